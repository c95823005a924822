//! Report assembly: per-key sections that either carry data blocks or an
//! inline failure line
//!
//! Batch commands walk a list of keys (stock codes, keywords), fetch and
//! shape data for each, and print one combined report. A key that fails must
//! not sink the batch: its section renders as a failure line and the loop
//! moves on.

use crate::table::Table;
use std::fmt::Display;
use std::future::Future;

/// One titled CSV block inside a data section
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    heading: String,
    csv: String,
}

impl Block {
    pub fn new(heading: impl Into<String>, csv: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            csv: csv.into(),
        }
    }

    /// Render a table into a block, keeping the table's CSV text
    pub fn from_table(heading: impl Into<String>, table: &Table) -> crate::error::Result<Self> {
        Ok(Self::new(heading, table.to_csv()?))
    }
}

/// One key's slice of a report
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Shaped data for the key, as titled CSV blocks
    Data {
        key: String,
        title: String,
        blocks: Vec<Block>,
    },
    /// The key's fetch failed; the report carries the message inline
    Failure { key: String, message: String },
}

impl Section {
    /// Create a data section with no blocks yet
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Section::Data {
            key: key.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Create a failure section
    pub fn failure(key: impl Into<String>, message: impl Into<String>) -> Self {
        Section::Failure {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Append a block to a data section; no-op on a failure section
    pub fn with_block(mut self, block: Block) -> Self {
        if let Section::Data { blocks, .. } = &mut self {
            blocks.push(block);
        }
        self
    }

    /// The key this section reports on
    pub fn key(&self) -> &str {
        match self {
            Section::Data { key, .. } | Section::Failure { key, .. } => key,
        }
    }

    /// Whether this section carries a failure instead of data
    pub fn is_failure(&self) -> bool {
        matches!(self, Section::Failure { .. })
    }

    /// Render the section as report text
    ///
    /// Data sections render a `# key title` heading followed by `## heading`
    /// plus CSV per block; failures render a single `数据获取失败` line.
    pub fn render(&self) -> String {
        match self {
            Section::Data { key, title, blocks } => {
                let mut out = format!("# {key} {title}\n");
                for block in blocks {
                    out.push_str(&format!("## {}\n{}\n", block.heading, block.csv));
                }
                out
            }
            Section::Failure { key, message } => {
                format!("# {key} 数据获取失败: {message}\n")
            }
        }
    }
}

/// A full report: one section per requested key, in request order
#[derive(Debug, Clone, Default)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render all sections joined by blank lines
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(Section::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fetch one section per key, turning per-key errors into failure sections
///
/// Keys are processed in order and one at a time. The report always carries
/// exactly one section per key.
pub async fn assemble<F, Fut, E>(keys: &[String], fetch: F) -> Report
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = std::result::Result<Section, E>>,
    E: Display,
{
    let mut report = Report::new();
    for key in keys {
        match fetch(key.clone()).await {
            Ok(section) => report.push(section),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Section fetch failed");
                report.push(Section::failure(key, e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Table};

    fn holder_table() -> Table {
        let mut table = Table::empty(&["time", "holder_num"]);
        table
            .push_row(vec![
                Cell::Text("20240101".to_string()),
                Cell::Number(500.0),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_data_section_render() {
        let section = Section::new("000001.SZ", "近一年股东数据")
            .with_block(Block::from_table("股东数", &holder_table()).unwrap());
        assert_eq!(
            section.render(),
            "# 000001.SZ 近一年股东数据\n## 股东数\ntime,holder_num\n20240101,500\n\n"
        );
    }

    #[test]
    fn test_failure_section_render() {
        let section = Section::failure("000001.SZ", "抱歉，您每天最多访问该接口1次");
        assert_eq!(
            section.render(),
            "# 000001.SZ 数据获取失败: 抱歉，您每天最多访问该接口1次\n"
        );
    }

    #[test]
    fn test_report_joins_sections_with_blank_line() {
        let mut report = Report::new();
        report.push(Section::failure("a", "x"));
        report.push(Section::failure("b", "y"));
        assert_eq!(
            report.render(),
            "# a 数据获取失败: x\n\n# b 数据获取失败: y\n"
        );
    }

    #[tokio::test]
    async fn test_assemble_isolates_failures() {
        let keys = vec!["000001.SZ".to_string(), "600519.SH".to_string()];
        let report = assemble(&keys, |key| async move {
            if key.starts_with('6') {
                Err("upstream busy".to_string())
            } else {
                Ok(Section::new(key, "近一年股东数据"))
            }
        })
        .await;

        assert_eq!(report.len(), 2);
        assert!(!report.sections()[0].is_failure());
        assert!(report.sections()[1].is_failure());
        assert_eq!(report.sections()[1].key(), "600519.SH");
    }

    #[tokio::test]
    async fn test_assemble_keeps_request_order() {
        let keys = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let report = assemble(&keys, |key| async move {
            Ok::<_, String>(Section::new(key, "t"))
        })
        .await;
        let order: Vec<&str> = report.sections().iter().map(Section::key).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }
}
