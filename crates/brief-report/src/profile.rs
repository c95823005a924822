//! Stock profile report: concept boards, industry plates and risk flags
//!
//! Each lookup degrades independently. A failed upstream call leaves an
//! empty table with the canonical columns in place, so the section always
//! renders all three blocks.

use crate::context::ReportContext;
use crate::error::Result;
use crate::symbols::bare_digits;
use crate::HITHINK_UNCONFIGURED;
use brief_core::{assemble, Block, Cell, Section, Table};
use brief_data::hithink::{CONCEPT_COLUMNS, INDUSTRY_COLUMNS, RISK_COLUMNS};
use brief_data::HithinkClient;
use tracing::warn;

const RISK_PLACEHOLDER: &str = "无";

async fn concept_table(hithink: &HithinkClient, digits: &str) -> Table {
    match hithink.concept_boards(digits).await {
        Ok(table) => table,
        Err(e) => {
            warn!(code = %digits, error = %e, "Concept lookup failed");
            Table::empty(&CONCEPT_COLUMNS)
        }
    }
}

async fn industry_table(hithink: &HithinkClient, digits: &str) -> Table {
    match hithink.industry_plates(digits).await {
        Ok(table) => table,
        Err(e) => {
            warn!(code = %digits, error = %e, "Industry lookup failed");
            Table::empty(&INDUSTRY_COLUMNS)
        }
    }
}

async fn risk_table(hithink: &HithinkClient, digits: &str) -> Table {
    match hithink.risk_flags(digits).await {
        Ok(table) => table.fill_null(RISK_PLACEHOLDER),
        Err(e) => {
            warn!(code = %digits, error = %e, "Risk lookup failed");
            Table::empty(&RISK_COLUMNS)
        }
    }
}

async fn profile_section(hithink: &HithinkClient, code: String) -> Result<Section> {
    let digits = bare_digits(&code);
    let stamp = || Cell::Text(code.clone());

    let concepts = concept_table(hithink, &digits)
        .await
        .with_column("stock_code", stamp());
    let plates = industry_table(hithink, &digits)
        .await
        .with_column("stock_code", stamp());
    let risks = risk_table(hithink, &digits)
        .await
        .with_column("stock_code", stamp());

    Ok(Section::new(&code, "股票信息")
        .with_block(Block::from_table("概念", &concepts)?)
        .with_block(Block::from_table("行业板块", &plates)?)
        .with_block(Block::from_table("风险提示", &risks)?))
}

/// Build the profile report for a batch of codes
///
/// Codes pass through as given; only the upstream lookups use the bare
/// digits.
pub async fn stock_info_report(context: &ReportContext, codes: &[String]) -> String {
    let Some(hithink) = context.hithink() else {
        return HITHINK_UNCONFIGURED.to_string();
    };

    assemble(codes, |code| profile_section(hithink, code))
        .await
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ReportConfig;
    use brief_data::{HithinkConfig, TushareConfig};

    #[tokio::test]
    async fn test_profile_report_degrades_to_empty_blocks() {
        let config = ReportConfig::new(TushareConfig::new("test-token"))
            .with_hithink(HithinkConfig::new().with_api_base("http://127.0.0.1:9"));
        let context = ReportContext::with_config(config).unwrap();

        let report = stock_info_report(&context, &["000001.SZ".to_string()]).await;

        assert!(report.starts_with("# 000001.SZ 股票信息\n"));
        assert!(report.contains("## 概念\nname,reason,stock_code\n"));
        assert!(report.contains("## 行业板块\nplate_name,stock_code\n"));
        assert!(report.contains("## 风险提示\nt_type,reason,stock_code\n"));
    }

    #[tokio::test]
    async fn test_profile_report_without_fundamentals_provider() {
        let config = ReportConfig::new(TushareConfig::new("test-token")).without_hithink();
        let context = ReportContext::with_config(config).unwrap();

        let report = stock_info_report(&context, &["000001.SZ".to_string()]).await;
        assert_eq!(report, HITHINK_UNCONFIGURED);
    }

    // Live API test, needs network access
    #[tokio::test]
    #[ignore]
    async fn test_live_profile_report() {
        let context = ReportContext::with_config(ReportConfig::new(TushareConfig::new(
            "unused-token",
        )))
        .unwrap();
        let report = stock_info_report(&context, &["000001".to_string()]).await;
        assert!(report.starts_with("# 000001 股票信息"));
    }
}
