//! Column-oriented record sets and the shaping operations report recipes use
//!
//! Providers answer tabular queries as a field list plus row-major values.
//! [`Table`] keeps that shape: an ordered list of column names and rows of
//! loosely typed cells. Shaping operations are column-name driven, consume the
//! table and hand back the reshaped one, so recipes read as a chain. Every row
//! is always exactly as wide as the column list.

use crate::error::{Result, TableError};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A single value in a record set
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value
    Null,
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
}

impl Cell {
    /// Build a cell from a JSON value
    ///
    /// Numbers that do not fit an `f64` and non-scalar values degrade to their
    /// JSON text form.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::String(s) => Cell::Text(s.clone()),
            Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Text form used when rendering CSV; nulls render empty
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }

    /// Whether the cell is a missing value
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Key used when deduplicating; distinguishes nulls from empty text
    fn dedup_key(&self) -> String {
        match self {
            Cell::Null => "\u{0}".to_string(),
            Cell::Text(s) => format!("t:{s}"),
            Cell::Number(n) => format!("n:{n}"),
        }
    }
}

/// Ordering used by sorts: numbers numerically, otherwise by text, nulls last
fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Null, Cell::Null) => Ordering::Equal,
        (Cell::Null, _) => Ordering::Greater,
        (_, Cell::Null) => Ordering::Less,
        (Cell::Number(x), Cell::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (x, y) => x.render().cmp(&y.render()),
    }
}

/// A fetched record set: ordered columns plus row-major cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create an empty table from column name literals
    pub fn empty(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(ToString::to_string).collect())
    }

    /// Build a table from rows, validating that every row matches the columns
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table from a field list plus row-major JSON items
    pub fn from_json_rows(columns: Vec<String>, items: &[Vec<Value>]) -> Result<Self> {
        let mut table = Self::new(columns);
        for item in items {
            table.push_row(item.iter().map(Cell::from_json).collect())?;
        }
        Ok(table)
    }

    /// Build a table from JSON object rows, pulling the named columns
    ///
    /// Keys a row does not carry become nulls; extra keys are ignored.
    pub fn from_objects(columns: &[&str], records: &[Value]) -> Self {
        let mut table = Self::empty(columns);
        for record in records {
            let row = columns
                .iter()
                .map(|column| {
                    record
                        .get(*column)
                        .map_or(Cell::Null, |value| Cell::from_json(value))
                })
                .collect();
            // Width always matches the column list by construction.
            let _ = table.push_row(row);
        }
        table
    }

    /// Append one row
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in order
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table has the named column
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Cell at a row/column position
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column).ok()?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    /// All cells of one column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Rename columns; names not present are skipped
    pub fn rename(mut self, renames: &[(&str, &str)]) -> Self {
        for (from, to) in renames {
            if let Some(index) = self.columns.iter().position(|column| column == from) {
                self.columns[index] = (*to).to_string();
            }
        }
        self
    }

    /// Keep only the named columns, in the given order
    pub fn select(self, names: &[&str]) -> Result<Self> {
        let indexes = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indexes.iter().map(|&index| row[index].clone()).collect())
            .collect();
        Ok(Self {
            columns: names.iter().map(ToString::to_string).collect(),
            rows,
        })
    }

    /// Drop the named columns; names not present are skipped
    pub fn drop_columns(self, names: &[&str]) -> Self {
        let dropped: HashSet<&str> = names.iter().copied().collect();
        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&index| !dropped.contains(self.columns[index].as_str()))
            .collect();
        let columns = kept.iter().map(|&index| self.columns[index].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| kept.iter().map(|&index| row[index].clone()).collect())
            .collect();
        Self { columns, rows }
    }

    /// Set every row's value in a column, appending the column if missing
    pub fn with_column(mut self, name: &str, value: Cell) -> Self {
        if let Ok(index) = self.column_index(name) {
            for row in &mut self.rows {
                row[index] = value.clone();
            }
        } else {
            self.columns.push(name.to_string());
            for row in &mut self.rows {
                row.push(value.clone());
            }
        }
        self
    }

    /// Keep only rows whose cell in the named column satisfies the predicate
    pub fn filter(self, name: &str, keep: impl Fn(&Cell) -> bool) -> Result<Self> {
        let index = self.column_index(name)?;
        let rows = self
            .rows
            .into_iter()
            .filter(|row| keep(&row[index]))
            .collect();
        Ok(Self {
            columns: self.columns,
            rows,
        })
    }

    /// Sort rows ascending by the named column (stable; nulls sort last)
    pub fn sorted_by(mut self, name: &str) -> Result<Self> {
        let index = self.column_index(name)?;
        self.rows
            .sort_by(|a, b| compare_cells(&a[index], &b[index]));
        Ok(self)
    }

    /// Drop duplicate values in the named column, keeping the first occurrence
    pub fn dedup_keep_first(self, name: &str) -> Result<Self> {
        let index = self.column_index(name)?;
        let mut seen = HashSet::new();
        let rows = self
            .rows
            .into_iter()
            .filter(|row| seen.insert(row[index].dedup_key()))
            .collect();
        Ok(Self {
            columns: self.columns,
            rows,
        })
    }

    /// Drop duplicate values in the named column, keeping the last occurrence
    ///
    /// Kept rows stay in their original relative order.
    pub fn dedup_keep_last(self, name: &str) -> Result<Self> {
        let index = self.column_index(name)?;
        let mut last_position: HashMap<String, usize> = HashMap::new();
        for (position, row) in self.rows.iter().enumerate() {
            last_position.insert(row[index].dedup_key(), position);
        }
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .filter(|(position, row)| last_position.get(&row[index].dedup_key()) == Some(position))
            .map(|(_, row)| row)
            .collect();
        Ok(Self {
            columns: self.columns,
            rows,
        })
    }

    /// Drop rows that contain any null
    pub fn drop_null_rows(self) -> Self {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| !row.iter().any(Cell::is_null))
            .collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    /// Replace every null in the table with the given text
    pub fn fill_null(mut self, replacement: &str) -> Self {
        for row in &mut self.rows {
            for cell in row {
                if cell.is_null() {
                    *cell = Cell::Text(replacement.to_string());
                }
            }
        }
        self
    }

    /// Where the target column is null, copy the value from the source column
    pub fn fill_null_from(mut self, target: &str, source: &str) -> Result<Self> {
        let target_index = self.column_index(target)?;
        let source_index = self.column_index(source)?;
        for row in &mut self.rows {
            if row[target_index].is_null() {
                row[target_index] = row[source_index].clone();
            }
        }
        Ok(self)
    }

    /// Replace the target column with target divided by the denominator column
    ///
    /// Rows where either side is not numeric get a null.
    pub fn divide(mut self, target: &str, denominator: &str) -> Result<Self> {
        let target_index = self.column_index(target)?;
        let denominator_index = self.column_index(denominator)?;
        for row in &mut self.rows {
            row[target_index] =
                match (row[target_index].as_f64(), row[denominator_index].as_f64()) {
                    (Some(a), Some(b)) => Cell::Number(a / b),
                    _ => Cell::Null,
                };
        }
        Ok(self)
    }

    /// Apply a function to every cell of the named column
    pub fn map_column(mut self, name: &str, f: impl Fn(Cell) -> Cell) -> Result<Self> {
        let index = self.column_index(name)?;
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[index], Cell::Null);
            row[index] = f(cell);
        }
        Ok(self)
    }

    /// Keep only the last `n` rows
    pub fn tail(mut self, n: usize) -> Self {
        if self.rows.len() > n {
            self.rows.drain(..self.rows.len() - n);
        }
        self
    }

    /// Largest non-null value in the named column
    pub fn latest(&self, name: &str) -> Result<Option<Cell>> {
        let index = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| &row[index])
            .filter(|cell| !cell.is_null())
            .max_by(|a, b| compare_cells(a, b))
            .cloned())
    }

    /// Describe-style summary over the numeric cells of every column
    ///
    /// The output carries one label column named `index` followed by the
    /// source columns; rows are `count`, `mean`, `std`, `min`, one row per
    /// requested percentile, then `max`. `std` is the sample standard
    /// deviation and percentiles use linear interpolation. Columns with no
    /// numeric data get nulls (the count stays 0).
    pub fn describe(&self, percentiles: &[f64]) -> Self {
        let mut columns = vec!["index".to_string()];
        columns.extend(self.columns.iter().cloned());

        let series: Vec<Vec<f64>> = (0..self.columns.len())
            .map(|index| {
                let mut values: Vec<f64> = self
                    .rows
                    .iter()
                    .filter_map(|row| row[index].as_f64())
                    .collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                values
            })
            .collect();

        let mut labels: Vec<(String, fn(&[f64], f64) -> Option<f64>, f64)> = vec![
            ("count".to_string(), |values, _| Some(values.len() as f64), 0.0),
            ("mean".to_string(), |values, _| mean(values), 0.0),
            ("std".to_string(), |values, _| sample_std(values), 0.0),
            ("min".to_string(), |values, _| values.first().copied(), 0.0),
        ];
        for &p in percentiles {
            let label = format!("{}%", (p * 100.0).round() as i64);
            labels.push((label, percentile, p));
        }
        labels.push(("max".to_string(), |values, _| values.last().copied(), 0.0));

        let mut summary = Self::new(columns);
        for (label, stat, q) in labels {
            let mut row = vec![Cell::Text(label)];
            for values in &series {
                row.push(stat(values, q).map_or(Cell::Null, Cell::Number));
            }
            // Width matches the label column plus one cell per source column.
            let _ = summary.push_row(row);
        }
        summary
    }

    /// Render the table as CSV text with a header row
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::render))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TableError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolation percentile over sorted values, `q` in `[0, 1]`
fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_rows(
            vec!["code".to_string(), "time".to_string(), "holder_num".to_string()],
            vec![
                vec![
                    Cell::Text("000001.SZ".to_string()),
                    Cell::Text("20240103".to_string()),
                    Cell::Number(500.0),
                ],
                vec![
                    Cell::Text("000001.SZ".to_string()),
                    Cell::Text("20240101".to_string()),
                    Cell::Number(500.0),
                ],
                vec![
                    Cell::Text("000001.SZ".to_string()),
                    Cell::Text("20240102".to_string()),
                    Cell::Number(600.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_validates_width() {
        let mut table = Table::empty(&["a", "b"]);
        let result = table.push_row(vec![Cell::Number(1.0)]);
        assert!(matches!(
            result,
            Err(TableError::RowWidth { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Null);
        assert_eq!(Cell::from_json(&json!("x")), Cell::Text("x".to_string()));
        assert_eq!(Cell::from_json(&json!(1.5)), Cell::Number(1.5));
        assert_eq!(Cell::from_json(&json!(true)), Cell::Text("true".to_string()));
    }

    #[test]
    fn test_from_objects_fills_missing_keys() {
        let records = vec![
            json!({"name": "银行", "reason": "金融"}),
            json!({"name": "白酒"}),
        ];
        let table = Table::from_objects(&["name", "reason"], &records);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "reason"), Some(&Cell::Null));
    }

    #[test]
    fn test_rename_and_select() {
        let table = sample()
            .rename(&[("code", "stock"), ("missing", "ignored")])
            .select(&["stock", "holder_num"])
            .unwrap();
        assert_eq!(table.columns(), ["stock", "holder_num"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_select_missing_column_errors() {
        let result = sample().select(&["code", "nope"]);
        assert!(matches!(result, Err(TableError::ColumnNotFound(_))));
    }

    #[test]
    fn test_drop_columns_ignores_missing() {
        let table = sample().drop_columns(&["holder_num", "nope"]);
        assert_eq!(table.columns(), ["code", "time"]);
    }

    #[test]
    fn test_with_column_appends_and_replaces() {
        let table = sample().with_column("stock_code", Cell::Text("000001.SZ".to_string()));
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.get(2, "stock_code"), Some(&Cell::Text("000001.SZ".to_string())));

        let replaced = table.with_column("stock_code", Cell::Text("other".to_string()));
        assert_eq!(replaced.columns().len(), 4);
        assert_eq!(replaced.get(0, "stock_code"), Some(&Cell::Text("other".to_string())));
    }

    #[test]
    fn test_with_column_on_empty_table_adds_header_only() {
        let table = Table::empty(&["name", "reason"])
            .with_column("stock_code", Cell::Text("000001".to_string()));
        assert_eq!(table.columns(), ["name", "reason", "stock_code"]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv().unwrap(), "name,reason,stock_code\n");
    }

    #[test]
    fn test_sorted_by_time_then_dedup_keep_last() {
        let table = sample()
            .sorted_by("time")
            .unwrap()
            .dedup_keep_last("holder_num")
            .unwrap();
        // After sorting: 0101/500, 0102/600, 0103/500. The 500 at 0103 wins.
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "time"), Some(&Cell::Text("20240102".to_string())));
        assert_eq!(table.get(1, "time"), Some(&Cell::Text("20240103".to_string())));
    }

    #[test]
    fn test_dedup_keep_first() {
        let table = sample().dedup_keep_first("holder_num").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "time"), Some(&Cell::Text("20240103".to_string())));
    }

    #[test]
    fn test_drop_null_rows() {
        let mut table = Table::empty(&["a", "b"]);
        table.push_row(vec![Cell::Number(1.0), Cell::Null]).unwrap();
        table
            .push_row(vec![Cell::Number(2.0), Cell::Text("x".to_string())])
            .unwrap();
        let table = table.drop_null_rows();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "a"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn test_fill_null_from_then_divide() {
        let mut table = Table::empty(&["holder_name", "hold_amount", "hold_change"]);
        table
            .push_row(vec![
                Cell::Text("甲".to_string()),
                Cell::Number(500.0),
                Cell::Null,
            ])
            .unwrap();
        table
            .push_row(vec![
                Cell::Text("乙".to_string()),
                Cell::Number(200.0),
                Cell::Number(50.0),
            ])
            .unwrap();
        let table = table
            .fill_null_from("hold_change", "hold_amount")
            .unwrap()
            .divide("hold_change", "hold_amount")
            .unwrap();
        // A null change is filled from the amount, so the ratio is exactly 1.
        assert_eq!(table.get(0, "hold_change"), Some(&Cell::Number(1.0)));
        assert_eq!(table.get(1, "hold_change"), Some(&Cell::Number(0.25)));
    }

    #[test]
    fn test_divide_with_null_denominator_yields_null() {
        let mut table = Table::empty(&["a", "b"]);
        table.push_row(vec![Cell::Number(1.0), Cell::Null]).unwrap();
        let table = table.divide("a", "b").unwrap();
        assert_eq!(table.get(0, "a"), Some(&Cell::Null));
    }

    #[test]
    fn test_filter() {
        let table = sample()
            .filter("time", |cell| {
                cell.as_str().is_some_and(|s| s >= "20240102")
            })
            .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_tail() {
        let table = sample().sorted_by("time").unwrap().tail(2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "time"), Some(&Cell::Text("20240102".to_string())));
    }

    #[test]
    fn test_latest() {
        let newest = sample().latest("time").unwrap();
        assert_eq!(newest, Some(Cell::Text("20240103".to_string())));
        assert_eq!(Table::empty(&["time"]).latest("time").unwrap(), None);
    }

    #[test]
    fn test_map_column() {
        let table = sample()
            .map_column("holder_num", |cell| match cell {
                Cell::Number(n) => Cell::Number(n * 10.0),
                other => other,
            })
            .unwrap();
        assert_eq!(table.get(0, "holder_num"), Some(&Cell::Number(5000.0)));
    }

    #[test]
    fn test_describe_stats() {
        let mut table = Table::empty(&["pe"]);
        for value in [1.0, 2.0, 3.0, 4.0] {
            table.push_row(vec![Cell::Number(value)]).unwrap();
        }
        let summary = table.describe(&[0.1, 0.25, 0.5, 0.75, 0.9]);

        assert_eq!(summary.columns(), ["index", "pe"]);
        let labels: Vec<String> = summary
            .column("index")
            .unwrap()
            .iter()
            .map(|cell| cell.render())
            .collect();
        assert_eq!(
            labels,
            ["count", "mean", "std", "min", "10%", "25%", "50%", "75%", "90%", "max"]
        );

        let value_at = |label: &str| {
            let row = labels.iter().position(|l| l == label).unwrap();
            summary.get(row, "pe").unwrap().as_f64().unwrap()
        };
        assert!((value_at("count") - 4.0).abs() < 1e-9);
        assert!((value_at("mean") - 2.5).abs() < 1e-9);
        assert!((value_at("std") - 1.290_994_448_735_805_6).abs() < 1e-9);
        assert!((value_at("min") - 1.0).abs() < 1e-9);
        assert!((value_at("10%") - 1.3).abs() < 1e-9);
        assert!((value_at("50%") - 2.5).abs() < 1e-9);
        assert!((value_at("90%") - 3.7).abs() < 1e-9);
        assert!((value_at("max") - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_describe_skips_nulls_and_text() {
        let mut table = Table::empty(&["pe"]);
        table.push_row(vec![Cell::Number(2.0)]).unwrap();
        table.push_row(vec![Cell::Null]).unwrap();
        table.push_row(vec![Cell::Text("n/a".to_string())]).unwrap();
        let summary = table.describe(&[0.5]);
        assert_eq!(summary.get(0, "pe"), Some(&Cell::Number(1.0)));
        // One value: the deviation is undefined.
        assert_eq!(summary.get(2, "pe"), Some(&Cell::Null));
    }

    #[test]
    fn test_to_csv_quotes_embedded_commas() {
        let mut table = Table::empty(&["title", "pub_time"]);
        table
            .push_row(vec![
                Cell::Text("盈利上行, 估值修复".to_string()),
                Cell::Text("2024-01-01 09:30:00".to_string()),
            ])
            .unwrap();
        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "title,pub_time\n\"盈利上行, 估值修复\",2024-01-01 09:30:00\n");
    }

    #[test]
    fn test_to_csv_renders_nulls_empty() {
        let mut table = Table::empty(&["a", "b"]);
        table.push_row(vec![Cell::Null, Cell::Number(1.0)]).unwrap();
        assert_eq!(table.to_csv().unwrap(), "a,b\n,1\n");
    }
}
