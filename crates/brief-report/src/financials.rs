//! Financial report: core indicator history plus valuation statistics
//!
//! Two datasets per code. The valuation table is a describe-style summary of
//! the last 250 trading days with the newest row labeled `current`; the
//! indicator table keeps the latest twelve report periods.

use crate::context::ReportContext;
use crate::error::Result;
use crate::symbols::bare_digits;
use crate::HITHINK_UNCONFIGURED;
use brief_core::dates::{compact_window, parse_date_loose, DASHED_DATE};
use brief_core::{assemble, Block, Cell, Section, Table};
use brief_data::{HithinkClient, TushareClient};
use chrono::Local;
use std::collections::HashSet;

const VALUATION_WINDOW_DAYS: i64 = 365;
const VALUATION_WINDOW_ROWS: usize = 250;
const VALUATION_PERCENTILES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];
const INDICATOR_PERIODS: usize = 12;

// Market values arrive in units of ten thousand yuan.
const MARKET_VALUE_SCALE: f64 = 10_000.0;

const DROPPED_INDICATOR_COLUMNS: [&str; 5] = [
    "stock_code",
    "short_name",
    "total_asset_turn_days",
    "inv_turn_days",
    "acct_recv_turn_days",
];

fn scale_market_value(cell: Cell) -> Cell {
    match cell {
        Cell::Number(n) => Cell::Number(n * MARKET_VALUE_SCALE),
        other => other,
    }
}

/// Shape the daily valuation dataset into summary statistics
///
/// Scales the market value columns to yuan, keeps the last 250 trading days
/// and describes them, then appends the newest day's values as a `current`
/// row.
pub fn shape_valuation(table: Table) -> Result<Table> {
    let table = table
        .map_column("total_mv", scale_market_value)?
        .map_column("circ_mv", scale_market_value)?
        .sorted_by("trade_date")?
        .tail(VALUATION_WINDOW_ROWS)
        .drop_columns(&["trade_date"]);

    let mut summary = table.describe(&VALUATION_PERCENTILES);
    if let Some(last) = table.rows().last() {
        let mut row = vec![Cell::Text("current".to_string())];
        row.extend(last.iter().cloned());
        summary.push_row(row)?;
    }
    Ok(summary)
}

/// Shape the core indicator history down to the latest report periods
///
/// Keeps rows from the twelve newest distinct report dates, drops the
/// identity and turnover-days columns, normalizes report dates to dashed
/// form and stamps the full code back on.
pub fn shape_indicators(table: Table, code: &str) -> Result<Table> {
    let table = table.sorted_by("report_date")?;

    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for cell in table.column("report_date")? {
        let key = cell.render();
        if seen.insert(key.clone()) {
            distinct.push(key);
        }
    }
    let kept: HashSet<String> = distinct.into_iter().rev().take(INDICATOR_PERIODS).collect();

    Ok(table
        .filter("report_date", |cell| kept.contains(&cell.render()))?
        .drop_columns(&DROPPED_INDICATOR_COLUMNS)
        .map_column("report_date", normalize_report_date)?
        .with_column("stock_code", Cell::Text(code.to_string())))
}

fn normalize_report_date(cell: Cell) -> Cell {
    match &cell {
        Cell::Text(text) => match parse_date_loose(text) {
            Some(date) => Cell::Text(date.format(DASHED_DATE).to_string()),
            None => cell,
        },
        _ => cell,
    }
}

async fn financial_section(
    tushare: &TushareClient,
    hithink: &HithinkClient,
    code: String,
    start: &str,
    end: &str,
) -> Result<Section> {
    let valuation = shape_valuation(tushare.daily_basic(&code, start, end).await?)?
        .with_column("stock_code", Cell::Text(code.clone()));
    let indicators =
        shape_indicators(hithink.core_indicators(&bare_digits(&code)).await?, &code)?;

    Ok(Section::new(&code, "财务与估值数据")
        .with_block(Block::from_table("近12期核心财务指标", &indicators)?)
        .with_block(Block::from_table("近一年估值统计", &valuation)?))
}

/// Build the financial report for a batch of codes
///
/// Answers the sentinel line when the fundamentals provider is not
/// configured; otherwise one section per code with failures kept inline.
pub async fn financial_report(context: &ReportContext, codes: &[String]) -> String {
    let Some(hithink) = context.hithink() else {
        return HITHINK_UNCONFIGURED.to_string();
    };
    let (start, end) = compact_window(Local::now().date_naive(), VALUATION_WINDOW_DAYS);
    let tushare = context.tushare();

    assemble(codes, |code| {
        let start = start.clone();
        let end = end.clone();
        async move { financial_section(tushare, hithink, code, &start, &end).await }
    })
    .await
    .render()
}
