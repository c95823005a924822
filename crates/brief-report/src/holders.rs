//! Shareholder report: counts plus the two top-ten holder tables
//!
//! Three datasets per code over a one-year window. Counts keep one row per
//! announcement date with stale duplicates dropped; the top-ten tables keep
//! only the newest disclosure and turn the change column into a ratio of the
//! held amount.

use crate::context::ReportContext;
use crate::error::Result;
use brief_core::dates::compact_window;
use brief_core::{assemble, Block, Cell, Section, Table};
use brief_data::TushareClient;
use chrono::Local;

const HOLDER_WINDOW_DAYS: i64 = 365;

/// Shape the shareholder count dataset
///
/// Sorts by announcement date, drops repeated counts keeping the newest,
/// then drops repeated dates and rows with missing values.
pub fn shape_counts(table: Table) -> Result<Table> {
    Ok(table
        .rename(&[("ts_code", "code"), ("ann_date", "time")])
        .sorted_by("time")?
        .dedup_keep_last("holder_num")?
        .dedup_keep_last("time")?
        .drop_null_rows())
}

/// Shape a top-ten holders dataset
///
/// Keeps only the newest disclosure date. A missing change is treated as a
/// fresh position, so it is filled from the held amount before the change
/// becomes a ratio of that amount; the raw amount and date columns then drop
/// out of the rendered table.
pub fn shape_top_holders(table: Table) -> Result<Table> {
    let table = table.rename(&[("ts_code", "code"), ("ann_date", "time")]);
    let table = match table.latest("time")? {
        Some(newest) => table.filter("time", |cell| *cell == newest)?,
        None => table,
    };
    Ok(table
        .fill_null_from("hold_change", "hold_amount")?
        .divide("hold_change", "hold_amount")?
        .drop_columns(&["hold_amount", "time"]))
}

async fn holder_section(
    tushare: &TushareClient,
    code: String,
    start: &str,
    end: &str,
) -> Result<Section> {
    let counts = shape_counts(tushare.stk_holdernumber(&code, start, end).await?)?
        .with_column("stock_code", Cell::Text(code.clone()));
    let float_top = shape_top_holders(tushare.top10_floatholders(&code, start, end).await?)?
        .with_column("stock_code", Cell::Text(code.clone()));
    let top = shape_top_holders(tushare.top10_holders(&code, start, end).await?)?
        .with_column("stock_code", Cell::Text(code.clone()));

    Ok(Section::new(&code, "近一年股东数据")
        .with_block(Block::from_table("股东数", &counts)?)
        .with_block(Block::from_table("十大流通股东", &float_top)?)
        .with_block(Block::from_table("十大股东", &top)?))
}

/// Build the shareholder report for a batch of codes
///
/// One section per code; a failed code renders as an inline failure line.
pub async fn holder_report(context: &ReportContext, codes: &[String]) -> String {
    let (start, end) = compact_window(Local::now().date_naive(), HOLDER_WINDOW_DAYS);
    let tushare = context.tushare();

    assemble(codes, |code| {
        let start = start.clone();
        let end = end.clone();
        async move { holder_section(tushare, code, &start, &end).await }
    })
    .await
    .render()
}
