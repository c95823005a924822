//! Date formats and windows shared by the report recipes
//!
//! Providers disagree on date shapes: quote endpoints take `YYYYMMDD`, the
//! fundamentals endpoint reports `YYYY-MM-DD`, and news feeds add a clock.
//! The loose parsers accept each shape in turn so recipes can normalize
//! whatever comes back.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Compact date format used by quote-style endpoints
pub const COMPACT_DATE: &str = "%Y%m%d";

/// Dashed date format used in rendered reports
pub const DASHED_DATE: &str = "%Y-%m-%d";

/// Start and end of a lookback window, both in compact form
pub fn compact_window(end: NaiveDate, days_back: i64) -> (String, String) {
    let start = end - Duration::days(days_back);
    (
        start.format(COMPACT_DATE).to_string(),
        end.format(COMPACT_DATE).to_string(),
    )
}

/// Parse a date in compact or dashed form, or the date part of a datetime
pub fn parse_date_loose(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, COMPACT_DATE)
        .or_else(|_| NaiveDate::parse_from_str(text, DASHED_DATE))
        .ok()
        .or_else(|| parse_datetime_loose(text).map(|dt| dt.date()))
}

/// Parse a timestamp with either a space or a `T` separator
pub fn parse_datetime_loose(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
