//! Stock code normalization and code/name lookup
//!
//! A-share codes are six digits plus an exchange suffix: `6`-leading codes
//! trade in Shanghai, everything else in Shenzhen. Users type codes with or
//! without the suffix, or type display names; the lookup direction is picked
//! from the first query's leading character.

use crate::context::ReportContext;
use crate::error::Result;
use brief_core::Table;
use brief_data::TushareClient;
use std::collections::HashSet;
use tracing::warn;

/// Suffix for Shanghai-listed codes
pub const SHANGHAI_SUFFIX: &str = ".SH";

/// Suffix for Shenzhen-listed codes
pub const SHENZHEN_SUFFIX: &str = ".SZ";

/// Keep only the digits of a code, dropping any exchange suffix
pub fn bare_digits(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a code to its suffixed exchange form
pub fn normalize_code(code: &str) -> String {
    let digits = bare_digits(code);
    if digits.starts_with('6') {
        format!("{digits}{SHANGHAI_SUFFIX}")
    } else {
        format!("{digits}{SHENZHEN_SUFFIX}")
    }
}

/// Normalize a batch of codes
pub fn normalize_codes(codes: &[String]) -> Vec<String> {
    codes.iter().map(|code| normalize_code(code)).collect()
}

/// Direction of a code/name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Queries are codes; answer with names
    CodeToName,
    /// Queries are names; answer with codes
    NameToCode,
}

/// Pick the lookup direction from the first query's leading character
pub fn detect_mode(queries: &[String]) -> LookupMode {
    let leading_digit = queries
        .first()
        .and_then(|first| first.chars().next())
        .is_some_and(|c| c.is_ascii_digit());
    if leading_digit {
        LookupMode::CodeToName
    } else {
        LookupMode::NameToCode
    }
}

/// Look up the listing rows matching the queries, as a `code,name` table
pub async fn code_name_table(tushare: &TushareClient, queries: &[String]) -> Result<Table> {
    let mode = detect_mode(queries);
    let (column, targets) = match mode {
        LookupMode::CodeToName => {
            let codes: HashSet<String> = normalize_codes(queries).into_iter().collect();
            ("code", codes)
        }
        LookupMode::NameToCode => ("name", queries.iter().cloned().collect()),
    };

    let listing = tushare.stock_basic().await?.rename(&[("ts_code", "code")]);
    Ok(listing.filter(column, |cell| {
        cell.as_str().is_some_and(|s| targets.contains(s))
    })?)
}

/// Transform codes or names and render the matches as CSV
///
/// Lookup failures come back as a single `error,<message>` line instead of
/// an error, so the command always prints something usable.
pub async fn code_name_transformer(context: &ReportContext, queries: &[String]) -> String {
    match code_name_table(context.tushare(), queries).await {
        Ok(table) => match table.to_csv() {
            Ok(csv) => csv,
            Err(e) => format!("error,{e}"),
        },
        Err(e) => {
            warn!(queries = ?queries, error = %e, "Code/name lookup failed");
            format!("error,{e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_data::TushareConfig;

    #[test]
    fn test_bare_digits_strips_suffix() {
        assert_eq!(bare_digits("000001.SZ"), "000001");
        assert_eq!(bare_digits("600519"), "600519");
        assert_eq!(bare_digits("sh600519"), "600519");
    }

    #[test]
    fn test_normalize_code_picks_exchange_by_leading_digit() {
        assert_eq!(normalize_code("600519"), "600519.SH");
        assert_eq!(normalize_code("688981"), "688981.SH");
        assert_eq!(normalize_code("000001"), "000001.SZ");
        assert_eq!(normalize_code("300750"), "300750.SZ");
        assert_eq!(normalize_code("000001.SZ"), "000001.SZ");
    }

    #[test]
    fn test_detect_mode() {
        assert_eq!(
            detect_mode(&["000001.SZ".to_string()]),
            LookupMode::CodeToName
        );
        assert_eq!(
            detect_mode(&["平安银行".to_string()]),
            LookupMode::NameToCode
        );
        assert_eq!(detect_mode(&[]), LookupMode::NameToCode);
        assert_eq!(detect_mode(&[String::new()]), LookupMode::NameToCode);
    }

    // Live API test, needs TUSHARE_TOKEN
    #[tokio::test]
    #[ignore]
    async fn test_live_code_name_transformer() {
        let context = ReportContext::from_env().unwrap();
        let csv = code_name_transformer(&context, &["000001".to_string()]).await;
        assert!(csv.starts_with("code,name\n"));
        assert!(csv.contains("000001.SZ"));
    }

    #[tokio::test]
    async fn test_transformer_renders_lookup_failure_inline() {
        let config = TushareConfig::new("test-token").with_api_base("http://127.0.0.1:9");
        let context =
            ReportContext::with_config(crate::ReportConfig::new(config)).unwrap();
        let result = code_name_transformer(&context, &["000001".to_string()]).await;
        assert!(result.starts_with("error,"));
    }
}
