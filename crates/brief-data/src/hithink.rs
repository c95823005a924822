//! Hithink F10 fundamentals client
//!
//! Serves the descriptive datasets behind a stock profile: concept board
//! membership, industry plates, risk flags and the core financial indicator
//! history. Every endpoint answers the same envelope of a status code plus a
//! list of JSON records, so one fetch path covers all four datasets.

use crate::error::{DataError, Result};
use brief_core::Table;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_HITHINK_API_BASE: &str = "https://basic.10jqka.com.cn/basicapi";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Columns of a concept board record
pub const CONCEPT_COLUMNS: [&str; 2] = ["name", "reason"];

/// Columns of an industry plate record
pub const INDUSTRY_COLUMNS: [&str; 1] = ["plate_name"];

/// Columns of a risk flag record
pub const RISK_COLUMNS: [&str; 2] = ["t_type", "reason"];

/// Columns of a core indicator record, one row per report period
pub const CORE_INDICATOR_COLUMNS: [&str; 22] = [
    "stock_code",
    "short_name",
    "report_date",
    "basic_eps",
    "diluted_eps",
    "net_profit",
    "net_profit_growth_ratio",
    "deduct_net_profit",
    "total_revenue",
    "total_revenue_growth_ratio",
    "roe",
    "roe_diluted",
    "bps",
    "capital_reserve_ps",
    "undist_profit_ps",
    "net_cash_flow_ps",
    "gross_margin",
    "net_margin",
    "debt_ratio",
    "total_asset_turn_days",
    "inv_turn_days",
    "acct_recv_turn_days",
];

/// Configuration for the Hithink client
#[derive(Debug, Clone)]
pub struct HithinkConfig {
    /// Base URL (default: "https://basic.10jqka.com.cn/basicapi")
    pub api_base: String,

    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,
}

impl HithinkConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self {
            api_base: DEFAULT_HITHINK_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Optionally reads the base URL from `HITHINK_API_BASE` if set.
    pub fn from_env() -> Self {
        let api_base = std::env::var("HITHINK_API_BASE")
            .unwrap_or_else(|_| DEFAULT_HITHINK_API_BASE.to_string());
        Self {
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for HithinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hithink F10 fundamentals client
pub struct HithinkClient {
    client: Client,
    config: HithinkConfig,
}

impl HithinkClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: HithinkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HithinkConfig::new())
    }

    /// Get the current configuration
    pub fn config(&self) -> &HithinkConfig {
        &self.config
    }

    /// Concept boards the stock belongs to, with inclusion reasons
    ///
    /// `code` is the bare six-digit code without an exchange suffix.
    pub async fn concept_boards(&self, code: &str) -> Result<Table> {
        self.fetch(&format!("concept/stock/{code}"), &CONCEPT_COLUMNS)
            .await
    }

    /// Industry plates the stock is classified under
    pub async fn industry_plates(&self, code: &str) -> Result<Table> {
        self.fetch(&format!("plate/stock/{code}/industry"), &INDUSTRY_COLUMNS)
            .await
    }

    /// Outstanding risk flags for the stock
    pub async fn risk_flags(&self, code: &str) -> Result<Table> {
        self.fetch(&format!("risk/stock/{code}"), &RISK_COLUMNS).await
    }

    /// Core financial indicators, one record per report period
    pub async fn core_indicators(&self, code: &str) -> Result<Table> {
        self.fetch(&format!("finance/stock/{code}/core"), &CORE_INDICATOR_COLUMNS)
            .await
    }

    async fn fetch(&self, path: &str, columns: &[&str]) -> Result<Table> {
        let url = format!("{}/{}", self.config.api_base, path);
        debug!(%url, "Fetching fundamentals");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                provider: "hithink",
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        let body: F10Response = response.json().await?;
        if body.status_code != 0 {
            return Err(DataError::Api {
                provider: "hithink",
                message: body
                    .status_msg
                    .unwrap_or_else(|| format!("request failed with status {}", body.status_code)),
            });
        }

        Ok(Table::from_objects(columns, &body.data))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct F10Response {
    status_code: i64,
    #[serde(default)]
    status_msg: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
}

// ============================================================================
// Tests
// ============================================================================
