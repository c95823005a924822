//! Tushare Pro client
//!
//! Tushare exposes every dataset through a single POST endpoint: the request
//! names the API, carries the token, a params object and a comma-separated
//! field list; the response is a field list plus row-major items, which maps
//! straight onto [`Table`].

use crate::error::{DataError, Result};
use brief_core::Table;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TUSHARE_API_BASE: &str = "http://api.tushare.pro";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Tushare client
#[derive(Debug, Clone)]
pub struct TushareConfig {
    /// API token for authentication
    pub token: String,

    /// Endpoint URL (default: "http://api.tushare.pro")
    pub api_base: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl TushareConfig {
    /// Create a new config with the given token and default settings
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_TUSHARE_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the token from `TUSHARE_TOKEN`. Optionally reads the endpoint
    /// from `TUSHARE_API_BASE` if set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TUSHARE_TOKEN").map_err(|_| {
            DataError::Configuration("TUSHARE_TOKEN environment variable not set".to_string())
        })?;

        let api_base = std::env::var("TUSHARE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_TUSHARE_API_BASE.to_string());

        Ok(Self {
            token,
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set a custom endpoint URL
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

/// Tushare Pro client
///
/// Carries the generic [`query`](TushareClient::query) plus one wrapper per
/// dataset the report recipes use.
pub struct TushareClient {
    client: Client,
    config: TushareConfig,
}

impl TushareClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: TushareConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new client with the given token and default settings
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(TushareConfig::new(token))
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = TushareConfig::from_env()?;
        Self::with_config(config)
    }

    /// Get the current configuration
    pub fn config(&self) -> &TushareConfig {
        &self.config
    }

    /// Run one Tushare query and decode the answer into a table
    ///
    /// # Arguments
    ///
    /// * `api_name` - Dataset name, e.g. `stock_basic`
    /// * `params` - Dataset parameters as a JSON object
    /// * `fields` - Comma-separated fields to return; empty means all
    pub async fn query(&self, api_name: &str, params: Value, fields: &str) -> Result<Table> {
        debug!(api_name, "Querying Tushare");

        let request = TushareRequest {
            api_name,
            token: &self.config.token,
            params,
            fields,
        };

        let response = self
            .client
            .post(&self.config.api_base)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                provider: "tushare",
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        let body: TushareResponse = response.json().await?;
        if body.code != 0 {
            return Err(DataError::Api {
                provider: "tushare",
                message: body
                    .msg
                    .unwrap_or_else(|| format!("request failed with code {}", body.code)),
            });
        }

        let payload = body.data.ok_or_else(|| {
            DataError::UnexpectedResponse("Tushare answer carried no data payload".to_string())
        })?;
        Ok(Table::from_json_rows(payload.fields, &payload.items)?)
    }

    /// All listed stocks with their codes and display names
    pub async fn stock_basic(&self) -> Result<Table> {
        self.query(
            "stock_basic",
            json!({"exchange": "", "list_status": "L"}),
            "ts_code,name",
        )
        .await
    }

    /// Shareholder counts per announcement date inside a window
    pub async fn stk_holdernumber(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        self.query(
            "stk_holdernumber",
            json!({"ts_code": ts_code, "start_date": start_date, "end_date": end_date}),
            "ts_code,ann_date,holder_num",
        )
        .await
    }

    /// Top ten holders of tradable shares inside a window
    pub async fn top10_floatholders(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        self.query(
            "top10_floatholders",
            json!({"ts_code": ts_code, "start_date": start_date, "end_date": end_date}),
            "",
        )
        .await
    }

    /// Top ten registered holders inside a window
    pub async fn top10_holders(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        self.query(
            "top10_holders",
            json!({"ts_code": ts_code, "start_date": start_date, "end_date": end_date}),
            "",
        )
        .await
    }

    /// Daily valuation indicators inside a window
    pub async fn daily_basic(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        self.query(
            "daily_basic",
            json!({"ts_code": ts_code, "start_date": start_date, "end_date": end_date}),
            "trade_date,pe,pe_ttm,pb,ps,ps_ttm,dv_ratio,dv_ttm,total_mv,circ_mv",
        )
        .await
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct TushareRequest<'a> {
    api_name: &'a str,
    token: &'a str,
    params: Value,
    fields: &'a str,
}

#[derive(Debug, Deserialize)]
struct TushareResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<TusharePayload>,
}

#[derive(Debug, Deserialize)]
struct TusharePayload {
    fields: Vec<String>,
    items: Vec<Vec<Value>>,
}

// ============================================================================
// Tests
// ============================================================================
