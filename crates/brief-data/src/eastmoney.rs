//! Eastmoney news search client
//!
//! The search endpoint is JSONP-only: the answer wraps a JSON body in a
//! callback invocation, and matched spans inside titles and bodies carry
//! `<em>` highlight tags. The client strips both before handing records out.

use crate::error::{DataError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const DEFAULT_SEARCH_API_BASE: &str = "https://search-api-web.eastmoney.com";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CALLBACK: &str = "jsonp";

/// One news article returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    /// Article title
    #[serde(default)]
    pub title: String,

    /// Article body
    #[serde(default)]
    pub content: String,

    /// Publication timestamp, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "date", default)]
    pub pub_time: String,

    /// Publishing outlet
    #[serde(rename = "mediaName", default)]
    pub source: String,
}

/// Configuration for the Eastmoney search client
#[derive(Debug, Clone)]
pub struct EastmoneyConfig {
    /// Base URL (default: "https://search-api-web.eastmoney.com")
    pub api_base: String,

    /// Articles requested per search (default: 100)
    pub page_size: u32,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl EastmoneyConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self {
            api_base: DEFAULT_SEARCH_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Optionally reads the base URL from `EASTMONEY_API_BASE` if set.
    pub fn from_env() -> Self {
        let api_base = std::env::var("EASTMONEY_API_BASE")
            .unwrap_or_else(|_| DEFAULT_SEARCH_API_BASE.to_string());
        Self {
            api_base,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the number of articles requested per search
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for EastmoneyConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Eastmoney news search client
pub struct EastmoneyClient {
    client: Client,
    config: EastmoneyConfig,
}

impl EastmoneyClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: EastmoneyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(EastmoneyConfig::new())
    }

    /// Get the current configuration
    pub fn config(&self) -> &EastmoneyConfig {
        &self.config
    }

    /// Search news articles mentioning a keyword, newest first
    pub async fn search_news(&self, keyword: &str) -> Result<Vec<NewsItem>> {
        debug!(keyword, "Searching news");

        let param = json!({
            "uid": "",
            "keyword": keyword,
            "type": ["cmsArticleWebOld"],
            "client": "web",
            "clientType": "web",
            "clientVersion": "curr",
            "param": {
                "cmsArticleWebOld": {
                    "searchScope": "default",
                    "sort": "default",
                    "pageIndex": 1,
                    "pageSize": self.config.page_size,
                    "preTag": "<em>",
                    "postTag": "</em>"
                }
            }
        })
        .to_string();

        let response = self
            .client
            .get(format!("{}/search/jsonp", self.config.api_base))
            .query(&[("cb", CALLBACK), ("param", &param)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                provider: "eastmoney",
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        let text = response.text().await?;
        let body: SearchResponse = serde_json::from_str(strip_jsonp(&text)?)?;
        if body.code != 0 {
            return Err(DataError::Api {
                provider: "eastmoney",
                message: body
                    .msg
                    .unwrap_or_else(|| format!("search failed with code {}", body.code)),
            });
        }

        let articles = body.result.map(|r| r.articles).unwrap_or_default();
        Ok(articles
            .into_iter()
            .map(|mut item| {
                item.title = strip_em_tags(&item.title);
                item.content = strip_em_tags(&item.content);
                item
            })
            .collect())
    }
}

/// Unwrap `callback({...})` into the inner JSON text
fn strip_jsonp(text: &str) -> Result<&str> {
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => Ok(&text[open + 1..close]),
        _ => Err(DataError::UnexpectedResponse(
            "Answer is not JSONP-wrapped".to_string(),
        )),
    }
}

/// Remove search highlight tags
fn strip_em_tags(text: &str) -> String {
    text.replace("<em>", "").replace("</em>", "")
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "cmsArticleWebOld", default)]
    articles: Vec<NewsItem>,
}

// ============================================================================
// Tests
// ============================================================================
