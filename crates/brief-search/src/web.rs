//! Web search and fetch client for the hosted Ollama web API
//!
//! The hosted service exposes two POST endpoints, `/api/web_search` and
//! `/api/web_fetch`, both requiring an API key.

use crate::error::{Result, SearchError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const DEFAULT_WEB_API_BASE: &str = "https://ollama.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the web API client
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Base URL (default: "https://ollama.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,
}

impl WebConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_WEB_API_BASE.to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `OLLAMA_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OLLAMA_API_KEY").map_err(|_| {
            SearchError::Configuration("OLLAMA_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
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

/// One matched page from a web search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResult {
    /// Page title
    #[serde(default)]
    pub title: String,

    /// Page URL
    #[serde(default)]
    pub url: String,

    /// Content snippet
    #[serde(default)]
    pub content: String,
}

/// Answer of a web search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResponse {
    /// Matched pages, best first
    #[serde(default)]
    pub results: Vec<WebSearchResult>,
}

/// Answer of a page fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebFetchResponse {
    /// Page title
    #[serde(default)]
    pub title: String,

    /// Extracted page content
    #[serde(default)]
    pub content: String,

    /// Links found on the page
    #[serde(default)]
    pub links: Vec<String>,
}

/// Client for the hosted web search and fetch API
pub struct WebClient {
    client: Client,
    config: WebConfig,
}

impl WebClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: WebConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(WebConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Search the web for a query
    pub async fn search(&self, query: &str, max_results: u32) -> Result<WebSearchResponse> {
        debug!(query, max_results, "Web search");
        self.post(
            "api/web_search",
            json!({"query": query, "max_results": max_results}),
        )
        .await
    }

    /// Fetch one page and extract its content
    pub async fn fetch(&self, url: &str) -> Result<WebFetchResponse> {
        debug!(url, "Web fetch");
        self.post("api/web_fetch", json!({"url": url})).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.config.api_base, path))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Web(format!("HTTP {status}: {error_text}")));
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Tests
// ============================================================================
