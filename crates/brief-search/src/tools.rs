//! Web tools offered to the search model

use crate::error::{Result, SearchError};
use crate::tool::Tool;
use crate::web::WebClient;
use async_trait::async_trait;
use brief_llm::tools::schema;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_MAX_RESULTS: u32 = 5;

fn required_str<'a>(params: &'a Value, key: &str, tool: &str) -> Result<&'a str> {
    params.get(key).and_then(Value::as_str).ok_or_else(|| SearchError::Tool {
        name: tool.to_string(),
        message: format!("missing required parameter: {key}"),
    })
}

/// Web search as a model tool
pub struct WebSearchTool {
    client: Arc<WebClient>,
    max_results: u32,
}

impl WebSearchTool {
    /// Create the tool over a shared web client
    pub fn new(client: Arc<WebClient>) -> Self {
        Self {
            client,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set how many results each search returns
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let query = required_str(&params, "query", "web_search")?;
        let max_results = params
            .get("max_results")
            .and_then(Value::as_u64)
            .map_or(self.max_results, |n| n as u32);
        let response = self.client.search(query, max_results).await?;
        Ok(serde_json::to_value(response)?)
    }

    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for a query and return matching pages with content snippets"
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("The search query"),
                "max_results": schema::integer("How many results to return"),
            }),
            vec!["query"],
        )
    }
}

/// Page fetch as a model tool
pub struct WebFetchTool {
    client: Arc<WebClient>,
}

impl WebFetchTool {
    /// Create the tool over a shared web client
    pub fn new(client: Arc<WebClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let url = required_str(&params, "url", "web_fetch")?;
        let response = self.client.fetch(url).await?;
        Ok(serde_json::to_value(response)?)
    }

    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch one web page by URL and return its extracted content"
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({"url": schema::string("The URL to fetch")}),
            vec!["url"],
        )
    }
}
