//! Ollama chat provider
//!
//! Talks to an Ollama server through the `/api/chat` endpoint. Works against
//! a local daemon as well as the hosted service at `https://ollama.com`,
//! which serves the `:cloud` model tags and expects an API key.

use crate::error::{LlmError, Result};
use crate::provider::ChatProvider;
use crate::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server URL (default: "http://localhost:11434")
    pub host: String,

    /// API key; required by the hosted service, unused by local daemons
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 300)
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Optionally reads the server URL from `OLLAMA_HOST` and the API key
    /// from `OLLAMA_API_KEY`. Both fall back to defaults when unset.
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
        let api_key = std::env::var("OLLAMA_API_KEY").ok();
        Self {
            host,
            api_key,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom server URL
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama chat provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new provider with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::new())
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env())
    }

    /// Get the current configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, host = %self.config.host))]
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        debug!("Sending chat request to {}", self.config.host);

        let mut builder = self
            .client
            .post(format!("{}/api/chat", self.config.host))
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = builder.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                404 => LlmError::ModelNotFound(request.model),
                400 => LlmError::InvalidRequest(error_text),
                _ => LlmError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            "Received response - done: {}, tool_calls: {}",
            chat_response.done,
            chat_response.message.tool_calls.len()
        );

        Ok(chat_response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::new();
        assert!(provider.is_ok());
        let provider = provider.unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.config().host, "http://localhost:11434");
        assert!(provider.config().api_key.is_none());
    }

    #[test]
    fn test_provider_with_custom_config() {
        let config = OllamaConfig::new()
            .with_host("https://ollama.com")
            .with_api_key("test-key")
            .with_timeout(60);

        let provider = OllamaProvider::with_config(config).unwrap();
        assert_eq!(provider.config().host, "https://ollama.com");
        assert_eq!(provider.config().api_key.as_deref(), Some("test-key"));
        assert_eq!(provider.config().timeout_secs, 60);
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var("OLLAMA_HOST", "https://ollama.com");
            std::env::set_var("OLLAMA_API_KEY", "key-from-env");
        }

        let config = OllamaConfig::from_env();
        assert_eq!(config.host, "https://ollama.com");
        assert_eq!(config.api_key.as_deref(), Some("key-from-env"));

        unsafe {
            std::env::remove_var("OLLAMA_HOST");
            std::env::remove_var("OLLAMA_API_KEY");
        }
        let config = OllamaConfig::from_env();
        assert_eq!(config.host, "http://localhost:11434");
        assert!(config.api_key.is_none());
    }

    // Live API test, needs a running Ollama server
    #[tokio::test]
    #[ignore]
    async fn test_live_chat() {
        use crate::messages::Message;

        let provider = OllamaProvider::from_env().unwrap();
        let request = ChatRequest::builder("qwen3")
            .add_message(Message::user("用一句话介绍你自己"))
            .build();
        let response = provider.chat(request).await.unwrap();
        assert!(!response.message.content.is_empty());
    }
}
