//! Chat provider trait definition

use crate::{ChatRequest, ChatResponse, Result};
use async_trait::async_trait;

/// Trait for chat model providers
///
/// Implementations of this trait run one non-streaming chat turn against a
/// model service.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one chat turn
    ///
    /// # Arguments
    ///
    /// * `request` - The chat request with messages and optional tools
    ///
    /// # Returns
    ///
    /// The model's answer, possibly carrying tool calls
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Get the provider name (e.g., "ollama")
    fn name(&self) -> &str;
}
