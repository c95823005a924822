//! Chat model abstraction layer for marketbrief
//!
//! This crate provides provider-agnostic types for talking to chat models:
//!
//! - Message types following the Ollama chat wire shape
//! - Chat request/response types with a request builder
//! - Tool definitions for function calling
//! - Provider trait for chat implementations
//! - The concrete Ollama provider

pub mod chat;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

// Re-export main types
pub use chat::{ChatOptions, ChatRequest, ChatRequestBuilder, ChatResponse};
pub use error::{LlmError, Result};
pub use messages::{FunctionCall, Message, Role, ToolCall};
pub use provider::ChatProvider;
pub use providers::{OllamaConfig, OllamaProvider};
pub use tools::{FunctionDefinition, ToolDefinition};
