//! Chat request and response types

use crate::messages::Message;
use crate::tools::ToolDefinition;
use serde::{Deserialize, Serialize};

/// Sampling options forwarded to the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A chat request
///
/// Streaming is always disabled: callers read one complete answer per turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,

    /// Conversation so far, oldest first
    pub messages: Vec<Message>,

    /// Tools the model may call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    /// Whether to stream the answer
    pub stream: bool,

    /// Sampling options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
}

impl ChatRequest {
    /// Start building a request for the given model
    pub fn builder(model: impl Into<String>) -> ChatRequestBuilder {
        ChatRequestBuilder::new(model)
    }
}

/// Builder for [`ChatRequest`]
#[derive(Debug, Clone)]
pub struct ChatRequestBuilder {
    model: String,
    messages: Vec<Message>,
    tools: Option<Vec<ToolDefinition>>,
    temperature: Option<f64>,
}

impl ChatRequestBuilder {
    /// Create a new builder for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: None,
            temperature: None,
        }
    }

    /// Append one message to the conversation
    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Replace the conversation with the given messages
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Offer tools to the model
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the request
    pub fn build(self) -> ChatRequest {
        ChatRequest {
            model: self.model,
            messages: self.messages,
            tools: self.tools,
            stream: false,
            options: self
                .temperature
                .map(|temperature| ChatOptions {
                    temperature: Some(temperature),
                }),
        }
    }
}

/// A chat response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Model that produced the answer
    #[serde(default)]
    pub model: String,

    /// The assistant's message
    pub message: Message,

    /// Whether generation finished
    #[serde(default)]
    pub done: bool,

    /// Why generation stopped, when reported
    #[serde(default)]
    pub done_reason: Option<String>,
}
