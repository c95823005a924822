//! Error types for search orchestration

use thiserror::Error;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search orchestration
#[derive(Error, Debug)]
pub enum SearchError {
    /// Chat model error
    #[error(transparent)]
    Llm(#[from] brief_llm::LlmError),

    /// The web API answered but reported a failure
    #[error("Web API error: {0}")]
    Web(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A tool rejected its parameters or failed to run
    #[error("Tool {name} failed: {message}")]
    Tool { name: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
