use thiserror::Error;

/// Errors from market data providers
#[derive(Error, Debug)]
pub enum DataError {
    /// The provider answered but reported a failure
    #[error("{provider} error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode a provider response body
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider answered with a shape we do not understand
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error while shaping fetched records
    #[error("Table error: {0}")]
    Table(#[from] brief_core::TableError),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, DataError>;
