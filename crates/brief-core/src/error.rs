use thiserror::Error;

/// Errors raised by record-set shaping and rendering
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Row width mismatch: expected {expected} cells, got {got}")]
    RowWidth { expected: usize, got: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid UTF-8 in rendered output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
