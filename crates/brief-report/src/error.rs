use thiserror::Error;

/// Errors raised while building a report
///
/// Both variants are transparent: failure sections carry the underlying
/// provider or shaping message without extra wrapping.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Data(#[from] brief_data::DataError),

    #[error(transparent)]
    Table(#[from] brief_core::TableError),
}

/// Result type for report recipes
pub type Result<T> = std::result::Result<T, ReportError>;
