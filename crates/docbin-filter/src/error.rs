//! Error types for docbin-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// An intermediate result was empty or not finite
    #[error("numeric failure: {0}")]
    NumericFailure(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
