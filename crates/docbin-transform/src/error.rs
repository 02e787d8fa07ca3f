//! Error types for docbin-transform

use thiserror::Error;

/// Errors that can occur during geometric transforms
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),

    /// Invalid scale factor or target size
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
