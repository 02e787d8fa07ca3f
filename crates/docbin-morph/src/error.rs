//! Error types for docbin-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),

    /// Invalid structuring element size
    #[error("invalid structuring element: {0}")]
    InvalidSel(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
