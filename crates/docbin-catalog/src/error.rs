//! Error types for docbin-catalog

use thiserror::Error;

/// Errors that can occur when looking up, validating or applying an
/// algorithm
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No algorithm registered under this name
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A parameter failed schema validation
    #[error("invalid parameter '{param}': {message}")]
    Validation { param: String, message: String },

    /// Error from the binarization engine
    #[error("binarization error: {0}")]
    Binarize(#[from] docbin_binarize::BinarizeError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),

    /// Malformed JSON parameters
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn validation(param: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
