//! Error types for docbin-binarize

use thiserror::Error;

/// Errors that can occur during binarization
///
/// Zero-sized images cannot be constructed, and a size mismatch between
/// paired images surfaces as a wrapped [`docbin_core::Error`].
#[derive(Debug, Error)]
pub enum BinarizeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),

    /// Filtering error
    #[error("filter error: {0}")]
    Filter(#[from] docbin_filter::FilterError),

    /// Resize error
    #[error("transform error: {0}")]
    Transform(#[from] docbin_transform::TransformError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] docbin_morph::MorphError),

    /// Parameter outside its valid range
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for binarization operations
pub type BinarizeResult<T> = Result<T, BinarizeError>;
