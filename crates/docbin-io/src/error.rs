//! I/O error types
//!
//! Each format module maps its decoder/encoder failures into `IoError`
//! so that callers only need to handle one error type.

use thiserror::Error;

/// Error type for image I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format or sample layout is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. a buffer size mismatch)
    #[error("core error: {0}")]
    Core(#[from] docbin_core::Error),
}

/// Convenience alias for I/O results
pub type IoResult<T> = Result<T, IoError>;
