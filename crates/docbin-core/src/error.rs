//! Error types for docbin-core
//!
//! Provides a unified error type for the image containers and helper
//! structures of the core crate. Higher crates wrap it with `#[from]`.

use thiserror::Error;

/// docbin core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Zero-sized image (empty input)
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Two images that must be co-registered differ in size
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Raw buffer length does not match width x height x channels
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Channel count other than 1, 3 or 4
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u32),

    /// Index out of bounds
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::DimensionMismatch`] unless both sizes are equal.
pub fn check_same_size(expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}
