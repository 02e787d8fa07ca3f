//! docbin - Document image binarization for Rust
//!
//! Converts grayscale scans of (often degraded) documents into black and
//! white images separating ink from paper.
//!
//! # Overview
//!
//! - Local adaptive thresholds (Niblack, Sauvola, Wolf-Jolion, NICK) over
//!   integral-image window statistics
//! - Otsu's method: global, three-level and windowed with interpolation
//! - 2D Otsu on intensity and its guided-filter smoothing
//! - A name-keyed [`catalog`] of all of the above with parameter schemas
//! - PNG and PNM I/O
//!
//! # Example
//!
//! ```
//! use docbin::binarize::{LocalMethod, LocalThresholdOptions, local_threshold};
//! use docbin::GrayImage;
//!
//! let page = GrayImage::from_fn(64, 48, |x, _| if x % 8 < 2 { 40 } else { 210 }).unwrap();
//! let opts = LocalThresholdOptions::for_method(LocalMethod::Sauvola);
//! let bin = local_threshold(&page, &opts).unwrap();
//! assert!(bin.is_foreground(0, 0));
//! assert!(!bin.is_foreground(4, 0));
//! ```

// Re-export core types (used by every crate)
pub use docbin_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use docbin_binarize as binarize;
pub use docbin_catalog as catalog;
pub use docbin_filter as filter;
pub use docbin_io as io;
pub use docbin_morph as morph;
pub use docbin_transform as transform;
