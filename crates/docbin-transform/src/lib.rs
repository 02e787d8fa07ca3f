//! docbin-transform - Image resizing
//!
//! Linear (bilinear) resizing of grayscale images, used to binarize a
//! reduced copy of a page for interactive previews and to bring the result
//! back to the source size.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{scale, scale_to_size};
