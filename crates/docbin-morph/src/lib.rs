//! docbin-morph - Morphological operations on binary images
//!
//! Erosion, dilation, opening and closing of [`BinaryImage`]s with a square
//! "brick" structuring element. Used to remove speckle noise and fill small
//! holes after binarization.
//!
//! [`BinaryImage`]: docbin_core::BinaryImage

pub mod binary;
mod error;

pub use binary::{close_brick, dilate_brick, erode_brick, open_brick};
pub use error::{MorphError, MorphResult};
