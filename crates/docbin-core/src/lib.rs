//! docbin Core - Basic data structures for document binarization
//!
//! This crate provides the containers shared by every docbin crate:
//!
//! - [`GrayImage`] - 8-bit grayscale source image
//! - [`BinaryImage`] - classification result with samples in {0, 255}
//! - [`FloatImage`] - `f32` image for intermediate computations
//! - [`PixelBuffer`] - interleaved 1/3/4-channel transport buffer
//! - [`WindowBounds`] - inclusive rectangle clamped to an image

pub mod binary;
pub mod buffer;
pub mod error;
pub mod fimage;
pub mod gray;
pub mod window;

pub use binary::{BACKGROUND, BinaryImage, FOREGROUND};
pub use buffer::PixelBuffer;
pub use error::{Error, Result, check_same_size};
pub use fimage::FloatImage;
pub use gray::GrayImage;
pub use window::WindowBounds;
