//! FloatImage - floating-point image
//!
//! `FloatImage` is a 2D array of `f32` values used for intermediate
//! computations where 8-bit precision is insufficient: the guided filter
//! works on intensities normalized to [0, 1], and the local binarizers can
//! export their per-pixel threshold surface as a `FloatImage`.
//!
//! # Examples
//!
//! ```
//! use docbin_core::FloatImage;
//!
//! let mut fimg = FloatImage::new(100, 100).unwrap();
//! fimg.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(fimg.get_pixel(10, 20), Some(0.5));
//! ```

use crate::error::{Error, Result};
use crate::gray::GrayImage;

/// Floating-point image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FloatImage {
    /// Create a new FloatImage with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new FloatImage with all pixels set to the specified value
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a FloatImage from raw data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a grayscale image to floats scaled into [0, 1]
    pub fn from_gray_normalized(gray: &GrayImage) -> Self {
        Self {
            width: gray.width(),
            height: gray.height(),
            data: gray.data().iter().map(|&v| v as f32 / 255.0).collect(),
        }
    }

    /// Convert a [0, 1] float image back to 8 bits
    ///
    /// Values are multiplied by 255, rounded and clamped to [0, 255].
    /// Non-finite values map to 0.
    pub fn to_gray_rescaled(&self) -> GrayImage {
        let data = self
            .data
            .iter()
            .map(|&v| {
                let scaled = v * 255.0;
                if scaled.is_finite() {
                    scaled.round().clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            })
            .collect();
        GrayImage::from_raw_unchecked(self.width, self.height, data)
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get a pixel value, `None` if out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without the bounds check on x/y
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Set a pixel value
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if (x, y) lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.set_pixel_unchecked(x, y, value);
        Ok(())
    }

    /// Set a pixel value without the bounds check on x/y
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: f32) {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.data[idx] = value;
    }

    /// Raw data (row-major)
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw data (row-major)
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Whether every sample is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
