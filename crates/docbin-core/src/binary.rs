//! BinaryImage - two-level classification result
//!
//! Stored as 8-bit samples restricted to [`FOREGROUND`] (0, ink) and
//! [`BACKGROUND`] (255, paper). The only way to write a pixel is through
//! [`BinaryImage::set_foreground`], so no other value can ever appear.

use crate::error::Result;
use crate::gray::GrayImage;

/// Sample value of a foreground (ink) pixel
pub const FOREGROUND: u8 = 0;

/// Sample value of a background (paper) pixel
pub const BACKGROUND: u8 = 255;

/// Binary image with samples in {0, 255}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    inner: GrayImage,
}

impl BinaryImage {
    /// Create an all-background image
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            inner: GrayImage::new_with_value(width, height, BACKGROUND)?,
        })
    }

    /// Build an image from a foreground predicate
    ///
    /// # Examples
    ///
    /// ```
    /// use docbin_core::{BinaryImage, FOREGROUND};
    ///
    /// let bin = BinaryImage::from_fn(4, 4, |x, _| x < 2).unwrap();
    /// assert_eq!(bin.get_pixel(0, 3), Some(FOREGROUND));
    /// assert_eq!(bin.foreground_count(), 8);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut is_foreground: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut bin = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                if is_foreground(x, y) {
                    bin.set_foreground(x, y, true);
                }
            }
        }
        Ok(bin)
    }

    /// Classify a grayscale image against a single cutoff
    ///
    /// Pixels `<= cutoff` become foreground.
    pub fn from_gray_cutoff(gray: &GrayImage, cutoff: u8) -> Self {
        let mut inner = gray.clone();
        for v in inner.data_mut() {
            *v = if *v <= cutoff { FOREGROUND } else { BACKGROUND };
        }
        Self { inner }
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Sample value at (x, y), `None` if out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.get_pixel(x, y)
    }

    /// Whether (x, y) is foreground; panics if the index is outside the buffer
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.inner.get_pixel_unchecked(x, y) == FOREGROUND
    }

    /// Mark (x, y) as foreground or background
    #[inline]
    pub fn set_foreground(&mut self, x: u32, y: u32, foreground: bool) {
        let v = if foreground { FOREGROUND } else { BACKGROUND };
        self.inner.set_pixel_unchecked(x, y, v);
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.inner.data().iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Raw samples
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.inner.data()
    }

    /// View as a grayscale image
    #[inline]
    pub fn as_gray(&self) -> &GrayImage {
        &self.inner
    }

    /// Convert into a grayscale image
    pub fn into_gray(self) -> GrayImage {
        self.inner
    }
}
