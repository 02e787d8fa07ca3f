//! GrayImage - 8-bit grayscale image
//!
//! The source image type of every binarization algorithm. Algorithms only
//! ever receive `&GrayImage`, so an input can never be modified by the
//! call that reads it.
//!
//! # Memory layout
//!
//! One byte per pixel, row-major, no padding. The pixel at (x, y) is at
//! index `y * width + x`.

use crate::error::{Error, Result};

/// 8-bit grayscale image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayImage {
    /// Create a new image with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use docbin_core::GrayImage;
    ///
    /// let img = GrayImage::new(64, 48).unwrap();
    /// assert_eq!(img.width(), 64);
    /// assert_eq!(img.get_pixel(10, 10), Some(0));
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0)
    }

    /// Create a new image with all pixels set to `value`
    pub fn new_with_value(width: u32, height: u32, value: u8) -> Result<Self> {
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

    /// Wrap a raw row-major buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-sized image and
    /// [`Error::BufferSize`] if `data.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
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

    /// Wrap a buffer whose length is already known to match
    pub(crate) fn from_raw_unchecked(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            data,
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel
    ///
    /// # Examples
    ///
    /// ```
    /// use docbin_core::GrayImage;
    ///
    /// let ramp = GrayImage::from_fn(4, 1, |x, _| (x * 80) as u8).unwrap();
    /// assert_eq!(ramp.data(), &[0, 80, 160, 240]);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut img = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                img.set_pixel_unchecked(x, y, f(x, y));
            }
        }
        Ok(img)
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

    /// Number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get a pixel value, `None` if out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Get a pixel value without the bounds check on x/y
    ///
    /// Panics if the computed index is outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data[self.index(x, y)]
    }

    /// Set a pixel value
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if (x, y) lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Set a pixel value without the bounds check on x/y
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: u8) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Raw pixel data (row-major)
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One row of pixels
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Consume the image and return its buffer
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Mean intensity over all pixels
    pub fn mean(&self) -> f64 {
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f64 / self.data.len() as f64
    }
}
