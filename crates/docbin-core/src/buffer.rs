//! PixelBuffer - dense 8-bit transport buffer
//!
//! The type images cross the catalog boundary in: interleaved 8-bit
//! samples with explicit width, height and channel count, no embedded
//! format header. Binarization works on 1 channel; 3 (RGB) and 4 (RGBA)
//! channel input is reduced to gray first.

use crate::binary::BinaryImage;
use crate::error::{Error, Result};
use crate::gray::GrayImage;

/// Rec.601 luma weights in 8-bit fixed point: Y = (77R + 150G + 29B) >> 8
const LUMA_R: u32 = 77;
const LUMA_G: u32 = 150;
const LUMA_B: u32 = 29;

/// Dense interleaved 8-bit image buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved samples
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] for a zero-sized image
    /// - [`Error::UnsupportedChannels`] unless `channels` is 1, 3 or 4
    /// - [`Error::BufferSize`] if the length is not `width * height * channels`
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(Error::UnsupportedChannels(channels));
        }
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
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

    /// Samples per pixel
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Raw interleaved samples
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its samples
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Reduce to a grayscale image
    ///
    /// One-channel buffers are copied as-is; RGB and RGBA use Rec.601 luma
    /// (alpha is ignored).
    pub fn to_gray(&self) -> GrayImage {
        let data = match self.channels {
            1 => self.data.clone(),
            n => self
                .data
                .chunks_exact(n as usize)
                .map(|px| {
                    let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                    ((LUMA_R * r + LUMA_G * g + LUMA_B * b + 128) >> 8).min(255) as u8
                })
                .collect(),
        };
        GrayImage::from_raw_unchecked(self.width, self.height, data)
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(gray: GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        Self {
            width,
            height,
            channels: 1,
            data: gray.into_raw(),
        }
    }
}

impl From<BinaryImage> for PixelBuffer {
    fn from(bin: BinaryImage) -> Self {
        Self::from(bin.into_gray())
    }
}
