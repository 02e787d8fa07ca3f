//! Box filtering of floating-point images
//!
//! Normalized box (mean) filter over a `(2r+1) x (2r+1)` window using an
//! `f64` summed area table, O(1) per pixel regardless of radius.
//!
//! Windows are clamped at the image border and averaged over the pixels
//! they actually cover, the same convention [`crate::IntegralImage`] uses
//! for its statistics.

use crate::FilterResult;
use docbin_core::{FloatImage, WindowBounds};

/// Summed area table over an `f32` image, with a zero leading row/column
struct FloatAccum {
    stride: usize,
    data: Vec<f64>,
}

impl FloatAccum {
    fn build(img: &FloatImage) -> Self {
        let w = img.width() as usize;
        let h = img.height() as usize;
        let stride = w + 1;
        let mut data = vec![0.0f64; stride * (h + 1)];
        let src = img.data();

        for y in 0..h {
            let mut row_sum = 0.0f64;
            for x in 0..w {
                row_sum += src[y * w + x] as f64;
                data[(y + 1) * stride + x + 1] = data[y * stride + x + 1] + row_sum;
            }
        }

        Self { stride, data }
    }

    #[inline]
    fn mean(&self, b: &WindowBounds) -> f64 {
        let s = self.stride;
        let top = b.y1 as usize * s;
        let bottom = (b.y2 as usize + 1) * s;
        let left = b.x1 as usize;
        let right = b.x2 as usize + 1;
        let d = &self.data;
        let sum = d[bottom + right] - d[top + right] - d[bottom + left] + d[top + left];
        sum / b.area() as f64
    }
}

/// Mean filter with a `(2*radius + 1)` square kernel.
///
/// A radius of 0 returns a copy of the input.
///
/// # Examples
///
/// ```
/// use docbin_core::FloatImage;
/// use docbin_filter::box_mean;
///
/// let img = FloatImage::from_data(3, 1, vec![0.0, 3.0, 0.0]).unwrap();
/// let out = box_mean(&img, 1).unwrap();
/// assert_eq!(out.get_pixel(1, 0), Some(1.0));
/// // Border windows average only the pixels they cover
/// assert_eq!(out.get_pixel(0, 0), Some(1.5));
/// ```
pub fn box_mean(img: &FloatImage, radius: u32) -> FilterResult<FloatImage> {
    if radius == 0 {
        return Ok(img.clone());
    }

    let (w, h) = img.dimensions();
    let acc = FloatAccum::build(img);
    let mut out = FloatImage::new(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let b = WindowBounds::centered(x, y, radius, w, h);
            out.set_pixel_unchecked(x, y, acc.mean(&b) as f32);
        }
    }

    Ok(out)
}
