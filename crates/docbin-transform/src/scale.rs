//! Image scaling operations
//!
//! Bilinear interpolation with pixel-centre alignment: destination pixel
//! `x` samples the source at `(x + 0.5) * src_w / dst_w - 0.5`, clamped to
//! the source bounds. Works for both reduction and enlargement.

use crate::{TransformError, TransformResult};
use docbin_core::GrayImage;

/// Per-destination-column (or row) source index pair and blend weight
fn sample_positions(src_len: u32, dst_len: u32) -> Vec<(u32, u32, f32)> {
    let ratio = src_len as f32 / dst_len as f32;
    let max = (src_len - 1) as f32;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * ratio - 0.5).clamp(0.0, max);
            let i0 = s.floor() as u32;
            let i1 = (i0 + 1).min(src_len - 1);
            (i0, i1, s - i0 as f32)
        })
        .collect()
}

/// Resize an image to exactly `width x height` with bilinear interpolation
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if either target
/// dimension is 0.
pub fn scale_to_size(pix: &GrayImage, width: u32, height: u32) -> TransformResult<GrayImage> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "target size must be non-zero, got {}x{}",
            width, height
        )));
    }
    if (width, height) == pix.dimensions() {
        return Ok(pix.clone());
    }

    let xs = sample_positions(pix.width(), width);
    let ys = sample_positions(pix.height(), height);
    let mut out = GrayImage::new(width, height)?;

    for (y, &(y0, y1, fy)) in ys.iter().enumerate() {
        let r0 = pix.row(y0);
        let r1 = pix.row(y1);
        for (x, &(x0, x1, fx)) in xs.iter().enumerate() {
            let (x0, x1) = (x0 as usize, x1 as usize);
            let top = r0[x0] as f32 * (1.0 - fx) + r0[x1] as f32 * fx;
            let bottom = r1[x0] as f32 * (1.0 - fx) + r1[x1] as f32 * fx;
            let v = top * (1.0 - fy) + bottom * fy;
            out.set_pixel_unchecked(x as u32, y as u32, v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Ok(out)
}

/// Scale an image by a uniform factor
///
/// The target size is `round(w * factor) x round(h * factor)`, at least 1.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] for a non-positive or
/// non-finite factor.
pub fn scale(pix: &GrayImage, factor: f32) -> TransformResult<GrayImage> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidParameters(format!(
            "scale factor must be positive, got {}",
            factor
        )));
    }
    let w = ((pix.width() as f32 * factor).round() as u32).max(1);
    let h = ((pix.height() as f32 * factor).round() as u32).max(1);
    scale_to_size(pix, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let img = GrayImage::from_fn(7, 5, |x, y| (x * 30 + y) as u8).unwrap();
        assert_eq!(scale(&img, 1.0).unwrap(), img);
    }

    #[test]
    fn test_constant_preserved() {
        let img = GrayImage::new_with_value(40, 30, 123).unwrap();
        let down = scale(&img, 0.25).unwrap();
        assert_eq!(down.dimensions(), (10, 8));
        assert!(down.data().iter().all(|&v| v == 123));
        let up = scale_to_size(&down, 40, 30).unwrap();
        assert!(up.data().iter().all(|&v| v == 123));
    }

    #[test]
    fn test_upscale_interpolates() {
        let img = GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();
        let up = scale_to_size(&img, 4, 1).unwrap();
        // Outer samples clamp to the source ends, inner ones blend
        assert_eq!(up.data(), &[0, 50, 150, 200]);
    }

    #[test]
    fn test_invalid() {
        let img = GrayImage::new(4, 4).unwrap();
        assert!(scale(&img, 0.0).is_err());
        assert!(scale(&img, f32::NAN).is_err());
        assert!(scale_to_size(&img, 0, 3).is_err());
    }
}
