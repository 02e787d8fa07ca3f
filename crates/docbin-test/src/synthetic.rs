//! Deterministic synthetic test pages
//!
//! Every generator is a pure function of its arguments, so regression
//! outputs are reproducible without shipping image files.

use docbin_core::{BinaryImage, GrayImage};

/// A flat image
pub fn uniform(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::new_with_value(width.max(1), height.max(1), value)
        .expect("dimensions clamped to >= 1")
}

/// Checkerboard of `block x block` squares alternating `dark` and `light`,
/// starting with `dark` at the origin
pub fn bimodal_blocks(width: u32, height: u32, block: u32, dark: u8, light: u8) -> GrayImage {
    let block = block.max(1);
    GrayImage::from_fn(width.max(1), height.max(1), |x, y| {
        if ((x / block) + (y / block)) % 2 == 0 {
            dark
        } else {
            light
        }
    })
    .expect("dimensions clamped to >= 1")
}

/// Whether (x, y) is an ink pixel of the synthetic page layout
///
/// Text lines repeat every 20 rows, with glyph bands on rows 6..=13 of
/// each line. Glyphs repeat every 10 columns: a 2-pixel stem plus a top
/// bar, leaving a margin of 4 pixels around the page.
fn is_ink(x: u32, y: u32, width: u32, height: u32) -> bool {
    if x < 4 || y < 4 || x + 4 >= width || y + 4 >= height {
        return false;
    }
    let ly = y % 20;
    let lx = x % 10;
    let in_band = (6..=13).contains(&ly);
    let stem = (2..=3).contains(&lx);
    let bar = ly == 6 && (2..=7).contains(&lx);
    in_band && (stem || bar)
}

/// Background brightness: strong left-to-right illumination falloff
fn illumination(x: u32, width: u32) -> f32 {
    let t = if width > 1 {
        x as f32 / (width - 1) as f32
    } else {
        0.0
    };
    240.0 - 130.0 * t
}

/// A text page under uneven illumination, with its ground-truth ink mask
///
/// Paper brightness falls from 240 on the left to 110 on the right; ink is
/// 40% of the local paper brightness. Ink on the bright side is therefore
/// lighter than paper on the dark side, which defeats any single global
/// threshold. A small deterministic texture is added to every pixel.
pub fn degraded_page_with_truth(width: u32, height: u32) -> (GrayImage, BinaryImage) {
    let (w, h) = (width.max(1), height.max(1));
    let page = GrayImage::from_fn(w, h, |x, y| {
        let paper = illumination(x, w);
        let base = if is_ink(x, y, w, h) {
            paper * 0.4
        } else {
            paper
        };
        let texture = ((x * 7 + y * 13) % 5) as f32 - 2.0;
        (base + texture).round().clamp(0.0, 255.0) as u8
    })
    .expect("dimensions clamped to >= 1");
    let truth = BinaryImage::from_fn(w, h, |x, y| is_ink(x, y, w, h))
        .expect("dimensions clamped to >= 1");
    (page, truth)
}

/// A text page under uneven illumination
pub fn degraded_page(width: u32, height: u32) -> GrayImage {
    degraded_page_with_truth(width, height).0
}

/// Fraction of pixels on which two binary images agree
///
/// Returns 0.0 if the dimensions differ.
pub fn agreement(a: &BinaryImage, b: &BinaryImage) -> f64 {
    if a.dimensions() != b.dimensions() {
        return 0.0;
    }
    let same = a
        .data()
        .iter()
        .zip(b.data())
        .filter(|(p, q)| p == q)
        .count();
    same as f64 / a.data().len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_deterministic() {
        assert_eq!(degraded_page(64, 48), degraded_page(64, 48));
    }

    #[test]
    fn test_bright_ink_darker_than_local_paper_only() {
        let (page, truth) = degraded_page_with_truth(200, 60);
        let ink_left = (0..200)
            .find(|&x| truth.is_foreground(x, 10))
            .expect("ink on row 10");
        let ink_value = page.get_pixel_unchecked(ink_left, 10);
        let paper_right = page.get_pixel_unchecked(198, 2);
        assert!(ink_value < page.get_pixel_unchecked(ink_left, 2));
        assert!(ink_value > paper_right);
    }

    #[test]
    fn test_agreement() {
        let a = BinaryImage::from_fn(4, 1, |x, _| x < 2).unwrap();
        let b = BinaryImage::from_fn(4, 1, |x, _| x < 1).unwrap();
        assert_eq!(agreement(&a, &a), 1.0);
        assert_eq!(agreement(&a, &b), 0.75);
    }
}
