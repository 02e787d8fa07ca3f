//! Binary morphological operations
//!
//! All operations act on the foreground (ink) set and use a square brick
//! of odd side `size`, centred on the pixel. The brick is separable, so
//! each operation is one horizontal and one vertical pass of running
//! counts, O(1) per pixel regardless of `size`.
//!
//! Near the border the brick is clipped to the image: pixels outside the
//! image are ignored rather than treated as background. A foreground
//! region touching the border therefore survives erosion at the border,
//! and `open`/`close` leave such regions intact.

use crate::{MorphError, MorphResult};
use docbin_core::BinaryImage;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    Dilate,
    Erode,
}

fn check_size(size: u32) -> MorphResult<u32> {
    if size == 0 || size % 2 == 0 {
        return Err(MorphError::InvalidSel(format!(
            "brick size must be odd and >= 1, got {}",
            size
        )));
    }
    Ok(size / 2)
}

/// One separable pass along a line of `len` cells.
///
/// `get(i)` reads the input, `set(i, v)` writes the output. A cell is
/// foreground after dilation when any cell in the clipped window is, and
/// after erosion when all of them are.
fn pass_line(
    len: usize,
    half: usize,
    op: Op,
    get: impl Fn(usize) -> bool,
    mut set: impl FnMut(usize, bool),
    prefix: &mut Vec<u32>,
) {
    prefix.clear();
    prefix.push(0);
    let mut acc = 0u32;
    for i in 0..len {
        acc += get(i) as u32;
        prefix.push(acc);
    }
    for i in 0..len {
        let lo = i.saturating_sub(half);
        let hi = (i + half).min(len - 1);
        let count = prefix[hi + 1] - prefix[lo];
        let fg = match op {
            Op::Dilate => count > 0,
            Op::Erode => count as usize == hi - lo + 1,
        };
        set(i, fg);
    }
}

fn apply(bin: &BinaryImage, size: u32, op: Op) -> MorphResult<BinaryImage> {
    let half = check_size(size)? as usize;
    if half == 0 {
        return Ok(bin.clone());
    }

    let (w, h) = bin.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let mut prefix = Vec::with_capacity(wu.max(hu) + 1);

    // Horizontal pass into a scratch mask
    let mut horiz = vec![false; wu * hu];
    for y in 0..hu {
        let row = &mut horiz[y * wu..(y + 1) * wu];
        pass_line(
            wu,
            half,
            op,
            |x| bin.is_foreground(x as u32, y as u32),
            |x, v| row[x] = v,
            &mut prefix,
        );
    }

    // Vertical pass into the result
    let mut out = BinaryImage::new(w, h)?;
    for x in 0..wu {
        pass_line(
            hu,
            half,
            op,
            |y| horiz[y * wu + x],
            |y, v| out.set_foreground(x as u32, y as u32, v),
            &mut prefix,
        );
    }

    Ok(out)
}

/// Dilate the foreground with a `size x size` brick
///
/// # Errors
///
/// Returns [`MorphError::InvalidSel`] if `size` is zero or even.
pub fn dilate_brick(bin: &BinaryImage, size: u32) -> MorphResult<BinaryImage> {
    apply(bin, size, Op::Dilate)
}

/// Erode the foreground with a `size x size` brick
pub fn erode_brick(bin: &BinaryImage, size: u32) -> MorphResult<BinaryImage> {
    apply(bin, size, Op::Erode)
}

/// Opening: erosion followed by dilation
///
/// Removes foreground specks smaller than the brick.
pub fn open_brick(bin: &BinaryImage, size: u32) -> MorphResult<BinaryImage> {
    let eroded = erode_brick(bin, size)?;
    dilate_brick(&eroded, size)
}

/// Closing: dilation followed by erosion
///
/// Fills background holes and gaps smaller than the brick.
pub fn close_brick(bin: &BinaryImage, size: u32) -> MorphResult<BinaryImage> {
    let dilated = dilate_brick(bin, size)?;
    erode_brick(&dilated, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> BinaryImage {
        BinaryImage::from_fn(w, h, |x, y| x >= x0 && x <= x1 && y >= y0 && y <= y1).unwrap()
    }

    #[test]
    fn test_invalid_size() {
        let bin = BinaryImage::new(4, 4).unwrap();
        assert!(dilate_brick(&bin, 0).is_err());
        assert!(erode_brick(&bin, 4).is_err());
    }

    #[test]
    fn test_size_one_is_identity() {
        let bin = rect(10, 10, 2, 3, 6, 7);
        assert_eq!(dilate_brick(&bin, 1).unwrap(), bin);
        assert_eq!(erode_brick(&bin, 1).unwrap(), bin);
    }

    #[test]
    fn test_dilate_single_pixel() {
        let bin = rect(9, 9, 4, 4, 4, 4);
        let d = dilate_brick(&bin, 3).unwrap();
        assert_eq!(d, rect(9, 9, 3, 3, 5, 5));
    }

    #[test]
    fn test_erode_rectangle() {
        let bin = rect(12, 12, 2, 2, 8, 8);
        let e = erode_brick(&bin, 3).unwrap();
        assert_eq!(e, rect(12, 12, 3, 3, 7, 7));
    }

    #[test]
    fn test_open_removes_speck_keeps_block() {
        let mut bin = rect(20, 20, 5, 5, 14, 14);
        bin.set_foreground(1, 1, true);
        let o = open_brick(&bin, 3).unwrap();
        assert!(!o.is_foreground(1, 1));
        assert_eq!(o, rect(20, 20, 5, 5, 14, 14));
    }

    #[test]
    fn test_close_fills_hole() {
        let mut bin = rect(20, 20, 5, 5, 14, 14);
        bin.set_foreground(9, 9, false);
        let c = close_brick(&bin, 3).unwrap();
        assert_eq!(c, rect(20, 20, 5, 5, 14, 14));
    }

    #[test]
    fn test_border_region_survives_open() {
        let bin = rect(10, 10, 0, 0, 3, 9);
        assert_eq!(open_brick(&bin, 3).unwrap(), bin);
    }
}
