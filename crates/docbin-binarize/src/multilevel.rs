//! Three-class Otsu thresholding
//!
//! The first threshold `t1` is the global Otsu threshold. The second is an
//! Otsu threshold of the histogram tail `[t1, 255]` alone, mapped back to
//! the full range. Pixels are then mapped to three evenly spaced levels.

use crate::histogram::Histogram;
use crate::otsu::{DEGENERATE_THRESHOLD, best_split};
use crate::BinarizeResult;
use docbin_core::GrayImage;
use tracing::debug;

/// Output levels for the dark, middle and light classes
pub const LEVELS: [u8; 3] = [0, 127, 255];

/// The two thresholds of a three-class split, `t1 <= t2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultilevelThresholds {
    /// Upper bound (inclusive) of the dark class
    pub t1: u8,
    /// Upper bound (inclusive) of the middle class
    pub t2: u8,
}

impl MultilevelThresholds {
    /// Output level for one intensity
    #[inline]
    pub fn level(&self, v: u8) -> u8 {
        if v <= self.t1 {
            LEVELS[0]
        } else if v <= self.t2 {
            LEVELS[1]
        } else {
            LEVELS[2]
        }
    }
}

/// Compute both thresholds of a three-class Otsu split
///
/// If the tail above `t1` has no valid split, `t2` is 255, so the light
/// class is empty.
pub fn compute_multilevel_thresholds(gray: &GrayImage) -> MultilevelThresholds {
    let hist = Histogram::from_image(gray);
    let counts = hist.counts();
    let t1 = best_split(counts).unwrap_or(DEGENERATE_THRESHOLD as usize);
    let t2 = match best_split(&counts[t1..]) {
        Some(t) => t + t1,
        None => 255,
    };
    let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    debug!(t1, t2, "multilevel Otsu thresholds");
    MultilevelThresholds {
        t1: t1 as u8,
        t2: t2 as u8,
    }
}

/// Map a grayscale image to the three levels {0, 127, 255}
pub fn threshold_multilevel(gray: &GrayImage) -> BinarizeResult<GrayImage> {
    let th = compute_multilevel_thresholds(gray);
    let data = gray.data().iter().map(|&v| th.level(v)).collect();
    Ok(GrayImage::from_raw(gray.width(), gray.height(), data)?)
}
