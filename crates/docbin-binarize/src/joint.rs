//! 2D Otsu thresholding over (intensity, guided intensity)
//!
//! Each pixel contributes the pair `(g, f)` of its gray value and its
//! guided-filtered value to a 256x256 joint histogram. For every candidate
//! pair `(s, t)`, class 0 is `{g <= s and f <= t}` and class 1 everything
//! else; the pair maximizing
//!
//! ```text
//! w0 * w1 * ((mu1_g - mu0_g)^2 + (mu1_f - mu0_f)^2)
//! ```
//!
//! wins (strict maximum, first in `(s, t)` scan order). Class sums come
//! from 2D prefix tables over count, `g * count` and `f * count`, so each
//! candidate costs O(1).
//!
//! Pixels in the `(<= s, <= t)` quadrant are ink and those in the
//! `(> s, > t)` quadrant are paper. The two transition quadrants go to
//! whichever class centroid is nearer: ink at `(s/2, t/2)`, paper at
//! `((s+255)/2, (t+255)/2)`, ties to paper.

use crate::{BinarizeError, BinarizeResult};
use docbin_core::{BinaryImage, GrayImage, check_same_size};
use docbin_filter::{GuidedFilterOptions, guided_filter};
use docbin_morph::{close_brick, open_brick};
use docbin_transform::{scale, scale_to_size};
use tracing::{debug, warn};

const BINS: usize = 256;

/// Options for [`two_dimensional_otsu`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoDimensionalOtsuOptions {
    /// Guided filter window radius
    pub radius: u32,
    /// Guided filter regularization on [0, 1]-normalized intensities
    pub epsilon: f32,
    /// Side of the square open/close brick; 0 or 1 disables cleanup
    pub morph_kernel: u32,
    /// Process a reduced copy scaled by this factor, in (0, 1]
    pub preview_scale: f32,
}

impl Default for TwoDimensionalOtsuOptions {
    fn default() -> Self {
        Self {
            radius: 5,
            epsilon: 0.02,
            morph_kernel: 3,
            preview_scale: 1.0,
        }
    }
}

impl TwoDimensionalOtsuOptions {
    /// Guided filter part of the options
    pub fn guided(&self) -> GuidedFilterOptions {
        GuidedFilterOptions {
            radius: self.radius,
            epsilon: self.epsilon,
        }
    }

    /// Check every parameter against its range
    pub fn validate(&self) -> BinarizeResult<()> {
        self.guided().validate()?;
        if self.morph_kernel > 1 && self.morph_kernel % 2 == 0 {
            return Err(BinarizeError::InvalidParameters(format!(
                "morph_kernel must be odd, got {}",
                self.morph_kernel
            )));
        }
        if !self.preview_scale.is_finite() || self.preview_scale <= 0.0 || self.preview_scale > 1.0
        {
            return Err(BinarizeError::InvalidParameters(format!(
                "preview_scale must be in (0, 1], got {}",
                self.preview_scale
            )));
        }
        Ok(())
    }
}

/// Joint histogram of `(gray, guide)` value pairs
#[derive(Debug, Clone)]
pub struct JointHistogram {
    /// `counts[g * 256 + f]`
    counts: Vec<u64>,
    total: u64,
}

impl JointHistogram {
    /// Count value pairs of two equally sized images
    ///
    /// # Errors
    ///
    /// Returns a wrapped `DimensionMismatch` if the sizes differ.
    pub fn from_images(gray: &GrayImage, guide: &GrayImage) -> BinarizeResult<Self> {
        check_same_size(gray.dimensions(), guide.dimensions())?;
        let mut counts = vec![0u64; BINS * BINS];
        for (&g, &f) in gray.data().iter().zip(guide.data()) {
            counts[g as usize * BINS + f as usize] += 1;
        }
        Ok(Self {
            counts,
            total: gray.pixel_count() as u64,
        })
    }

    /// Count of pixels with gray value `g` and guide value `f`
    #[inline]
    pub fn get(&self, g: u8, f: u8) -> u64 {
        self.counts[g as usize * BINS + f as usize]
    }

    /// Number of pixels
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// The optimal `(s, t)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointThresholds {
    /// Gray threshold
    pub s: u8,
    /// Guide threshold
    pub t: u8,
}

impl JointThresholds {
    /// Thresholds used when no split separates two classes
    pub const DEGENERATE: Self = Self { s: 127, t: 127 };

    /// Whether the pair `(g, f)` is classified as ink
    pub fn is_foreground(&self, g: u8, f: u8) -> bool {
        match (g <= self.s, f <= self.t) {
            (true, true) => true,
            (false, false) => false,
            _ => {
                let (s, t) = (self.s as f64, self.t as f64);
                let (g, f) = (g as f64, f as f64);
                let d_fg = (g - s / 2.0).powi(2) + (f - t / 2.0).powi(2);
                let d_bg = (g - (s + 255.0) / 2.0).powi(2) + (f - (t + 255.0) / 2.0).powi(2);
                d_fg < d_bg
            }
        }
    }
}

/// Inclusive 2D prefix sums over the joint histogram
struct PrefixTables {
    count: Vec<u64>,
    sum_g: Vec<u64>,
    sum_f: Vec<u64>,
}

impl PrefixTables {
    fn build(hist: &JointHistogram) -> Self {
        let mut count = vec![0u64; BINS * BINS];
        let mut sum_g = vec![0u64; BINS * BINS];
        let mut sum_f = vec![0u64; BINS * BINS];
        for g in 0..BINS {
            let (mut rc, mut rg, mut rf) = (0u64, 0u64, 0u64);
            for f in 0..BINS {
                let c = hist.counts[g * BINS + f];
                rc += c;
                rg += g as u64 * c;
                rf += f as u64 * c;
                let i = g * BINS + f;
                let above = |table: &[u64]| if g > 0 { table[i - BINS] } else { 0 };
                count[i] = rc + above(&count);
                sum_g[i] = rg + above(&sum_g);
                sum_f[i] = rf + above(&sum_f);
            }
        }
        Self {
            count,
            sum_g,
            sum_f,
        }
    }
}

/// Search the `(s, t)` pair maximizing the 2D between-class variance
///
/// Returns [`JointThresholds::DEGENERATE`] if no pair leaves both classes
/// non-empty.
pub fn find_joint_thresholds(hist: &JointHistogram) -> JointThresholds {
    let p = PrefixTables::build(hist);
    let last = BINS * BINS - 1;
    let total = p.count[last];
    let (total_g, total_f) = (p.sum_g[last], p.sum_f[last]);
    if total == 0 {
        return JointThresholds::DEGENERATE;
    }
    let n = total as f64;

    let mut best_var = 0.0f64;
    let mut best = None;
    for s in 0..BINS - 1 {
        for t in 0..BINS - 1 {
            let i = s * BINS + t;
            let c0 = p.count[i];
            if c0 == 0 || c0 == total {
                continue;
            }
            let c1 = total - c0;
            let w0 = c0 as f64 / n;
            let w1 = c1 as f64 / n;
            let dg = (total_g - p.sum_g[i]) as f64 / c1 as f64 - p.sum_g[i] as f64 / c0 as f64;
            let df = (total_f - p.sum_f[i]) as f64 / c1 as f64 - p.sum_f[i] as f64 / c0 as f64;
            let var = w0 * w1 * (dg * dg + df * df);
            if var > best_var {
                best_var = var;
                best = Some((s, t));
            }
        }
    }

    match best {
        Some((s, t)) => JointThresholds {
            s: s as u8,
            t: t as u8,
        },
        None => {
            warn!("degenerate joint histogram, using fallback thresholds");
            JointThresholds::DEGENERATE
        }
    }
}

/// Classify every pixel by its `(gray, guide)` pair
pub fn classify_joint(
    gray: &GrayImage,
    guide: &GrayImage,
    thresholds: &JointThresholds,
) -> BinarizeResult<BinaryImage> {
    check_same_size(gray.dimensions(), guide.dimensions())?;
    let (w, h) = gray.dimensions();
    Ok(BinaryImage::from_fn(w, h, |x, y| {
        thresholds.is_foreground(gray.get_pixel_unchecked(x, y), guide.get_pixel_unchecked(x, y))
    })?)
}

/// Guided filter, joint threshold search, classification and cleanup at
/// the working resolution
fn binarize_at_scale(
    gray: &GrayImage,
    options: &TwoDimensionalOtsuOptions,
) -> BinarizeResult<BinaryImage> {
    let guide = guided_filter(gray, &options.guided())?;
    let hist = JointHistogram::from_images(gray, &guide)?;
    let th = find_joint_thresholds(&hist);
    debug!(s = th.s, t = th.t, "2D Otsu thresholds");

    let bin = classify_joint(gray, &guide, &th)?;
    if options.morph_kernel <= 1 {
        return Ok(bin);
    }
    let opened = open_brick(&bin, options.morph_kernel)?;
    Ok(close_brick(&opened, options.morph_kernel)?)
}

/// Binarize with 2D Otsu on the image and its guided-filtered version
///
/// With `preview_scale < 1` the work is done on a reduced copy; the result
/// is resized back to the source size and re-thresholded at 127.
///
/// # Errors
///
/// Returns [`BinarizeError::InvalidParameters`] (or a wrapped filter
/// error) for invalid options, before any pixel work.
pub fn two_dimensional_otsu(
    gray: &GrayImage,
    options: &TwoDimensionalOtsuOptions,
) -> BinarizeResult<BinaryImage> {
    options.validate()?;
    if options.preview_scale >= 1.0 {
        return binarize_at_scale(gray, options);
    }

    let small = scale(gray, options.preview_scale)?;
    debug!(
        width = small.width(),
        height = small.height(),
        "2D Otsu on reduced preview"
    );
    let bin = binarize_at_scale(&small, options)?;
    let up = scale_to_size(bin.as_gray(), gray.width(), gray.height())?;
    Ok(BinaryImage::from_gray_cutoff(&up, 127))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halves(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| if x < w / 2 { 30 } else { 220 }).unwrap()
    }

    #[test]
    fn test_validation() {
        let img = halves(16, 16);
        let mut o = TwoDimensionalOtsuOptions {
            morph_kernel: 4,
            ..Default::default()
        };
        assert!(matches!(
            two_dimensional_otsu(&img, &o),
            Err(BinarizeError::InvalidParameters(_))
        ));
        o.morph_kernel = 3;
        o.preview_scale = 0.0;
        assert!(two_dimensional_otsu(&img, &o).is_err());
        o.preview_scale = 1.5;
        assert!(two_dimensional_otsu(&img, &o).is_err());
        o.preview_scale = 1.0;
        o.radius = 0;
        assert!(matches!(
            two_dimensional_otsu(&img, &o),
            Err(BinarizeError::Filter(_))
        ));
    }

    #[test]
    fn test_histogram_sums_to_pixel_count() {
        let gray = GrayImage::from_fn(13, 7, |x, y| (x * 19 + y) as u8).unwrap();
        let guide = GrayImage::from_fn(13, 7, |x, y| (y * 31 + x) as u8).unwrap();
        let hist = JointHistogram::from_images(&gray, &guide).unwrap();
        assert_eq!(hist.counts.iter().sum::<u64>(), 91);
        assert_eq!(hist.total(), 91);
        assert_eq!(hist.get(0, 0), 1);
    }

    #[test]
    fn test_histogram_size_mismatch() {
        let a = GrayImage::new(4, 4).unwrap();
        let b = GrayImage::new(4, 5).unwrap();
        assert!(matches!(
            JointHistogram::from_images(&a, &b),
            Err(BinarizeError::Core(docbin_core::Error::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_prefix_search_matches_brute_force() {
        let gray = GrayImage::from_fn(12, 12, |x, y| ((x * 21 + y * 5) % 256) as u8).unwrap();
        let guide = GrayImage::from_fn(12, 12, |x, y| ((x * 17 + y * 11 + 40) % 256) as u8).unwrap();
        let hist = JointHistogram::from_images(&gray, &guide).unwrap();
        let th = find_joint_thresholds(&hist);

        let pixels: Vec<(f64, f64)> = gray
            .data()
            .iter()
            .zip(guide.data())
            .map(|(&g, &f)| (g as f64, f as f64))
            .collect();
        let n = pixels.len() as f64;
        let variance = |s: f64, t: f64| {
            let (c0, c1): (Vec<_>, Vec<_>) = pixels.iter().partition(|(g, f)| *g <= s && *f <= t);
            if c0.is_empty() || c1.is_empty() {
                return 0.0;
            }
            let mean = |c: &[&(f64, f64)]| {
                let k = c.len() as f64;
                (
                    c.iter().map(|p| p.0).sum::<f64>() / k,
                    c.iter().map(|p| p.1).sum::<f64>() / k,
                )
            };
            let (m0, m1) = (mean(&c0), mean(&c1));
            let (w0, w1) = (c0.len() as f64 / n, c1.len() as f64 / n);
            w0 * w1 * ((m1.0 - m0.0).powi(2) + (m1.1 - m0.1).powi(2))
        };

        let found = variance(th.s as f64, th.t as f64);
        for s in (0..255).step_by(5) {
            for t in (0..255).step_by(5) {
                assert!(variance(s as f64, t as f64) <= found + 1e-6);
            }
        }
    }

    #[test]
    fn test_uniform_is_degenerate() {
        let gray = GrayImage::new_with_value(8, 8, 99).unwrap();
        let hist = JointHistogram::from_images(&gray, &gray).unwrap();
        assert_eq!(find_joint_thresholds(&hist), JointThresholds::DEGENERATE);
    }

    #[test]
    fn test_transition_quadrants() {
        let th = JointThresholds { s: 100, t: 100 };
        assert!(th.is_foreground(100, 100));
        assert!(!th.is_foreground(101, 101));
        // Just past s but far below t: nearer the ink centroid (50, 50)
        assert!(th.is_foreground(101, 0));
        // Barely under t but deep in the paper range of g
        assert!(!th.is_foreground(250, 100));
        // Equidistant from (50, 50.5) and (177.5, 178): ties go to paper
        let th = JointThresholds { s: 100, t: 101 };
        assert!(!th.is_foreground(127, 101));
    }

    #[test]
    fn test_bimodal_blocks_classified_exactly() {
        let img = halves(64, 48);
        for morph_kernel in [0, 3] {
            let o = TwoDimensionalOtsuOptions {
                morph_kernel,
                ..Default::default()
            };
            let bin = two_dimensional_otsu(&img, &o).unwrap();
            let expected = BinaryImage::from_fn(64, 48, |x, _| x < 32).unwrap();
            assert_eq!(bin, expected, "morph_kernel = {morph_kernel}");
        }
    }

    #[test]
    fn test_preview_scale_keeps_size() {
        let img = halves(80, 40);
        let o = TwoDimensionalOtsuOptions {
            preview_scale: 0.5,
            ..Default::default()
        };
        let bin = two_dimensional_otsu(&img, &o).unwrap();
        assert_eq!(bin.dimensions(), (80, 40));
        assert!(bin.is_foreground(5, 20));
        assert!(!bin.is_foreground(75, 20));
    }
}
