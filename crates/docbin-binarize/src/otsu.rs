//! Otsu's global threshold
//!
//! Scans every split `t` of the histogram into `[0, t]` and `[t+1, 255]`
//! and keeps the one maximizing the between-class variance
//!
//! ```text
//! sigma_b^2(t) = w0 * w1 * (mu0 - mu1)^2
//! ```
//!
//! Class weights and means come from running integer sums, so two splits
//! that put the same pixels in each class produce bit-identical variances.
//! The strict maximum is kept (an earlier split wins over a later equal
//! one), except that a run of consecutive equal maxima, which occurs when
//! empty bins separate the classes, reports the middle of the run. That
//! places the threshold halfway across the gap: two equal populations at
//! 0 and 255 split at 127.

use crate::histogram::Histogram;
use crate::BinarizeResult;
use docbin_core::{BinaryImage, GrayImage};
use tracing::{debug, warn};

/// Threshold used when a histogram has no valid split
pub const DEGENERATE_THRESHOLD: u8 = 127;

/// Best split index of a histogram slice, or `None` if every split leaves
/// one class empty
///
/// Splits `t` range over `0..counts.len() - 1`; class 0 is `counts[..=t]`.
pub(crate) fn best_split(counts: &[u64]) -> Option<usize> {
    if counts.len() < 2 {
        return None;
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let sum_all: u64 = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| i as u64 * c)
        .sum();

    let n = total as f64;
    let mut count0 = 0u64;
    let mut sum0 = 0u64;
    let mut best_var = 0.0f64;
    let mut run: Option<(usize, usize)> = None;

    for (t, &c) in counts[..counts.len() - 1].iter().enumerate() {
        count0 += c;
        sum0 += t as u64 * c;
        if count0 == 0 || count0 == total {
            continue;
        }
        let count1 = total - count0;
        let w0 = count0 as f64 / n;
        let w1 = count1 as f64 / n;
        let mu0 = sum0 as f64 / count0 as f64;
        let mu1 = (sum_all - sum0) as f64 / count1 as f64;
        let d = mu0 - mu1;
        let var = w0 * w1 * d * d;

        if var > best_var {
            best_var = var;
            run = Some((t, t));
        } else if var == best_var
            && let Some((start, end)) = run
            && end + 1 == t
        {
            run = Some((start, t));
        }
    }

    run.map(|(start, end)| (start + end) / 2)
}

/// Otsu threshold of a histogram
///
/// Falls back to [`DEGENERATE_THRESHOLD`] when no split separates two
/// non-empty classes (e.g. a uniform image).
///
/// # Examples
///
/// ```
/// use docbin_binarize::{Histogram, otsu_threshold};
///
/// let mut counts = [0u64; 256];
/// counts[0] = 128;
/// counts[255] = 128;
/// assert_eq!(otsu_threshold(&Histogram::from_counts(counts)), 127);
/// ```
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    match best_split(hist.counts()) {
        Some(t) => t as u8,
        None => DEGENERATE_THRESHOLD,
    }
}

/// Compute Otsu's threshold for a grayscale image
pub fn compute_otsu_threshold(gray: &GrayImage) -> u8 {
    let hist = Histogram::from_image(gray);
    match best_split(hist.counts()) {
        Some(t) => {
            debug!(threshold = t, "global Otsu threshold");
            t as u8
        }
        None => {
            warn!(
                occupied_bins = hist.occupied_bins(),
                "degenerate histogram, using fallback threshold"
            );
            DEGENERATE_THRESHOLD
        }
    }
}

/// Binarize with Otsu's global threshold
///
/// Pixels `<=` the threshold become foreground.
pub fn threshold_otsu(gray: &GrayImage) -> BinarizeResult<BinaryImage> {
    let t = compute_otsu_threshold(gray);
    Ok(BinaryImage::from_gray_cutoff(gray, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist_of(pairs: &[(usize, u64)]) -> Histogram {
        let mut counts = [0u64; 256];
        for &(v, c) in pairs {
            counts[v] = c;
        }
        Histogram::from_counts(counts)
    }

    #[test]
    fn test_extremes_split_at_127() {
        assert_eq!(otsu_threshold(&hist_of(&[(0, 128), (255, 128)])), 127);
    }

    #[test]
    fn test_gap_midpoint() {
        // Two clusters with empty bins 41..=199 between them
        let h = hist_of(&[(30, 10), (40, 10), (200, 10), (210, 10)]);
        assert_eq!(otsu_threshold(&h), (40 + 199) / 2);
    }

    #[test]
    fn test_uniform_falls_back() {
        assert_eq!(otsu_threshold(&hist_of(&[(77, 500)])), DEGENERATE_THRESHOLD);
        assert_eq!(otsu_threshold(&Histogram::from_counts([0; 256])), 127);
        // All mass in the last bin: no split leaves class 1 non-empty
        assert_eq!(otsu_threshold(&hist_of(&[(255, 9)])), 127);
    }

    #[test]
    fn test_three_clusters() {
        // Splitting off the lowest cluster wins; the plateau 0..=127 is
        // reported at its middle
        let h = hist_of(&[(0, 10), (128, 10), (255, 10)]);
        assert_eq!(otsu_threshold(&h), 63);
    }

    #[test]
    fn test_brute_force_agreement() {
        let h = hist_of(&[(12, 40), (50, 15), (90, 5), (160, 30), (220, 60), (221, 7)]);
        let p = h.normalized();
        let mut best = (0.0, 0usize);
        for t in 0..255 {
            let w0: f64 = p[..=t].iter().sum();
            let w1 = 1.0 - w0;
            if w0 < 1e-12 || w1 < 1e-12 {
                continue;
            }
            let m0: f64 = p[..=t].iter().enumerate().map(|(i, q)| i as f64 * q).sum::<f64>() / w0;
            let m1: f64 = p[t + 1..]
                .iter()
                .enumerate()
                .map(|(i, q)| (i + t + 1) as f64 * q)
                .sum::<f64>()
                / w1;
            let v = w0 * w1 * (m0 - m1) * (m0 - m1);
            if v > best.0 + 1e-9 {
                best = (v, t);
            }
        }
        // The brute-force scan sees the plateau start; Otsu reports its middle
        let t = otsu_threshold(&h) as usize;
        assert!(t >= best.1);
        assert!(h.counts()[best.1 + 1..=t].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_threshold_otsu_binary() {
        let img = GrayImage::from_fn(8, 8, |x, _| if x < 4 { 20 } else { 230 }).unwrap();
        let bin = threshold_otsu(&img).unwrap();
        assert_eq!(bin.foreground_count(), 32);
        assert!(bin.data().iter().all(|&v| v == 0 || v == 255));
    }
}
