//! 256-bin intensity histograms

use docbin_core::{GrayImage, WindowBounds};

/// Intensity histogram of an 8-bit image or window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Wrap raw bin counts
    pub fn from_counts(counts: [u64; 256]) -> Self {
        let total = counts.iter().sum();
        Self { counts, total }
    }

    /// Histogram of a whole image
    pub fn from_image(gray: &GrayImage) -> Self {
        let mut counts = [0u64; 256];
        for &v in gray.data() {
            counts[v as usize] += 1;
        }
        Self {
            counts,
            total: gray.pixel_count() as u64,
        }
    }

    /// Histogram of one window of an image
    pub fn from_window(gray: &GrayImage, bounds: &WindowBounds) -> Self {
        let mut counts = [0u64; 256];
        for y in bounds.y1..=bounds.y2 {
            let row = &gray.row(y)[bounds.x1 as usize..=bounds.x2 as usize];
            for &v in row {
                counts[v as usize] += 1;
            }
        }
        Self {
            counts,
            total: bounds.area(),
        }
    }

    /// Raw bin counts
    #[inline]
    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Number of samples
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bin probabilities (all zero for an empty histogram)
    pub fn normalized(&self) -> [f64; 256] {
        let mut p = [0.0; 256];
        if self.total > 0 {
            let n = self.total as f64;
            for (pi, &c) in p.iter_mut().zip(&self.counts) {
                *pi = c as f64 / n;
            }
        }
        p
    }

    /// Number of distinct occupied bins
    pub fn occupied_bins(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_and_window() {
        let img = GrayImage::from_raw(3, 2, vec![0, 5, 5, 9, 5, 0]).unwrap();
        let h = Histogram::from_image(&img);
        assert_eq!(h.total(), 6);
        assert_eq!(h.counts()[5], 3);
        assert_eq!(h.occupied_bins(), 3);

        let w = Histogram::from_window(&img, &WindowBounds::clamped(1, 0, 2, 1, 3, 2));
        assert_eq!(w.total(), 4);
        assert_eq!(w.counts()[5], 3);
        assert_eq!(w.counts()[0], 1);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let img = GrayImage::from_fn(16, 16, |x, y| (x * 16 + y) as u8).unwrap();
        let p = Histogram::from_image(&img).normalized();
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(Histogram::from_counts([0; 256]).normalized(), [0.0; 256]);
    }
}
