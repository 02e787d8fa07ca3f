//! Windowed statistics using integral images
//!
//! Computes the mean, variance and standard deviation of any axis-aligned
//! window in O(1), using two summed area tables (sum and sum of squares)
//! built in a single pass over the image.
//!
//! Both tables have one extra leading row and column of zeros, so entry
//! `(x + 1, y + 1)` holds the sum over `[0, x] x [0, y]` and no window
//! lookup needs a boundary special case. Sums are exact `u64`: an 8-bit
//! image would need more than 2^40 pixels to overflow the square table.

use docbin_core::{GrayImage, WindowBounds};

/// Statistics of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Mean intensity
    pub mean: f64,
    /// Population variance, clamped to be non-negative
    pub variance: f64,
    /// Standard deviation (`sqrt(variance)`)
    pub stddev: f64,
}

/// Sum and sum-of-squares tables over an 8-bit image
///
/// Built once per call and read-only afterward.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Build both tables from a grayscale image.
    ///
    /// The recursion is:
    /// `S(x,y) = v(x,y) + S(x-1,y) + S(x,y-1) - S(x-1,y-1)`,
    /// evaluated row by row with a running row sum, which avoids the
    /// subtraction.
    pub fn build(gray: &GrayImage) -> Self {
        let w = gray.width() as usize;
        let h = gray.height() as usize;
        let stride = w + 1;
        let mut sum = vec![0u64; stride * (h + 1)];
        let mut sum_sq = vec![0u64; stride * (h + 1)];

        for y in 0..h {
            let row = gray.row(y as u32);
            let mut row_sum = 0u64;
            let mut row_sum_sq = 0u64;
            let above = y * stride;
            let here = (y + 1) * stride;
            for x in 0..w {
                let v = row[x] as u64;
                row_sum += v;
                row_sum_sq += v * v;
                sum[here + x + 1] = sum[above + x + 1] + row_sum;
                sum_sq[here + x + 1] = sum_sq[above + x + 1] + row_sum_sq;
            }
        }

        Self {
            width: gray.width(),
            height: gray.height(),
            stride,
            sum,
            sum_sq,
        }
    }

    /// Width of the source image
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the source image
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw `(sum, sum_of_squares)` over a window
    #[inline]
    pub fn window_sums(&self, b: &WindowBounds) -> (u64, u64) {
        let s = self.stride;
        let top = b.y1 as usize * s;
        let bottom = (b.y2 as usize + 1) * s;
        let left = b.x1 as usize;
        let right = b.x2 as usize + 1;

        // (A + D) - (B + C) keeps the unsigned arithmetic non-negative
        let rect = |t: &[u64]| {
            (t[bottom + right] + t[top + left]) - (t[top + right] + t[bottom + left])
        };
        (rect(&self.sum[..]), rect(&self.sum_sq[..]))
    }

    /// Statistics over a window that is already clamped to the image
    pub fn query_bounds(&self, b: &WindowBounds) -> WindowStats {
        let (s, sq) = self.window_sums(b);
        let n = b.area() as f64;
        let mean = s as f64 / n;
        // Rounding can push this slightly below zero on flat windows.
        let variance = (sq as f64 / n - mean * mean).max(0.0);
        WindowStats {
            mean,
            variance,
            stddev: variance.sqrt(),
        }
    }

    /// Statistics over `[x1, x2] x [y1, y2]`, clamped to the image first
    ///
    /// # Examples
    ///
    /// ```
    /// use docbin_core::GrayImage;
    /// use docbin_filter::IntegralImage;
    ///
    /// let img = GrayImage::from_raw(2, 2, vec![0, 10, 20, 30]).unwrap();
    /// let ii = IntegralImage::build(&img);
    /// let st = ii.query(-5, -5, 10, 10);
    /// assert_eq!(st.mean, 15.0);
    /// ```
    pub fn query(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> WindowStats {
        let b = WindowBounds::clamped(x1, y1, x2, y2, self.width, self.height);
        self.query_bounds(&b)
    }

    /// Statistics of the square window of half-size `half` centred on (x, y)
    #[inline]
    pub fn query_centered(&self, x: u32, y: u32, half: u32) -> WindowStats {
        let b = WindowBounds::centered(x, y, half, self.width, self.height);
        self.query_bounds(&b)
    }

    /// Statistics over the whole image
    pub fn global_stats(&self) -> WindowStats {
        self.query_bounds(&WindowBounds::full(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| ((x * 37 + y * 91 + x * y * 13) % 256) as u8).unwrap()
    }

    fn brute_force(img: &GrayImage, b: &WindowBounds) -> (f64, f64) {
        let mut sum = 0.0f64;
        let mut n = 0.0f64;
        for y in b.y1..=b.y2 {
            for x in b.x1..=b.x2 {
                sum += img.get_pixel_unchecked(x, y) as f64;
                n += 1.0;
            }
        }
        let mean = sum / n;
        let mut ss = 0.0f64;
        for y in b.y1..=b.y2 {
            for x in b.x1..=b.x2 {
                let d = img.get_pixel_unchecked(x, y) as f64 - mean;
                ss += d * d;
            }
        }
        (mean, (ss / n).sqrt())
    }

    #[test]
    fn test_full_bounds_match_brute_force() {
        for (w, h) in [(1, 1), (3, 3), (17, 13), (256, 256)] {
            let img = pattern(w, h);
            let ii = IntegralImage::build(&img);
            let st = ii.global_stats();
            let (mean, stddev) = brute_force(&img, &WindowBounds::full(w, h));
            assert!((st.mean - mean).abs() < 1e-9, "{w}x{h} mean");
            assert!((st.stddev - stddev).abs() < 1e-6, "{w}x{h} stddev");
        }
    }

    #[test]
    fn test_sub_windows_match_brute_force() {
        let img = pattern(17, 13);
        let ii = IntegralImage::build(&img);
        for (x, y, half) in [(0, 0, 2), (16, 12, 3), (8, 6, 1), (3, 11, 5), (9, 0, 0)] {
            let b = WindowBounds::centered(x, y, half, 17, 13);
            let st = ii.query_bounds(&b);
            let (mean, stddev) = brute_force(&img, &b);
            assert!((st.mean - mean).abs() < 1e-9);
            assert!((st.stddev - stddev).abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_pixel_window() {
        let img = pattern(5, 4);
        let ii = IntegralImage::build(&img);
        let st = ii.query(4, 3, 4, 3);
        assert_eq!(st.mean, img.get_pixel_unchecked(4, 3) as f64);
        assert_eq!(st.variance, 0.0);
        assert_eq!(st.stddev, 0.0);
    }

    #[test]
    fn test_flat_image_has_zero_variance() {
        let img = GrayImage::new_with_value(31, 7, 201).unwrap();
        let ii = IntegralImage::build(&img);
        let st = ii.query_centered(15, 3, 4);
        assert_eq!(st.mean, 201.0);
        assert!(st.variance >= 0.0);
        assert!(st.stddev < 1e-6);
    }

    #[test]
    fn test_query_clamps_out_of_range() {
        let img = pattern(6, 6);
        let ii = IntegralImage::build(&img);
        assert_eq!(ii.query(-100, -100, 100, 100), ii.global_stats());
    }
}
