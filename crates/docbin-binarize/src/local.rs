//! Local adaptive thresholding
//!
//! Each pixel gets its own threshold from the mean `m` and standard
//! deviation `s` of the square window centred on it (clamped at the image
//! border), all answered in O(1) by one shared [`IntegralImage`]:
//!
//! | Method      | Threshold                                   |
//! |-------------|---------------------------------------------|
//! | Niblack     | `m + k * s`                                 |
//! | Sauvola     | `m * (1 + k * (s / R - 1))`                 |
//! | Wolf-Jolion | `m - k * s * (1 - m / M)`, `M` = image mean  |
//! | NICK        | `m + k * sqrt(s^2 + m^2)`                   |
//!
//! The Wolf-Jolion form is a simplified variant of the published method
//! that uses only local box statistics. When the image mean `M` is zero
//! the correction term is dropped and the threshold is `m`.
//!
//! Pixels with intensity `<= T` are foreground.

use crate::{BinarizeError, BinarizeResult};
use docbin_core::{BinaryImage, FloatImage, GrayImage};
use docbin_filter::{IntegralImage, WindowStats};
use tracing::debug;

/// Smallest accepted window size
pub const MIN_WINDOW_SIZE: u32 = 3;
/// Largest accepted window size
pub const MAX_WINDOW_SIZE: u32 = 101;

/// Local threshold formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalMethod {
    /// `T = m + k * s`
    Niblack,
    /// `T = m * (1 + k * (s / R - 1))`
    Sauvola,
    /// `T = m - k * s * (1 - m / M)`
    WolfJolion,
    /// `T = m + k * sqrt(s^2 + m^2)`
    Nick,
}

impl LocalMethod {
    /// Default `k` for this method
    pub fn default_k(self) -> f64 {
        match self {
            LocalMethod::Niblack | LocalMethod::Nick => -0.2,
            LocalMethod::Sauvola | LocalMethod::WolfJolion => 0.5,
        }
    }

    /// Accepted `k` range (inclusive)
    pub fn k_range(self) -> (f64, f64) {
        match self {
            LocalMethod::Niblack | LocalMethod::Nick => (-1.0, 1.0),
            LocalMethod::Sauvola | LocalMethod::WolfJolion => (0.1, 1.0),
        }
    }
}

/// Options for [`local_threshold`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalThresholdOptions {
    /// Threshold formula
    pub method: LocalMethod,
    /// Side of the square window; even values are rounded up to odd
    pub window_size: u32,
    /// Formula weight `k`
    pub k: f64,
    /// Dynamic range of the standard deviation (Sauvola only)
    pub r: f64,
}

impl Default for LocalThresholdOptions {
    fn default() -> Self {
        Self::for_method(LocalMethod::Sauvola)
    }
}

impl LocalThresholdOptions {
    /// Default options for one method
    pub fn for_method(method: LocalMethod) -> Self {
        Self {
            method,
            window_size: 15,
            k: method.default_k(),
            r: 128.0,
        }
    }

    /// Set the window size
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set `k`
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set `R`
    pub fn with_r(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    /// The odd window size actually used
    pub fn effective_window_size(&self) -> u32 {
        self.window_size | 1
    }

    /// Check every parameter against its range
    pub fn validate(&self) -> BinarizeResult<()> {
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&self.window_size) {
            return Err(BinarizeError::InvalidParameters(format!(
                "window_size must be in [{}, {}], got {}",
                MIN_WINDOW_SIZE, MAX_WINDOW_SIZE, self.window_size
            )));
        }
        let (lo, hi) = self.method.k_range();
        if !self.k.is_finite() || self.k < lo || self.k > hi {
            return Err(BinarizeError::InvalidParameters(format!(
                "k for {:?} must be in [{}, {}], got {}",
                self.method, lo, hi, self.k
            )));
        }
        if self.method == LocalMethod::Sauvola
            && (!self.r.is_finite() || self.r < 50.0 || self.r > 255.0)
        {
            return Err(BinarizeError::InvalidParameters(format!(
                "R must be in [50, 255], got {}",
                self.r
            )));
        }
        Ok(())
    }
}

/// Threshold of one window under the given formula
#[inline]
fn window_threshold(opts: &LocalThresholdOptions, st: &WindowStats, global_mean: f64) -> f64 {
    let (m, s, k) = (st.mean, st.stddev, opts.k);
    match opts.method {
        LocalMethod::Niblack => m + k * s,
        LocalMethod::Sauvola => m * (1.0 + k * (s / opts.r - 1.0)),
        LocalMethod::WolfJolion => {
            if global_mean == 0.0 {
                m
            } else {
                m - k * s * (1.0 - m / global_mean)
            }
        }
        LocalMethod::Nick => m + k * (st.variance + m * m).sqrt(),
    }
}

/// Visit the threshold of every pixel in row-major order
fn for_each_threshold<F>(gray: &GrayImage, opts: &LocalThresholdOptions, mut f: F) -> BinarizeResult<()>
where
    F: FnMut(u32, u32, f64),
{
    opts.validate()?;
    let half = opts.effective_window_size() / 2;
    let ii = IntegralImage::build(gray);
    let global_mean = match opts.method {
        LocalMethod::WolfJolion => ii.global_stats().mean,
        _ => 0.0,
    };
    debug!(
        method = ?opts.method,
        window = opts.effective_window_size(),
        k = opts.k,
        global_mean,
        "local threshold"
    );

    for y in 0..gray.height() {
        for x in 0..gray.width() {
            let st = ii.query_centered(x, y, half);
            f(x, y, window_threshold(opts, &st, global_mean));
        }
    }
    Ok(())
}

/// Binarize with a local adaptive threshold
///
/// # Errors
///
/// Returns [`BinarizeError::InvalidParameters`] if the window size or a
/// formula weight is out of range; nothing is computed in that case.
///
/// # Examples
///
/// ```
/// use docbin_binarize::{LocalMethod, LocalThresholdOptions, local_threshold};
/// use docbin_core::GrayImage;
///
/// let page = GrayImage::from_fn(32, 32, |x, y| if (x / 4 + y / 4) % 2 == 0 { 40 } else { 200 })
///     .unwrap();
/// let opts = LocalThresholdOptions::for_method(LocalMethod::Sauvola).with_window_size(9);
/// let bin = local_threshold(&page, &opts).unwrap();
/// assert!(bin.is_foreground(0, 0));
/// assert!(!bin.is_foreground(4, 0));
/// ```
pub fn local_threshold(
    gray: &GrayImage,
    options: &LocalThresholdOptions,
) -> BinarizeResult<BinaryImage> {
    let mut out = BinaryImage::new(gray.width(), gray.height())?;
    for_each_threshold(gray, options, |x, y, t| {
        out.set_foreground(x, y, gray.get_pixel_unchecked(x, y) as f64 <= t);
    })?;
    Ok(out)
}

/// Per-pixel threshold surface of a local method
pub fn local_threshold_map(
    gray: &GrayImage,
    options: &LocalThresholdOptions,
) -> BinarizeResult<FloatImage> {
    let mut out = FloatImage::new(gray.width(), gray.height())?;
    for_each_threshold(gray, options, |x, y, t| {
        out.set_pixel_unchecked(x, y, t as f32);
    })?;
    Ok(out)
}
