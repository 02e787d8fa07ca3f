//! Guided filtering (edge-preserving smoothing)
//!
//! The guided filter models the output as a locally linear transform of a
//! guide image, `q = a * I + b` inside every window, with `a` and `b`
//! chosen by ridge regression against the input `p`:
//!
//! ```text
//! a = cov(I, p) / (var(I) + eps)
//! b = mean(p) - a * mean(I)
//! q = mean(a) * I + mean(b)
//! ```
//!
//! Flat regions (`var << eps`) get `a -> 0` and are smoothed to their local
//! mean; edges (`var >> eps`) get `a -> 1` and pass through. The binarizers
//! use the self-guided form (guide = input), where `cov(I, p) = var(I)`.
//!
//! All statistics are box means over a `(2r+1)` square window computed on
//! intensities normalized to [0, 1]; `eps` is therefore in those units.

use crate::box_filter::box_mean;
use crate::{FilterError, FilterResult};
use docbin_core::{FloatImage, GrayImage, check_same_size};
use tracing::warn;

/// Options for [`guided_filter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidedFilterOptions {
    /// Window radius r; the kernel is `(2r+1) x (2r+1)`
    pub radius: u32,
    /// Regularization epsilon on [0, 1]-normalized intensities
    pub epsilon: f32,
}

impl Default for GuidedFilterOptions {
    fn default() -> Self {
        Self {
            radius: 5,
            epsilon: 0.02,
        }
    }
}

impl GuidedFilterOptions {
    /// Reject a zero radius and a non-positive or non-finite epsilon
    pub fn validate(&self) -> FilterResult<()> {
        if self.radius == 0 {
            return Err(FilterError::InvalidParameters(
                "guided filter radius must be >= 1".into(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "guided filter epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Element-wise product of two equally sized images
fn product(a: &FloatImage, b: &FloatImage) -> FilterResult<FloatImage> {
    let data = a.data().iter().zip(b.data()).map(|(x, y)| x * y).collect();
    Ok(FloatImage::from_data(a.width(), a.height(), data)?)
}

/// Guided filter on [0, 1]-normalized float images.
///
/// `guide` and `input` must have the same dimensions.
///
/// # Errors
///
/// - [`FilterError::InvalidParameters`] for invalid options
/// - [`FilterError::Core`] wrapping a dimension mismatch
/// - [`FilterError::NumericFailure`] if the result is not finite
pub fn guided_filter_float(
    input: &FloatImage,
    guide: &FloatImage,
    options: &GuidedFilterOptions,
) -> FilterResult<FloatImage> {
    options.validate()?;
    check_same_size(guide.dimensions(), input.dimensions())?;

    let r = options.radius;
    let eps = options.epsilon;

    let mean_i = box_mean(guide, r)?;
    let mean_p = box_mean(input, r)?;
    let corr_ii = box_mean(&product(guide, guide)?, r)?;
    let corr_ip = box_mean(&product(guide, input)?, r)?;

    let n = mean_i.data().len();
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for k in 0..n {
        let mi = mean_i.data()[k];
        let mp = mean_p.data()[k];
        let var_i = (corr_ii.data()[k] - mi * mi).max(0.0);
        let cov_ip = corr_ip.data()[k] - mi * mp;
        let ak = cov_ip / (var_i + eps);
        a.push(ak);
        b.push(mp - ak * mi);
    }

    let (w, h) = guide.dimensions();
    let mean_a = box_mean(&FloatImage::from_data(w, h, a)?, r)?;
    let mean_b = box_mean(&FloatImage::from_data(w, h, b)?, r)?;

    let q: Vec<f32> = mean_a
        .data()
        .iter()
        .zip(mean_b.data())
        .zip(guide.data())
        .map(|((ma, mb), i)| ma * i + mb)
        .collect();
    if q.is_empty() {
        return Err(FilterError::NumericFailure("empty guided filter output".into()));
    }

    let out = FloatImage::from_data(w, h, q)?;
    if !out.is_finite() {
        return Err(FilterError::NumericFailure(
            "guided filter produced non-finite values".into(),
        ));
    }
    Ok(out)
}

/// Guided filter of `input` steered by a separate `guide` image.
///
/// # Errors
///
/// Unlike [`guided_filter`], every failure is reported, including a size
/// mismatch between the two images.
pub fn guided_filter_with_guide(
    input: &GrayImage,
    guide: &GrayImage,
    options: &GuidedFilterOptions,
) -> FilterResult<GrayImage> {
    let p = FloatImage::from_gray_normalized(input);
    let i = FloatImage::from_gray_normalized(guide);
    let q = guided_filter_float(&p, &i, options)?;
    Ok(q.to_gray_rescaled())
}

/// Self-guided edge-preserving smoothing of a grayscale image.
///
/// Invalid options are reported as errors. A numeric failure inside the
/// filter is not: the unmodified input is returned instead, so a caller
/// using this as a preprocessing step always gets a usable guide.
///
/// # Examples
///
/// ```
/// use docbin_core::GrayImage;
/// use docbin_filter::{GuidedFilterOptions, guided_filter};
///
/// let img = GrayImage::new_with_value(16, 16, 90).unwrap();
/// let out = guided_filter(&img, &GuidedFilterOptions::default()).unwrap();
/// assert_eq!(out, img);
/// ```
pub fn guided_filter(gray: &GrayImage, options: &GuidedFilterOptions) -> FilterResult<GrayImage> {
    options.validate()?;

    let i = FloatImage::from_gray_normalized(gray);
    match guided_filter_float(&i, &i, options) {
        Ok(q) => Ok(q.to_gray_rescaled()),
        Err(e) => {
            warn!(error = %e, "guided filter failed, passing input through");
            Ok(gray.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image() -> GrayImage {
        GrayImage::from_fn(32, 16, |x, _| if x < 16 { 30 } else { 220 }).unwrap()
    }

    #[test]
    fn test_invalid_options() {
        let img = step_image();
        let bad_radius = GuidedFilterOptions {
            radius: 0,
            epsilon: 0.01,
        };
        assert!(matches!(
            guided_filter(&img, &bad_radius),
            Err(FilterError::InvalidParameters(_))
        ));
        for eps in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let opts = GuidedFilterOptions {
                radius: 2,
                epsilon: eps,
            };
            assert!(guided_filter(&img, &opts).is_err());
        }
    }

    #[test]
    fn test_preserves_strong_edge() {
        let img = step_image();
        let opts = GuidedFilterOptions {
            radius: 3,
            epsilon: 0.001,
        };
        let out = guided_filter(&img, &opts).unwrap();
        // Far from the edge the plateaus are untouched
        assert_eq!(out.get_pixel(2, 8), Some(30));
        assert_eq!(out.get_pixel(29, 8), Some(220));
        // Across the edge the step survives with little blur
        let left = out.get_pixel_unchecked(15, 8) as i32;
        let right = out.get_pixel_unchecked(16, 8) as i32;
        assert!(right - left > 120, "edge blurred: {left} -> {right}");
    }

    #[test]
    fn test_large_epsilon_degenerates_to_box_filter() {
        let img = GrayImage::from_fn(24, 18, |x, y| ((x * 11 + y * 17) % 256) as u8).unwrap();
        let opts = GuidedFilterOptions {
            radius: 2,
            epsilon: 1.0e9,
        };
        let out = guided_filter(&img, &opts).unwrap();

        // a -> 0 and b -> mean(I), so q = mean(b) = box(box(I))
        let f = FloatImage::from_gray_normalized(&img);
        let expected = box_mean(&box_mean(&f, 2).unwrap(), 2)
            .unwrap()
            .to_gray_rescaled();
        for (o, e) in out.data().iter().zip(expected.data()) {
            assert!((*o as i32 - *e as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_with_guide_size_mismatch() {
        let a = GrayImage::new(8, 8).unwrap();
        let b = GrayImage::new(8, 9).unwrap();
        let err = guided_filter_with_guide(&a, &b, &GuidedFilterOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Core(docbin_core::Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_does_not_mutate_input() {
        let img = step_image();
        let before = img.clone();
        let _ = guided_filter(&img, &GuidedFilterOptions::default()).unwrap();
        assert_eq!(img, before);
    }
}
