//! Windowed (local) Otsu thresholding
//!
//! The image is tiled with square windows of `window_size`, advancing by
//! `step = max(1, window_size * (1 - overlap))`. Along each axis the last
//! window is aligned to the image edge, so every pixel is covered. Each
//! window gets the Otsu threshold of its own histogram (127 for a uniform
//! window).
//!
//! Without interpolation a pixel is thresholded by the last window that
//! covers it. With interpolation the per-window thresholds form a grid
//! anchored at window centres, and each pixel's threshold is bilinearly
//! interpolated from the four surrounding grid points (clamped outside the
//! outermost centres), which removes block seams.

use crate::histogram::Histogram;
use crate::otsu::otsu_threshold;
use crate::{BinarizeError, BinarizeResult};
use docbin_core::{BinaryImage, FloatImage, GrayImage, WindowBounds};
use tracing::debug;

/// Options for [`local_otsu`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalOtsuOptions {
    /// Side of each square window (clipped to the image)
    pub window_size: u32,
    /// Fraction of a window shared with the next one, in [0, 1)
    pub overlap: f64,
    /// Interpolate thresholds between window centres
    pub interpolation: bool,
}

impl Default for LocalOtsuOptions {
    fn default() -> Self {
        Self {
            window_size: 64,
            overlap: 0.5,
            interpolation: true,
        }
    }
}

impl LocalOtsuOptions {
    /// Check every parameter against its range
    pub fn validate(&self) -> BinarizeResult<()> {
        if self.window_size < 2 {
            return Err(BinarizeError::InvalidParameters(format!(
                "window_size must be >= 2, got {}",
                self.window_size
            )));
        }
        if !self.overlap.is_finite() || !(0.0..1.0).contains(&self.overlap) {
            return Err(BinarizeError::InvalidParameters(format!(
                "overlap must be in [0, 1), got {}",
                self.overlap
            )));
        }
        Ok(())
    }

    /// Distance between consecutive window origins
    pub fn step(&self) -> u32 {
        ((self.window_size as f64 * (1.0 - self.overlap)) as u32).max(1)
    }
}

/// Window origins along one axis of length `len`
fn window_origins(len: u32, size: u32, step: u32) -> Vec<u32> {
    let size = size.min(len);
    let last = len - size;
    let mut origins = Vec::new();
    let mut o = 0;
    while o < last {
        origins.push(o);
        o += step;
    }
    origins.push(last);
    origins
}

/// Per-window thresholds with their window geometry
struct ThresholdGrid {
    xs: Vec<u32>,
    ys: Vec<u32>,
    win_w: u32,
    win_h: u32,
    /// Row-major, `ys.len()` rows of `xs.len()` values
    values: Vec<u8>,
}

impl ThresholdGrid {
    fn build(gray: &GrayImage, opts: &LocalOtsuOptions) -> Self {
        let (w, h) = gray.dimensions();
        let step = opts.step();
        let xs = window_origins(w, opts.window_size, step);
        let ys = window_origins(h, opts.window_size, step);
        let win_w = opts.window_size.min(w);
        let win_h = opts.window_size.min(h);

        let mut values = Vec::with_capacity(xs.len() * ys.len());
        for &y0 in &ys {
            for &x0 in &xs {
                let b = WindowBounds {
                    x1: x0,
                    y1: y0,
                    x2: x0 + win_w - 1,
                    y2: y0 + win_h - 1,
                };
                values.push(otsu_threshold(&Histogram::from_window(gray, &b)));
            }
        }
        debug!(
            cols = xs.len(),
            rows = ys.len(),
            step,
            "local Otsu threshold grid"
        );

        Self {
            xs,
            ys,
            win_w,
            win_h,
            values,
        }
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.xs.len() + i] as f64
    }

    /// Window centres along one axis
    fn centres(origins: &[u32], size: u32) -> Vec<f64> {
        origins
            .iter()
            .map(|&o| o as f64 + (size - 1) as f64 / 2.0)
            .collect()
    }

    /// Paint each window's threshold over its pixels, later windows last
    fn paint(&self, w: u32, h: u32) -> BinarizeResult<FloatImage> {
        let mut map = FloatImage::new(w, h)?;
        for (j, &y0) in self.ys.iter().enumerate() {
            for (i, &x0) in self.xs.iter().enumerate() {
                let t = self.value(i, j) as f32;
                for y in y0..y0 + self.win_h {
                    for x in x0..x0 + self.win_w {
                        map.set_pixel_unchecked(x, y, t);
                    }
                }
            }
        }
        Ok(map)
    }

    /// Bilinearly interpolated threshold surface
    fn interpolate(&self, w: u32, h: u32) -> BinarizeResult<FloatImage> {
        let cx = Self::centres(&self.xs, self.win_w);
        let cy = Self::centres(&self.ys, self.win_h);
        let col_pos: Vec<(usize, usize, f64)> = (0..w).map(|x| bracket(&cx, x as f64)).collect();

        let mut map = FloatImage::new(w, h)?;
        for y in 0..h {
            let (j0, j1, fy) = bracket(&cy, y as f64);
            for (x, &(i0, i1, fx)) in col_pos.iter().enumerate() {
                let top = self.value(i0, j0) * (1.0 - fx) + self.value(i1, j0) * fx;
                let bottom = self.value(i0, j1) * (1.0 - fx) + self.value(i1, j1) * fx;
                let t = top * (1.0 - fy) + bottom * fy;
                map.set_pixel_unchecked(x as u32, y, t as f32);
            }
        }
        Ok(map)
    }
}

/// Surrounding grid indices and blend weight of `p` among sorted centres
fn bracket(centres: &[f64], p: f64) -> (usize, usize, f64) {
    let n = centres.len();
    let k = centres.partition_point(|&c| c <= p);
    if k == 0 {
        (0, 0, 0.0)
    } else if k == n {
        (n - 1, n - 1, 0.0)
    } else {
        let (c0, c1) = (centres[k - 1], centres[k]);
        (k - 1, k, (p - c0) / (c1 - c0))
    }
}

/// Per-pixel threshold surface of windowed Otsu
pub fn local_otsu_threshold_map(
    gray: &GrayImage,
    options: &LocalOtsuOptions,
) -> BinarizeResult<FloatImage> {
    options.validate()?;
    let grid = ThresholdGrid::build(gray, options);
    let (w, h) = gray.dimensions();
    if options.interpolation {
        grid.interpolate(w, h)
    } else {
        grid.paint(w, h)
    }
}

/// Binarize with windowed Otsu thresholds
///
/// # Errors
///
/// Returns [`BinarizeError::InvalidParameters`] for a window smaller than
/// 2 or an overlap outside [0, 1).
pub fn local_otsu(gray: &GrayImage, options: &LocalOtsuOptions) -> BinarizeResult<BinaryImage> {
    let map = local_otsu_threshold_map(gray, options)?;
    let mut out = BinaryImage::new(gray.width(), gray.height())?;
    for (i, (&v, &t)) in gray.data().iter().zip(map.data()).enumerate() {
        let x = (i % gray.width() as usize) as u32;
        let y = (i / gray.width() as usize) as u32;
        out.set_foreground(x, y, v as f32 <= t);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(window_size: u32, overlap: f64, interpolation: bool) -> LocalOtsuOptions {
        LocalOtsuOptions {
            window_size,
            overlap,
            interpolation,
        }
    }

    #[test]
    fn test_validation() {
        let img = GrayImage::new(8, 8).unwrap();
        assert!(local_otsu(&img, &opts(1, 0.0, true)).is_err());
        assert!(local_otsu(&img, &opts(4, 1.0, true)).is_err());
        assert!(local_otsu(&img, &opts(4, -0.1, true)).is_err());
        assert!(local_otsu(&img, &opts(4, f64::NAN, false)).is_err());
    }

    #[test]
    fn test_window_origins() {
        assert_eq!(window_origins(10, 4, 2), vec![0, 2, 4, 6]);
        assert_eq!(window_origins(10, 4, 3), vec![0, 3, 6]);
        assert_eq!(window_origins(11, 4, 4), vec![0, 4, 7]);
        assert_eq!(window_origins(5, 8, 4), vec![0]);
        assert_eq!(opts(10, 0.95, false).step(), 1);
    }

    #[test]
    fn test_uniform_windows_fall_back() {
        let img = GrayImage::new_with_value(20, 20, 200).unwrap();
        let map = local_otsu_threshold_map(&img, &opts(8, 0.5, false)).unwrap();
        assert!(map.data().iter().all(|&t| t == 127.0));
        // 200 > 127: a blank page stays blank
        let bin = local_otsu(&img, &opts(8, 0.5, true)).unwrap();
        assert_eq!(bin.foreground_count(), 0);
    }

    #[test]
    fn test_later_windows_overwrite() {
        // Left half uniform, right half bimodal; window 8 with step 4
        let img = GrayImage::from_fn(16, 8, |x, y| {
            if x < 8 { 100 } else if y % 2 == 0 { 20 } else { 220 }
        })
        .unwrap();
        let map = local_otsu_threshold_map(&img, &opts(8, 0.5, false)).unwrap();
        // Columns 4..8 belong to windows at 0 and 4; the window at 4 wins
        let mixed = map.get_pixel(5, 0).unwrap();
        let uniform = map.get_pixel(1, 0).unwrap();
        assert_eq!(uniform, 127.0);
        assert_ne!(mixed, 127.0);
    }

    #[test]
    fn test_interpolated_has_no_seams() {
        let img = GrayImage::from_fn(96, 80, |x, y| {
            let paper = 240 - (x * 100 / 95) as i32;
            let ink = (x % 12 < 3) && (y % 10 < 6);
            (if ink { paper / 3 } else { paper }) as u8
        })
        .unwrap();
        let o = opts(24, 0.5, true);
        let grid = ThresholdGrid::build(&img, &o);
        let map = local_otsu_threshold_map(&img, &o).unwrap();

        // Largest grid difference per unit distance between neighbouring centres
        let cx = ThresholdGrid::centres(&grid.xs, grid.win_w);
        let cy = ThresholdGrid::centres(&grid.ys, grid.win_h);
        let mut slope: f64 = 0.0;
        for j in 0..grid.ys.len() {
            for i in 0..grid.xs.len() {
                if i + 1 < grid.xs.len() {
                    let d = (grid.value(i + 1, j) - grid.value(i, j)).abs();
                    slope = slope.max(d / (cx[i + 1] - cx[i]));
                }
                if j + 1 < grid.ys.len() {
                    let d = (grid.value(i, j + 1) - grid.value(i, j)).abs();
                    slope = slope.max(d / (cy[j + 1] - cy[j]));
                }
            }
        }

        let (w, h) = map.dimensions();
        for y in 0..h {
            for x in 0..w {
                let t = map.get_pixel_unchecked(x, y) as f64;
                if x + 1 < w {
                    let d = (map.get_pixel_unchecked(x + 1, y) as f64 - t).abs();
                    assert!(d <= slope + 1e-3, "seam at ({x}, {y}): {d} > {slope}");
                }
                if y + 1 < h {
                    let d = (map.get_pixel_unchecked(x, y + 1) as f64 - t).abs();
                    assert!(d <= slope + 1e-3, "seam at ({x}, {y}): {d} > {slope}");
                }
            }
        }
    }

    #[test]
    fn test_interpolated_matches_grid_at_centres() {
        let img = GrayImage::from_fn(40, 40, |x, y| ((x * 13 + y * 7) % 256) as u8).unwrap();
        let o = opts(9, 0.0, true);
        let grid = ThresholdGrid::build(&img, &o);
        let map = local_otsu_threshold_map(&img, &o).unwrap();
        // Window 9 has an integral centre at origin + 4
        for (j, &y0) in grid.ys.iter().enumerate() {
            for (i, &x0) in grid.xs.iter().enumerate() {
                let t = map.get_pixel_unchecked(x0 + 4, y0 + 4) as f64;
                assert!((t - grid.value(i, j)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_binary_output() {
        let img = GrayImage::from_fn(50, 30, |x, y| ((x * x + y * 3) % 256) as u8).unwrap();
        for interpolation in [false, true] {
            let bin = local_otsu(&img, &opts(16, 0.25, interpolation)).unwrap();
            assert!(bin.data().iter().all(|&v| v == 0 || v == 255));
        }
    }
}
