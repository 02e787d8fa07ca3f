//! WindowBounds - clamped rectangular window
//!
//! Inclusive pixel rectangle used by every windowed computation. A bounds
//! value is always clamped to its image, so its area is at least 1.

/// Inclusive window `[x1, x2] x [y1, y2]` inside a `width x height` image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowBounds {
    /// Left column (inclusive)
    pub x1: u32,
    /// Top row (inclusive)
    pub y1: u32,
    /// Right column (inclusive)
    pub x2: u32,
    /// Bottom row (inclusive)
    pub y2: u32,
}

impl WindowBounds {
    /// Clamp an arbitrary (possibly negative or oversized) rectangle to the
    /// image. Corners are reordered if given reversed.
    ///
    /// `width` and `height` must be non-zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use docbin_core::WindowBounds;
    ///
    /// let b = WindowBounds::clamped(-3, -3, 2, 40, 10, 10);
    /// assert_eq!((b.x1, b.y1, b.x2, b.y2), (0, 0, 2, 9));
    /// assert_eq!(b.area(), 30);
    /// ```
    pub fn clamped(x1: i64, y1: i64, x2: i64, y2: i64, width: u32, height: u32) -> Self {
        let max_x = width.saturating_sub(1) as i64;
        let max_y = height.saturating_sub(1) as i64;
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self {
            x1: x1.clamp(0, max_x) as u32,
            y1: y1.clamp(0, max_y) as u32,
            x2: x2.clamp(0, max_x) as u32,
            y2: y2.clamp(0, max_y) as u32,
        }
    }

    /// Square window of half-size `half` centred on (x, y), clamped
    pub fn centered(x: u32, y: u32, half: u32, width: u32, height: u32) -> Self {
        let (x, y, half) = (x as i64, y as i64, half as i64);
        Self::clamped(x - half, y - half, x + half, y + half, width, height)
    }

    /// The whole `width x height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width.saturating_sub(1),
            y2: height.saturating_sub(1),
        }
    }

    /// Window width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1 + 1
    }

    /// Window height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered
    #[inline]
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_interior() {
        let b = WindowBounds::centered(5, 5, 2, 20, 20);
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (3, 3, 7, 7));
        assert_eq!(b.area(), 25);
    }

    #[test]
    fn test_single_pixel_image() {
        let b = WindowBounds::centered(0, 0, 7, 1, 1);
        assert_eq!(b, WindowBounds::full(1, 1));
        assert_eq!(b.area(), 1);
    }

    #[test]
    fn test_clamped_reorders() {
        let b = WindowBounds::clamped(8, 6, 2, 1, 10, 10);
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (2, 1, 8, 6));
    }
}
