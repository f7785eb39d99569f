//! Common geometry and time types
//!
//! All coordinates are `f64` layout units. Times are seconds from the start
//! of the track.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (`x`, `y` is the top-left corner)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Create a new rectangle
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`)
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`)
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Check if a point lies inside the rectangle (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check if the vertical span `[top, bottom]` overlaps this rectangle
    pub fn overlaps_rows(&self, top: f64, bottom: f64) -> bool {
        top <= self.bottom() && bottom >= self.y
    }
}

/// A screen or layout point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Time boundaries `[start, end)` of a segment, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub start: f64,
    pub end: f64,
}

impl TimeBounds {
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the span in seconds
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open containment test
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(40.0, 60.0)));
        assert!(!rect.contains(Point::new(41.0, 30.0)));
    }

    #[test]
    fn test_time_bounds_half_open() {
        let bounds = TimeBounds::new(1.0, 2.0);
        assert!(bounds.contains(1.0));
        assert!(bounds.contains(1.999));
        assert!(!bounds.contains(2.0));
        assert_eq!(bounds.duration(), 1.0);
    }
}
