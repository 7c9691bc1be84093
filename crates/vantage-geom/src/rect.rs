// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::DVec2;

/// Width/height pair in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dimensions {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Dimensions {
    /// Creates a dimensions pair.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `1.0` when the height is zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point with the origin at the top-left corner.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Uniformly scales both extents.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Largest dimensions with this aspect ratio that fit inside `bounds`.
    #[must_use]
    pub fn fit_within(&self, bounds: &Self) -> Self {
        let scale = (bounds.width / self.width).min(bounds.height / self.height);
        if scale.is_finite() {
            self.scale(scale)
        } else {
            *bounds
        }
    }
}

/// Axis-aligned rectangle with a top-left origin and y pointing down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rectangle {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two arbitrary corner points.
    #[must_use]
    pub fn from_points(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Rectangle at the origin covering `dims`.
    #[must_use]
    pub fn from_dimensions(dims: Dimensions) -> Self {
        Self::new(0.0, 0.0, dims.width, dims.height)
    }

    /// Top-left corner.
    #[must_use]
    pub fn top_left(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn bottom_right(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Extents as [`Dimensions`].
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive.
    #[must_use]
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// Scales position and extents independently per axis.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rectangle::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains_point(DVec2::new(10.0, 10.0)));
        assert!(r.contains_point(DVec2::new(14.9, 14.9)));
        assert!(!r.contains_point(DVec2::new(15.0, 12.0)));
    }

    #[test]
    fn from_points_orders_corners() {
        let r = Rectangle::from_points(DVec2::new(8.0, 2.0), DVec2::new(2.0, 6.0));
        assert_eq!(r, Rectangle::new(2.0, 2.0, 6.0, 4.0));
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let d = Dimensions::new(200.0, 100.0).fit_within(&Dimensions::new(100.0, 100.0));
        assert_eq!(d, Dimensions::new(100.0, 50.0));
        assert_eq!(Dimensions::new(4.0, 0.0).aspect_ratio(), 1.0);
    }
}
