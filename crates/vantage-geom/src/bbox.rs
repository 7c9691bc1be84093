// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::DVec3;

use crate::EPSILON;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Center and radius are derived on demand and never stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: DVec3,
    max: DVec3,
}

impl BoundingBox {
    /// Constructs a box from two opposite corners.
    ///
    /// Corners are reordered component-wise, so `new(a, b) == new(b, a)`.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds the minimal box containing all `points`. Returns `None` when empty.
    #[must_use]
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    /// Builds a box centered at `center` with the given half-extents.
    #[must_use]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        let he = half_extents.abs();
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> DVec3 {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> DVec3 {
        self.max
    }

    /// Midpoint of the two corners.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Length of the min→max diagonal.
    #[must_use]
    pub fn diagonal_length(&self) -> f64 {
        self.size().length()
    }

    /// Radius of the bounding sphere (`|max - center|`).
    ///
    /// Zero-volume boxes report [`EPSILON`] so callers can divide by it.
    #[must_use]
    pub fn radius(&self) -> f64 {
        let r = (self.max - self.center()).length();
        if r < EPSILON {
            EPSILON
        } else {
            r
        }
    }

    /// `true` when every extent is below [`EPSILON`].
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.size().max_element() < EPSILON
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The eight corners, min-x first.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_reordered() {
        let b = BoundingBox::new(DVec3::new(1.0, -1.0, 2.0), DVec3::new(-1.0, 1.0, -2.0));
        assert_eq!(b.min(), DVec3::new(-1.0, -1.0, -2.0));
        assert_eq!(b.max(), DVec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn unit_cube_radius_is_half_diagonal() {
        let b = BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        assert!((b.radius() - 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(b.center(), DVec3::ZERO);
    }

    #[test]
    fn degenerate_box_has_epsilon_radius() {
        let b = BoundingBox::new(DVec3::ONE, DVec3::ONE);
        assert!(b.is_degenerate());
        assert_eq!(b.radius(), EPSILON);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(BoundingBox::from_points(&[]).is_none());
        let b = BoundingBox::from_points(&[DVec3::X, DVec3::Y, -DVec3::Z]).unwrap();
        assert_eq!(b.min(), DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.max(), DVec3::new(1.0, 1.0, 0.0));
    }
}
