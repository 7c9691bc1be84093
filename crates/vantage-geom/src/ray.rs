// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::DVec3;

use crate::{Plane, EPSILON};

/// Half-line starting at `origin` and travelling along a unit `direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: DVec3,
    /// Unit direction (zero only when constructed from a zero vector).
    pub direction: DVec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the point on the ray closest to `p` (may be negative).
    #[must_use]
    pub fn closest_parameter(&self, p: DVec3) -> f64 {
        (p - self.origin).dot(self.direction)
    }

    /// Distance from `p` to the infinite line carrying this ray.
    #[must_use]
    pub fn distance_to_point(&self, p: DVec3) -> f64 {
        let t = self.closest_parameter(p);
        (self.at(t) - p).length()
    }

    /// Intersection with `plane` in front of the origin, if any.
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<DVec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
        (t >= 0.0).then(|| self.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_walks_unit_direction() {
        let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -10.0));
        assert_eq!(r.at(2.0), DVec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn plane_behind_origin_is_missed() {
        let plane = Plane::from_normal_and_coplanar_point(DVec3::Z, DVec3::new(0.0, 0.0, 5.0));
        let toward = Ray::new(DVec3::ZERO, DVec3::Z);
        let away = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(toward.intersect_plane(&plane), Some(DVec3::new(0.0, 0.0, 5.0)));
        assert_eq!(away.intersect_plane(&plane), None);
    }

    #[test]
    fn distance_to_point_is_perpendicular() {
        let r = Ray::new(DVec3::ZERO, DVec3::X);
        assert!((r.distance_to_point(DVec3::new(4.0, 3.0, 0.0)) - 3.0).abs() < 1e-12);
    }
}
