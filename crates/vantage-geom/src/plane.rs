// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::DVec3;

/// Plane satisfying `normal · p + constant = 0`.
///
/// Section planes on the wire are expressed as `normal` + `offset` where the
/// offset is the signed distance of the plane from the origin along the
/// normal; that is `constant = -offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: DVec3,
    /// Negated signed distance from the origin.
    pub constant: f64,
}

impl Plane {
    /// Plane through `point` with the given normal (normalized).
    #[must_use]
    pub fn from_normal_and_coplanar_point(normal: DVec3, point: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            constant: -point.dot(normal),
        }
    }

    /// Plane from a normal and an offset along it.
    #[must_use]
    pub fn from_normal_and_offset(normal: DVec3, offset: f64) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            constant: -offset,
        }
    }

    /// Signed distance along the normal to the origin.
    #[must_use]
    pub fn offset(&self) -> f64 {
        -self.constant
    }

    /// Positive in front of the plane, negative behind it.
    #[must_use]
    pub fn signed_distance_to_point(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.constant
    }

    /// Orthogonal projection of `p` onto the plane.
    #[must_use]
    pub fn project_point(&self, p: DVec3) -> DVec3 {
        p - self.normal * self.signed_distance_to_point(p)
    }
}
