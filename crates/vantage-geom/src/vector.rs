// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::{DQuat, DVec3};

use crate::EPSILON;

/// Angle in radians between two vectors, `0` if either is near zero.
#[must_use]
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denom = a.length() * b.length();
    if denom < EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Rotates a direction vector about `axis` by `angle` radians (Rodrigues).
///
/// A zero axis leaves the vector unchanged.
#[must_use]
pub fn rotate_direction(v: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    let axis = axis.normalize_or_zero();
    if axis == DVec3::ZERO {
        return v;
    }
    DQuat::from_axis_angle(axis, angle) * v
}

/// Rotates a point about the line through `pivot` along `axis`.
#[must_use]
pub fn rotate_point_about(p: DVec3, pivot: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    pivot + rotate_direction(p - pivot, axis, angle)
}

/// Vector perpendicular to `v`, used to repair degenerate up vectors.
#[must_use]
pub fn any_orthogonal(v: DVec3) -> DVec3 {
    let v = v.normalize_or_zero();
    if v == DVec3::ZERO {
        return DVec3::Y;
    }
    v.any_orthonormal_vector()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_y() {
        let r = rotate_direction(DVec3::X, DVec3::Y, FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pivot_rotation_keeps_pivot_fixed() {
        let pivot = DVec3::new(1.0, 0.0, 0.0);
        let p = rotate_point_about(DVec3::new(2.0, 0.0, 0.0), pivot, DVec3::Z, FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_eq!(rotate_point_about(pivot, pivot, DVec3::Z, 1.0), pivot);
    }

    #[test]
    fn angle_of_zero_vector_is_zero() {
        assert_eq!(angle_between(DVec3::ZERO, DVec3::X), 0.0);
        assert_relative_eq!(angle_between(DVec3::X, DVec3::Y), FRAC_PI_2);
    }
}
