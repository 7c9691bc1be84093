// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Near/far derivation from the visible bounding box.
//!
//! Clipping planes are never stored on a camera. They are recomputed from the
//! bounding box and the camera pose on every access so that a camera moved by
//! any operation always clips tightly around the scene.

use vantage_geom::{BoundingBox, DVec3};

/// Margin applied to the bounding-sphere radius.
pub const BOUNDING_RADIUS_MARGIN: f64 = 1.1;
/// Tentative `near / far` ratio.
pub const NEAR_FAR_RATIO: f64 = 0.01;
/// Largest near distance used when the camera sits inside the bounding volume.
pub const NEAR_PLANE_LIMIT: f64 = 1000.0;
/// Lower bound for both planes when the scene lies behind the camera.
pub const MIN_CLIP_DISTANCE: f64 = 1e-3;

/// Derived clipping distances, measured from the camera along its view direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClippingPlanes {
    /// Distance to the near plane. Always positive.
    pub near: f64,
    /// Distance to the far plane. Never less than `near`.
    pub far: f64,
}

impl ClippingPlanes {
    /// `far - near`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.far - self.near
    }
}

/// Computes near/far for a camera at `position` looking along `view_vector`.
///
/// With `C` the box center, `r = 1.1 * |max - C|` and `d` the signed distance
/// from the camera to `C` along the view direction: `far = d + r` and
/// `near = far * 0.01`. When that near plane would cut into the bounding
/// sphere (`near > d - r`) it is kept, limited to 1000 with `far` shortened by
/// the same amount; otherwise the near plane hugs the sphere at `d - r`.
///
/// Finally both planes are bounded below by [`MIN_CLIP_DISTANCE`], keeping
/// `0 < near <= far` when the whole box lies behind the camera.
#[must_use]
pub fn compute_clipping_planes(
    bounding_box: &BoundingBox,
    position: DVec3,
    view_vector: DVec3,
) -> ClippingPlanes {
    let center = bounding_box.center();
    let direction = view_vector.try_normalize().unwrap_or(DVec3::NEG_Z);
    let distance = (center - position).dot(direction);
    // radius() is epsilon-guarded for zero-volume boxes.
    let radius = BOUNDING_RADIUS_MARGIN * bounding_box.radius();

    let mut far = distance + radius;
    let mut near = far * NEAR_FAR_RATIO;

    if near > distance - radius {
        if near > NEAR_PLANE_LIMIT {
            let difference = near - NEAR_PLANE_LIMIT;
            near = NEAR_PLANE_LIMIT;
            far -= difference;
        }
    } else {
        near = distance - radius;
    }

    let far = if far.is_finite() {
        far.max(MIN_CLIP_DISTANCE)
    } else {
        MIN_CLIP_DISTANCE
    };
    let near = if near.is_finite() {
        near.clamp(MIN_CLIP_DISTANCE, far)
    } else {
        MIN_CLIP_DISTANCE
    };
    ClippingPlanes { near, far }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    #[test]
    fn camera_outside_box_hugs_bounding_sphere() {
        let planes = compute_clipping_planes(&unit_box(), DVec3::new(0.0, 0.0, 5.0), -DVec3::Z);
        let r = 1.1 * 3f64.sqrt();
        assert_relative_eq!(planes.far, 5.0 + r, epsilon = 1e-12);
        assert_relative_eq!(planes.near, 5.0 - r, epsilon = 1e-12);
    }

    #[test]
    fn camera_inside_box_keeps_ratio() {
        let planes = compute_clipping_planes(&unit_box(), DVec3::ZERO, -DVec3::Z);
        let r = 1.1 * 3f64.sqrt();
        assert_relative_eq!(planes.far, r, epsilon = 1e-12);
        assert_relative_eq!(planes.near, r * NEAR_FAR_RATIO, epsilon = 1e-12);
    }

    #[test]
    fn huge_scene_limits_near_and_shortens_far() {
        let huge = BoundingBox::new(DVec3::splat(-1e6), DVec3::splat(1e6));
        let planes = compute_clipping_planes(&huge, DVec3::ZERO, -DVec3::Z);
        let r = 1.1 * (3.0f64).sqrt() * 1e6;
        assert_relative_eq!(planes.near, NEAR_PLANE_LIMIT, epsilon = 1e-9);
        assert_relative_eq!(planes.far, r - (r * NEAR_FAR_RATIO - NEAR_PLANE_LIMIT), epsilon = 1e-6);
    }

    #[test]
    fn scene_behind_camera_stays_positive() {
        let planes = compute_clipping_planes(&unit_box(), DVec3::new(0.0, 0.0, 50.0), DVec3::Z);
        assert!(planes.near > 0.0);
        assert!(planes.near <= planes.far);
    }

    #[test]
    fn degenerate_box_does_not_divide_by_zero() {
        let point = BoundingBox::new(DVec3::ZERO, DVec3::ZERO);
        let planes = compute_clipping_planes(&point, DVec3::new(0.0, 0.0, 10.0), -DVec3::Z);
        assert!(planes.near.is_finite() && planes.far.is_finite());
        assert!(planes.near > 0.0 && planes.near <= planes.far);
    }
}
