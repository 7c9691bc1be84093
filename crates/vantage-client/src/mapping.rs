// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Domain ↔ wire value conversions.

use std::time::Duration;

use vantage_geom::{BoundingBox, DVec2, DVec3};
use vantage_proto as proto;
use vantage_scene::{Camera, CameraView, FlyTo, FlyToTarget, SceneViewStateId};

/// Wire vector to world vector.
pub fn vector_from_wire(v: proto::Vector3) -> DVec3 {
    DVec3::new(v.x, v.y, v.z)
}

/// World vector to wire vector.
pub fn vector_to_wire(v: DVec3) -> proto::Vector3 {
    proto::Vector3::new(v.x, v.y, v.z)
}

/// Screen point as a wire 2-vector.
pub fn point_to_wire(p: DVec2) -> proto::Vector2 {
    proto::Vector2 { x: p.x, y: p.y }
}

/// Wire box from its min and max corners.
pub fn bounding_box_to_wire(bbox: &BoundingBox) -> proto::BoundingBox {
    proto::BoundingBox {
        min: Some(vector_to_wire(bbox.min())),
        max: Some(vector_to_wire(bbox.max())),
    }
}

/// Camera message with the variant's oneof populated.
pub fn camera_to_wire(camera: &Camera) -> proto::Camera {
    match camera.view() {
        CameraView::Perspective(p) => proto::Camera::from_perspective(proto::PerspectiveCamera {
            position: Some(vector_to_wire(p.position)),
            look_at: Some(vector_to_wire(p.look_at)),
            up: Some(vector_to_wire(p.up)),
            fov_y: Some(p.fov_y),
        }),
        CameraView::Orthographic(o) => {
            proto::Camera::from_orthographic(proto::OrthographicCamera {
                view_vector: Some(vector_to_wire(o.view_vector)),
                look_at: Some(vector_to_wire(o.look_at)),
                up: Some(vector_to_wire(o.up)),
                fov_height: Some(o.fov_height),
            })
        }
    }
}

/// Duration in nanoseconds, saturating at `u64::MAX`.
pub fn animation_to_wire(duration: Duration) -> proto::Animation {
    proto::Animation {
        duration_nanos: u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX),
    }
}

/// Wire oneof for a fly-to target.
pub fn fly_to_target_to_wire(target: &FlyToTarget) -> proto::FlyToTarget {
    match target {
        FlyToTarget::ItemId(id) => proto::FlyToTarget::ItemId(id.clone()),
        FlyToTarget::ItemSuppliedId(id) => proto::FlyToTarget::ItemSuppliedId(id.clone()),
        FlyToTarget::Camera(camera) => proto::FlyToTarget::Camera(camera_to_wire(camera)),
        FlyToTarget::BoundingBox(bbox) => {
            proto::FlyToTarget::BoundingBox(bounding_box_to_wire(bbox))
        }
        FlyToTarget::SceneViewState(SceneViewStateId::Id(id)) => {
            proto::FlyToTarget::SceneViewStateIdentifier(proto::SceneViewStateSelector::Id(
                id.clone(),
            ))
        }
        FlyToTarget::SceneViewState(SceneViewStateId::SuppliedId(id)) => {
            proto::FlyToTarget::SceneViewStateIdentifier(
                proto::SceneViewStateSelector::SuppliedId(id.clone()),
            )
        }
    }
}

/// Fly-to request for a queued transition.
pub fn fly_to_to_wire(fly_to: &FlyTo, frame_correlation_id: String) -> proto::FlyTo {
    proto::FlyTo {
        frame_correlation_id,
        animation: fly_to.animation.map(animation_to_wire),
        target: fly_to_target_to_wire(&fly_to.target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthographic_camera_sets_only_its_variant() {
        let bbox = BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        let camera =
            Camera::orthographic(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO, 3.0, 1.0, bbox).unwrap();
        let wire = camera_to_wire(&camera);
        assert!(wire.perspective.is_none());
        let ortho = wire.orthographic.unwrap();
        assert_eq!(ortho.fov_height, Some(3.0));
        assert_eq!(ortho.view_vector, Some(proto::Vector3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn animation_in_nanoseconds() {
        assert_eq!(
            animation_to_wire(Duration::from_millis(500)).duration_nanos,
            500_000_000
        );
    }
}
