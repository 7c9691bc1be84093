// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used)]
//! Camera, viewport and depth behavior across module boundaries.

use approx::assert_relative_eq;
use proptest::prelude::*;
use vantage_geom::{BoundingBox, DVec2, DVec3, Dimensions};
use vantage_scene::{
    compute_clipping_planes, Camera, DepthBuffer, ImageAttributes, PixelImage, Viewport,
    DEPTH_SENTINEL,
};

fn unit_box() -> BoundingBox {
    BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0))
}

fn perspective() -> Camera {
    Camera::perspective(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 1.0, unit_box()).unwrap()
}

fn orthographic() -> Camera {
    Camera::orthographic(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO, 4.0, 1.0, unit_box()).unwrap()
}

fn uniform_depth(camera: Camera, value: u16) -> DepthBuffer {
    let attrs = ImageAttributes::full_frame(Dimensions::new(16.0, 16.0));
    DepthBuffer::new(camera, attrs, PixelImage::filled(16, 16, value).unwrap())
}

#[test]
fn unit_box_from_five_units_away() {
    let planes = perspective().clipping_planes();
    let r = 1.1 * 3.0_f64.sqrt();
    assert_relative_eq!(planes.far, 5.0 + r, epsilon = 1e-9);
    // The camera is outside the bounding sphere, so near hugs the sphere.
    assert_relative_eq!(planes.near, 5.0 - r, epsilon = 1e-9);
}

#[test]
fn uniform_buffer_linearizes_between_planes() {
    for v in [0_u16, 1, 1000, 32768, 65534] {
        let buf = uniform_depth(perspective(), v);
        let camera = buf.camera();
        let expected =
            camera.near() + f64::from(v) / 65535.0 * (camera.far() - camera.near());
        assert_relative_eq!(
            buf.linear_depth_at_point(DVec2::new(8.0, 8.0), None),
            expected,
            epsilon = 1e-9
        );
    }
}

#[test]
fn orthographic_linear_depth_has_no_near_offset() {
    let buf = uniform_depth(orthographic(), 65535 / 2);
    let span = buf.camera().far() - buf.camera().near();
    assert_relative_eq!(
        buf.linear_depth_at_point(DVec2::new(3.0, 3.0), None),
        (65535 / 2) as f64 / 65535.0 * span,
        epsilon = 1e-9
    );
}

#[test]
fn occlusion_tie_is_visible_and_two_percent_is_not() {
    let buf = uniform_depth(perspective(), 20000);
    let vp = Viewport::new(16.0, 16.0);
    let geometry = buf.linear_depth_at_point(DVec2::new(8.0, 8.0), None);

    let on_surface = DVec3::new(0.0, 0.0, 5.0 - geometry);
    assert!(!buf.is_occluded(on_surface, &vp));
    assert!(!buf.is_detached(on_surface, &vp));

    let behind = DVec3::new(0.0, 0.0, 5.0 - geometry * 1.03);
    assert!(buf.is_occluded(behind, &vp));
    assert!(buf.is_detached(behind, &vp));

    let slightly_behind = DVec3::new(0.0, 0.0, 5.0 - geometry * 1.01);
    assert!(!buf.is_occluded(slightly_behind, &vp));
}

#[test]
fn orthographic_occlusion_measures_from_near_plane() {
    let buf = uniform_depth(orthographic(), 30000);
    let vp = Viewport::new(16.0, 16.0);
    let near = buf.camera().near();
    let geometry = buf.linear_depth_at_point(DVec2::new(8.0, 8.0), None);

    let on_surface = DVec3::new(0.5, -0.5, 5.0 - near - geometry);
    assert!(!buf.is_occluded(on_surface, &vp));
    let behind = DVec3::new(0.5, -0.5, 5.0 - near - geometry * 1.1);
    assert!(buf.is_occluded(behind, &vp));
}

#[test]
fn empty_pixels_never_occlude_but_detach() {
    let buf = uniform_depth(perspective(), DEPTH_SENTINEL);
    let vp = Viewport::new(16.0, 16.0);
    let p = DVec3::new(0.0, 0.0, 0.5);
    assert!(!buf.is_occluded(p, &vp));
    assert!(buf.is_detached(p, &vp));
}

#[test]
fn points_behind_near_are_never_occluded() {
    let buf = uniform_depth(perspective(), 0);
    let vp = Viewport::new(16.0, 16.0);
    assert!(!buf.is_occluded(DVec3::new(0.0, 0.0, 4.9), &vp));
    assert!(buf.is_detached(DVec3::new(0.0, 0.0, 4.9), &vp));
}

#[test]
fn picked_world_point_reprojects_to_the_same_pixel() {
    let vp = Viewport::new(16.0, 16.0);
    for camera in [perspective(), orthographic()] {
        let buf = uniform_depth(camera.clone(), 12000);
        let screen = DVec2::new(3.25, 11.5);
        let world = vp.transform_screen_point_to_world(screen, &buf, None);
        let back = vp.transform_world_to_screen(world, &camera);
        assert_relative_eq!(back.x, screen.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, screen.y, epsilon = 1e-6);
        assert!(!buf.is_occluded(world, &vp));
    }
}

fn vec3(range: f64) -> impl Strategy<Value = DVec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #[test]
    fn clipping_planes_stay_ordered_and_positive(
        a in vec3(100.0),
        b in vec3(100.0),
        position in vec3(5000.0),
        target in vec3(100.0),
    ) {
        prop_assume!((target - position).length() > 1e-3);
        let bbox = BoundingBox::new(a, b);
        let planes = compute_clipping_planes(&bbox, position, target - position);
        prop_assert!(planes.near > 0.0);
        prop_assert!(planes.near <= planes.far);
    }

    #[test]
    fn screen_world_screen_round_trip(
        x in 0.0_f64..320.0,
        y in 0.0_f64..200.0,
        z in -0.9_f64..0.9,
        orthographic_camera in any::<bool>(),
    ) {
        let vp = Viewport::new(320.0, 200.0);
        let camera = if orthographic_camera {
            Camera::orthographic(DVec3::new(1.0, -2.0, -6.0), DVec3::ZERO, 4.0, 1.6, unit_box())
        } else {
            Camera::perspective(DVec3::new(3.0, 2.0, 6.0), DVec3::ZERO, 1.6, unit_box())
        }
        .unwrap();
        let screen = DVec2::new(x, y);
        let ndc = vp.transform_screen_point_to_ndc(screen).extend(z);
        let world = vp.transform_ndc_to_world(ndc, &camera);
        let ndc_back = vp.transform_world_to_ndc(world, &camera);
        let back = vp.transform_ndc_to_screen_point(ndc_back.truncate());
        prop_assert!((back - screen).length() < 1e-6);
    }
}
