// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Depth buffer interpretation.
//!
//! Each pixel holds the geometry depth at that pixel, linear between the
//! frame camera's near and far planes and quantized to 16 bits. The value
//! [`DEPTH_SENTINEL`] marks pixels with no geometry.
//!
//! All point arguments are in frame space; use
//! [`Viewport::transform_point_to_frame`] to convert screen points.

use vantage_geom::vector::angle_between;
use vantage_geom::{DVec2, DVec3, Ray};

use crate::{Camera, ImageAttributes, PixelImage, Viewport};

/// Pixel value meaning "no geometry".
pub const DEPTH_SENTINEL: u16 = u16::MAX;

/// Fraction of the camera-to-point distance treated as coincident surface.
///
/// Chosen empirically to absorb quantization of the 16-bit depth image; it
/// is a tunable, not a derived bound. [`DepthBuffer::is_occluded_within`]
/// accepts an override.
pub const DEFAULT_DEPTH_TOLERANCE: f64 = 0.02;

/// Depth image bound to the camera it was rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    camera: Camera,
    image_attributes: ImageAttributes,
    image: PixelImage<u16>,
}

/// Camera-relative distances for one world point.
struct Distances {
    point: f64,
    geometry: Option<f64>,
    beyond_far: bool,
}

impl DepthBuffer {
    /// Binds decoded depth pixels to their frame camera.
    #[must_use]
    pub fn new(camera: Camera, image_attributes: ImageAttributes, image: PixelImage<u16>) -> Self {
        Self {
            camera,
            image_attributes,
            image,
        }
    }

    /// Camera the depth was rendered with.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Placement of the depth image within the frame.
    #[must_use]
    pub fn image_attributes(&self) -> &ImageAttributes {
        &self.image_attributes
    }

    /// Decoded pixels.
    #[must_use]
    pub fn image(&self) -> &PixelImage<u16> {
        &self.image
    }

    /// Raw pixel value under `pt`, `None` outside the image.
    #[must_use]
    pub fn value_at_point(&self, pt: DVec2) -> Option<u16> {
        self.image.sample(&self.image_attributes, pt)
    }

    /// Depth in `[0, 1]` between near and far.
    ///
    /// Out-of-bounds and sentinel pixels return `fallback` (default `1`).
    #[must_use]
    pub fn normalized_depth_at_point(&self, pt: DVec2, fallback: Option<f64>) -> f64 {
        match self.value_at_point(pt) {
            Some(v) if v != DEPTH_SENTINEL => f64::from(v) / f64::from(DEPTH_SENTINEL),
            _ => fallback.unwrap_or(1.0),
        }
    }

    /// Depth in world units along the view direction.
    ///
    /// Perspective: `depth * (far - near) + near`, measured from the eye.
    /// Orthographic: `depth * (far - near)`, measured from the near plane.
    #[must_use]
    pub fn linear_depth_at_point(&self, pt: DVec2, fallback: Option<f64>) -> f64 {
        let depth = self.normalized_depth_at_point(pt, fallback);
        self.linearize(depth)
    }

    fn linearize(&self, normalized: f64) -> f64 {
        let planes = self.camera.clipping_planes();
        if self.camera.is_perspective() {
            normalized * planes.span() + planes.near
        } else {
            normalized * planes.span()
        }
    }

    /// `true` when geometry covers `pt`.
    #[must_use]
    pub fn hit_test(&self, pt: DVec2) -> bool {
        self.normalized_depth_at_point(pt, None) < 1.0
    }

    /// World point where `ray` meets the depth under `pt`.
    ///
    /// Depth is stored along the view direction, so perspective rays are
    /// stretched by `1 / cos θ`, θ being the angle between the ray and the
    /// view vector. Orthographic rays are parallel to the view vector and
    /// start on the near plane, so depth maps onto them directly.
    #[must_use]
    pub fn world_point(&self, pt: DVec2, ray: &Ray, fallback: Option<f64>) -> DVec3 {
        let depth = self.linear_depth_at_point(pt, fallback);
        if self.camera.is_perspective() {
            let angle = angle_between(ray.direction, self.camera.view_vector());
            ray.at(depth / angle.cos())
        } else {
            ray.at(depth)
        }
    }

    fn distances(&self, world: DVec3, viewport: &Viewport) -> Distances {
        let screen = viewport.transform_world_to_screen(world, &self.camera);
        let frame_pt = viewport.transform_point_to_frame(screen, &self.image_attributes);
        let normalized = self.normalized_depth_at_point(frame_pt, None);
        let planes = self.camera.clipping_planes();
        let to_point = world - self.camera.position();
        let along_view = to_point.dot(self.camera.direction());

        if self.camera.is_perspective() {
            let cos = angle_between(to_point, self.camera.view_vector()).cos();
            Distances {
                point: to_point.length(),
                geometry: (normalized < 1.0).then(|| self.linearize(normalized) / cos),
                beyond_far: along_view > planes.far,
            }
        } else {
            Distances {
                point: along_view - planes.near,
                geometry: (normalized < 1.0).then(|| self.linearize(normalized)),
                beyond_far: along_view > planes.far,
            }
        }
    }

    /// `true` when geometry in front of `world` hides it.
    #[must_use]
    pub fn is_occluded(&self, world: DVec3, viewport: &Viewport) -> bool {
        self.is_occluded_within(world, viewport, DEFAULT_DEPTH_TOLERANCE)
    }

    /// [`DepthBuffer::is_occluded`] with an explicit tolerance fraction.
    ///
    /// The point is occluded only if it lies farther than the closest
    /// geometry under it by more than `tolerance * distance`; ties resolve to
    /// visible. Points behind the near plane or over empty pixels are never
    /// occluded.
    #[must_use]
    pub fn is_occluded_within(&self, world: DVec3, viewport: &Viewport, tolerance: f64) -> bool {
        if self.camera.is_point_behind_near(world) {
            return false;
        }
        let d = self.distances(world, viewport);
        match d.geometry {
            Some(geometry) => d.point - geometry > tolerance * d.point,
            None => false,
        }
    }

    /// `true` when `world` does not sit on any rendered surface.
    #[must_use]
    pub fn is_detached(&self, world: DVec3, viewport: &Viewport) -> bool {
        self.is_detached_within(world, viewport, DEFAULT_DEPTH_TOLERANCE)
    }

    /// [`DepthBuffer::is_detached`] with an explicit tolerance fraction.
    ///
    /// Detached means: behind the near plane, beyond the far plane, over an
    /// empty pixel, or off the geometry depth by more than
    /// `tolerance * distance` in either direction.
    #[must_use]
    pub fn is_detached_within(&self, world: DVec3, viewport: &Viewport, tolerance: f64) -> bool {
        if self.camera.is_point_behind_near(world) {
            return true;
        }
        let d = self.distances(world, viewport);
        if d.beyond_far {
            return true;
        }
        match d.geometry {
            Some(geometry) => (d.point - geometry).abs() > tolerance * d.point,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vantage_geom::{BoundingBox, Dimensions};

    fn camera() -> Camera {
        let bbox = BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        Camera::perspective(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 1.0, bbox).unwrap()
    }

    fn uniform(value: u16) -> DepthBuffer {
        let attrs = ImageAttributes::full_frame(Dimensions::new(10.0, 10.0));
        DepthBuffer::new(camera(), attrs, PixelImage::filled(10, 10, value).unwrap())
    }

    #[test]
    fn sentinel_and_out_of_bounds_use_fallback() {
        let buf = uniform(DEPTH_SENTINEL);
        assert_eq!(buf.normalized_depth_at_point(DVec2::new(5.0, 5.0), None), 1.0);
        assert_eq!(buf.normalized_depth_at_point(DVec2::new(5.0, 5.0), Some(0.25)), 0.25);
        assert_eq!(buf.normalized_depth_at_point(DVec2::new(50.0, 5.0), Some(0.5)), 0.5);
        assert!(!buf.hit_test(DVec2::new(5.0, 5.0)));
    }

    #[test]
    fn linear_depth_perspective_adds_near() {
        let buf = uniform(32768);
        let planes = buf.camera().clipping_planes();
        let expected = planes.near + (32768.0 / 65535.0) * (planes.far - planes.near);
        assert_relative_eq!(
            buf.linear_depth_at_point(DVec2::new(1.0, 1.0), None),
            expected,
            epsilon = 1e-12
        );
        assert!(buf.hit_test(DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn center_world_point_lies_on_view_axis() {
        let buf = uniform(0);
        let vp = Viewport::new(10.0, 10.0);
        let p = vp.transform_screen_point_to_world(vp.center(), &buf, None);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 5.0 - buf.camera().near(), epsilon = 1e-9);
    }
}
