// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Screen ↔ normalized-device ↔ world conversions.
//!
//! Screen space: pixels, origin top-left, y down. Normalized-device space:
//! `x, y ∈ [-1, 1]`, y up, `z = -1` on the near plane and `+1` on the far
//! plane. World space is reached through the camera's inverse
//! projection-view matrix.
//!
//! Frame space is the renderer's pixel grid. It differs from screen space
//! when the frame was rendered at another resolution (device pixel ratio,
//! reduced-quality streaming); conversions scale per axis.

use vantage_geom::{Dimensions, DVec2, DVec3, Ray};

use crate::{Camera, ImageAttributes};

/// On-screen area the frame is presented in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    /// Width in screen pixels.
    pub width: f64,
    /// Height in screen pixels.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport covering `dims`.
    #[must_use]
    pub fn from_dimensions(dims: Dimensions) -> Self {
        Self::new(dims.width, dims.height)
    }

    /// Size as [`Dimensions`].
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Center in screen pixels.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// `width / height`.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.dimensions().aspect_ratio()
    }

    /// `true` when the point lies inside the viewport.
    #[must_use]
    pub fn is_in_viewport(&self, pt: DVec2) -> bool {
        pt.x >= 0.0 && pt.y >= 0.0 && pt.x <= self.width && pt.y <= self.height
    }

    fn frame_scale(&self, attributes: &ImageAttributes) -> DVec2 {
        let frame = attributes.frame_dimensions;
        DVec2::new(
            if self.width > 0.0 { frame.width / self.width } else { 1.0 },
            if self.height > 0.0 { frame.height / self.height } else { 1.0 },
        )
    }

    /// Screen point → frame point.
    #[must_use]
    pub fn transform_point_to_frame(&self, pt: DVec2, attributes: &ImageAttributes) -> DVec2 {
        pt * self.frame_scale(attributes)
    }

    /// Frame point → screen point.
    #[must_use]
    pub fn transform_point_from_frame(&self, pt: DVec2, attributes: &ImageAttributes) -> DVec2 {
        pt / self.frame_scale(attributes)
    }

    /// Screen point → normalized-device x/y.
    #[must_use]
    pub fn transform_screen_point_to_ndc(&self, pt: DVec2) -> DVec2 {
        DVec2::new(
            (pt.x / self.width) * 2.0 - 1.0,
            1.0 - (pt.y / self.height) * 2.0,
        )
    }

    /// Normalized-device x/y → screen point.
    #[must_use]
    pub fn transform_ndc_to_screen_point(&self, ndc: DVec2) -> DVec2 {
        DVec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    /// Normalized-device point → world point.
    #[must_use]
    pub fn transform_ndc_to_world(&self, ndc: DVec3, camera: &Camera) -> DVec3 {
        camera.inverse_projection_view_matrix().project_point3(ndc)
    }

    /// World point → normalized-device point.
    #[must_use]
    pub fn transform_world_to_ndc(&self, world: DVec3, camera: &Camera) -> DVec3 {
        camera.projection_view_matrix().project_point3(world)
    }

    /// World point → screen point.
    #[must_use]
    pub fn transform_world_to_screen(&self, world: DVec3, camera: &Camera) -> DVec2 {
        self.transform_ndc_to_screen_point(self.transform_world_to_ndc(world, camera).truncate())
    }

    /// Picking ray under a screen point.
    ///
    /// Perspective rays start at the eye and pass through the point on the
    /// far plane. Orthographic rays start on the near plane under the point
    /// and travel along the view direction.
    #[must_use]
    pub fn transform_screen_point_to_ray(&self, pt: DVec2, camera: &Camera) -> Ray {
        let ndc = self.transform_screen_point_to_ndc(pt);
        if camera.is_perspective() {
            let on_far = self.transform_ndc_to_world(ndc.extend(1.0), camera);
            let origin = camera.position();
            Ray::new(origin, on_far - origin)
        } else {
            let on_near = self.transform_ndc_to_world(ndc.extend(-1.0), camera);
            Ray::new(on_near, camera.direction())
        }
    }

    /// World point of the geometry under a screen point, using `depth`.
    ///
    /// Pixels without geometry resolve to `fallback_normalized_depth`
    /// (default: the far plane).
    #[must_use]
    pub fn transform_screen_point_to_world(
        &self,
        pt: DVec2,
        depth: &crate::DepthBuffer,
        fallback_normalized_depth: Option<f64>,
    ) -> DVec3 {
        let ray = self.transform_screen_point_to_ray(pt, depth.camera());
        let frame_pt = self.transform_point_to_frame(pt, depth.image_attributes());
        depth.world_point(frame_pt, &ray, fallback_normalized_depth)
    }
}
