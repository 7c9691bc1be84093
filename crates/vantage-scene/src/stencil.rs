// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stencil (feature) buffer and pixel snapping.

use vantage_geom::{DVec2, DVec3};

use crate::{DepthBuffer, ImageAttributes, PixelImage, SceneError, Viewport};

/// Pixel value meaning "no feature".
pub const STENCIL_EMPTY: u8 = 0;
/// Pixel value marking a feature (edge/vertex) pixel.
pub const STENCIL_FEATURE: u8 = u8::MAX;

/// Feature mask for one frame, paired with that frame's depth buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilBuffer {
    image_attributes: ImageAttributes,
    image: PixelImage<u8>,
    depth_buffer: DepthBuffer,
}

impl StencilBuffer {
    /// Pairs stencil pixels with the depth buffer of the same frame.
    ///
    /// # Errors
    /// Returns [`SceneError::InvalidArgument`] when the stencil and depth
    /// images describe different frame sizes.
    pub fn new(
        image_attributes: ImageAttributes,
        image: PixelImage<u8>,
        depth_buffer: DepthBuffer,
    ) -> Result<Self, SceneError> {
        if image_attributes.frame_dimensions != depth_buffer.image_attributes().frame_dimensions {
            return Err(SceneError::InvalidArgument(
                "stencil and depth frames differ in size".into(),
            ));
        }
        Ok(Self {
            image_attributes,
            image,
            depth_buffer,
        })
    }

    /// Placement of the stencil image.
    pub fn image_attributes(&self) -> &ImageAttributes {
        &self.image_attributes
    }

    /// Depth buffer of the same frame.
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    /// Stencil byte under `pt`; [`STENCIL_EMPTY`] outside the image.
    #[must_use]
    pub fn value_at_point(&self, pt: DVec2) -> u8 {
        self.image
            .sample(&self.image_attributes, pt)
            .unwrap_or(STENCIL_EMPTY)
    }

    #[must_use]
    /// `true` when `pt` lies on a feature pixel.
    pub fn hit_test(&self, pt: DVec2) -> bool {
        self.value_at_point(pt) != STENCIL_EMPTY
    }

    /// Center of the nearest feature pixel within `radius`, or `pt`.
    #[must_use]
    pub fn snap_to_nearest_pixel(&self, pt: DVec2, radius: f64) -> DVec2 {
        self.snap_to_nearest_pixel_matching(pt, radius, |_| true)
    }

    /// [`StencilBuffer::snap_to_nearest_pixel`] restricted to candidates
    /// (pixel centers, frame space) accepted by `predicate`.
    pub fn snap_to_nearest_pixel_matching<F>(&self, pt: DVec2, radius: f64, predicate: F) -> DVec2
    where
        F: Fn(DVec2) -> bool,
    {
        if !radius.is_finite() || radius <= 0.0 || !pt.is_finite() {
            return pt;
        }
        let origin = pt.floor();
        // Cells whose centers can fall inside the image rectangle.
        let rect = self.image_attributes.image_rect;
        let lo = (origin - DVec2::splat(radius))
            .max(rect.top_left() - DVec2::ONE)
            .floor()
            - origin;
        let hi = (origin + DVec2::splat(radius))
            .min(rect.bottom_right())
            .ceil()
            - origin;
        if !(lo.is_finite() && hi.is_finite()) || lo.x > hi.x || lo.y > hi.y {
            return pt;
        }
        #[allow(clippy::cast_possible_truncation)]
        let (x_range, y_range) = (lo.x as i64..=hi.x as i64, lo.y as i64..=hi.y as i64);
        let mut candidates: Vec<(f64, DVec2)> = Vec::new();
        for dy in y_range {
            for dx in x_range.clone() {
                #[allow(clippy::cast_precision_loss)]
                let offset = DVec2::new(dx as f64, dy as f64);
                let distance = offset.length();
                if distance > radius {
                    continue;
                }
                let cell = origin + offset;
                let center = cell + DVec2::splat(0.5);
                if self.value_at_point(center) == STENCIL_FEATURE && predicate(center) {
                    candidates.push((distance, center));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.first().map_or(pt, |&(_, center)| center)
    }

    /// See [`DepthBuffer::normalized_depth_at_point`].
    pub fn normalized_depth_at_point(&self, pt: DVec2, fallback: Option<f64>) -> f64 {
        self.depth_buffer.normalized_depth_at_point(pt, fallback)
    }

    /// See [`DepthBuffer::linear_depth_at_point`].
    pub fn linear_depth_at_point(&self, pt: DVec2, fallback: Option<f64>) -> f64 {
        self.depth_buffer.linear_depth_at_point(pt, fallback)
    }

    /// See [`DepthBuffer::is_occluded`].
    pub fn is_occluded(&self, world: DVec3, viewport: &Viewport) -> bool {
        self.depth_buffer.is_occluded(world, viewport)
    }
}
