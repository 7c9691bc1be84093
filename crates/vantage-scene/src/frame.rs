// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Decoded frame aggregate.

use std::sync::Arc;

use vantage_geom::{BoundingBox, DVec3, Dimensions, Plane};

use crate::{Camera, DepthBuffer, ImageAttributes};

/// A section plane in `normal · p = offset` form.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionPlane {
    /// Unit plane normal.
    pub normal: DVec3,
    /// Signed distance of the plane from the origin along `normal`.
    pub offset: f64,
}

impl SectionPlane {
    /// Equivalent [`Plane`] (`normal · p + constant = 0`).
    #[must_use]
    pub fn to_plane(&self) -> Plane {
        Plane::from_normal_and_offset(self.normal, self.offset)
    }
}

/// Active cross-section state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossSectioning {
    /// Active planes; empty when sectioning is off.
    pub section_planes: Vec<SectionPlane>,
    /// RGBA, 0–255 per channel.
    pub highlight_color: [u8; 4],
    /// Outline width of the cut, in pixels.
    pub line_width: f64,
}

impl CrossSectioning {
    /// `true` when at least one plane is active.
    pub fn is_enabled(&self) -> bool {
        !self.section_planes.is_empty()
    }
}

/// Encoded color image plus its placement in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    /// Placement of the image within the frame.
    pub image_attributes: ImageAttributes,
    /// Container-encoded image bytes, as delivered.
    pub data: Arc<[u8]>,
}

/// Scene state the frame was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScene {
    /// Scene view the frame belongs to.
    pub scene_view_id: String,
    /// Camera the frame was rendered with.
    pub camera: Camera,
    /// Bounds of everything visible.
    pub bounding_box: BoundingBox,
    /// Cross-section state.
    pub cross_sectioning: CrossSectioning,
    /// `false` when only the camera moved since the previous frame.
    pub has_changed: bool,
}

/// One snapshot of remote scene state.
///
/// Frames are immutable after decoding; a new frame replaces the old one
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Ids of every request this frame answers.
    pub correlation_ids: Vec<String>,
    /// Renderer-assigned, increasing per scene view.
    pub sequence_number: u64,
    /// Color image.
    pub image: FrameImage,
    /// Scene metadata.
    pub scene: FrameScene,
    /// Depth for this frame, when the renderer sent one.
    pub depth_buffer: Option<DepthBuffer>,
}

impl Frame {
    /// `true` if this frame answers the request tagged `id`.
    #[must_use]
    pub fn is_correlated(&self, id: &str) -> bool {
        self.correlation_ids.iter().any(|c| c == id)
    }

    /// Full frame size in frame pixels.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.image.image_attributes.frame_dimensions
    }

    /// Camera the frame was rendered with.
    pub fn camera(&self) -> &Camera {
        &self.scene.camera
    }

    /// Depth buffer, if any.
    pub fn depth_buffer(&self) -> Option<&DepthBuffer> {
        self.depth_buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_lookup() {
        let bbox = BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        let camera = Camera::perspective(DVec3::Z * 5.0, DVec3::ZERO, 1.0, bbox).unwrap();
        let frame = Frame {
            correlation_ids: vec!["render-1".into(), "alter-4".into()],
            sequence_number: 7,
            image: FrameImage {
                image_attributes: ImageAttributes::full_frame(Dimensions::new(4.0, 2.0)),
                data: Arc::from(vec![0_u8; 3]),
            },
            scene: FrameScene {
                scene_view_id: "sv".into(),
                camera,
                bounding_box: bbox,
                cross_sectioning: CrossSectioning::default(),
                has_changed: true,
            },
            depth_buffer: None,
        };
        assert!(frame.is_correlated("alter-4"));
        assert!(!frame.is_correlated("render-2"));
        assert_eq!(frame.dimensions(), Dimensions::new(4.0, 2.0));
        assert!(!frame.scene.cross_sectioning.is_enabled());
    }

    #[test]
    fn section_plane_maps_offset() {
        let plane = SectionPlane {
            normal: DVec3::X,
            offset: 2.0,
        }
        .to_plane();
        assert!(plane.signed_distance_to_point(DVec3::new(2.0, 7.0, 1.0)).abs() < 1e-12);
    }
}
