// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire → domain decoding.
//!
//! Decoders walk the whole message before failing so a single
//! [`DecodeError`] lists every missing field.

use std::sync::Arc;

use vantage_geom::{BoundingBox, DVec3, Dimensions, Rectangle};
use vantage_proto as proto;
use vantage_scene::{
    Camera, CameraFields, CrossSectioning, DepthBuffer, Frame, FrameImage, FrameScene,
    ImageAttributes, SceneError, SectionPlane, StencilBuffer,
};

use crate::mapping::vector_from_wire;
use crate::pixels::{image_size, PixelDecoder};
use crate::{ClientError, DecodeError};

const DEFAULT_SECTION_LINE_WIDTH: f64 = 1.0;

/// One validated pick result.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// Item server id.
    pub item_id: String,
    /// Item supplied id, if the item has one.
    pub item_supplied_id: Option<String>,
    /// World point on the surface.
    pub point: DVec3,
    /// Unit surface normal.
    pub normal: DVec3,
}

/// Builds [`Frame`]s (and stencil buffers) from wire messages.
#[derive(Clone)]
pub struct FrameDecoder {
    pixels: Arc<dyn PixelDecoder>,
}

impl FrameDecoder {
    /// Decoder that hands depth and stencil payloads to `pixels`.
    pub fn new(pixels: Arc<dyn PixelDecoder>) -> Self {
        Self { pixels }
    }

    /// Decodes a rendered frame.
    ///
    /// # Errors
    /// [`ClientError::Decode`] listing every missing required field,
    /// [`ClientError::Scene`] when the camera variant cannot be determined or
    /// is invalid, [`ClientError::Pixels`] when the depth payload is unusable.
    pub fn decode_frame(&self, frame: &proto::DrawFrame) -> Result<Frame, ClientError> {
        let mut missing = DecodeError::default();

        let sequence_number = missing.require(frame.sequence_number, "sequence_number");
        let image_attributes =
            decode_image_attributes(frame.image_attributes.as_ref(), "image_attributes", &mut missing);
        let image = missing.require(frame.image.as_ref(), "image");

        let scene = missing.require(frame.scene_attributes.as_ref(), "scene_attributes");
        let camera_fields = match scene {
            Some(scene) => {
                match missing.require(scene.camera.as_ref(), "scene_attributes.camera") {
                    Some(camera) => Some(camera_fields(camera, "scene_attributes.camera", &mut missing)?),
                    None => None,
                }
            }
            None => None,
        };
        let bounding_box = scene.and_then(|scene| {
            decode_bounding_box(
                missing.require(
                    scene.visible_bounding_box.as_ref(),
                    "scene_attributes.visible_bounding_box",
                ),
                "scene_attributes.visible_bounding_box",
                &mut missing,
            )
        });
        let cross_sectioning = scene
            .and_then(|s| s.cross_sectioning.as_ref())
            .map(|c| decode_cross_sectioning(c, &mut missing))
            .unwrap_or_default();

        match (
            sequence_number,
            image_attributes,
            image,
            scene,
            camera_fields,
            bounding_box,
        ) {
            (
                Some(sequence_number),
                Some(image_attributes),
                Some(image),
                Some(scene),
                Some(fields),
                Some(bounding_box),
            ) if missing.is_empty() => {
                let camera =
                    Camera::from_fields(&fields, image_attributes.aspect_ratio(), bounding_box)?;
                let depth_buffer = frame
                    .depth_buffer
                    .as_deref()
                    .map(|bytes| {
                        let size = image_size(&image_attributes)?;
                        self.pixels
                            .decode_depth(bytes, size)
                            .map(|pixels| {
                                DepthBuffer::new(camera.clone(), image_attributes, pixels)
                            })
                    })
                    .transpose()?;
                Ok(Frame {
                    correlation_ids: frame.frame_correlation_ids.clone(),
                    sequence_number,
                    image: FrameImage {
                        image_attributes,
                        data: Arc::from(image.as_slice()),
                    },
                    scene: FrameScene {
                        scene_view_id: scene.scene_view_id.clone().unwrap_or_default(),
                        camera,
                        bounding_box,
                        cross_sectioning,
                        has_changed: scene.has_changed,
                    },
                    depth_buffer,
                })
            }
            _ => Err(missing.into()),
        }
    }

    /// Decodes a stencil reply and binds it to `frame`'s depth.
    ///
    /// The depth image sent with the stencil wins over the frame's own depth
    /// buffer; one of the two must exist.
    pub fn decode_stencil(
        &self,
        reply: &proto::StencilBufferResult,
        frame: &Frame,
    ) -> Result<StencilBuffer, ClientError> {
        let mut missing = DecodeError::default();
        let attributes =
            decode_image_attributes(reply.image_attributes.as_ref(), "image_attributes", &mut missing);
        let stencil = missing.require(reply.stencil_buffer.as_ref(), "stencil_buffer");
        if reply.depth_buffer.is_none() && frame.depth_buffer.is_none() {
            missing.record("depth_buffer");
        }
        let (Some(attributes), Some(stencil)) = (attributes, stencil) else {
            return Err(missing.into());
        };
        let size = image_size(&attributes)?;
        let depth = match (&reply.depth_buffer, &frame.depth_buffer) {
            (Some(bytes), _) => DepthBuffer::new(
                frame.scene.camera.clone(),
                attributes,
                self.pixels.decode_depth(bytes, size)?,
            ),
            (None, Some(depth)) => depth.clone(),
            (None, None) => return Err(missing.into()),
        };
        let pixels = self.pixels.decode_stencil(stencil, size)?;
        Ok(StencilBuffer::new(attributes, pixels, depth)?)
    }
}

/// Validates a pick reply. Every hit needs an item id, a point and a normal.
pub fn decode_hits(reply: &proto::HitItemsResult) -> Result<Vec<HitResult>, ClientError> {
    reply
        .hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let invalid = |what: &str| ClientError::InvalidHitResponse(format!("hit {i}: {what}"));
            let item_id = hit.item_id.clone().ok_or_else(|| invalid("missing item id"))?;
            let point = hit.hit_point.map(vector_from_wire).ok_or_else(|| invalid("missing hit point"))?;
            let normal = hit
                .hit_normal
                .map(vector_from_wire)
                .ok_or_else(|| invalid("missing hit normal"))?;
            if !point.is_finite() {
                return Err(invalid("non-finite hit point"));
            }
            let normal = normal
                .try_normalize()
                .ok_or_else(|| invalid("degenerate hit normal"))?;
            Ok(HitResult {
                item_id,
                item_supplied_id: hit.item_supplied_id.clone(),
                point,
                normal,
            })
        })
        .collect()
}

fn decode_image_attributes(
    attributes: Option<&proto::ImageAttributes>,
    path: &str,
    missing: &mut DecodeError,
) -> Option<ImageAttributes> {
    let Some(attributes) = missing.require(attributes, path) else {
        return None;
    };
    let dims = missing.require(attributes.frame_dimensions, &format!("{path}.frame_dimensions"));
    let rect = missing.require(attributes.image_rect, &format!("{path}.image_rect"));
    let scale = missing.require(attributes.scale_factor, &format!("{path}.scale_factor"));
    Some(ImageAttributes {
        frame_dimensions: dims.map(|d| Dimensions::new(d.width, d.height))?,
        image_rect: rect.map(|r| Rectangle::new(r.x, r.y, r.width, r.height))?,
        image_scale: scale?,
    })
}

fn decode_bounding_box(
    bbox: Option<&proto::BoundingBox>,
    path: &str,
    missing: &mut DecodeError,
) -> Option<BoundingBox> {
    let bbox = bbox?;
    let min = missing.require(bbox.min, &format!("{path}.min"));
    let max = missing.require(bbox.max, &format!("{path}.max"));
    Some(BoundingBox::new(vector_from_wire(min?), vector_from_wire(max?)))
}

fn decode_cross_sectioning(
    cross: &proto::CrossSectioning,
    missing: &mut DecodeError,
) -> CrossSectioning {
    let section_planes = cross
        .section_planes
        .iter()
        .enumerate()
        .filter_map(|(i, plane)| {
            let normal = missing.require(
                plane.normal,
                &format!("scene_attributes.cross_sectioning.section_planes[{i}].normal"),
            )?;
            Some(SectionPlane {
                normal: vector_from_wire(normal),
                offset: plane.offset,
            })
        })
        .collect();
    let color = cross.highlight_color.unwrap_or_default();
    CrossSectioning {
        section_planes,
        highlight_color: [color.r, color.g, color.b, color.a],
        line_width: cross.line_width.unwrap_or(DEFAULT_SECTION_LINE_WIDTH),
    }
}

/// Flattens the wire camera's oneof into [`CameraFields`], recording
/// missing members. Both variants present, or neither and no flat fields,
/// is an invalid camera.
fn camera_fields(
    camera: &proto::Camera,
    path: &str,
    missing: &mut DecodeError,
) -> Result<CameraFields, ClientError> {
    let v = |value: Option<proto::Vector3>| value.map(vector_from_wire);
    match (&camera.perspective, &camera.orthographic) {
        (Some(_), Some(_)) => Err(SceneError::InvalidCamera(
            "camera sets both perspective and orthographic".into(),
        )
        .into()),
        (Some(p), None) => Ok(CameraFields {
            position: v(missing.require(p.position, &format!("{path}.perspective.position"))),
            look_at: v(missing.require(p.look_at, &format!("{path}.perspective.look_at"))),
            up: v(missing.require(p.up, &format!("{path}.perspective.up"))),
            fov_y: p.fov_y,
            ..CameraFields::default()
        }),
        (None, Some(o)) => Ok(CameraFields {
            view_vector: v(missing.require(o.view_vector, &format!("{path}.orthographic.view_vector"))),
            look_at: v(missing.require(o.look_at, &format!("{path}.orthographic.look_at"))),
            up: v(missing.require(o.up, &format!("{path}.orthographic.up"))),
            fov_height: missing.require(o.fov_height, &format!("{path}.orthographic.fov_height")),
            ..CameraFields::default()
        }),
        (None, None) if camera.position.is_some() || camera.look_at.is_some() => Ok(CameraFields {
            position: v(missing.require(camera.position, &format!("{path}.position"))),
            look_at: v(missing.require(camera.look_at, &format!("{path}.look_at"))),
            up: v(missing.require(camera.up, &format!("{path}.up"))),
            ..CameraFields::default()
        }),
        (None, None) => Err(SceneError::InvalidCamera(
            "camera has neither a perspective nor an orthographic variant".into(),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::{encode_raw_depth, RawPixelDecoder};
    use vantage_geom::DVec2;

    fn v(x: f64, y: f64, z: f64) -> Option<proto::Vector3> {
        Some(proto::Vector3::new(x, y, z))
    }

    fn attributes() -> proto::ImageAttributes {
        proto::ImageAttributes {
            frame_dimensions: Some(proto::Dimensions {
                width: 2.0,
                height: 2.0,
            }),
            image_rect: Some(proto::Rect {
                x: 0.0,
                y: 0.0,
                width: 2.0,
                height: 2.0,
            }),
            scale_factor: Some(1.0),
        }
    }

    fn draw_frame() -> proto::DrawFrame {
        proto::DrawFrame {
            sequence_number: Some(3),
            frame_correlation_ids: vec!["vantage-1".into()],
            image_attributes: Some(attributes()),
            scene_attributes: Some(proto::SceneAttributes {
                scene_view_id: Some("view".into()),
                camera: Some(proto::Camera::from_perspective(proto::PerspectiveCamera {
                    position: v(0.0, 0.0, 5.0),
                    look_at: v(0.0, 0.0, 0.0),
                    up: v(0.0, 1.0, 0.0),
                    fov_y: Some(45.0),
                })),
                visible_bounding_box: Some(proto::BoundingBox {
                    min: v(-1.0, -1.0, -1.0),
                    max: v(1.0, 1.0, 1.0),
                }),
                cross_sectioning: None,
                has_changed: true,
            }),
            image: Some(vec![0; 16]),
            depth_buffer: Some(encode_raw_depth(&[100; 4])),
        }
    }

    fn decoder() -> FrameDecoder {
        FrameDecoder::new(Arc::new(RawPixelDecoder))
    }

    #[test]
    fn decodes_complete_frame() {
        let frame = decoder().decode_frame(&draw_frame()).unwrap();
        assert_eq!(frame.sequence_number, 3);
        assert!(frame.is_correlated("vantage-1"));
        assert_eq!(frame.scene.scene_view_id, "view");
        assert!(frame.camera().is_perspective());
        assert!(frame.depth_buffer().is_some());
        assert!(!frame.scene.cross_sectioning.is_enabled());
    }

    #[test]
    fn lists_every_missing_field() {
        let mut draw = draw_frame();
        draw.sequence_number = None;
        draw.image = None;
        if let Some(scene) = draw.scene_attributes.as_mut() {
            scene.visible_bounding_box = Some(proto::BoundingBox {
                min: None,
                max: v(1.0, 1.0, 1.0),
            });
        }
        let Err(ClientError::Decode(err)) = decoder().decode_frame(&draw) else {
            panic!("expected a decode error");
        };
        assert_eq!(
            err.missing,
            vec![
                "sequence_number",
                "image",
                "scene_attributes.visible_bounding_box.min"
            ]
        );
    }

    #[test]
    fn camera_with_both_variants_is_invalid() {
        let mut draw = draw_frame();
        if let Some(camera) = draw
            .scene_attributes
            .as_mut()
            .and_then(|s| s.camera.as_mut())
        {
            camera.orthographic = Some(proto::OrthographicCamera::default());
        }
        assert!(matches!(
            decoder().decode_frame(&draw),
            Err(ClientError::Scene(SceneError::InvalidCamera(_)))
        ));
    }

    #[test]
    fn legacy_flat_camera_is_perspective() {
        let mut draw = draw_frame();
        if let Some(scene) = draw.scene_attributes.as_mut() {
            scene.camera = Some(proto::Camera {
                position: v(0.0, 0.0, 5.0),
                look_at: v(0.0, 0.0, 0.0),
                up: v(0.0, 1.0, 0.0),
                ..proto::Camera::default()
            });
        }
        let frame = decoder().decode_frame(&draw).unwrap();
        assert!(frame.camera().is_perspective());
    }

    #[test]
    fn stencil_falls_back_to_frame_depth() {
        let frame = decoder().decode_frame(&draw_frame()).unwrap();
        let reply = proto::StencilBufferResult {
            correlation_id: "vantage-2".into(),
            image_attributes: Some(attributes()),
            stencil_buffer: Some(vec![0, 255, 0, 0]),
            depth_buffer: None,
        };
        let stencil = decoder().decode_stencil(&reply, &frame).unwrap();
        assert!(stencil.hit_test(DVec2::new(1.5, 0.5)));
        assert_eq!(stencil.depth_buffer(), frame.depth_buffer().unwrap());
    }

    #[test]
    fn huge_image_rect_is_an_error_not_a_panic() {
        let mut draw = draw_frame();
        draw.image_attributes = Some(proto::ImageAttributes {
            image_rect: Some(proto::Rect {
                x: 0.0,
                y: 0.0,
                width: 1e12,
                height: 1e12,
            }),
            ..attributes()
        });
        assert!(matches!(
            decoder().decode_frame(&draw),
            Err(ClientError::Pixels(_))
        ));
    }

    #[test]
    fn hit_without_normal_is_rejected() {
        let reply = proto::HitItemsResult {
            correlation_id: "vantage-3".into(),
            hits: vec![proto::Hit {
                item_id: Some("item".into()),
                item_supplied_id: None,
                hit_point: v(0.0, 0.0, 1.0),
                hit_normal: None,
            }],
        };
        assert!(matches!(
            decode_hits(&reply),
            Err(ClientError::InvalidHitResponse(_))
        ));
    }

    #[test]
    fn hit_normals_are_normalized() {
        let reply = proto::HitItemsResult {
            correlation_id: "vantage-3".into(),
            hits: vec![proto::Hit {
                item_id: Some("item".into()),
                item_supplied_id: Some("part-7".into()),
                hit_point: v(0.0, 0.0, 1.0),
                hit_normal: v(0.0, 0.0, 4.0),
            }],
        };
        let hits = decode_hits(&reply).unwrap();
        assert_eq!(hits[0].normal, DVec3::Z);
        assert_eq!(hits[0].item_supplied_id.as_deref(), Some("part-7"));
    }
}
