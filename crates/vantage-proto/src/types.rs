// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared value types.
//!
//! Nested message fields are optional on the wire; receivers validate
//! presence themselves and report every missing path at once.

use serde::{Deserialize, Serialize};

/// 2D point in frame pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector2 {
    /// X.
    pub x: f64,
    /// Y (down).
    pub y: f64,
}

/// 3D world-space vector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector3 {
    /// X.
    pub x: f64,
    /// Y.
    pub y: f64,
    /// Z.
    pub z: f64,
}

impl Vector3 {
    /// Component constructor.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Axis-aligned rectangle, origin top-left.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// Left.
    pub x: f64,
    /// Top.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// World-space bounding box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Option<Vector3>,
    /// Maximum corner.
    pub max: Option<Vector3>,
}

/// Perspective projection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position.
    pub position: Option<Vector3>,
    /// Look-at point.
    pub look_at: Option<Vector3>,
    /// Up vector.
    pub up: Option<Vector3>,
    /// Vertical field of view, degrees.
    pub fov_y: Option<f64>,
}

/// Orthographic projection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OrthographicCamera {
    /// Eye → look-at vector.
    pub view_vector: Option<Vector3>,
    /// Look-at point.
    pub look_at: Option<Vector3>,
    /// Up vector.
    pub up: Option<Vector3>,
    /// Visible height in world units.
    pub fov_height: Option<f64>,
}

/// Camera message.
///
/// Exactly one of `perspective` / `orthographic` is expected. Older
/// renderers send only the flat `position`/`look_at`/`up` triple, which
/// denotes a perspective camera.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    /// Flat perspective position.
    pub position: Option<Vector3>,
    /// Flat look-at point.
    pub look_at: Option<Vector3>,
    /// Flat up vector.
    pub up: Option<Vector3>,
    /// Perspective variant.
    pub perspective: Option<PerspectiveCamera>,
    /// Orthographic variant.
    pub orthographic: Option<OrthographicCamera>,
}

impl Camera {
    /// Perspective camera message.
    pub fn from_perspective(perspective: PerspectiveCamera) -> Self {
        Self {
            perspective: Some(perspective),
            ..Self::default()
        }
    }

    /// Orthographic camera message.
    pub fn from_orthographic(orthographic: OrthographicCamera) -> Self {
        Self {
            orthographic: Some(orthographic),
            ..Self::default()
        }
    }
}

/// Placement of a delivered image in its frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageAttributes {
    /// Full frame size.
    pub frame_dimensions: Option<Dimensions>,
    /// Region of the frame the image covers.
    pub image_rect: Option<Rect>,
    /// Image pixels per frame pixel.
    pub scale_factor: Option<f64>,
}

/// RGBA color, 0–255 channels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

/// Section plane: `normal · p = offset`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionPlane {
    /// Plane normal.
    pub normal: Option<Vector3>,
    /// Offset along the normal.
    pub offset: f64,
}

/// Cross-section configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CrossSectioning {
    /// Active planes.
    pub section_planes: Vec<SectionPlane>,
    /// Cut-edge highlight.
    pub highlight_color: Option<Rgba>,
    /// Cut-edge width in pixels.
    pub line_width: Option<f64>,
}

/// Scene state a frame was rendered from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneAttributes {
    /// Scene view the frame belongs to.
    pub scene_view_id: Option<String>,
    /// Render camera.
    pub camera: Option<Camera>,
    /// Bounds of visible geometry.
    pub visible_bounding_box: Option<BoundingBox>,
    /// Cross-section state.
    pub cross_sectioning: Option<CrossSectioning>,
    /// Scene content changed since the previous frame.
    pub has_changed: bool,
}
