// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Request, response and event payloads.

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, Camera, ImageAttributes, SceneAttributes, Vector2, Vector3};

/// Rendered frame pushed by the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrawFrame {
    /// Monotonic per-stream frame number.
    pub sequence_number: Option<u64>,
    /// Correlation ids of the requests this frame satisfies.
    pub frame_correlation_ids: Vec<String>,
    /// Image placement.
    pub image_attributes: Option<ImageAttributes>,
    /// Scene state.
    pub scene_attributes: Option<SceneAttributes>,
    /// Encoded color image.
    pub image: Option<Vec<u8>>,
    /// Encoded 16-bit depth image, when requested.
    pub depth_buffer: Option<Vec<u8>>,
}

/// Animation settings for a camera transition.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Animation {
    /// Duration in nanoseconds.
    pub duration_nanos: u64,
}

/// Saved scene view state selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SceneViewStateSelector {
    /// Server id.
    Id(String),
    /// Caller-supplied id.
    SuppliedId(String),
}

/// Fly-to destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FlyToTarget {
    /// Item server id.
    ItemId(String),
    /// Item supplied id.
    ItemSuppliedId(String),
    /// Explicit camera.
    Camera(Camera),
    /// Box to frame.
    BoundingBox(BoundingBox),
    /// Saved view state.
    SceneViewStateIdentifier(SceneViewStateSelector),
}

/// Animated (or instant) camera transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyTo {
    /// Echoed in the resulting frame.
    pub frame_correlation_id: String,
    /// Absent for an instant jump.
    pub animation: Option<Animation>,
    /// Destination.
    pub target: FlyToTarget,
}

/// Replace the camera without animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplaceCamera {
    /// New camera.
    pub camera: Camera,
    /// Echoed in the resulting frame.
    pub frame_correlation_id: String,
}

/// Pick items under a frame point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HitItems {
    /// Echoed in the response.
    pub correlation_id: String,
    /// Frame-space point.
    pub point: Vector2,
    /// Include item metadata in hits.
    pub include_metadata: bool,
}

/// One picked item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Hit {
    /// Item server id.
    pub item_id: Option<String>,
    /// Item supplied id.
    pub item_supplied_id: Option<String>,
    /// World point on the item surface.
    pub hit_point: Option<Vector3>,
    /// Surface normal at `hit_point`.
    pub hit_normal: Option<Vector3>,
}

/// Response to [`HitItems`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HitItemsResult {
    /// Echo of the request id.
    pub correlation_id: String,
    /// Nearest first.
    pub hits: Vec<Hit>,
}

/// Request the feature stencil for the latest frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetStencilBuffer {
    /// Echoed in the response.
    pub correlation_id: String,
}

/// Response to [`GetStencilBuffer`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StencilBufferResult {
    /// Echo of the request id.
    pub correlation_id: String,
    /// Stencil image placement.
    pub image_attributes: Option<ImageAttributes>,
    /// Encoded 8-bit stencil image.
    pub stencil_buffer: Option<Vec<u8>>,
    /// Encoded 16-bit depth image rendered alongside the stencil.
    pub depth_buffer: Option<Vec<u8>>,
}

/// Renderer-side events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    /// A queued scene alteration finished applying.
    SceneAlterationCompleted {
        /// The alteration's supplied correlation id.
        correlation_id: Option<String>,
        /// Failure reason, if it did not apply.
        error: Option<String>,
    },
    /// A fly-to animation reached its destination.
    AnimationCompleted {
        /// Fly-to frame correlation id.
        correlation_id: Option<String>,
    },
}

impl SceneEvent {
    /// Correlation id carried by the event.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::SceneAlterationCompleted { correlation_id, .. }
            | Self::AnimationCompleted { correlation_id } => correlation_id.as_deref(),
        }
    }
}

/// Error reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    /// Correlation id of the failed request, when known.
    pub correlation_id: Option<String>,
    /// Numeric status code.
    pub code: u32,
    /// Human readable message.
    pub message: String,
}
