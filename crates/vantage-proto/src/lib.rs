// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for Vantage remote rendering sessions.
//!
//! The schema is logical: every message is a serde type, and [`wire`] offers
//! one concrete framing (CBOR `OpEnvelope`s in checksummed packets).
//! Transports are free to carry [`Message`] values any other way.

use serde::{Deserialize, Serialize};

mod messages;
mod scene;
mod types;
pub mod wire;

pub use messages::{
    Animation, DrawFrame, ErrorPayload, FlyTo, FlyToTarget, GetStencilBuffer, Hit, HitItems,
    HitItemsResult, ReplaceCamera, SceneEvent, SceneViewStateSelector, StencilBufferResult,
};
pub use scene::{
    ItemOperations, ItemSelector, Material, Matrix4, Operand, OperationType, QueryExpression,
    RepresentationSelector, SceneAlteration,
};
pub use types::{
    BoundingBox, Camera, CrossSectioning, Dimensions, ImageAttributes, OrthographicCamera,
    PerspectiveCamera, Rect, Rgba, SceneAttributes, SectionPlane, Vector2, Vector3,
};

/// Envelope carried as the payload of a [`wire::Packet`].
///
/// * `op` – operation name, see [`Message::op_name`].
/// * `ts` – sender's logical timestamp.
/// * `payload` – operation specific body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpEnvelope<P> {
    /// Operation name.
    pub op: String,
    /// Logical timestamp (monotonic per sender).
    pub ts: u64,
    /// Operation-specific body.
    pub payload: P,
}

/// Every message exchanged with the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Message {
    /// Client → renderer: alter scene items (op = "scene_alteration").
    SceneAlteration(SceneAlteration),
    /// Client → renderer: camera transition (op = "fly_to").
    FlyTo(FlyTo),
    /// Client → renderer: set camera (op = "replace_camera").
    ReplaceCamera(ReplaceCamera),
    /// Client → renderer: pick (op = "hit_items").
    HitItems(HitItems),
    /// Client → renderer: stencil fetch (op = "get_stencil_buffer").
    GetStencilBuffer(GetStencilBuffer),
    /// Renderer → client: frame (op = "draw_frame").
    DrawFrame(DrawFrame),
    /// Renderer → client: pick result (op = "hit_items_result").
    HitItemsResult(HitItemsResult),
    /// Renderer → client: stencil (op = "stencil_buffer_result").
    StencilBufferResult(StencilBufferResult),
    /// Renderer → client: event (op = "event").
    Event(SceneEvent),
    /// Either direction: failure (op = "error").
    Error(ErrorPayload),
}

impl Message {
    /// Canonical op string for this message variant.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::SceneAlteration(_) => "scene_alteration",
            Self::FlyTo(_) => "fly_to",
            Self::ReplaceCamera(_) => "replace_camera",
            Self::HitItems(_) => "hit_items",
            Self::GetStencilBuffer(_) => "get_stencil_buffer",
            Self::DrawFrame(_) => "draw_frame",
            Self::HitItemsResult(_) => "hit_items_result",
            Self::StencilBufferResult(_) => "stencil_buffer_result",
            Self::Event(_) => "event",
            Self::Error(_) => "error",
        }
    }

    /// Correlation id this message answers or carries, if any.
    ///
    /// Frames may answer several requests; use
    /// [`DrawFrame::frame_correlation_ids`] for those.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::SceneAlteration(m) => m.supplied_correlation_id.as_deref(),
            Self::FlyTo(m) => Some(&m.frame_correlation_id),
            Self::ReplaceCamera(m) => Some(&m.frame_correlation_id),
            Self::HitItems(m) => Some(&m.correlation_id),
            Self::GetStencilBuffer(m) => Some(&m.correlation_id),
            Self::HitItemsResult(m) => Some(&m.correlation_id),
            Self::StencilBufferResult(m) => Some(&m.correlation_id),
            Self::Event(e) => e.correlation_id(),
            Self::Error(e) => e.correlation_id.as_deref(),
            Self::DrawFrame(_) => None,
        }
    }
}
