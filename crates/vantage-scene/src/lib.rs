// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Local geometry engine for remotely rendered frames.
//!
//! A renderer streams color images plus per-pixel depth; this crate answers
//! geometric questions about them without a network round trip:
//!
//! - [`Camera`]: immutable perspective/orthographic camera with derived
//!   clipping planes, fits, standard views and queued fly-to transitions.
//! - [`Viewport`]: screen ↔ normalized-device ↔ world conversions.
//! - [`DepthBuffer`] / [`StencilBuffer`]: world points under pixels, hit
//!   tests, occlusion and detachment tests, feature snapping.
//! - [`Frame`]: one decoded snapshot of remote scene state.
//!
//! Nothing here performs I/O. Wire mapping lives in `vantage-client`.

use thiserror::Error;

pub mod camera;
mod depth;
mod frame;
mod image;
mod stencil;
mod viewport;

pub use camera::{
    compute_clipping_planes, Camera, CameraFields, CameraUpdate, CameraView, ClippingPlanes,
    FlyTo, FlyToOptions, FlyToTarget, OrthographicView, PerspectiveView, ProjectionKind,
    SceneViewStateId, StandardView,
};
pub use depth::{DepthBuffer, DEFAULT_DEPTH_TOLERANCE, DEPTH_SENTINEL};
pub use frame::{CrossSectioning, Frame, FrameImage, FrameScene, SectionPlane};
pub use image::{ImageAttributes, PixelImage};
pub use stencil::{StencilBuffer, STENCIL_EMPTY, STENCIL_FEATURE};
pub use viewport::Viewport;

/// Error type for camera construction and buffer assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The camera variant could not be determined from the supplied fields.
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
    /// A value was out of range or did not apply to the camera variant.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A decoded pixel buffer did not match its declared dimensions.
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// `width * height`.
        expected: usize,
        /// Number of pixels supplied.
        actual: usize,
    },
}
