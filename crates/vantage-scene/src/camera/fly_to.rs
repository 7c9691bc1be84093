// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Queued camera transitions.

use std::time::Duration;

use vantage_geom::BoundingBox;

use super::Camera;

/// Saved scene view state, addressed by server id or caller-supplied id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneViewStateId {
    /// Server-assigned id.
    Id(String),
    /// Caller-supplied id.
    SuppliedId(String),
}

/// Destination of a fly-to transition.
#[derive(Debug, Clone, PartialEq)]
pub enum FlyToTarget {
    /// Frame the item with this server id.
    ItemId(String),
    /// Frame the item with this caller-supplied id.
    ItemSuppliedId(String),
    /// Move to an explicit camera.
    Camera(Box<Camera>),
    /// Frame a world-space bounding box.
    BoundingBox(BoundingBox),
    /// Restore a saved scene view state's camera.
    SceneViewState(SceneViewStateId),
}

/// Caller-facing options; `target` is required by [`Camera::fly_to`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlyToOptions {
    /// Where to fly.
    pub target: Option<FlyToTarget>,
    /// Animation length; `None` jumps.
    pub animation: Option<Duration>,
}

impl FlyToOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an item by server id.
    #[must_use]
    pub fn item_id(mut self, id: impl Into<String>) -> Self {
        self.target = Some(FlyToTarget::ItemId(id.into()));
        self
    }

    /// Target an item by supplied id.
    #[must_use]
    pub fn item_supplied_id(mut self, id: impl Into<String>) -> Self {
        self.target = Some(FlyToTarget::ItemSuppliedId(id.into()));
        self
    }

    /// Target an explicit camera.
    #[must_use]
    pub fn camera(mut self, camera: Camera) -> Self {
        self.target = Some(FlyToTarget::Camera(Box::new(camera)));
        self
    }

    /// Target a bounding box.
    #[must_use]
    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.target = Some(FlyToTarget::BoundingBox(bounding_box));
        self
    }

    /// Target a saved scene view state.
    #[must_use]
    pub fn scene_view_state(mut self, id: SceneViewStateId) -> Self {
        self.target = Some(FlyToTarget::SceneViewState(id));
        self
    }

    /// Animate over `duration`.
    #[must_use]
    pub fn animation(mut self, duration: Duration) -> Self {
        self.animation = Some(duration);
        self
    }
}

/// A validated, pending transition carried by a camera until it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyTo {
    /// Destination.
    pub target: FlyToTarget,
    /// Animation length; `None` jumps.
    pub animation: Option<Duration>,
}
