// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene alteration schema: query expressions and item operations.

use serde::{Deserialize, Serialize};

use crate::types::{Rect, Rgba, Vector2};

/// Item selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemSelector {
    /// Server-assigned id.
    Id(String),
    /// Caller-supplied id.
    SuppliedId(String),
}

/// Leaf term of a query expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operand {
    /// Every item in the scene.
    Root,
    /// One item.
    Item {
        /// Which item.
        selector: ItemSelector,
    },
    /// Contiguous range of rows in the scene tree.
    SceneTreeRange {
        /// First row (inclusive).
        start: u32,
        /// Last row (inclusive).
        end: u32,
    },
    /// Metadata text filter.
    Metadata {
        /// Value to match.
        filter: String,
        /// Metadata keys to search.
        keys: Vec<String>,
        /// Require an exact match rather than a substring.
        exact_match: bool,
    },
    /// Currently selected items.
    Selected,
    /// Items by visibility.
    Visibility {
        /// `true` for visible items, `false` for hidden ones.
        visible: bool,
    },
    /// Item under a frame point.
    Point {
        /// Frame-space point.
        point: Vector2,
    },
    /// Items intersecting the frustum through a frame rectangle.
    Volume {
        /// Frame-space rectangle.
        rectangle: Rect,
        /// Only items wholly inside the volume.
        exclusive: bool,
    },
}

/// Query expression tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpression {
    /// Leaf.
    Operand(Operand),
    /// Intersection.
    And(Vec<QueryExpression>),
    /// Union.
    Or(Vec<QueryExpression>),
    /// Complement.
    Not(Box<QueryExpression>),
}

/// Material override.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// 0–255.
    pub opacity: u8,
    /// 0–128.
    pub glossiness: u8,
    /// Diffuse color.
    pub diffuse: Rgba,
    /// Ambient color.
    pub ambient: Rgba,
    /// Specular color.
    pub specular: Rgba,
    /// Emissive color.
    pub emissive: Rgba,
}

/// Row-major 4×4 transform.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Matrix4 {
    /// Sixteen row-major components.
    pub components: [f64; 16],
}

/// Representation to display for an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationSelector {
    /// A specific representation.
    Id(String),
    /// The empty representation (show nothing).
    Empty,
    /// The entire part.
    EntirePart,
}

/// One operation applied to every item matched by a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationType {
    /// Show or hide.
    ChangeVisibility {
        /// Target visibility.
        visible: bool,
    },
    /// Select or deselect.
    ChangeSelection {
        /// Target selection state.
        selected: bool,
    },
    /// Override the material.
    ChangeMaterial {
        /// New material.
        material: Material,
    },
    /// Remove material overrides.
    ClearMaterial,
    /// Override the local transform.
    ChangeTransform {
        /// New transform.
        transform: Matrix4,
    },
    /// Remove transform overrides.
    ClearTransform {
        /// Also clear descendants.
        cascade: bool,
    },
    /// Render as phantom.
    ChangePhantom {
        /// Phantom state.
        phantom: bool,
    },
    /// Remove phantom overrides.
    ClearPhantom,
    /// Treat as an end item.
    ChangeEndItem {
        /// End-item state.
        end_item: bool,
    },
    /// Remove end-item overrides.
    ClearEndItem,
    /// Show a rendition.
    ViewRendition {
        /// Which rendition.
        selector: ItemSelector,
    },
    /// Show the default rendition.
    ViewDefaultRendition,
    /// Remove rendition overrides.
    ClearRendition,
    /// Show a representation.
    ViewRepresentation {
        /// Which representation.
        representation: RepresentationSelector,
    },
    /// Remove representation overrides.
    ClearRepresentation,
}

/// Query target plus ordered operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemOperations {
    /// Target items.
    pub query: QueryExpression,
    /// Applied in order.
    pub operation_types: Vec<OperationType>,
}

/// Scene alteration request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneAlteration {
    /// Scene view to alter.
    pub scene_view_id: String,
    /// Operation groups, applied in order.
    pub operations: Vec<ItemOperations>,
    /// Echoed back on the completion event.
    pub supplied_correlation_id: Option<String>,
}
