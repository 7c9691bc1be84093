// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Vantage.

This crate provides:
- Axis-aligned bounding boxes (`BoundingBox`) with derived center/radius.
- Rays (`Ray`) and planes (`Plane`) for picking and section planes.
- Screen-space rectangles and dimensions (`Rectangle`, `Dimensions`).
- Vector helpers for angles and axis/pivot rotations.

Design notes:
- `f64` throughout (`glam::DVec*`); frames arrive with double precision camera
  data and depth linearization is sensitive to rounding near the far plane.
- All operations are pure and infallible. Degenerate inputs (zero-length
  vectors, zero-volume boxes) are clamped to [`EPSILON`] rather than panicking.
"]

/// Axis-aligned bounding boxes (world space).
pub mod bbox;
/// Infinite planes in Hessian normal form.
pub mod plane;
/// Half-lines used for screen picking.
pub mod ray;
/// 2D rectangles and dimensions in screen/frame space.
pub mod rect;
/// Angle and rotation helpers.
pub mod vector;

pub use bbox::BoundingBox;
pub use glam::{DMat4, DQuat, DVec2, DVec3, DVec4};
pub use plane::Plane;
pub use ray::Ray;
pub use rect::{Dimensions, Rectangle};

/// Smallest magnitude treated as non-zero by geometric computations.
pub const EPSILON: f64 = 1e-6;
