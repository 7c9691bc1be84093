// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Axis-aligned preset orientations.

use vantage_geom::DVec3;

/// Preset camera orientations relative to the world axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandardView {
    /// Looking down -Z.
    Front,
    /// Looking down +Z.
    Back,
    /// Looking down -Y, +Y is behind the camera.
    Top,
    /// Looking up +Y.
    Bottom,
    /// Looking down +X.
    Left,
    /// Looking down -X.
    Right,
    /// Looking from the (+X, +Y, +Z) octant toward the origin.
    Isometric,
}

impl StandardView {
    /// Every preset, in menu order.
    pub const ALL: [StandardView; 7] = [
        StandardView::Front,
        StandardView::Back,
        StandardView::Top,
        StandardView::Bottom,
        StandardView::Left,
        StandardView::Right,
        StandardView::Isometric,
    ];

    /// Unit vector from the look-at point toward the camera.
    #[must_use]
    pub fn eye_direction(self) -> DVec3 {
        match self {
            StandardView::Front => DVec3::Z,
            StandardView::Back => DVec3::NEG_Z,
            StandardView::Top => DVec3::Y,
            StandardView::Bottom => DVec3::NEG_Y,
            StandardView::Left => DVec3::NEG_X,
            StandardView::Right => DVec3::X,
            StandardView::Isometric => DVec3::ONE.normalize(),
        }
    }

    /// Up vector for the preset.
    #[must_use]
    pub fn up(self) -> DVec3 {
        match self {
            StandardView::Top => DVec3::NEG_Z,
            StandardView::Bottom => DVec3::Z,
            _ => DVec3::Y,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StandardView::Front => "Front",
            StandardView::Back => "Back",
            StandardView::Top => "Top",
            StandardView::Bottom => "Bottom",
            StandardView::Left => "Left",
            StandardView::Right => "Right",
            StandardView::Isometric => "Isometric",
        }
    }
}

impl std::fmt::Display for StandardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
