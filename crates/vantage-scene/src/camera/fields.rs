// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Loosely-typed camera input (config files, saved views, scripting).

use vantage_geom::DVec3;

use super::{CameraView, OrthographicView, PerspectiveView, DEFAULT_FOV_Y};
use crate::SceneError;

/// Camera fields without a variant tag.
///
/// Resolution is strict: a perspective shape carries `position` and no
/// orthographic fields; an orthographic shape carries both `view_vector` and
/// `fov_height` and no `position`. Anything else (including a mixture) is an
/// [`SceneError::InvalidCamera`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraFields {
    /// Perspective eye position.
    pub position: Option<DVec3>,
    /// Look-at point (required).
    pub look_at: Option<DVec3>,
    /// Up vector (defaults to +Y).
    pub up: Option<DVec3>,
    /// Perspective vertical field of view in degrees (defaults to 45).
    pub fov_y: Option<f64>,
    /// Orthographic view vector.
    pub view_vector: Option<DVec3>,
    /// Orthographic visible height.
    pub fov_height: Option<f64>,
}

impl CameraFields {
    /// Determines the variant.
    pub fn resolve(&self) -> Result<CameraView, SceneError> {
        let look_at = self
            .look_at
            .ok_or_else(|| SceneError::InvalidCamera("missing look_at".into()))?;
        let up = self.up.unwrap_or(DVec3::Y);
        let has_ortho = self.view_vector.is_some() || self.fov_height.is_some();
        match (self.position, self.view_vector, self.fov_height) {
            (Some(position), None, None) => Ok(CameraView::Perspective(PerspectiveView {
                position,
                look_at,
                up,
                fov_y: self.fov_y.unwrap_or(DEFAULT_FOV_Y),
            })),
            (None, Some(view_vector), Some(fov_height)) if self.fov_y.is_none() => {
                Ok(CameraView::Orthographic(OrthographicView {
                    view_vector,
                    look_at,
                    up,
                    fov_height,
                }))
            }
            (Some(_), _, _) if has_ortho => Err(SceneError::InvalidCamera(
                "fields mix perspective and orthographic shapes".into(),
            )),
            _ => Err(SceneError::InvalidCamera(
                "expected position (perspective) or view_vector + fov_height (orthographic)"
                    .into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ProjectionKind;

    #[test]
    fn resolves_each_shape() {
        let persp = CameraFields {
            position: Some(DVec3::Z),
            look_at: Some(DVec3::ZERO),
            ..CameraFields::default()
        };
        assert_eq!(persp.resolve().unwrap().kind(), ProjectionKind::Perspective);

        let ortho = CameraFields {
            view_vector: Some(-DVec3::Z),
            look_at: Some(DVec3::ZERO),
            fov_height: Some(2.0),
            ..CameraFields::default()
        };
        assert_eq!(ortho.resolve().unwrap().kind(), ProjectionKind::Orthographic);
    }

    #[test]
    fn ambiguous_or_partial_shapes_are_invalid() {
        let mixed = CameraFields {
            position: Some(DVec3::Z),
            look_at: Some(DVec3::ZERO),
            fov_height: Some(2.0),
            ..CameraFields::default()
        };
        assert!(matches!(mixed.resolve(), Err(SceneError::InvalidCamera(_))));

        let half_ortho = CameraFields {
            view_vector: Some(-DVec3::Z),
            look_at: Some(DVec3::ZERO),
            ..CameraFields::default()
        };
        assert!(matches!(half_ortho.resolve(), Err(SceneError::InvalidCamera(_))));

        assert!(matches!(
            CameraFields::default().resolve(),
            Err(SceneError::InvalidCamera(_))
        ));
    }
}
