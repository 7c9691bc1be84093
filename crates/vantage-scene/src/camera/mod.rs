// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Immutable camera model.
//!
//! A [`Camera`] is a value: every operation returns a new instance and the
//! receiver is never modified. Near/far are derived from the bounding box on
//! each access (see [`compute_clipping_planes`]).
//!
//! Conventions:
//! - Right-handed world space, OpenGL-style normalized device coordinates
//!   (`z ∈ [-1, 1]`, `-1` on the near plane).
//! - Perspective field of view is vertical and in degrees.
//! - Orthographic cameras store a view vector; their position is
//!   `look_at - view_vector`.

mod clipping;
mod fields;
mod fly_to;
mod standard_view;

pub use clipping::{
    compute_clipping_planes, ClippingPlanes, BOUNDING_RADIUS_MARGIN, MIN_CLIP_DISTANCE,
    NEAR_FAR_RATIO, NEAR_PLANE_LIMIT,
};
pub use fields::CameraFields;
pub use fly_to::{FlyTo, FlyToOptions, FlyToTarget, SceneViewStateId};
pub use standard_view::StandardView;

use vantage_geom::vector::{any_orthogonal, rotate_direction, rotate_point_about};
use vantage_geom::{BoundingBox, DMat4, DVec3, EPSILON};

use crate::SceneError;

/// Default vertical field of view in degrees.
pub const DEFAULT_FOV_Y: f64 = 45.0;

/// Projection discriminant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    /// Objects farther away appear smaller.
    Perspective,
    /// Parallel projection.
    Orthographic,
}

/// Pose of a perspective camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveView {
    /// Eye position.
    pub position: DVec3,
    /// Point the camera looks at.
    pub look_at: DVec3,
    /// Up vector.
    pub up: DVec3,
    /// Vertical field of view in degrees.
    pub fov_y: f64,
}

/// Pose of an orthographic camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicView {
    /// Vector from the eye to `look_at`.
    pub view_vector: DVec3,
    /// Point the camera looks at.
    pub look_at: DVec3,
    /// Up vector.
    pub up: DVec3,
    /// Visible height in world units.
    pub fov_height: f64,
}

/// Tagged camera pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraView {
    /// Perspective projection.
    Perspective(PerspectiveView),
    /// Orthographic projection.
    Orthographic(OrthographicView),
}

impl CameraView {
    /// Projection discriminant.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        match self {
            CameraView::Perspective(_) => ProjectionKind::Perspective,
            CameraView::Orthographic(_) => ProjectionKind::Orthographic,
        }
    }
}

/// Partial camera update. Fields left `None` keep their current value.
///
/// Supplying a field that does not exist on the camera's variant
/// (`position`/`fov_y` on orthographic, `view_vector`/`fov_height` on
/// perspective) is rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraUpdate {
    /// Perspective eye position.
    pub position: Option<DVec3>,
    /// Look-at point.
    pub look_at: Option<DVec3>,
    /// Up vector.
    pub up: Option<DVec3>,
    /// Perspective vertical field of view (degrees).
    pub fov_y: Option<f64>,
    /// Orthographic view vector.
    pub view_vector: Option<DVec3>,
    /// Orthographic visible height.
    pub fov_height: Option<f64>,
    /// Viewport aspect ratio.
    pub aspect_ratio: Option<f64>,
    /// Bounding box used for clipping.
    pub bounding_box: Option<BoundingBox>,
}

/// Immutable camera: pose + aspect ratio + clipping bounds + pending fly-to.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view: CameraView,
    aspect_ratio: f64,
    bounding_box: BoundingBox,
    pending_fly_to: Option<Box<FlyTo>>,
}

impl Camera {
    /// Builds a camera, validating the pose and aspect ratio.
    pub fn new(
        view: CameraView,
        aspect_ratio: f64,
        bounding_box: BoundingBox,
    ) -> Result<Self, SceneError> {
        let camera = Self {
            view,
            aspect_ratio,
            bounding_box,
            pending_fly_to: None,
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Builds a camera from loosely-typed fields (see [`CameraFields`]).
    pub fn from_fields(
        fields: &CameraFields,
        aspect_ratio: f64,
        bounding_box: BoundingBox,
    ) -> Result<Self, SceneError> {
        Self::new(fields.resolve()?, aspect_ratio, bounding_box)
    }

    /// Perspective camera at `position` looking at `look_at` with +Y up.
    pub fn perspective(
        position: DVec3,
        look_at: DVec3,
        aspect_ratio: f64,
        bounding_box: BoundingBox,
    ) -> Result<Self, SceneError> {
        Self::new(
            CameraView::Perspective(PerspectiveView {
                position,
                look_at,
                up: DVec3::Y,
                fov_y: DEFAULT_FOV_Y,
            }),
            aspect_ratio,
            bounding_box,
        )
    }

    /// Orthographic camera with +Y up.
    pub fn orthographic(
        view_vector: DVec3,
        look_at: DVec3,
        fov_height: f64,
        aspect_ratio: f64,
        bounding_box: BoundingBox,
    ) -> Result<Self, SceneError> {
        Self::new(
            CameraView::Orthographic(OrthographicView {
                view_vector,
                look_at,
                up: DVec3::Y,
                fov_height,
            }),
            aspect_ratio,
            bounding_box,
        )
    }

    fn validate(&self) -> Result<(), SceneError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(SceneError::InvalidArgument(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        let finite = |v: DVec3| v.is_finite();
        match &self.view {
            CameraView::Perspective(p) => {
                if !(finite(p.position) && finite(p.look_at) && finite(p.up)) {
                    return Err(SceneError::InvalidArgument(
                        "camera vectors must be finite".into(),
                    ));
                }
                if (p.look_at - p.position).length() < EPSILON {
                    return Err(SceneError::InvalidArgument(
                        "position and look_at coincide".into(),
                    ));
                }
                if !(p.fov_y > 0.0 && p.fov_y < 180.0) {
                    return Err(SceneError::InvalidArgument(format!(
                        "fov_y must be in (0, 180) degrees, got {}",
                        p.fov_y
                    )));
                }
            }
            CameraView::Orthographic(o) => {
                if !(finite(o.view_vector) && finite(o.look_at) && finite(o.up)) {
                    return Err(SceneError::InvalidArgument(
                        "camera vectors must be finite".into(),
                    ));
                }
                if o.view_vector.length() < EPSILON {
                    return Err(SceneError::InvalidArgument("view_vector is zero".into()));
                }
                if !(o.fov_height.is_finite() && o.fov_height > 0.0) {
                    return Err(SceneError::InvalidArgument(format!(
                        "fov_height must be positive, got {}",
                        o.fov_height
                    )));
                }
            }
        }
        Ok(())
    }

    fn with_view(&self, view: CameraView) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    // --- accessors -------------------------------------------------------

    /// Tagged pose.
    #[must_use]
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    /// Projection discriminant.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.view.kind()
    }

    /// `true` for perspective cameras.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        matches!(self.view, CameraView::Perspective(_))
    }

    /// `true` for orthographic cameras.
    #[must_use]
    pub fn is_orthographic(&self) -> bool {
        matches!(self.view, CameraView::Orthographic(_))
    }

    /// Viewport aspect ratio (`width / height`).
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Bounding box used to derive clipping planes.
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Eye position. Orthographic: `look_at - view_vector`.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        match &self.view {
            CameraView::Perspective(p) => p.position,
            CameraView::Orthographic(o) => o.look_at - o.view_vector,
        }
    }

    /// Look-at point.
    #[must_use]
    pub fn look_at(&self) -> DVec3 {
        match &self.view {
            CameraView::Perspective(p) => p.look_at,
            CameraView::Orthographic(o) => o.look_at,
        }
    }

    /// Up vector as stored.
    #[must_use]
    pub fn up(&self) -> DVec3 {
        match &self.view {
            CameraView::Perspective(p) => p.up,
            CameraView::Orthographic(o) => o.up,
        }
    }

    /// Vector from the eye to the look-at point.
    #[must_use]
    pub fn view_vector(&self) -> DVec3 {
        match &self.view {
            CameraView::Perspective(p) => p.look_at - p.position,
            CameraView::Orthographic(o) => o.view_vector,
        }
    }

    /// Unit view direction.
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        self.view_vector().try_normalize().unwrap_or(DVec3::NEG_Z)
    }

    /// Perspective field of view, if any.
    #[must_use]
    pub fn fov_y(&self) -> Option<f64> {
        match &self.view {
            CameraView::Perspective(p) => Some(p.fov_y),
            CameraView::Orthographic(_) => None,
        }
    }

    /// Orthographic visible height, if any.
    #[must_use]
    pub fn fov_height(&self) -> Option<f64> {
        match &self.view {
            CameraView::Perspective(_) => None,
            CameraView::Orthographic(o) => Some(o.fov_height),
        }
    }

    /// Transition queued by [`Camera::fly_to`], consumed by the next render.
    #[must_use]
    pub fn pending_fly_to(&self) -> Option<&FlyTo> {
        self.pending_fly_to.as_deref()
    }

    /// Copy of this camera with no queued transition.
    #[must_use]
    pub fn without_pending_fly_to(&self) -> Self {
        Self {
            pending_fly_to: None,
            ..self.clone()
        }
    }

    // --- derived geometry ------------------------------------------------

    /// Near/far, recomputed from the bounding box.
    #[must_use]
    pub fn clipping_planes(&self) -> ClippingPlanes {
        compute_clipping_planes(&self.bounding_box, self.position(), self.view_vector())
    }

    /// Near plane distance.
    #[must_use]
    pub fn near(&self) -> f64 {
        self.clipping_planes().near
    }

    /// Far plane distance.
    #[must_use]
    pub fn far(&self) -> f64 {
        self.clipping_planes().far
    }

    /// Distance from the eye to the bounding box center along the view direction.
    #[must_use]
    pub fn signed_distance_to_bounding_box_center(&self) -> f64 {
        (self.bounding_box.center() - self.position()).dot(self.direction())
    }

    /// Straight-line distance from the eye to the bounding box center.
    #[must_use]
    pub fn distance_to_bounding_box_center(&self) -> f64 {
        (self.bounding_box.center() - self.position()).length()
    }

    /// `true` when `point` lies in front of the eye but before the near plane,
    /// or behind the eye altogether.
    #[must_use]
    pub fn is_point_behind_near(&self, point: DVec3) -> bool {
        (point - self.position()).dot(self.direction()) < self.near()
    }

    fn safe_up(&self) -> DVec3 {
        let dir = self.direction();
        let up = self.up();
        if up.cross(dir).length() < EPSILON {
            any_orthogonal(dir)
        } else {
            up
        }
    }

    /// World → camera transform.
    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position(), self.look_at(), self.safe_up())
    }

    /// Camera → clip transform.
    #[must_use]
    pub fn projection_matrix(&self) -> DMat4 {
        let ClippingPlanes { near, far } = self.clipping_planes();
        match &self.view {
            CameraView::Perspective(p) => {
                DMat4::perspective_rh_gl(p.fov_y.to_radians(), self.aspect_ratio, near, far)
            }
            CameraView::Orthographic(o) => {
                let half_h = o.fov_height * 0.5;
                let half_w = half_h * self.aspect_ratio;
                DMat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }

    /// `projection * view`.
    #[must_use]
    pub fn projection_view_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse of [`Camera::projection_view_matrix`].
    #[must_use]
    pub fn inverse_projection_view_matrix(&self) -> DMat4 {
        self.projection_view_matrix().inverse()
    }

    // --- immutable updates -----------------------------------------------

    /// Returns a new camera merging the provided fields.
    pub fn update(&self, update: &CameraUpdate) -> Result<Self, SceneError> {
        let view = match self.view {
            CameraView::Perspective(p) => {
                if update.view_vector.is_some() || update.fov_height.is_some() {
                    return Err(SceneError::InvalidArgument(
                        "view_vector/fov_height do not apply to a perspective camera".into(),
                    ));
                }
                CameraView::Perspective(PerspectiveView {
                    position: update.position.unwrap_or(p.position),
                    look_at: update.look_at.unwrap_or(p.look_at),
                    up: update.up.unwrap_or(p.up),
                    fov_y: update.fov_y.unwrap_or(p.fov_y),
                })
            }
            CameraView::Orthographic(o) => {
                if update.position.is_some() || update.fov_y.is_some() {
                    return Err(SceneError::InvalidArgument(
                        "position/fov_y do not apply to an orthographic camera".into(),
                    ));
                }
                CameraView::Orthographic(OrthographicView {
                    view_vector: update.view_vector.unwrap_or(o.view_vector),
                    look_at: update.look_at.unwrap_or(o.look_at),
                    up: update.up.unwrap_or(o.up),
                    fov_height: update.fov_height.unwrap_or(o.fov_height),
                })
            }
        };
        let camera = Self {
            view,
            aspect_ratio: update.aspect_ratio.unwrap_or(self.aspect_ratio),
            bounding_box: update.bounding_box.unwrap_or(self.bounding_box),
            pending_fly_to: self.pending_fly_to.clone(),
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Copy with a new aspect ratio.
    pub fn with_aspect_ratio(&self, aspect_ratio: f64) -> Result<Self, SceneError> {
        self.update(&CameraUpdate {
            aspect_ratio: Some(aspect_ratio),
            ..CameraUpdate::default()
        })
    }

    /// Copy with a new clipping bounding box.
    #[must_use]
    pub fn with_bounding_box(&self, bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            ..self.clone()
        }
    }

    /// Translates the eye and look-at point by `delta`.
    #[must_use]
    pub fn move_by(&self, delta: DVec3) -> Self {
        let view = match self.view {
            CameraView::Perspective(p) => CameraView::Perspective(PerspectiveView {
                position: p.position + delta,
                look_at: p.look_at + delta,
                ..p
            }),
            CameraView::Orthographic(o) => CameraView::Orthographic(OrthographicView {
                look_at: o.look_at + delta,
                ..o
            }),
        };
        self.with_view(view)
    }

    /// Rotates eye, look-at and up by `angle` radians about the line through
    /// `point` along `axis`.
    #[must_use]
    pub fn rotate_around_axis_at_point(&self, angle: f64, point: DVec3, axis: DVec3) -> Self {
        let view = match self.view {
            CameraView::Perspective(p) => CameraView::Perspective(PerspectiveView {
                position: rotate_point_about(p.position, point, axis, angle),
                look_at: rotate_point_about(p.look_at, point, axis, angle),
                up: rotate_direction(p.up, axis, angle),
                ..p
            }),
            CameraView::Orthographic(o) => CameraView::Orthographic(OrthographicView {
                view_vector: rotate_direction(o.view_vector, axis, angle),
                look_at: rotate_point_about(o.look_at, point, axis, angle),
                up: rotate_direction(o.up, axis, angle),
                ..o
            }),
        };
        self.with_view(view)
    }

    /// Orbits about the look-at point.
    #[must_use]
    pub fn rotate_around_axis(&self, angle: f64, axis: DVec3) -> Self {
        self.rotate_around_axis_at_point(angle, self.look_at(), axis)
    }

    /// Keeps the view direction and moves so `bounding_box` fills the view.
    ///
    /// The look-at point moves to the box center. Perspective cameras back off
    /// to `radius / tan(fov_y / 2)` (the tangent scaled by the aspect ratio
    /// when the viewport is taller than wide); orthographic cameras resize
    /// `fov_height` to the sphere's diameter instead.
    #[must_use]
    pub fn fit_to_bounding_box(&self, bounding_box: &BoundingBox) -> Self {
        let center = bounding_box.center();
        let radius = BOUNDING_RADIUS_MARGIN * bounding_box.radius();
        let direction = self.direction();
        let view = match self.view {
            CameraView::Perspective(p) => {
                let mut h_over_d = (p.fov_y.to_radians() * 0.5).tan();
                if self.aspect_ratio < 1.0 {
                    h_over_d *= self.aspect_ratio;
                }
                let distance = (radius / h_over_d).abs();
                CameraView::Perspective(PerspectiveView {
                    position: center - direction * distance,
                    look_at: center,
                    ..p
                })
            }
            CameraView::Orthographic(o) => {
                let mut fov_height = radius * 2.0;
                if self.aspect_ratio < 1.0 {
                    fov_height /= self.aspect_ratio;
                }
                CameraView::Orthographic(OrthographicView {
                    view_vector: direction * radius,
                    look_at: center,
                    fov_height,
                    ..o
                })
            }
        };
        self.with_view(view)
    }

    /// Re-orients to a preset and fits the camera's bounding box.
    #[must_use]
    pub fn standard_view(&self, standard: StandardView) -> Self {
        let length = self.view_vector().length();
        let view_vector = -standard.eye_direction() * length;
        let view = match self.view {
            CameraView::Perspective(p) => CameraView::Perspective(PerspectiveView {
                position: p.look_at - view_vector,
                up: standard.up(),
                ..p
            }),
            CameraView::Orthographic(o) => CameraView::Orthographic(OrthographicView {
                view_vector,
                up: standard.up(),
                ..o
            }),
        };
        self.with_view(view).fit_to_bounding_box(&self.bounding_box)
    }

    /// Queues a one-shot transition. The camera's own pose is unchanged; the
    /// next render of the returned camera issues the animated request.
    pub fn fly_to(&self, options: FlyToOptions) -> Result<Self, SceneError> {
        let target = options.target.ok_or_else(|| {
            SceneError::InvalidArgument("fly_to requires a target".into())
        })?;
        Ok(Self {
            pending_fly_to: Some(Box::new(FlyTo {
                target,
                animation: options.animation,
            })),
            ..self.clone()
        })
    }

    /// Orthographic camera showing the same height at the look-at distance.
    #[must_use]
    pub fn to_orthographic(&self) -> Self {
        match self.view {
            CameraView::Orthographic(_) => self.clone(),
            CameraView::Perspective(p) => {
                let view_vector = p.look_at - p.position;
                let fov_height = 2.0 * view_vector.length() * (p.fov_y.to_radians() * 0.5).tan();
                self.with_view(CameraView::Orthographic(OrthographicView {
                    view_vector,
                    look_at: p.look_at,
                    up: p.up,
                    fov_height,
                }))
            }
        }
    }

    /// Perspective camera (default field of view) showing the same height at
    /// the look-at distance.
    #[must_use]
    pub fn to_perspective(&self) -> Self {
        match self.view {
            CameraView::Perspective(_) => self.clone(),
            CameraView::Orthographic(o) => {
                let fov_y = DEFAULT_FOV_Y;
                let distance = o.fov_height * 0.5 / (fov_y.to_radians() * 0.5).tan();
                let direction = o.view_vector.try_normalize().unwrap_or(DVec3::NEG_Z);
                self.with_view(CameraView::Perspective(PerspectiveView {
                    position: o.look_at - direction * distance,
                    look_at: o.look_at,
                    up: o.up,
                    fov_y,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    fn perspective() -> Camera {
        Camera::perspective(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 1.0, unit_box()).unwrap()
    }

    fn orthographic() -> Camera {
        Camera::orthographic(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO, 4.0, 1.0, unit_box())
            .unwrap()
    }

    #[test]
    fn update_returns_new_instance() {
        let camera = perspective();
        let moved = camera
            .update(&CameraUpdate {
                position: Some(DVec3::new(0.0, 0.0, 10.0)),
                ..CameraUpdate::default()
            })
            .unwrap();
        assert_eq!(camera.position(), DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(moved.position(), DVec3::new(0.0, 0.0, 10.0));
        assert_eq!(moved.look_at(), DVec3::ZERO);
    }

    #[test]
    fn update_rejects_fields_of_other_variant() {
        let err = perspective()
            .update(&CameraUpdate {
                fov_height: Some(3.0),
                ..CameraUpdate::default()
            })
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidArgument(_)));
        let err = orthographic()
            .update(&CameraUpdate {
                position: Some(DVec3::ONE),
                ..CameraUpdate::default()
            })
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidArgument(_)));
    }

    #[test]
    fn orthographic_position_is_derived() {
        assert_eq!(orthographic().position(), DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(orthographic().direction(), DVec3::NEG_Z);
    }

    #[test]
    fn near_far_follow_the_camera() {
        let camera = perspective();
        let far_before = camera.far();
        let moved = camera.move_by(DVec3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(moved.far() - far_before, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn rotate_quarter_turn_about_y() {
        let rotated = perspective().rotate_around_axis(FRAC_PI_2, DVec3::Y);
        assert_relative_eq!(rotated.position().x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.position().z, 0.0, epsilon = 1e-9);
        assert_eq!(rotated.look_at(), DVec3::ZERO);
        assert_relative_eq!(rotated.up().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn fit_to_bounding_box_uses_tangent_of_half_fov() {
        let camera = perspective();
        let target = BoundingBox::new(DVec3::new(9.0, 9.0, 9.0), DVec3::new(11.0, 11.0, 11.0));
        let fitted = camera.fit_to_bounding_box(&target);
        let expected = 1.1 * 3f64.sqrt() / (22.5f64.to_radians()).tan();
        assert_eq!(fitted.look_at(), DVec3::splat(10.0));
        assert_relative_eq!(
            (fitted.position() - fitted.look_at()).length(),
            expected,
            epsilon = 1e-9
        );
        assert_eq!(fitted.direction(), camera.direction());
    }

    #[test]
    fn fit_in_portrait_backs_off_further() {
        let wide = perspective().fit_to_bounding_box(&unit_box());
        let tall = perspective()
            .with_aspect_ratio(0.5)
            .unwrap()
            .fit_to_bounding_box(&unit_box());
        let wide_d = wide.view_vector().length();
        let tall_d = tall.view_vector().length();
        assert_relative_eq!(tall_d, wide_d * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn standard_view_top_looks_down() {
        let top = perspective().standard_view(StandardView::Top);
        assert_relative_eq!(top.direction().y, -1.0, epsilon = 1e-12);
        assert_eq!(top.up(), DVec3::NEG_Z);
        assert_eq!(top.look_at(), DVec3::ZERO);
    }

    #[test]
    fn fly_to_requires_target_and_leaves_pose() {
        let camera = perspective();
        let err = camera.fly_to(FlyToOptions::new()).unwrap_err();
        assert!(matches!(err, SceneError::InvalidArgument(_)));

        let queued = camera.fly_to(FlyToOptions::new().item_id("item-1")).unwrap();
        assert_eq!(queued.position(), camera.position());
        assert!(camera.pending_fly_to().is_none());
        assert_eq!(
            queued.pending_fly_to().map(|f| &f.target),
            Some(&FlyToTarget::ItemId("item-1".into()))
        );
        assert!(queued.without_pending_fly_to().pending_fly_to().is_none());
    }

    #[test]
    fn projection_conversions_preserve_visible_height() {
        let persp = perspective();
        let ortho = persp.to_orthographic();
        let expected = 2.0 * 5.0 * (22.5f64.to_radians()).tan();
        assert_relative_eq!(ortho.fov_height().unwrap(), expected, epsilon = 1e-9);
        let back = ortho.to_perspective();
        assert_relative_eq!(back.position().z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_poses_are_rejected() {
        assert!(Camera::perspective(DVec3::ZERO, DVec3::ZERO, 1.0, unit_box()).is_err());
        assert!(Camera::perspective(DVec3::Z, DVec3::ZERO, 0.0, unit_box()).is_err());
        assert!(Camera::orthographic(DVec3::ZERO, DVec3::ZERO, 1.0, 1.0, unit_box()).is_err());
    }

    #[test]
    fn up_parallel_to_view_still_builds_a_view_matrix() {
        let camera = Camera::perspective(DVec3::new(0.0, 5.0, 0.0), DVec3::ZERO, 1.0, unit_box())
            .unwrap();
        assert!(camera.view_matrix().is_finite());
    }
}
