//! A perspective camera with look-at and first-person controls.
//!
//! [`Camera`] wraps a [`Transformable`] pose. Its look direction is derived
//! from the pose orientation, which maps local -Z to `front`, +Y to `up` and
//! +X to `right`. Interaction comes in two flavours:
//!
//! - **Look-at**: [`Camera::look_at`] aims the camera at a point or at
//!   another posed object, keeping world +Y as the up reference.
//! - **First person**: [`Camera::pan`], [`Camera::tilt`] and [`Camera::roll`]
//!   turn the view, [`Camera::forward`], [`Camera::sideways`] and
//!   [`Camera::upwards`] move along it.
//!
//! # Example
//!
//! ```
//! use vista::{Camera, CameraConfig, Vec3};
//!
//! let mut camera = Camera::with_aspect(
//!     CameraConfig::new().fov(60.0).aspect_ratio(16.0 / 9.0).clip_planes(0.1, 100.0),
//! )?;
//! camera.set_position(Vec3::new(0.0, 2.0, 8.0));
//! camera.look_at(Vec3::ZERO);
//!
//! // Mouse look and WASD-style movement, once per frame
//! camera.pan(-1.5);
//! camera.tilt(0.5);
//! camera.forward(0.1);
//!
//! let view = camera.view_matrix();
//! let projection = camera.projection();
//! # let _ = (view, projection);
//! # Ok::<(), vista::Error>(())
//! ```
//!
//! # Tilt clamp
//!
//! Tilting stops just short of the poles: the camera's up vector never drops
//! below a `y` of [`MIN_UP_Y`]. Letting it cross zero would turn the camera
//! upside down and invert every subsequent pan.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::error::{Error, Result};
use crate::transformable::{HasPose, Transformable};
use crate::uniforms::CameraUniforms;

/// World up reference for look-at and panning.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Smallest `y` component the camera's up vector may reach while tilting.
pub const MIN_UP_Y: f32 = 0.01;

/// Largest single rotation step used when applying a tilt.
const MAX_TILT_STEP: f32 = 45.0;

/// Source of the current framebuffer size.
///
/// The camera queries it once, at construction, when no aspect ratio is
/// configured. Window and surface wrappers implement it; `(width, height)`
/// tuples do too.
pub trait Viewport {
    fn size(&self) -> (u32, u32);
}

impl Viewport for (u32, u32) {
    fn size(&self) -> (u32, u32) {
        *self
    }
}

/// Projection settings for a [`Camera`].
///
/// An `aspect_ratio` of `0.0` means "ask the viewport".
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect_ratio: 0.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees;
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set near and far clipping planes.
    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.z_near = near;
        self.z_far = far;
        self
    }
}

/// A perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pose: Transformable,
    fov: f32,
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera at the origin looking down -Z.
    ///
    /// When `config.aspect_ratio` is `0.0` the aspect ratio is taken from
    /// `viewport`; a viewport with a zero dimension is rejected.
    pub fn new(config: CameraConfig, viewport: &impl Viewport) -> Result<Self> {
        let mut config = config;
        if config.aspect_ratio == 0.0 {
            config.aspect_ratio = aspect_from_size(viewport.size())?;
        }
        Self::with_aspect(config)
    }

    /// Creates a camera from a config with an explicit aspect ratio.
    pub fn with_aspect(config: CameraConfig) -> Result<Self> {
        validate_fov(config.fov)?;
        validate_aspect(config.aspect_ratio)?;
        validate_clip_planes(config.z_near, config.z_far)?;

        log::debug!(
            "camera: fov={} aspect={} near={} far={}",
            config.fov,
            config.aspect_ratio,
            config.z_near,
            config.z_far
        );

        let mut camera = Self {
            pose: Transformable::new(),
            fov: config.fov,
            aspect_ratio: config.aspect_ratio,
            z_near: config.z_near,
            z_far: config.z_far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        Ok(camera)
    }

    /// The current projection settings.
    pub fn config(&self) -> CameraConfig {
        CameraConfig {
            fov: self.fov,
            aspect_ratio: self.aspect_ratio,
            z_near: self.z_near,
            z_far: self.z_far,
        }
    }

    // Position

    pub fn position(&self) -> Vec3 {
        self.pose.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.pose.set_position(position);
    }

    /// Offsets the camera in world space.
    pub fn move_by(&mut self, delta: Vec3) {
        self.pose.move_by(delta);
    }

    /// Moves along the look direction.
    pub fn forward(&mut self, amount: f32) {
        self.pose.move_by(self.front() * amount);
    }

    /// Strafes along the right vector.
    pub fn sideways(&mut self, amount: f32) {
        self.pose.move_by(self.right() * amount);
    }

    /// Moves along the camera's own up vector.
    pub fn upwards(&mut self, amount: f32) {
        self.pose.move_by(self.up() * amount);
    }

    // Orientation

    pub fn front(&self) -> Vec3 {
        self.pose.orientation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.pose.orientation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.pose.orientation() * Vec3::Y
    }

    /// Aims the camera at `target`.
    ///
    /// Up is derived from world +Y, so this also removes any roll. Targets at
    /// the eye position or straight above/below it have no usable basis and
    /// leave the camera unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(front) = (target - self.position()).try_normalize() else {
            log::warn!("camera: look_at target {target} coincides with the eye");
            return;
        };
        let right = front.cross(WORLD_UP);
        if right.length_squared() < 1e-8 {
            log::warn!("camera: look_at target {target} is straight above or below the eye");
            return;
        }
        let right = right.normalize();
        let up = right.cross(front).normalize();
        self.set_basis(front, right, up);
    }

    /// Aims the camera at another posed object.
    pub fn look_at_pose(&mut self, target: &impl HasPose) {
        self.look_at(target.world_position());
    }

    /// Turns the view `angle` degrees about world up. Positive pans left.
    pub fn pan(&mut self, angle: f32) {
        let delta = Quat::from_axis_angle(WORLD_UP, angle.to_radians());
        self.pose
            .set_orientation((delta * self.pose.orientation()).normalize());
    }

    /// Pitches the view `angle` degrees about the right vector. Positive
    /// looks up.
    ///
    /// The result is clamped so `up.y` stays at or above [`MIN_UP_Y`].
    pub fn tilt(&mut self, angle: f32) {
        // A half turn in one direction always ends on the clamp.
        let angle = angle.clamp(-180.0, 180.0);
        // Each step stays well under a half turn, so a clamped up vector keeps
        // its horizontal heading.
        let steps = (angle.abs() / MAX_TILT_STEP).ceil().max(1.0) as u32;
        let step = angle / steps as f32;
        for _ in 0..steps {
            self.tilt_step(step);
        }
    }

    fn tilt_step(&mut self, angle: f32) {
        let right = self.right();
        let delta = Quat::from_axis_angle(right, angle.to_radians());
        let orientation = (delta * self.pose.orientation()).normalize();

        let up = orientation * Vec3::Y;
        if up.y >= MIN_UP_Y {
            self.pose.set_orientation(orientation);
            return;
        }

        let heading = Vec3::new(up.x, 0.0, up.z).normalize_or_zero();
        let up = (heading * (1.0 - MIN_UP_Y * MIN_UP_Y).sqrt() + Vec3::Y * MIN_UP_Y).normalize();
        let front = up.cross(right).normalize();
        let right = front.cross(up).normalize();
        self.set_basis(front, right, up);
    }

    /// Rolls the view `angle` degrees about the look direction.
    pub fn roll(&mut self, angle: f32) {
        let delta = Quat::from_axis_angle(self.front(), angle.to_radians());
        self.pose
            .set_orientation((delta * self.pose.orientation()).normalize());
    }

    /// Stores an orthonormal right-handed basis as the pose orientation.
    fn set_basis(&mut self, front: Vec3, right: Vec3, up: Vec3) {
        let basis = Mat3::from_cols(right, up, -front);
        self.pose.set_orientation(Quat::from_mat3(&basis).normalize());
    }

    // Matrices

    /// World-to-view transform, recomputed on every call.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.position();
        Mat4::look_at_rh(eye, eye + self.front(), self.up())
    }

    /// View-to-clip transform (OpenGL depth range), cached between changes
    /// to the projection settings.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Camera uniform block for this frame.
    pub fn uniforms(&self) -> CameraUniforms {
        let view = self.view_matrix();
        CameraUniforms {
            view_proj: (self.projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: self.projection.to_cols_array_2d(),
            camera_pos: self.position().to_array(),
            _pad: 0.0,
        }
    }

    // Projection settings

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.z_near, self.z_far)
    }

    /// Sets the vertical field of view in degrees.
    pub fn set_fov(&mut self, fov: f32) -> Result<()> {
        validate_fov(fov)?;
        self.fov = fov;
        self.update_projection();
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        validate_aspect(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        self.update_projection();
        Ok(())
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<()> {
        validate_clip_planes(near, far)?;
        self.z_near = near;
        self.z_far = far;
        self.update_projection();
        Ok(())
    }

    /// Adopts the aspect ratio of a resized framebuffer.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let aspect = aspect_from_size((width, height))?;
        self.set_aspect_ratio(aspect)
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.z_near,
            self.z_far,
        );
    }
}

impl HasPose for Camera {
    fn pose(&self) -> &Transformable {
        &self.pose
    }

    fn pose_mut(&mut self) -> &mut Transformable {
        &mut self.pose
    }
}

fn aspect_from_size((width, height): (u32, u32)) -> Result<f32> {
    if width == 0 || height == 0 {
        return Err(Error::DegenerateViewport { width, height });
    }
    Ok(width as f32 / height as f32)
}

fn validate_fov(fov: f32) -> Result<()> {
    if fov.is_finite() && fov > 0.0 && fov < 180.0 {
        Ok(())
    } else {
        Err(Error::InvalidFov(fov))
    }
}

fn validate_aspect(aspect_ratio: f32) -> Result<()> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAspectRatio(aspect_ratio))
    }
}

fn validate_clip_planes(near: f32, far: f32) -> Result<()> {
    if near.is_finite() && far.is_finite() && near > 0.0 && near < far {
        Ok(())
    } else {
        Err(Error::InvalidClipPlanes { near, far })
    }
}
