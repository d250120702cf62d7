//! A first-person fly controller for [`Camera`].
//!
//! [`FlyController`] turns one frame of abstract input into camera motion:
//! look deltas pan and tilt the view, movement axes walk along the view and
//! climb along world up. It knows nothing about keyboards or mice; the host
//! fills a [`FlyInput`] from whatever windowing layer it uses.
//!
//! # Example
//!
//! ```
//! use vista::{Camera, CameraConfig, FlyController, FlyInput, Vec2};
//!
//! let mut camera = Camera::with_aspect(CameraConfig::new().aspect_ratio(1.0))?;
//! let fly = FlyController::default();
//!
//! // W held, mouse moved 12 pixels right
//! let input = FlyInput::new().forward(1.0).look(Vec2::new(12.0, 0.0));
//! fly.update(&mut camera, &input, 1.0 / 60.0);
//! # Ok::<(), vista::Error>(())
//! ```

use glam::{Vec2, Vec3};

use crate::camera::{Camera, WORLD_UP};

/// Tunables for [`FlyController`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlyConfig {
    /// Movement speed in units per second.
    pub speed: f32,
    /// Degrees turned per unit of look delta (usually pixels).
    pub sensitivity: f32,
    /// Flip vertical look, for "airplane" controls.
    pub invert_y: bool,
}

impl Default for FlyConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            sensitivity: 0.1,
            invert_y: false,
        }
    }
}

impl FlyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn invert_y(mut self, invert: bool) -> Self {
        self.invert_y = invert;
        self
    }
}

/// One frame of fly input.
///
/// Movement axes are in `[-1, 1]`: positive `forward` moves along the view,
/// positive `sideways` strafes right, positive `upwards` climbs. `look` is the
/// pointer delta since the last frame with +y meaning "look up".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlyInput {
    pub forward: f32,
    pub sideways: f32,
    pub upwards: f32,
    pub look: Vec2,
}

impl FlyInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forward(mut self, amount: f32) -> Self {
        self.forward = amount;
        self
    }

    pub fn sideways(mut self, amount: f32) -> Self {
        self.sideways = amount;
        self
    }

    pub fn upwards(mut self, amount: f32) -> Self {
        self.upwards = amount;
        self
    }

    pub fn look(mut self, delta: Vec2) -> Self {
        self.look = delta;
        self
    }

    /// Whether this input would leave the camera untouched.
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0
            && self.sideways == 0.0
            && self.upwards == 0.0
            && self.look == Vec2::ZERO
    }
}

/// Drives a [`Camera`] with first-person fly controls.
#[derive(Clone, Debug)]
pub struct FlyController {
    pub config: FlyConfig,
    /// When false, [`FlyController::update`] does nothing.
    pub enabled: bool,
}

impl FlyController {
    pub fn new(config: FlyConfig) -> Self {
        Self {
            config,
            enabled: true,
        }
    }

    /// Applies one frame of `input` to `camera`, `dt` seconds after the last.
    pub fn update(&self, camera: &mut Camera, input: &FlyInput, dt: f32) {
        if !self.enabled || input.is_idle() {
            return;
        }

        let look = input.look * self.config.sensitivity;
        let tilt = if self.config.invert_y { -look.y } else { look.y };
        if look.x != 0.0 {
            camera.pan(-look.x);
        }
        if tilt != 0.0 {
            camera.tilt(tilt);
        }

        let step = self.config.speed * dt;
        camera.forward(input.forward.clamp(-1.0, 1.0) * step);
        camera.sideways(input.sideways.clamp(-1.0, 1.0) * step);
        camera.move_by(WORLD_UP * input.upwards.clamp(-1.0, 1.0) * step);
    }
}

impl Default for FlyController {
    fn default() -> Self {
        Self::new(FlyConfig::default())
    }
}

/// Direction `camera` would move for a given input, without moving it.
///
/// Useful for collision checks before committing a step.
pub fn fly_direction(camera: &Camera, input: &FlyInput) -> Vec3 {
    camera.front() * input.forward.clamp(-1.0, 1.0)
        + camera.right() * input.sideways.clamp(-1.0, 1.0)
        + WORLD_UP * input.upwards.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;

    fn camera() -> Camera {
        Camera::with_aspect(CameraConfig::new().aspect_ratio(1.0)).unwrap()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn forward_moves_along_front_at_speed() {
        let mut cam = camera();
        let fly = FlyController::new(FlyConfig::new().speed(2.0));
        fly.update(&mut cam, &FlyInput::new().forward(1.0), 0.5);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn upwards_uses_world_up_even_when_tilted() {
        let mut cam = camera();
        cam.tilt(30.0);
        let fly = FlyController::new(FlyConfig::new().speed(1.0));
        fly.update(&mut cam, &FlyInput::new().upwards(1.0), 1.0);
        assert!(approx(cam.position(), Vec3::Y));
    }

    #[test]
    fn look_right_pans_right() {
        let mut cam = camera();
        let fly = FlyController::new(FlyConfig::new().sensitivity(1.0));
        fly.update(&mut cam, &FlyInput::new().look(Vec2::new(90.0, 0.0)), 0.016);
        assert!(approx(cam.front(), Vec3::X));
        assert_eq!(cam.position(), Vec3::ZERO);
    }

    #[test]
    fn look_up_tilts_up() {
        let mut cam = camera();
        let fly = FlyController::default();
        fly.update(&mut cam, &FlyInput::new().look(Vec2::new(0.0, 100.0)), 0.016);
        assert!(cam.front().y > 0.0);

        let mut inverted = camera();
        let fly = FlyController::new(FlyConfig::new().invert_y(true));
        fly.update(&mut inverted, &FlyInput::new().look(Vec2::new(0.0, 100.0)), 0.016);
        assert!(inverted.front().y < 0.0);
    }

    #[test]
    fn axes_are_clamped() {
        let mut cam = camera();
        let fly = FlyController::new(FlyConfig::new().speed(1.0));
        fly.update(&mut cam, &FlyInput::new().sideways(5.0), 1.0);
        assert!(approx(cam.position(), Vec3::X));
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut cam = camera();
        let mut fly = FlyController::default();
        fly.enabled = false;
        fly.update(&mut cam, &FlyInput::new().forward(1.0).look(Vec2::ONE), 1.0);
        assert_eq!(cam.position(), Vec3::ZERO);
        assert!(approx(cam.front(), Vec3::NEG_Z));
    }

    #[test]
    fn direction_preview_matches_basis() {
        let cam = camera();
        let dir = fly_direction(&cam, &FlyInput::new().forward(1.0).sideways(-1.0));
        assert!(approx(dir, Vec3::new(-1.0, 0.0, -1.0)));
    }
}
