use std::ops::{Deref, DerefMut};

use glam::Vec3;
use hecs::World;

use super::{Attenuation, HasAttenuation, PointLight};
use crate::error::{Error, Result};
use crate::uniforms::SpotLightUniform;

/// A point light restricted to a cone around `direction`.
///
/// Light is full strength inside `angle`, fades out towards `outer_angle`
/// and is zero beyond it. Both angles are half-angles in degrees.
///
/// Position, colors and linking come from the inner [`PointLight`], reached
/// through `Deref`:
///
/// ```
/// use vista::{SpotLight, Vec3, World};
///
/// let world = World::new();
/// let mut spot = SpotLight::new(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y);
/// spot.set_cone(12.5, 17.5)?;
/// assert_eq!(spot.position(&world), Vec3::new(0.0, 4.0, 0.0));
/// # Ok::<(), vista::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    light: PointLight,
    direction: Vec3,
    angle: f32,
    outer_angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            light: PointLight::default(),
            direction: Vec3::NEG_Y,
            angle: 18.5,
            outer_angle: 25.0,
        }
    }
}

impl SpotLight {
    /// A spot light at `position` shining along `direction`.
    ///
    /// A zero `direction` keeps the default, straight down.
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        let mut spot = Self {
            light: PointLight::new(position),
            ..Self::default()
        };
        spot.set_direction(direction);
        spot
    }

    pub fn with_cone(mut self, angle: f32, outer_angle: f32) -> Result<Self> {
        self.set_cone(angle, outer_angle)?;
        Ok(self)
    }

    pub fn with_light(mut self, light: PointLight) -> Self {
        self.light = light;
        self
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Points the cone along `direction`, normalized.
    ///
    /// Zero or non-finite vectors are ignored.
    pub fn set_direction(&mut self, direction: Vec3) {
        match direction.try_normalize() {
            Some(dir) => self.direction = dir,
            None => log::warn!("spot light: ignoring degenerate direction {direction}"),
        }
    }

    /// Aims the cone at `target`, resolving a linked position against `world`.
    pub fn point_at(&mut self, target: Vec3, world: &World) {
        let from = self.light.position(world);
        self.set_direction(target - from);
    }

    /// Inner and outer cone half-angles in degrees.
    pub fn cone(&self) -> (f32, f32) {
        (self.angle, self.outer_angle)
    }

    /// Sets the cone, requiring `0 < angle < outer_angle < 90`.
    ///
    /// On error the previous cone is kept.
    pub fn set_cone(&mut self, angle: f32, outer_angle: f32) -> Result<()> {
        if !(angle > 0.0 && angle < outer_angle && outer_angle < 90.0) {
            return Err(Error::InvalidCone {
                inner: angle,
                outer: outer_angle,
            });
        }
        self.angle = angle;
        self.outer_angle = outer_angle;
        Ok(())
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut PointLight {
        &mut self.light
    }

    /// Cone intensity for a point in `direction` from the light, in `[0, 1]`.
    pub fn cone_factor(&self, direction: Vec3) -> f32 {
        let Some(dir) = direction.try_normalize() else {
            return 0.0;
        };
        let theta = dir.dot(self.direction);
        let inner = self.angle.to_radians().cos();
        let outer = self.outer_angle.to_radians().cos();
        ((theta - outer) / (inner - outer)).clamp(0.0, 1.0)
    }

    pub fn uniform(&self, world: &World) -> SpotLightUniform {
        let point = self.light.uniform(world);
        SpotLightUniform {
            position: point.position,
            constant: point.constant,
            direction: self.direction.to_array(),
            linear: point.linear,
            diffuse: point.diffuse,
            quadratic: point.quadratic,
            specular: point.specular,
            cut_off: self.angle.to_radians().cos(),
            outer_cut_off: self.outer_angle.to_radians().cos(),
            _pad: [0.0; 3],
        }
    }
}

impl Deref for SpotLight {
    type Target = PointLight;

    fn deref(&self) -> &PointLight {
        &self.light
    }
}

impl DerefMut for SpotLight {
    fn deref_mut(&mut self) -> &mut PointLight {
        &mut self.light
    }
}

impl HasAttenuation for SpotLight {
    fn attenuation(&self) -> Attenuation {
        self.light.attenuation
    }

    fn set_attenuation(&mut self, attenuation: Attenuation) {
        self.light.attenuation = attenuation;
    }
}
