//! Lights for the Phong-style lighting model.
//!
//! - [`AmbientLight`]: a flat color added to every fragment
//! - [`PointLight`]: an omnidirectional light with distance attenuation
//! - [`SpotLight`]: a point light restricted to a cone
//!
//! # Linking a light to an object
//!
//! A point or spot light can follow a scene object instead of owning its
//! position. The light keeps the object's [`Entity`](hecs::Entity) and reads
//! the object's [`Transformable`](crate::Transformable) translation from the
//! [`World`](hecs::World) whenever it needs a position:
//!
//! ```
//! use vista::{PointLight, Transformable, Vec3, World};
//!
//! let mut world = World::new();
//! let lamp = world.spawn((Transformable::at(Vec3::new(1.0, 2.0, 3.0)),));
//!
//! let mut light = PointLight::default();
//! light.link_position(lamp, &world)?;
//!
//! world.get::<&mut Transformable>(lamp).unwrap().move_xyz(1.0, 0.0, 0.0);
//! assert_eq!(light.position(&world), Vec3::new(2.0, 2.0, 3.0));
//! # Ok::<(), vista::Error>(())
//! ```
//!
//! The link never owns the object. If the object is despawned, the light
//! falls back to the last position it observed and drops the link the next
//! time it is synced or edited.

mod ambient;
mod point;
mod spot;

pub use ambient::AmbientLight;
pub use point::{LightPosition, PointLight};
pub use spot::SpotLight;

/// Distance falloff `1 / (constant + linear * d + quadratic * d²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    /// Coefficients covering a range of roughly 50 units.
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// No falloff at all.
    pub const NONE: Attenuation = Attenuation::new(1.0, 0.0, 0.0);

    /// Intensity multiplier at `distance` from the light.
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Lights whose intensity falls off with distance.
pub trait HasAttenuation {
    fn attenuation(&self) -> Attenuation;

    fn set_attenuation(&mut self, attenuation: Attenuation);

    /// Intensity multiplier at `distance` from the light.
    fn falloff(&self, distance: f32) -> f32 {
        self.attenuation().factor(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_factor() {
        assert_eq!(Attenuation::NONE.factor(100.0), 1.0);

        let a = Attenuation::new(1.0, 0.5, 0.25);
        assert_eq!(a.factor(0.0), 1.0);
        assert_eq!(a.factor(2.0), 1.0 / 3.0);
    }

    #[test]
    fn default_attenuation_decreases_with_distance() {
        let a = Attenuation::default();
        assert!(a.factor(1.0) > a.factor(10.0));
        assert!(a.factor(10.0) > a.factor(50.0));
    }
}
