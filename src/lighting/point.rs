use glam::Vec3;
use hecs::{Entity, World};

use super::{Attenuation, HasAttenuation};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::transformable::Transformable;
use crate::uniforms::PointLightUniform;

/// Where a light takes its position from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightPosition {
    /// The light owns its position.
    Owned(Vec3),
    /// The light follows the translation of `entity`'s [`Transformable`].
    ///
    /// `last_known` is the most recent translation observed, used once the
    /// entity is gone.
    Linked { entity: Entity, last_known: Vec3 },
}

/// An omnidirectional light with distance attenuation.
///
/// Clones share a link target but nothing else; since the link does not own
/// the target, any number of lights can follow the same object.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub diffuse: Color,
    pub specular: Color,
    pub attenuation: Attenuation,
    position: LightPosition,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PointLight {
    /// Creates a white light owning `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            attenuation: Attenuation::default(),
            position: LightPosition::Owned(position),
        }
    }

    pub fn with_colors(mut self, diffuse: Color, specular: Color) -> Self {
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// The raw position source, linked or owned.
    pub fn position_source(&self) -> LightPosition {
        self.position
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.position, LightPosition::Linked { .. })
    }

    /// Follows the translation of `entity` from now on.
    ///
    /// Fails if `entity` is not alive in `world` or carries no [`Transformable`].
    /// Any previously owned position or link is discarded.
    pub fn link_position(&mut self, entity: Entity, world: &World) -> Result<()> {
        let current = world
            .get::<&Transformable>(entity)
            .map_err(|_| Error::MissingPose(entity))?
            .position();
        log::debug!("point light: linked to {entity:?} at {current}");
        self.position = LightPosition::Linked {
            entity,
            last_known: current,
        };
        Ok(())
    }

    /// Stops following the linked entity, keeping its current position.
    ///
    /// Later moves of the entity no longer affect the light. Does nothing if
    /// the light owns its position.
    pub fn unlink_position(&mut self, world: &World) {
        if self.is_linked() {
            let snapshot = self.position(world);
            log::debug!("point light: unlinked at {snapshot}");
            self.position = LightPosition::Owned(snapshot);
        }
    }

    /// Replaces the position with an owned one, dropping any link.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = LightPosition::Owned(position);
    }

    /// The light's current world position.
    ///
    /// For a link this is the entity's live translation, or the last observed
    /// one if the entity has been despawned.
    pub fn position(&self, world: &World) -> Vec3 {
        match self.position {
            LightPosition::Owned(position) => position,
            LightPosition::Linked { entity, last_known } => world
                .get::<&Transformable>(entity)
                .map(|pose| pose.position())
                .unwrap_or(last_known),
        }
    }

    /// Mutable access to wherever the position lives.
    ///
    /// For a live link this edits the linked entity's translation (and marks
    /// its pose dirty), so the object moves with the light. A link to a
    /// despawned entity is dropped first and the last known position becomes
    /// owned.
    pub fn position_mut<'a>(&'a mut self, world: &'a mut World) -> &'a mut Vec3 {
        if let LightPosition::Linked { entity, last_known } = self.position {
            if let Ok(pose) = world.query_one_mut::<&mut Transformable>(entity) {
                return pose.translation_mut();
            }
            log::warn!("point light: linked entity {entity:?} is gone, keeping {last_known}");
            self.position = LightPosition::Owned(last_known);
        }
        match &mut self.position {
            LightPosition::Owned(position) => position,
            LightPosition::Linked { last_known, .. } => last_known,
        }
    }

    /// Refreshes the last known position of a link, dropping the link if the
    /// entity is gone.
    pub fn sync(&mut self, world: &World) {
        let LightPosition::Linked { entity, last_known } = self.position else {
            return;
        };
        match world.get::<&Transformable>(entity) {
            Ok(pose) => {
                self.position = LightPosition::Linked {
                    entity,
                    last_known: pose.position(),
                };
            }
            Err(_) => {
                log::warn!("point light: linked entity {entity:?} is gone, keeping {last_known}");
                self.position = LightPosition::Owned(last_known);
            }
        }
    }

    /// Uniform block for this light, resolving its position against `world`.
    pub fn uniform(&self, world: &World) -> PointLightUniform {
        PointLightUniform {
            position: self.position(world).to_array(),
            constant: self.attenuation.constant,
            diffuse: self.diffuse.rgb_vec3().to_array(),
            linear: self.attenuation.linear,
            specular: self.specular.rgb_vec3().to_array(),
            quadratic: self.attenuation.quadratic,
        }
    }
}

impl HasAttenuation for PointLight {
    fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    fn set_attenuation(&mut self, attenuation: Attenuation) {
        self.attenuation = attenuation;
    }
}
