//! A world of posed objects, a camera and the lights that illuminate them.
//!
//! [`Scene`] ties the other modules together. Objects live in a
//! [`hecs::World`] as entities carrying a [`Transformable`] and an
//! [`Object`]; lights are stored by the scene and may link their position to
//! any posed entity. Once per frame, [`Scene::render`] streams everything a
//! Phong shader needs into a [`FrameSink`].
//!
//! # Example
//!
//! ```
//! use vista::*;
//!
//! let camera = Camera::with_aspect(CameraConfig::new().aspect_ratio(16.0 / 9.0))?;
//! let mut scene = Scene::new(camera);
//!
//! let cube = GeometryHandle::new(Geometry::cube());
//! let red = MaterialHandle::new(Material::phong(Color::RED, Color::WHITE, 32.0));
//! let first = scene.spawn(Transformable::at(Vec3::new(-1.0, 0.0, -5.0)), Object::new(cube, red));
//! let second = scene.duplicate(first)?;
//! scene.pose_mut(second)?.move_xyz(2.0, 0.0, 0.0);
//!
//! let lamp = scene.spawn_pose(Transformable::at(Vec3::new(0.0, 3.0, -5.0)));
//! let light = scene.add_point_light(PointLight::default());
//! scene.link_point_light(light, lamp)?;
//! # Ok::<(), vista::Error>(())
//! ```
//!
//! # Uniform names
//!
//! | Uniform                      | Value                                    |
//! |------------------------------|------------------------------------------|
//! | `view`, `projection`         | camera matrices                          |
//! | `viewPos`                    | camera position                          |
//! | `ambient.color`              | ambient color scaled by its intensity    |
//! | `pointLights[i].*`           | position, colors and attenuation terms   |
//! | `pointLightCount`            | number of point lights                   |
//! | `spotLights[i].*`            | point light fields plus `direction`, `cutOff`, `outerCutOff` |
//! | `spotLightCount`             | number of spot lights                    |
//! | `model`, `normalMatrix`      | per object, before its draw call         |
//! | `material.<name>`            | per object, one per material property    |

use glam::{Mat4, Vec3};
use hecs::{Entity, Ref, World};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::lighting::{AmbientLight, PointLight, SpotLight};
use crate::object::Object;
use crate::transformable::Transformable;
use crate::uniforms::{FrameSink, PointLightUniform, UniformValue};

/// Handle to a point light added with [`Scene::add_point_light`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointLightId(usize);

/// Handle to a spot light added with [`Scene::add_spot_light`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpotLightId(usize);

/// Objects, camera and lights rendered together.
pub struct Scene {
    pub camera: Camera,
    pub ambient: AmbientLight,
    world: World,
    point_lights: Vec<PointLight>,
    spot_lights: Vec<SpotLight>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ambient: AmbientLight::default(),
            world: World::new(),
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
        }
    }

    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access to the entity world, for attaching custom components.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // Objects

    /// Adds a renderable object with its own pose.
    pub fn spawn(&mut self, pose: Transformable, object: Object) -> Entity {
        self.world.spawn((pose, object))
    }

    /// Adds a pose with nothing to draw, e.g. an anchor for a light.
    pub fn spawn_pose(&mut self, pose: Transformable) -> Entity {
        self.world.spawn((pose,))
    }

    /// Spawns a copy of `entity`.
    ///
    /// The pose is copied by value, so the two move independently. Geometry
    /// and material handles are shared with the original.
    pub fn duplicate(&mut self, entity: Entity) -> Result<Entity> {
        let pose = Transformable::clone(&*self.pose(entity)?);
        let object = self
            .world
            .get::<&Object>(entity)
            .ok()
            .map(|object| Object::clone(&object));

        let copy = match object {
            Some(object) => self.world.spawn((pose, object)),
            None => self.world.spawn((pose,)),
        };
        log::debug!("scene: duplicated {entity:?} as {copy:?}");
        Ok(copy)
    }

    /// Removes `entity` and everything attached to it.
    ///
    /// Lights linked to it keep shining from where it was when despawned.
    pub fn despawn(&mut self, entity: Entity) -> Result<()> {
        self.sync_lights();
        self.world
            .despawn(entity)
            .map_err(|_| Error::MissingPose(entity))?;
        log::debug!("scene: despawned {entity:?}");
        Ok(())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn pose(&self, entity: Entity) -> Result<Ref<'_, Transformable>> {
        self.world
            .get::<&Transformable>(entity)
            .map_err(|_| Error::MissingPose(entity))
    }

    pub fn pose_mut(&mut self, entity: Entity) -> Result<&mut Transformable> {
        self.world
            .query_one_mut::<&mut Transformable>(entity)
            .map_err(|_| Error::MissingPose(entity))
    }

    /// Number of entities carrying an [`Object`].
    pub fn object_count(&self) -> usize {
        self.world.query::<&Object>().iter().count()
    }

    // Lights

    pub fn add_point_light(&mut self, light: PointLight) -> PointLightId {
        self.point_lights.push(light);
        PointLightId(self.point_lights.len() - 1)
    }

    pub fn add_spot_light(&mut self, light: SpotLight) -> SpotLightId {
        self.spot_lights.push(light);
        SpotLightId(self.spot_lights.len() - 1)
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn spot_lights(&self) -> &[SpotLight] {
        &self.spot_lights
    }

    pub fn point_light(&self, id: PointLightId) -> Result<&PointLight> {
        self.point_lights
            .get(id.0)
            .ok_or(Error::UnknownLight { kind: "point", index: id.0 })
    }

    pub fn point_light_mut(&mut self, id: PointLightId) -> Result<&mut PointLight> {
        self.point_lights
            .get_mut(id.0)
            .ok_or(Error::UnknownLight { kind: "point", index: id.0 })
    }

    pub fn spot_light(&self, id: SpotLightId) -> Result<&SpotLight> {
        self.spot_lights
            .get(id.0)
            .ok_or(Error::UnknownLight { kind: "spot", index: id.0 })
    }

    pub fn spot_light_mut(&mut self, id: SpotLightId) -> Result<&mut SpotLight> {
        self.spot_lights
            .get_mut(id.0)
            .ok_or(Error::UnknownLight { kind: "spot", index: id.0 })
    }

    /// Makes a point light follow `entity`'s position.
    pub fn link_point_light(&mut self, id: PointLightId, entity: Entity) -> Result<()> {
        let light = self
            .point_lights
            .get_mut(id.0)
            .ok_or(Error::UnknownLight { kind: "point", index: id.0 })?;
        light.link_position(entity, &self.world)
    }

    /// Makes a spot light follow `entity`'s position.
    pub fn link_spot_light(&mut self, id: SpotLightId, entity: Entity) -> Result<()> {
        let light = self
            .spot_lights
            .get_mut(id.0)
            .ok_or(Error::UnknownLight { kind: "spot", index: id.0 })?;
        light.link_position(entity, &self.world)
    }

    /// Current world position of a point light.
    pub fn point_light_position(&self, id: PointLightId) -> Result<Vec3> {
        Ok(self.point_light(id)?.position(&self.world))
    }

    /// Mutable position of a point light.
    ///
    /// For a linked light this moves the linked object too.
    pub fn point_light_position_mut(&mut self, id: PointLightId) -> Result<&mut Vec3> {
        let light = self
            .point_lights
            .get_mut(id.0)
            .ok_or(Error::UnknownLight { kind: "point", index: id.0 })?;
        Ok(light.position_mut(&mut self.world))
    }

    /// Current world position of a spot light.
    pub fn spot_light_position(&self, id: SpotLightId) -> Result<Vec3> {
        Ok(self.spot_light(id)?.position(&self.world))
    }

    /// Refreshes every light link, dropping links to despawned entities.
    pub fn sync_lights(&mut self) {
        for light in &mut self.point_lights {
            light.sync(&self.world);
        }
        for light in &mut self.spot_lights {
            light.sync(&self.world);
        }
    }

    // Rendering

    /// Uploads the frame's uniforms and draws every visible object.
    ///
    /// Returns the number of draw calls issued.
    pub fn render(&mut self, sink: &mut impl FrameSink) -> usize {
        self.sync_lights();

        set_mat4(sink, "view", self.camera.view_matrix());
        set_mat4(sink, "projection", self.camera.projection());
        set_vec3(sink, "viewPos", self.camera.position());
        set_vec3(sink, "ambient.color", self.ambient.contribution().rgb_vec3());

        for (i, light) in self.point_lights.iter().enumerate() {
            upload_light(sink, &format!("pointLights[{i}]"), &light.uniform(&self.world));
        }
        sink.set_uniform("pointLightCount", UniformValue::Int(self.point_lights.len() as i32));

        for (i, light) in self.spot_lights.iter().enumerate() {
            let prefix = format!("spotLights[{i}]");
            let spot = light.uniform(&self.world);
            upload_light(sink, &prefix, &light.light().uniform(&self.world));
            sink.set_uniform(&format!("{prefix}.direction"), UniformValue::Vec3(spot.direction));
            sink.set_uniform(&format!("{prefix}.cutOff"), UniformValue::Float(spot.cut_off));
            sink.set_uniform(
                &format!("{prefix}.outerCutOff"),
                UniformValue::Float(spot.outer_cut_off),
            );
        }
        sink.set_uniform("spotLightCount", UniformValue::Int(self.spot_lights.len() as i32));

        let mut draws = 0;
        for (_, (pose, object)) in self.world.query_mut::<(&mut Transformable, &Object)>() {
            if !object.visible {
                continue;
            }
            sink.set_uniform("model", UniformValue::Mat4(pose.matrix_array()));
            set_mat4(sink, "normalMatrix", pose.normal_matrix());
            for (name, value) in object.material().properties() {
                sink.set_uniform(&format!("material.{name}"), value.to_uniform());
            }
            sink.draw(object.geometry());
            draws += 1;
        }

        log::trace!("scene: rendered {draws} objects");
        draws
    }
}

fn set_mat4(sink: &mut impl FrameSink, name: &str, value: Mat4) {
    sink.set_uniform(name, UniformValue::Mat4(value.to_cols_array()));
}

fn set_vec3(sink: &mut impl FrameSink, name: &str, value: Vec3) {
    sink.set_uniform(name, UniformValue::Vec3(value.to_array()));
}

fn upload_light(sink: &mut impl FrameSink, prefix: &str, light: &PointLightUniform) {
    sink.set_uniform(&format!("{prefix}.position"), UniformValue::Vec3(light.position));
    sink.set_uniform(&format!("{prefix}.diffuse"), UniformValue::Vec3(light.diffuse));
    sink.set_uniform(&format!("{prefix}.specular"), UniformValue::Vec3(light.specular));
    sink.set_uniform(&format!("{prefix}.constant"), UniformValue::Float(light.constant));
    sink.set_uniform(&format!("{prefix}.linear"), UniformValue::Float(light.linear));
    sink.set_uniform(&format!("{prefix}.quadratic"), UniformValue::Float(light.quadratic));
}
