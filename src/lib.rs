//! # vista
//!
//! **Poses, cameras and lights for small renderers.**
//!
//! vista models the scene side of a classic forward renderer and leaves the
//! graphics API to you. Objects get a position, orientation and scale that
//! compose into a model matrix; a perspective camera derives view and
//! projection matrices and offers first-person controls; point and spot
//! lights can follow scene objects around.
//!
//! ## Quick Start
//!
//! ```
//! use vista::*;
//!
//! # fn main() -> Result<()> {
//! let mut camera = Camera::new(CameraConfig::new().fov(60.0), &(1280, 720))?;
//! camera.set_position(Vec3::new(0.0, 2.0, 6.0));
//! camera.look_at(Vec3::ZERO);
//!
//! let mut scene = Scene::new(camera);
//! let cube = scene.spawn(
//!     Transformable::new(),
//!     Object::new(Geometry::cube(), Material::phong(Color::RED, Color::WHITE, 32.0)),
//! );
//! scene.pose_mut(cube)?.rotate(0.0, 45.0, 0.0);
//!
//! let light = scene.add_point_light(PointLight::new(Vec3::new(2.0, 4.0, 2.0)));
//! # let _ = light;
//!
//! // Once per frame, with a FrameSink backed by your renderer:
//! // scene.render(&mut sink);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules at a glance
//!
//! - [`Transformable`]: translation, quaternion orientation and scale with a cached matrix
//! - [`Camera`]: look-at, pan/tilt/roll and a cached perspective projection
//! - [`FlyController`]: maps per-frame input onto a camera
//! - [`PointLight`], [`SpotLight`], [`AmbientLight`]: lights whose position may link to an entity
//! - [`Geometry`], [`Material`], [`Object`]: what gets drawn, shareable between instances
//! - [`Scene`]: the world, its camera and lights, rendered into a [`FrameSink`]

mod camera;
mod color;
mod error;
mod fly_camera;
mod geometry;
pub mod lighting;
mod material;
mod object;
mod scene;
mod transformable;
mod uniforms;

pub use camera::{Camera, CameraConfig, MIN_UP_Y, Viewport, WORLD_UP};
pub use color::Color;
pub use error::{Error, Result};
pub use fly_camera::{FlyConfig, FlyController, FlyInput, fly_direction};
pub use geometry::{Geometry, GeometryHandle, Vertex3d};
pub use lighting::{AmbientLight, Attenuation, HasAttenuation, LightPosition, PointLight, SpotLight};
pub use material::{Material, MaterialHandle, MaterialValue};
pub use object::Object;
pub use scene::{PointLightId, Scene, SpotLightId};
pub use transformable::{HasPose, Transformable};
pub use uniforms::{
    CameraUniforms, FrameSink, ModelUniforms, PointLightUniform, SpotLightUniform, UniformValue,
};

// Re-export glam math types for convenience
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

// Entity handles used by scenes and light links
pub use hecs::{Entity, World};
