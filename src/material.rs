//! Named surface properties handed to the shader per object.
//!
//! A [`Material`] is an open property bag: any name can hold a float, color,
//! vector or integer. [`Scene::render`](crate::Scene::render) uploads every
//! property as `material.<name>`.
//!
//! ```
//! use vista::{Color, Material};
//!
//! let mut material = Material::phong(Color::RED, Color::WHITE, 32.0);
//! material.set("emission", Color::BLACK);
//!
//! assert_eq!(material.float("shininess")?, 32.0);
//! assert!(material.vec3("diffuse").is_err());
//! # Ok::<(), vista::Error>(())
//! ```

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use glam::Vec3;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::uniforms::UniformValue;

/// A single material property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialValue {
    Float(f32),
    Color(Color),
    Vec3(Vec3),
    Int(i32),
}

impl MaterialValue {
    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            MaterialValue::Float(_) => "float",
            MaterialValue::Color(_) => "color",
            MaterialValue::Vec3(_) => "vec3",
            MaterialValue::Int(_) => "int",
        }
    }

    /// The value as a shader uniform. Colors upload as `vec4`.
    pub fn to_uniform(self) -> UniformValue {
        match self {
            MaterialValue::Float(v) => UniformValue::Float(v),
            MaterialValue::Color(c) => UniformValue::Vec4(c.to_array()),
            MaterialValue::Vec3(v) => UniformValue::Vec3(v.to_array()),
            MaterialValue::Int(v) => UniformValue::Int(v),
        }
    }
}

impl From<f32> for MaterialValue {
    fn from(value: f32) -> Self {
        MaterialValue::Float(value)
    }
}

impl From<Color> for MaterialValue {
    fn from(value: Color) -> Self {
        MaterialValue::Color(value)
    }
}

impl From<Vec3> for MaterialValue {
    fn from(value: Vec3) -> Self {
        MaterialValue::Vec3(value)
    }
}

impl From<i32> for MaterialValue {
    fn from(value: i32) -> Self {
        MaterialValue::Int(value)
    }
}

/// A set of named properties describing a surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    properties: BTreeMap<String, MaterialValue>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    /// A classic Phong material with `diffuse`, `specular` and `shininess`.
    pub fn phong(diffuse: Color, specular: Color, shininess: f32) -> Self {
        let mut material = Self::new();
        material.set("diffuse", diffuse);
        material.set("specular", specular);
        material.set("shininess", shininess);
        material
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<MaterialValue>,
    ) -> Option<MaterialValue> {
        self.properties.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<MaterialValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<MaterialValue> {
        self.properties.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Mutable access to `name`, inserting `default` first if it is missing.
    ///
    /// A missing property usually means the material was set up incompletely,
    /// so the insertion is logged as a warning.
    pub fn get_or_insert_default(
        &mut self,
        name: &str,
        default: impl Into<MaterialValue>,
    ) -> &mut MaterialValue {
        self.properties.entry(name.to_owned()).or_insert_with(|| {
            let value = default.into();
            log::warn!(
                "material: no property '{name}', inserting default {}",
                value.type_name()
            );
            value
        })
    }

    pub fn float(&self, name: &str) -> Result<f32> {
        match self.lookup(name)? {
            MaterialValue::Float(v) => Ok(*v),
            other => Err(mismatch(name, "float", other)),
        }
    }

    pub fn color(&self, name: &str) -> Result<Color> {
        match self.lookup(name)? {
            MaterialValue::Color(v) => Ok(*v),
            other => Err(mismatch(name, "color", other)),
        }
    }

    pub fn vec3(&self, name: &str) -> Result<Vec3> {
        match self.lookup(name)? {
            MaterialValue::Vec3(v) => Ok(*v),
            other => Err(mismatch(name, "vec3", other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i32> {
        match self.lookup(name)? {
            MaterialValue::Int(v) => Ok(*v),
            other => Err(mismatch(name, "int", other)),
        }
    }

    /// All properties, ordered by name.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &MaterialValue)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn lookup(&self, name: &str) -> Result<&MaterialValue> {
        self.properties
            .get(name)
            .ok_or_else(|| Error::MissingProperty(name.to_owned()))
    }
}

fn mismatch(name: &str, expected: &'static str, found: &MaterialValue) -> Error {
    Error::PropertyType {
        name: name.to_owned(),
        expected,
        found: found.type_name(),
    }
}

/// A material shared between objects.
///
/// Editing through [`make_mut`](MaterialHandle::make_mut) copies the
/// material first if anyone else holds it, so other objects keep theirs.
#[derive(Clone, Debug, Default)]
pub struct MaterialHandle(Arc<Material>);

impl MaterialHandle {
    pub fn new(material: Material) -> Self {
        Self(Arc::new(material))
    }

    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy-on-write access to the material.
    pub fn make_mut(&mut self) -> &mut Material {
        Arc::make_mut(&mut self.0)
    }
}

impl From<Material> for MaterialHandle {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

impl Deref for MaterialHandle {
    type Target = Material;

    fn deref(&self) -> &Material {
        &self.0
    }
}
