//! The shared half of a scene object.
//!
//! An object in a [`Scene`](crate::Scene) is an entity with two components:
//! a [`Transformable`](crate::Transformable) that belongs to that instance
//! alone, and an [`Object`] holding geometry and material that may be shared
//! with other instances.
//!
//! ```
//! use vista::{Geometry, Material, Object};
//!
//! let crate_box = Object::new(Geometry::cube(), Material::new());
//! let second = crate_box.clone();
//! assert!(second.geometry.ptr_eq(&crate_box.geometry));
//! ```

use crate::geometry::{Geometry, GeometryHandle};
use crate::material::{Material, MaterialHandle};

/// Renderable data attached to an entity alongside its pose.
#[derive(Clone, Debug)]
pub struct Object {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    /// Skipped by [`Scene::render`](crate::Scene::render) when false.
    pub visible: bool,
}

impl Object {
    pub fn new(geometry: impl Into<GeometryHandle>, material: impl Into<MaterialHandle>) -> Self {
        Self {
            geometry: geometry.into(),
            material: material.into(),
            visible: true,
        }
    }

    /// Uses the same geometry with an empty material.
    pub fn from_geometry(geometry: impl Into<GeometryHandle>) -> Self {
        Self::new(geometry, Material::new())
    }

    pub fn with_material(mut self, material: impl Into<MaterialHandle>) -> Self {
        self.material = material.into();
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Edits this object's material, detaching it from any other holder first.
    pub fn material_mut(&mut self) -> &mut Material {
        self.material.make_mut()
    }

    /// Replaces the material with a private copy of `material`.
    pub fn copy_material(&mut self, material: &Material) {
        self.material = MaterialHandle::new(material.clone());
    }
}
