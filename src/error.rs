//! Error types for vista.

use hecs::Entity;
use thiserror::Error;

/// Errors raised by camera, lighting, material and scene operations.
///
/// Pose mutation itself never fails; these cover parameter validation and
/// lookups into the scene world.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Field of view outside the open range (0, 180) degrees.
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    /// Aspect ratio that is not a finite positive number.
    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    /// Clip planes violating `0 < near < far`.
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    /// The viewport reported a size that cannot produce an aspect ratio.
    #[error("viewport of {width}x{height} cannot produce an aspect ratio")]
    DegenerateViewport { width: u32, height: u32 },

    /// Spot light cone angles violating `0 < inner < outer < 90`.
    #[error("invalid spot cone inner={inner} outer={outer}, need 0 < inner < outer < 90 degrees")]
    InvalidCone { inner: f32, outer: f32 },

    /// The entity is gone or carries no pose.
    #[error("entity {0:?} has no pose")]
    MissingPose(Entity),

    /// A light id that does not belong to the scene.
    #[error("scene has no {kind} light with id {index}")]
    UnknownLight { kind: &'static str, index: usize },

    /// Material lookup for a property that was never set.
    #[error("material has no property '{0}'")]
    MissingProperty(String),

    /// Material property stored with a different type than requested.
    #[error("material property '{name}' is a {found}, expected {expected}")]
    PropertyType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type alias using vista's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
