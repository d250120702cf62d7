//! Uniform data handed to the rendering backend.
//!
//! vista does not talk to a graphics API itself. Per frame, [`Scene::render`](crate::Scene::render)
//! pushes named uniform values and draw calls into a [`FrameSink`], which the
//! host implements on top of whatever backend it uses (a GL program, a wgpu
//! bind group writer, a test recorder).
//!
//! Backends that prefer uniform buffers can upload the `#[repr(C)]` blocks in
//! this module directly with [`bytemuck::bytes_of`]. Their field order and
//! padding follow std140, so each `vec3` is paired with a trailing scalar.
//!
//! Matrices are column-major throughout, the layout GLSL and WGSL expect.

use crate::geometry::Geometry;

/// A single uniform value as seen by a shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// 16 column-major floats.
    Mat4([f32; 16]),
}

/// The boundary between the scene and the rendering backend.
pub trait FrameSink {
    /// Sets a uniform on the currently bound program.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Issues a draw call for `geometry` with the uniforms set so far.
    fn draw(&mut self, geometry: &Geometry);
}

/// Camera uniforms for 3D rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix for transforming world positions to clip space.
    pub view_proj: [[f32; 4]; 4],
    /// View matrix (world to camera space transformation).
    pub view: [[f32; 4]; 4],
    /// Projection matrix (camera to clip space transformation).
    pub proj: [[f32; 4]; 4],
    /// Camera position in world space, for specular highlights.
    pub camera_pos: [f32; 3],
    pub _pad: f32,
}

/// Per-object model uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Model matrix (object to world space transformation).
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
}

/// A point light packed for a uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub diffuse: [f32; 3],
    pub linear: f32,
    pub specular: [f32; 3],
    pub quadratic: f32,
}

/// A spot light packed for a uniform buffer.
///
/// Cone angles are stored as cosines so the shader can compare them with a
/// dot product directly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub direction: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    /// Cosine of the inner cone half-angle.
    pub cut_off: f32,
    /// Cosine of the outer cone half-angle.
    pub outer_cut_off: f32,
    pub _pad: [f32; 3],
}
