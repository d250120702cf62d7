//! CPU-side mesh data shared between scene objects.
//!
//! - [`Vertex3d`]: position, normal and UV, laid out for direct upload
//! - [`Geometry`]: a vertex and index list with a few spatial helpers
//! - [`GeometryHandle`]: a cheap, shared reference to a [`Geometry`]
//!
//! Uploading the data is left to the [`FrameSink`](crate::FrameSink), which
//! receives the `Geometry` in every draw call.
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset |
//! |-----------|-----------|--------|
//! | position  | Float32x3 | 0      |
//! | normal    | Float32x3 | 12     |
//! | uv        | Float32x2 | 24     |

use std::ops::Deref;
use std::sync::Arc;

use glam::Vec3;

/// A vertex with position, normal and texture coordinates (32 bytes).
///
/// ```
/// use vista::Vertex3d;
///
/// let v = Vertex3d::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
/// assert_eq!(bytemuck::bytes_of(&v).len(), 32);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Model-space position.
    pub position: [f32; 3],
    /// Surface normal, expected to be unit length.
    pub normal: [f32; 3],
    /// Texture coordinates, usually in `[0, 1]`.
    pub uv: [f32; 2],
}

impl Vertex3d {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex3d>,
    /// Triangle list, three indices per face.
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// A unit cube centered at the origin, with per-face normals.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // +Z
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
            // -Z
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
            // +Y
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
            // -Y
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
            // +X
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
            // -X
            Vertex3d::new([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
        ];

        let indices = (0..6u32)
            .flat_map(|face| [0, 1, 2, 2, 3, 0].map(|i| face * 4 + i))
            .collect();

        Self::new(vertices, indices)
    }

    /// A square in the XZ plane facing +Y, `size` units on a side.
    pub fn plane(size: f32) -> Self {
        let half = size * 0.5;
        let up = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex3d::new([-half, 0.0, -half], up, [0.0, 0.0]),
            Vertex3d::new([half, 0.0, -half], up, [1.0, 0.0]),
            Vertex3d::new([half, 0.0, half], up, [1.0, 1.0]),
            Vertex3d::new([-half, 0.0, half], up, [0.0, 1.0]),
        ];

        Self::new(vertices, vec![0, 2, 1, 2, 0, 3])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`.
    ///
    /// Empty geometry yields `(ZERO, ZERO)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.vertices.iter().map(|v| Vec3::from(v.position)).fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(p), max.max(p)),
        )
    }

    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    /// Moves the vertices so the bounding box is centered on the origin.
    pub fn recenter(&mut self) {
        let offset = self.center();
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) - offset).into();
        }
    }
}

/// A shared, immutable [`Geometry`].
///
/// Cloning the handle shares the vertex data, so any number of scene objects
/// can draw the same mesh.
#[derive(Clone, Debug)]
pub struct GeometryHandle(Arc<Geometry>);

impl GeometryHandle {
    pub fn new(geometry: Geometry) -> Self {
        Self(Arc::new(geometry))
    }

    /// Whether both handles point at the same geometry.
    pub fn ptr_eq(&self, other: &GeometryHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles sharing this geometry.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<Geometry> for GeometryHandle {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}

impl Deref for GeometryHandle {
    type Target = Geometry;

    fn deref(&self) -> &Geometry {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex3d>(), 32);
    }

    #[test]
    fn cube_counts_and_bounds() {
        let cube = Geometry::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.bounds(), (Vec3::splat(-0.5), Vec3::splat(0.5)));
        assert_eq!(cube.center(), Vec3::ZERO);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertex_count()));
        assert_eq!(&cube.indices[6..12], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn plane_is_flat() {
        let plane = Geometry::plane(4.0);
        assert_eq!(plane.size(), Vec3::new(4.0, 0.0, 4.0));
        assert!(plane.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn plane_winding_faces_up() {
        let plane = Geometry::plane(2.0);
        for tri in plane.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(plane.vertices[i as usize].position));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn empty_geometry_bounds() {
        let empty = Geometry::default();
        assert!(empty.is_empty());
        assert_eq!(empty.bounds(), (Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn recenter_moves_bounds_to_origin() {
        let mut geometry = Geometry::new(
            vec![
                Vertex3d::new([1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
                Vertex3d::new([3.0, 5.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0]),
            ],
            vec![],
        );
        assert_eq!(geometry.center(), Vec3::new(2.0, 3.0, 1.0));

        geometry.recenter();
        assert_eq!(geometry.center(), Vec3::ZERO);
        assert_eq!(geometry.size(), Vec3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn handles_share_data() {
        let a = GeometryHandle::new(Geometry::cube());
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.share_count(), 2);
        assert_eq!(b.vertex_count(), 24);

        let c = GeometryHandle::from(Geometry::cube());
        assert!(!a.ptr_eq(&c));
    }
}
