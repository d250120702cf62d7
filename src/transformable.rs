//! Poses for anything placed in the scene.
//!
//! A [`Transformable`] owns a translation, a quaternion orientation and a
//! per-axis scale, and composes them into a 4×4 affine matrix on demand:
//!
//! ```text
//! M = translate(translation) * rotate(orientation) * scale(scale)
//! ```
//!
//! The composed matrix is cached. Every mutation marks the pose dirty and the
//! next [`Transformable::matrix`] call recomposes it, so reading the matrix
//! several times per frame costs one composition at most.
//!
//! # Relative rotations are local
//!
//! [`Transformable::rotate`] and friends post-multiply the current
//! orientation (`orientation = orientation * delta`). The delta is therefore
//! applied in the object's own frame: yawing a pitched object turns it about
//! its tilted up axis, not about world +Y.
//!
//! ```
//! use vista::{Transformable, Vec3};
//!
//! let mut pose = Transformable::new();
//! pose.set_position(Vec3::new(0.0, 1.0, -4.0));
//! pose.yaw(90.0);
//! pose.pitch(30.0);
//!
//! let model = pose.matrix();
//! assert_eq!(model.w_axis.truncate(), Vec3::new(0.0, 1.0, -4.0));
//! ```
//!
//! Angles taken by this module are in degrees, matching the camera and
//! light APIs.

use glam::{Mat4, Quat, Vec3};

use crate::uniforms::ModelUniforms;

/// Position, orientation and scale with a lazily composed matrix.
///
/// Cloning yields an independent pose; nothing is shared between copies.
#[derive(Clone, Debug)]
pub struct Transformable {
    translation: Vec3,
    orientation: Quat,
    scale: Vec3,
    cached: Mat4,
    dirty: bool,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            cached: Mat4::IDENTITY,
            dirty: false,
        }
    }
}

/// Poses compare by translation, orientation and scale; the cached matrix is
/// ignored.
impl PartialEq for Transformable {
    fn eq(&self, other: &Self) -> bool {
        self.translation == other.translation
            && self.orientation == other.orientation
            && self.scale == other.scale
    }
}

impl Transformable {
    /// Creates an identity pose: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pose at `position` with no rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self::new().with_position(position)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.set_orientation(orientation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    // Absolute mutation

    /// Replaces the translation.
    pub fn set_position(&mut self, position: Vec3) {
        self.translation = position;
        self.dirty = true;
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_position(Vec3::new(x, y, z));
    }

    /// Replaces the orientation with rotations of `pitch`, `yaw` and `roll`
    /// degrees about X, Y and Z, chained in that order in the local frame.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.set_orientation(euler_degrees(pitch, yaw, roll));
    }

    /// Replaces the orientation with a rotation of `angle` degrees about `axis`.
    ///
    /// The axis is normalized here. A zero-length axis has no direction and
    /// produces a NaN orientation; validating it is up to the caller.
    pub fn set_rotation_axis(&mut self, angle: f32, axis: Vec3) {
        self.set_orientation(axis_angle_degrees(angle, axis));
    }

    /// Replaces the orientation with a quaternion.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.dirty = true;
    }

    /// Replaces the scale.
    ///
    /// Negative components are kept as given and mirror the geometry along
    /// that axis. Mirrored poses flip triangle winding, so back-face culling
    /// sees the inside of the mesh.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec3::splat(scale));
    }

    // Relative mutation

    /// Offsets the translation by `delta` in world space.
    pub fn move_by(&mut self, delta: Vec3) {
        self.translation += delta;
        self.dirty = true;
    }

    pub fn move_xyz(&mut self, dx: f32, dy: f32, dz: f32) {
        self.move_by(Vec3::new(dx, dy, dz));
    }

    /// Rotates by `pitch`, `yaw` and `roll` degrees in the local frame.
    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotate_by(euler_degrees(pitch, yaw, roll));
    }

    /// Rotates by `angle` degrees about the local `axis`.
    ///
    /// Same zero-axis caveat as [`Transformable::set_rotation_axis`].
    pub fn rotate_axis(&mut self, angle: f32, axis: Vec3) {
        self.rotate_by(axis_angle_degrees(angle, axis));
    }

    /// Post-multiplies the orientation by `delta`.
    pub fn rotate_by(&mut self, delta: Quat) {
        self.orientation = (self.orientation * delta).normalize();
        self.dirty = true;
    }

    /// Rotates about the local X axis.
    pub fn pitch(&mut self, angle: f32) {
        self.rotate_axis(angle, Vec3::X);
    }

    /// Rotates about the local Y axis.
    pub fn yaw(&mut self, angle: f32) {
        self.rotate_axis(angle, Vec3::Y);
    }

    /// Rotates about the local Z axis.
    pub fn roll(&mut self, angle: f32) {
        self.rotate_axis(angle, Vec3::Z);
    }

    /// Multiplies the scale component-wise by `factor`.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.dirty = true;
    }

    /// Adds `delta` to the scale.
    ///
    /// Growing by `(1, 1, 1)` turns a unit scale into 2 but a scale of 3 into
    /// 4, so this is not a uniform zoom. Prefer [`Transformable::scale_by`].
    pub fn grow_by(&mut self, delta: Vec3) {
        self.scale += delta;
        self.dirty = true;
    }

    // Reading

    pub fn position(&self) -> Vec3 {
        self.translation
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// The orientation as a rotation-only 4×4 matrix.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation)
    }

    pub fn scaling(&self) -> Vec3 {
        self.scale
    }

    /// Mutable access to the translation for in-place editing.
    ///
    /// The pose is marked dirty up front since the caller may write through
    /// the reference.
    pub fn translation_mut(&mut self) -> &mut Vec3 {
        self.dirty = true;
        &mut self.translation
    }

    /// Whether the next [`Transformable::matrix`] call will recompose.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the composed transform, recomposing only if the pose changed.
    pub fn matrix(&mut self) -> Mat4 {
        if self.dirty {
            self.cached = self.compute_matrix();
            self.dirty = false;
        }
        self.cached
    }

    /// Composes the transform without touching the cache.
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.translation)
    }

    /// The composed transform as 16 column-major floats, as uniforms expect.
    pub fn matrix_array(&mut self) -> [f32; 16] {
        self.matrix().to_cols_array()
    }

    /// Inverse transpose of the composed transform, for transforming normals.
    ///
    /// A singular pose (any zero scale) has no inverse; identity is returned
    /// so shaders never see NaN.
    pub fn normal_matrix(&mut self) -> Mat4 {
        const EPSILON: f32 = 1e-6;
        let model = self.matrix();
        if model.determinant().abs() < EPSILON {
            Mat4::IDENTITY
        } else {
            model.inverse().transpose()
        }
    }

    /// Model uniform block for this pose.
    pub fn uniforms(&mut self) -> ModelUniforms {
        ModelUniforms {
            model: self.matrix().to_cols_array_2d(),
            normal_matrix: self.normal_matrix().to_cols_array_2d(),
        }
    }
}

/// Anything that carries a [`Transformable`] pose.
///
/// Implemented by the pose itself and by composite types such as
/// [`Camera`](crate::Camera), so code that only needs a position or a model
/// matrix can take either.
pub trait HasPose {
    fn pose(&self) -> &Transformable;

    fn pose_mut(&mut self) -> &mut Transformable;

    /// World-space position of the pose.
    fn world_position(&self) -> Vec3 {
        self.pose().position()
    }

    /// Composed model matrix, using the pose's cache.
    fn world_matrix(&mut self) -> Mat4 {
        self.pose_mut().matrix()
    }
}

impl HasPose for Transformable {
    fn pose(&self) -> &Transformable {
        self
    }

    fn pose_mut(&mut self) -> &mut Transformable {
        self
    }
}

/// X, then Y, then Z about successively rotated axes.
fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_rotation_x(pitch.to_radians())
        * Quat::from_rotation_y(yaw.to_radians())
        * Quat::from_rotation_z(roll.to_radians())
}

fn axis_angle_degrees(angle: f32, axis: Vec3) -> Quat {
    Quat::from_axis_angle(axis.normalize(), angle.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, EPSILON)
    }

    #[test]
    fn new_pose_is_identity() {
        let mut t = Transformable::new();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.orientation(), Quat::IDENTITY);
        assert_eq!(t.scaling(), Vec3::ONE);
        assert!(!t.is_dirty());
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn set_position_round_trips() {
        let mut t = Transformable::new();
        let v = Vec3::new(-3.5, 0.25, 12.0);
        t.set_position(v);
        assert_eq!(t.position(), v);

        t.set_position_xyz(1.0, 2.0, 3.0);
        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn move_then_move_back_restores_position() {
        let mut t = Transformable::at(Vec3::new(1.0, 2.0, 3.0));
        let delta = Vec3::new(0.3, -7.0, 2.5);
        t.move_by(delta);
        t.move_by(-delta);
        assert!(approx_eq_vec3(t.position(), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn mutation_marks_dirty_and_matrix_clears_it() {
        let mut t = Transformable::new();
        t.move_xyz(1.0, 0.0, 0.0);
        assert!(t.is_dirty());

        let m = t.matrix();
        assert!(!t.is_dirty());
        assert_eq!(m, t.compute_matrix());
        assert_eq!(m.w_axis.truncate(), Vec3::X);
    }

    #[test]
    fn cached_matrix_matches_composition() {
        let mut t = Transformable::new()
            .with_position(Vec3::new(4.0, -1.0, 2.0))
            .with_scale(Vec3::new(2.0, 1.0, 0.5));
        t.set_rotation(30.0, 45.0, 10.0);

        let expected = Mat4::from_translation(t.position())
            * Mat4::from_quat(t.orientation())
            * Mat4::from_scale(t.scaling());
        assert!(t.matrix().abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn relative_rotation_is_local_frame() {
        let mut t = Transformable::new();
        t.rotate_axis(90.0, Vec3::Y);
        t.rotate_axis(90.0, Vec3::X);

        // q_y * q_x computed by hand.
        let expected = Quat::from_xyzw(0.5, 0.5, -0.5, 0.5);
        assert!(t.orientation().abs_diff_eq(expected, EPSILON));

        // Local X ends up on world -Z, local Y on world +X, local Z on world -Y.
        let q = t.orientation();
        assert!(approx_eq_vec3(q * Vec3::X, Vec3::NEG_Z));
        assert!(approx_eq_vec3(q * Vec3::Y, Vec3::X));
        assert!(approx_eq_vec3(q * Vec3::Z, Vec3::NEG_Y));

        // World-frame composition would have sent local Y to +Z instead.
        let world_frame = Quat::from_rotation_x(90f32.to_radians())
            * Quat::from_rotation_y(90f32.to_radians());
        assert!(approx_eq_vec3(world_frame * Vec3::Y, Vec3::Z));
    }

    #[test]
    fn single_axis_helpers_match_rotate_axis() {
        let mut a = Transformable::new();
        a.pitch(20.0);
        a.yaw(-35.0);
        a.roll(50.0);

        let mut b = Transformable::new();
        b.rotate_axis(20.0, Vec3::X);
        b.rotate_axis(-35.0, Vec3::Y);
        b.rotate_axis(50.0, Vec3::Z);

        assert!(a.orientation().abs_diff_eq(b.orientation(), EPSILON));
    }

    #[test]
    fn set_rotation_is_absolute() {
        let mut t = Transformable::new();
        t.rotate(10.0, 20.0, 30.0);
        t.set_rotation(0.0, 90.0, 0.0);
        assert!(
            t.orientation()
                .abs_diff_eq(Quat::from_rotation_y(90f32.to_radians()), EPSILON)
        );
    }

    #[test]
    fn set_rotation_axis_normalizes_axis() {
        let mut t = Transformable::new();
        t.set_rotation_axis(90.0, Vec3::new(0.0, 5.0, 0.0));
        assert!(approx_eq_vec3(t.orientation() * Vec3::X, Vec3::NEG_Z));
    }

    #[test]
    fn zero_axis_yields_nan() {
        let mut t = Transformable::new();
        t.set_rotation_axis(45.0, Vec3::ZERO);
        assert!(t.orientation().is_nan());
    }

    #[test]
    fn scale_by_multiplies_and_grow_by_adds() {
        let mut t = Transformable::new().with_scale(Vec3::splat(3.0));
        t.scale_by(Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(t.scaling(), Vec3::new(6.0, 3.0, 1.5));

        t.grow_by(Vec3::ONE);
        assert_eq!(t.scaling(), Vec3::new(7.0, 4.0, 2.5));
    }

    #[test]
    fn negative_scale_mirrors() {
        let mut t = Transformable::new();
        t.set_scale(Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(t.scaling(), Vec3::new(-1.0, 1.0, 1.0));

        let m = t.matrix();
        assert_eq!(m.transform_point3(Vec3::new(2.0, 3.0, 4.0)), Vec3::new(-2.0, 3.0, 4.0));
        assert!(m.determinant() < 0.0);
    }

    #[test]
    fn translation_mut_marks_dirty() {
        let mut t = Transformable::new();
        *t.translation_mut() += Vec3::Y;
        assert!(t.is_dirty());
        assert_eq!(t.matrix().w_axis.truncate(), Vec3::Y);
    }

    #[test]
    fn matrix_array_is_column_major() {
        let mut t = Transformable::at(Vec3::new(7.0, 8.0, 9.0));
        let a = t.matrix_array();
        assert_eq!(&a[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(a[15], 1.0);
    }

    #[test]
    fn normal_matrix_falls_back_for_zero_scale() {
        let mut t = Transformable::new().with_scale(Vec3::ZERO);
        assert_eq!(t.normal_matrix(), Mat4::IDENTITY);

        let mut s = Transformable::new().with_scale(Vec3::new(1.0, 2.0, 1.0));
        let expected = s.matrix().inverse().transpose();
        assert_eq!(s.normal_matrix(), expected);
    }

    #[test]
    fn uniforms_carry_model_and_normal_matrix() {
        let mut t = Transformable::at(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(2.0));
        let u = t.uniforms();
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.normal_matrix, t.normal_matrix().to_cols_array_2d());
    }

    #[test]
    fn clones_are_independent() {
        let mut a = Transformable::at(Vec3::X);
        let b = a.clone();
        a.move_by(Vec3::X);
        assert_eq!(b.position(), Vec3::X);
        assert_eq!(a.position(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn equality_ignores_cached_matrix() {
        let mut a = Transformable::at(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(2.0));
        let b = a.clone();
        a.matrix();
        assert!(!a.is_dirty());
        assert!(b.is_dirty());
        assert_eq!(a, b);

        a.move_by(Vec3::X);
        assert_ne!(a, b);
    }
}
