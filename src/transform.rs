//! Position, rotation and scale with lazily rebuilt matrices.
//!
//! A [`Transform`] stores its components and caches the world matrix, the
//! inverse-transpose used for normals and the three local direction vectors.
//! Every mutation drops the cache; the next read rebuilds all of it at once.
//!
//! Conventions are left-handed: +X right, +Y up, +Z forward. The rotation is
//! applied roll (Z), then pitch (X), then yaw (Y), and the world matrix is
//! `translation * rotation * scale`.

use std::cell::Cell;

use cgmath::{Matrix, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3};

/// Everything derived from the components, rebuilt together.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Derived {
    world: Matrix4<f32>,
    world_inverse_transpose: Matrix4<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    forward: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct Transform {
    position: Vector3<f32>,
    pitch_yaw_roll: Vector3<f32>,
    scale: Vector3<f32>,
    // `None` means dirty
    derived: Cell<Option<Derived>>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            pitch_yaw_roll: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            derived: Cell::new(None),
        }
    }

    pub fn set_position(&mut self, position: impl Into<Vector3<f32>>) {
        self.position = position.into();
        self.mark_dirty();
    }

    /// Absolute rotation in radians, `(pitch, yaw, roll)`.
    pub fn set_rotation(&mut self, pitch_yaw_roll: impl Into<Vector3<f32>>) {
        self.pitch_yaw_roll = pitch_yaw_roll.into();
        self.mark_dirty();
    }

    pub fn set_scale(&mut self, scale: impl Into<Vector3<f32>>) {
        self.scale = scale.into();
        self.mark_dirty();
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.pitch_yaw_roll
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Moves along the world axes, ignoring the current rotation.
    pub fn move_absolute(&mut self, offset: impl Into<Vector3<f32>>) {
        self.position += offset.into();
        self.mark_dirty();
    }

    /// Moves along the local axes, e.g. `(0, 0, 1)` is "one unit forward".
    pub fn move_relative(&mut self, offset: impl Into<Vector3<f32>>) {
        let rotated = self.orientation() * offset.into();
        self.position += rotated;
        self.mark_dirty();
    }

    pub fn rotate(&mut self, delta: impl Into<Vector3<f32>>) {
        self.pitch_yaw_roll += delta.into();
        self.mark_dirty();
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, factor: impl Into<Vector3<f32>>) {
        let factor = factor.into();
        self.scale = Vector3::new(
            self.scale.x * factor.x,
            self.scale.y * factor.y,
            self.scale.z * factor.z,
        );
        self.mark_dirty();
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.derived().world
    }

    /// Inverse-transpose of the world matrix, used to move normals into world
    /// space under non-uniform scale. Identity when the world matrix is singular.
    pub fn world_inverse_transpose_matrix(&self) -> Matrix4<f32> {
        self.derived().world_inverse_transpose
    }

    pub fn right(&self) -> Vector3<f32> {
        self.derived().right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.derived().up
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.derived().forward
    }

    /// Whether the next matrix read has to rebuild the cache.
    pub fn is_dirty(&self) -> bool {
        self.derived.get().is_none()
    }

    /// Rotation as a quaternion: yaw * pitch * roll.
    pub fn orientation(&self) -> Quaternion<f32> {
        let Vector3 {
            x: pitch,
            y: yaw,
            z: roll,
        } = self.pitch_yaw_roll;
        Quaternion::from_angle_y(Rad(yaw))
            * Quaternion::from_angle_x(Rad(pitch))
            * Quaternion::from_angle_z(Rad(roll))
    }

    fn mark_dirty(&mut self) {
        self.derived.set(None);
    }

    fn derived(&self) -> Derived {
        if let Some(derived) = self.derived.get() {
            return derived;
        }
        let derived = self.rebuild();
        self.derived.set(Some(derived));
        derived
    }

    fn rebuild(&self) -> Derived {
        let orientation = self.orientation();
        let world = Matrix4::from_translation(self.position)
            * Matrix4::from(orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let world_inverse_transpose = world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Derived {
            world,
            world_inverse_transpose,
            right: orientation * Vector3::unit_x(),
            up: orientation * Vector3::unit_y(),
            forward: orientation * Vector3::unit_z(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        let mut transform = Transform::new();
        transform.set_position(position);
        transform
    }
}
