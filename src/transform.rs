use std::cell::Cell;

use glam::{Mat4, Vec3};

/// Position, per-axis Euler rotation (radians) and non-uniform scale.
///
/// The model matrix is composed as translate · rotate_z · rotate_y ·
/// rotate_x · scale and cached until a component changes.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    cached: Cell<Option<Mat4>>,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            cached: Cell::new(None),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.cached.set(None);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.cached.set(None);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.cached.set(None);
    }

    pub fn model_matrix(&self) -> Mat4 {
        if let Some(matrix) = self.cached.get() {
            return matrix;
        }

        let matrix = Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_scale(self.scale);
        self.cached.set(Some(matrix));
        matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}
