use glam::{Mat4, Vec3};

const AMBIENT_WEIGHT: f32 = 0.06;
const DIFFUSE_WEIGHT: f32 = 0.8;
const SPECULAR_WEIGHT: f32 = 1.0;

/// The scene's single directional light. The color is decomposed into
/// ambient/diffuse/specular intensities with fixed weights, and the view
/// matrix from the light's position toward the origin drives the shadow
/// pass.
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    view: Mat4,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            ambient: AMBIENT_WEIGHT * color,
            diffuse: DIFFUSE_WEIGHT * color,
            specular: SPECULAR_WEIGHT * color,
            view: Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(50.0, 50.0, -10.0), Vec3::ONE)
    }
}
