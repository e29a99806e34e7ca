use glam::{Mat3, Mat4, Vec3};
use winit::{event::ElementState, keyboard::KeyCode};

pub const FOV: f32 = 50.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;
pub const SPEED: f32 = 10.0;
pub const SENSITIVITY: f32 = 0.05;

/// First-person camera. Orientation is stored as yaw/pitch in degrees and
/// the basis vectors are re-derived from the angles every update rather
/// than integrated, so the camera can never roll or drift.
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            view: Mat4::IDENTITY,
            // The window is not resizable, so the projection is fixed for
            // the lifetime of the camera.
            projection: Mat4::perspective_rh_gl(FOV.to_radians(), aspect_ratio, NEAR, FAR),
        };
        camera.update_vectors();
        camera.refresh_view();
        camera
    }

    pub fn rotate(&mut self, mouse_dx: f32, mouse_dy: f32) {
        self.yaw += mouse_dx * SENSITIVITY;
        self.pitch = (self.pitch - mouse_dy * SENSITIVITY).clamp(-89.0, 89.0);
    }

    pub fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        self.forward = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.forward.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    pub fn refresh_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Strips the translation column from a view matrix, keeping only the
/// rotation block. Used by both skybox variants so the sky rotates with
/// the camera but never translates with it.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
        }
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        let amount = if state == ElementState::Pressed {
            1.0
        } else {
            0.0
        };
        match key {
            KeyCode::KeyW => self.amount_forward = amount,
            KeyCode::KeyS => self.amount_backward = amount,
            KeyCode::KeyA => self.amount_left = amount,
            KeyCode::KeyD => self.amount_right = amount,
            KeyCode::KeyQ => self.amount_up = amount,
            KeyCode::KeyE => self.amount_down = amount,
            _ => (),
        }
    }

    pub fn process_mouse(&mut self, mouse_dx: f32, mouse_dy: f32) {
        self.rotate_horizontal += mouse_dx;
        self.rotate_vertical += mouse_dy;
    }

    pub fn update_camera(&mut self, camera: &mut Camera, delta_time: f32) {
        camera.rotate(self.rotate_horizontal, self.rotate_vertical);
        camera.update_vectors();

        let velocity = SPEED * delta_time;
        camera.position +=
            camera.forward() * (self.amount_forward - self.amount_backward) * velocity;
        camera.position += camera.right() * (self.amount_right - self.amount_left) * velocity;
        camera.position += camera.up() * (self.amount_up - self.amount_down) * velocity;

        camera.refresh_view();

        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pitch_is_clamped_after_every_update() {
        let mut camera = Camera::new(Vec3::ZERO, -90.0, 0.0, 16.0 / 9.0);
        let mut controller = CameraController::new();

        for delta in [5000.0, -25_000.0, 123.0, -1.0, 90_000.0] {
            controller.process_mouse(0.0, delta);
            controller.update_camera(&mut camera, 1.0 / 60.0);
            assert!(camera.pitch() >= -89.0 && camera.pitch() <= 89.0);
        }
    }

    #[test]
    fn basis_is_orthonormal_for_arbitrary_orientation() {
        for yaw in [-90.0_f32, 0.0, 37.5, 180.0, 623.0] {
            for pitch in [-89.0_f32, -45.0, 0.0, 30.0, 89.0] {
                let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), yaw, pitch, 1.0);

                assert_relative_eq!(camera.forward().length(), 1.0, epsilon = 1e-5);
                assert_relative_eq!(camera.right().length(), 1.0, epsilon = 1e-5);
                assert_relative_eq!(camera.up().length(), 1.0, epsilon = 1e-5);
                assert_relative_eq!(camera.forward().dot(camera.right()), 0.0, epsilon = 1e-5);
                assert_relative_eq!(camera.forward().dot(camera.up()), 0.0, epsilon = 1e-5);
                assert_relative_eq!(camera.right().dot(camera.up()), 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn rotation_only_view_has_no_translation() {
        for position in [Vec3::ZERO, Vec3::new(10.0, -4.0, 22.0), Vec3::splat(-3.5)] {
            let camera = Camera::new(position, -47.0, 21.0, 16.0 / 9.0);

            let stripped = rotation_only(camera.view_matrix());
            let translation = stripped.col(3);
            assert_relative_eq!(translation.x, 0.0);
            assert_relative_eq!(translation.y, 0.0);
            assert_relative_eq!(translation.z, 0.0);
            assert_relative_eq!(translation.w, 1.0);

            let full = Mat3::from_mat4(camera.view_matrix());
            let kept = Mat3::from_mat4(stripped);
            for (a, b) in full.to_cols_array().iter().zip(kept.to_cols_array().iter()) {
                assert_relative_eq!(a, b);
            }
        }
    }

    #[test]
    fn elevator_movement_ignores_pitch() {
        let mut camera = Camera::new(Vec3::ZERO, -90.0, 0.0, 1.0);
        let mut controller = CameraController::new();

        controller.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        controller.update_camera(&mut camera, 1.0);
        assert!(camera.position.y > 0.0);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-5);
    }
}
