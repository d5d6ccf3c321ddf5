//! Diagonal-down camera following the tower top

use glam::{Mat4, Vec3};

use crate::consts::{CAMERA_BASE_HEIGHT, CAMERA_FOV_DEG};

/// Perspective camera looking down the (-1, -1, -1) diagonal.
///
/// Only the height changes at runtime; the look direction is fixed so the
/// tower reads the same from every height.
pub struct Camera {
    pub height: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            height: CAMERA_BASE_HEIGHT,
        }
    }

    /// View-projection matrix for the given viewport aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let eye = Vec3::new(4.0, self.height, 4.0);
        let target = eye + Vec3::new(-1.0, -1.0, -1.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect, 1.0, 200.0);
        proj * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
