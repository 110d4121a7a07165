// camera.rs - Perspective camera
//
// Right-handed, looking down -Z in camera space, GL clip conventions.

use glam::{Mat4, Quat, Vec3};

use crate::config::CameraConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Camera-to-world rotation
    pub fn orientation(&self) -> Quat {
        Quat::from_mat4(&self.view().inverse()).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_faces_origin() {
        let cam = Camera::new(&CameraConfig::default(), 1.5);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        let forward = cam.orientation() * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn aspect_drives_projection() {
        let mut cam = Camera::new(&CameraConfig::default(), 1.0);
        cam.set_aspect(2.0);
        let p = cam.projection();
        // x scale is y scale divided by aspect
        assert!((p.x_axis.x * 2.0 - p.y_axis.y).abs() < 1e-5);

        cam.set_aspect(0.0);
        assert_eq!(cam.aspect, 2.0);
    }
}
