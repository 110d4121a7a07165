// controls.rs - Damped orbit controls
//
// Drag rotates the camera around its target on a sphere of fixed radius.
// Input accumulates into a pending delta; each update applies a damping
// fraction of it and keeps the rest, so motion eases out over frames.
// Zoom and pan are disabled.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::camera::Camera;

// Keeps the camera off the poles where look_at degenerates
const POLAR_EPSILON: f32 = 1e-4;
const SETTLED: f32 = 1e-6;

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub damping: f32,
    pub rotate_speed: f32,
    theta: f32,
    phi: f32,
    radius: f32,
    delta_theta: f32,
    delta_phi: f32,
}

impl OrbitControls {
    pub fn new(camera: &Camera, damping: f32, rotate_speed: f32) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        Self {
            damping: damping.clamp(0.0, 1.0),
            rotate_speed,
            theta,
            phi,
            radius,
            delta_theta: 0.0,
            delta_phi: 0.0,
        }
    }

    /// Pointer drag in CSS pixels; a full-height drag turns one revolution
    /// scaled by rotate_speed.
    pub fn drag(&mut self, dx: f32, dy: f32, client_height: f32) {
        if client_height <= 0.0 {
            return;
        }
        self.delta_theta -= TAU * dx / client_height * self.rotate_speed;
        self.delta_phi -= TAU * dy / client_height * self.rotate_speed;
    }

    pub fn is_settled(&self) -> bool {
        self.delta_theta.abs() < SETTLED && self.delta_phi.abs() < SETTLED
    }

    /// Apply one frame of damped motion to the camera.
    pub fn update(&mut self, camera: &mut Camera) {
        let k = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.theta += self.delta_theta * k;
        self.phi = (self.phi + self.delta_phi * k).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        self.delta_theta *= 1.0 - k;
        self.delta_phi *= 1.0 - k;

        let sin_phi = self.phi.sin();
        let offset = Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        );
        camera.position = camera.target + offset;
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn polar(&self) -> f32 {
        self.phi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn rig() -> (Camera, OrbitControls) {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let controls = OrbitControls::new(&camera, 0.05, 0.5);
        (camera, controls)
    }

    #[test]
    fn idle_update_keeps_camera() {
        let (mut camera, mut controls) = rig();
        controls.update(&mut camera);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn drag_eases_toward_target() {
        let (mut camera, mut controls) = rig();
        controls.drag(100.0, 0.0, 400.0);
        let total = -TAU * 100.0 / 400.0 * 0.5;

        controls.update(&mut camera);
        let first = controls.azimuth();
        assert!((first - total * 0.05).abs() < 1e-6);

        for _ in 0..400 {
            controls.update(&mut camera);
        }
        assert!((controls.azimuth() - total).abs() < 1e-3);
        assert!(controls.is_settled());
        assert!((camera.position.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let (mut camera, mut controls) = rig();
        controls.drag(0.0, 10_000.0, 100.0);
        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(controls.polar() >= POLAR_EPSILON);
        assert!(camera.position.is_finite());
    }
}
