// animation.rs - Per-frame animation state
//
// Angles only ever grow by a fixed step per rendered frame; there is no
// time-based interpolation, so a slow frame simply delays the next step.

use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub angle: f32,
    pub step: f32,
}

impl Spin {
    pub fn new(step: f32) -> Self {
        Self { angle: 0.0, step }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.angle += self.step;
    }
}

/// Light position that keeps a fixed offset in camera space, so the lit
/// side follows the viewer as they orbit.
#[inline]
pub fn light_position(camera_orientation: Quat, offset: Vec3) -> Vec3 {
    camera_orientation * offset
}
