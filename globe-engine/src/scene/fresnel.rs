// fresnel.rs - View-angle glow for the atmosphere shell
//
// CPU mirror of the glow shader so the curve can be checked without a GPU.

use glam::Vec3;

use crate::config::FresnelParams;

/// bias + scale * (1 + I.N)^power, clamped to [0, 1].
/// `incident` points from the camera to the surface point.
pub fn reflection_factor(incident: Vec3, normal: Vec3, params: &FresnelParams) -> f32 {
    let i = incident.normalize_or_zero();
    let n = normal.normalize_or_zero();
    let base = (1.0 + i.dot(n)).max(0.0);
    (params.bias + params.scale * base.powf(params.power)).clamp(0.0, 1.0)
}

/// Shaded colour and alpha for a given factor
pub fn shade(factor: f32, params: &FresnelParams) -> ([f32; 3], f32) {
    let rim = rgb(params.rim_color);
    let facing = rgb(params.facing_color);
    let f = factor.clamp(0.0, 1.0);
    let mixed = [
        facing[0] + (rim[0] - facing[0]) * f,
        facing[1] + (rim[1] - facing[1]) * f,
        facing[2] + (rim[2] - facing[2]) * f,
    ];
    (mixed, f * params.opacity)
}

/// 0xRRGGBB to linear-agnostic float triple
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brighter_toward_silhouette() {
        let params = FresnelParams::default();
        let normal = Vec3::Z;

        // Looking straight at the surface
        let facing = reflection_factor(Vec3::NEG_Z, normal, &params);
        // Grazing the edge
        let grazing = reflection_factor(Vec3::new(1.0, 0.0, -0.05), normal, &params);
        let edge = reflection_factor(Vec3::X, normal, &params);

        assert!((facing - params.bias).abs() < 1e-6);
        assert!(grazing > facing);
        assert!(edge >= grazing);
        assert!((edge - 1.0).abs() < 1e-6);
    }

    #[test]
    fn glow_alpha_scaled_by_opacity() {
        let params = FresnelParams::default();
        let (color, alpha) = shade(1.0, &params);
        assert!((alpha - 0.3).abs() < 1e-6);
        assert_eq!(color, rgb(0x0088ff));

        let (color, alpha) = shade(0.0, &params);
        assert_eq!(alpha, 0.0);
        assert_eq!(color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn hex_unpacks() {
        assert_eq!(rgb(0xff8000), [1.0, 128.0 / 255.0, 0.0]);
    }
}
