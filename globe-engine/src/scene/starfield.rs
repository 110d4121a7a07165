// starfield.rs - Background star point cloud
//
// Stars sit on random shells between radius_min and radius_max, uniformly
// distributed over the sphere. Colour is a fixed bluish hue with random
// lightness so brightness varies star to star.

use std::f32::consts::PI;

use super::geometry::PointData;
use crate::config::StarfieldConfig;

pub fn generate(config: &StarfieldConfig) -> PointData {
    let mut rng = config.seed.max(1);
    let mut stars = PointData {
        positions: Vec::with_capacity(config.count * 3),
        colors: Vec::with_capacity(config.count * 3),
    };

    for _ in 0..config.count {
        let radius = config.radius_min + rand(&mut rng) * (config.radius_max - config.radius_min);

        // Inverse-CDF on cos(phi) gives an even spread instead of pole clumping
        let theta = 2.0 * PI * rand(&mut rng);
        let phi = (2.0 * rand(&mut rng) - 1.0).clamp(-1.0, 1.0).acos();

        stars.positions.extend_from_slice(&[
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        ]);

        let (r, g, b) = hsl_to_rgb(config.hue, config.saturation, rand(&mut rng));
        stars.colors.extend_from_slice(&[r, g, b]);
    }

    stars
}

/// xorshift32, returns [0, 1)
#[inline(always)]
fn rand(rng: &mut u32) -> f32 {
    *rng ^= *rng << 13;
    *rng ^= *rng >> 17;
    *rng ^= *rng << 5;
    (*rng >> 8) as f32 * (1.0 / 16777216.0)
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let low = 2.0 * l - high;

    (
        hue_to_rgb(low, high, h + 1.0 / 3.0),
        hue_to_rgb(low, high, h),
        hue_to_rgb(low, high, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(low: f32, high: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radii_in_range() {
        let config = StarfieldConfig::default();
        let stars = generate(&config);
        assert_eq!(stars.positions.len(), config.count * 3);
        assert_eq!(stars.colors.len(), config.count * 3);
        for p in stars.positions.chunks_exact(3) {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!(r >= config.radius_min - 1e-3 && r < config.radius_max + 1e-3, "r = {r}");
        }
    }

    #[test]
    fn hemispheres_roughly_balanced() {
        let stars = generate(&StarfieldConfig { count: 4000, ..Default::default() });
        let north = stars.positions.chunks_exact(3).filter(|p| p[2] > 0.0).count();
        assert!((1700..2300).contains(&north), "north = {north}");
    }

    #[test]
    fn same_seed_same_sky() {
        let config = StarfieldConfig { count: 50, ..Default::default() };
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn hsl_matches_reference_values() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < 1e-6 && g.abs() < 1e-6 && b.abs() < 1e-6);

        // Low saturation blue stays close to grey, blue channel on top
        let (r, g, b) = hsl_to_rgb(0.6, 0.2, 0.5);
        assert!(b > g && g > r);
        assert!((b - 0.6).abs() < 1e-5 && (r - 0.4).abs() < 1e-5);
    }
}
