// sprite.rs - Radial star sprite
//
// White disc whose alpha falls off smoothly from the centre to the edge of
// the inscribed circle. Colour is premultiplied by alpha: the points pass
// draws without blending, so outside the circle the sprite must be black.

use image::{Rgba, RgbaImage};

pub fn radial(size: u32) -> RgbaImage {
    let center = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let r = (dx * dx + dy * dy).sqrt() / center;
        let t = (1.0 - r).clamp(0.0, 1.0);
        // smoothstep
        let a = (t * t * (3.0 - 2.0 * t) * 255.0).round() as u8;
        Rgba([a, a, a, a])
    })
}
