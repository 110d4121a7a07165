// viewport.rs - Rendering surface sizing
//
// CSS size comes from the container; the drawing buffer is CSS size times
// the clamped device pixel ratio.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    /// None when the container has no usable area yet
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixel_ratio: effective_pixel_ratio(device_pixel_ratio, max_pixel_ratio),
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Drawing buffer size in physical pixels
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.pixel_ratio).round().max(1.0) as u32,
            (self.height as f64 * self.pixel_ratio).round().max(1.0) as u32,
        )
    }

    pub fn resized(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height, pixel_ratio: self.pixel_ratio })
    }
}

/// Device pixel ratio capped to bound GPU cost on dense displays
#[inline]
pub fn effective_pixel_ratio(device: f64, max: f64) -> f64 {
    if !device.is_finite() || device <= 0.0 {
        return 1.0_f64.min(max);
    }
    device.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_dense_displays() {
        assert_eq!(effective_pixel_ratio(3.0, 1.75), 1.75);
        assert_eq!(effective_pixel_ratio(2.0, 1.75), 1.75);
        assert_eq!(effective_pixel_ratio(1.5, 1.75), 1.5);
        for dpr in [1.76, 2.25, 4.0, 8.0] {
            assert!(effective_pixel_ratio(dpr, 1.75) <= 1.75);
        }
    }

    #[test]
    fn garbage_ratio_falls_back_to_one() {
        assert_eq!(effective_pixel_ratio(f64::NAN, 1.75), 1.0);
        assert_eq!(effective_pixel_ratio(0.0, 1.75), 1.0);
    }

    #[test]
    fn buffer_scales_by_ratio() {
        let vp = Viewport::new(400, 300, 3.0, 1.75).unwrap();
        assert_eq!(vp.buffer_size(), (700, 525));
        assert!((vp.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_container_has_no_viewport() {
        assert!(Viewport::new(0, 300, 1.0, 1.75).is_none());
        assert!(Viewport::new(300, 300, 1.0, 1.75).unwrap().resized(300, 0).is_none());
    }
}
