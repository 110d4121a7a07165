// maps.rs - Equirectangular map resizing

use std::path::Path;

use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Map size for a given width; equirectangular maps are 2:1
pub fn target_size(width: u32) -> Result<(u32, u32)> {
    if width < 2 {
        bail!("--width must be at least 2, got {width}");
    }
    Ok((width, width / 2))
}

pub fn resize(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8()
}

/// Load, resize and save one map. JPEG has no alpha, so output is RGB.
pub fn resize_map(src: &Path, dst: &Path, width: u32, height: u32) -> Result<()> {
    let img = image::open(src).with_context(|| format!("reading {}", src.display()))?;
    resize(&img, width, height)
        .save(dst)
        .with_context(|| format!("writing {}", dst.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn half_height() {
        assert_eq!(target_size(2048).unwrap(), (2048, 1024));
        assert_eq!(target_size(1025).unwrap(), (1025, 512));
        assert!(target_size(1).is_err());
    }

    #[test]
    fn resize_keeps_flat_colour() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([10, 120, 200])));
        let out = resize(&src, 16, 8);
        assert_eq!(out.dimensions(), (16, 8));
        let px = out.get_pixel(8, 4);
        for (got, want) in px.0.iter().zip([10u8, 120, 200]) {
            assert!(got.abs_diff(want) <= 1);
        }
    }
}
