// texture.rs - Texture assets by convention
//
// Files live under one base path. Colour maps are sRGB encoded and must be
// decoded on sampling; data maps (bump, alpha) are linear.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureRole {
    Surface,
    Specular,
    Bump,
    NightLights,
    CloudColor,
    CloudAlpha,
    StarSprite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSpec {
    pub role: TextureRole,
    pub url: String,
    pub color_space: ColorSpace,
}

/// Earth maps in load order: (role, file name, colour space)
pub const EARTH_TEXTURES: [(TextureRole, &str, ColorSpace); 6] = [
    (TextureRole::Surface, "00_earthmap1k.jpg", ColorSpace::Srgb),
    (TextureRole::Specular, "02_earthspec1k.jpg", ColorSpace::Srgb),
    (TextureRole::Bump, "01_earthbump1k.jpg", ColorSpace::Linear),
    (TextureRole::NightLights, "03_earthlights1k.jpg", ColorSpace::Srgb),
    (TextureRole::CloudColor, "04_earthcloudmap.jpg", ColorSpace::Srgb),
    (TextureRole::CloudAlpha, "05_earthcloudmaptrans.jpg", ColorSpace::Linear),
];

pub const STAR_SPRITE_FILE: &str = "stars/circle.png";

pub fn earth_textures(base: &str) -> Vec<TextureSpec> {
    EARTH_TEXTURES
        .iter()
        .map(|&(role, file, color_space)| TextureSpec {
            role,
            url: join(base, file),
            color_space,
        })
        .collect()
}

pub fn join(base: &str, file: &str) -> String {
    if base.is_empty() {
        return file.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), file.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_maps_are_linear() {
        let specs = earth_textures("/textures/earth/");
        assert_eq!(specs.len(), 6);
        for spec in &specs {
            let expect = match spec.role {
                TextureRole::Bump | TextureRole::CloudAlpha => ColorSpace::Linear,
                _ => ColorSpace::Srgb,
            };
            assert_eq!(spec.color_space, expect, "{:?}", spec.role);
        }
        assert_eq!(specs[0].url, "/textures/earth/00_earthmap1k.jpg");
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join("a/", "/b.png"), "a/b.png");
        assert_eq!(join("a", "b.png"), "a/b.png");
        assert_eq!(join("", "b.png"), "b.png");
    }
}
