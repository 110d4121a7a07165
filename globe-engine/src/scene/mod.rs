// scene/ - Scene graph description
//
// A SceneGraph is plain data: one shared base geometry, the textures it
// references, and an ordered list of layers drawn with it. Nothing here
// touches the GPU; render/ turns a graph into device resources.

pub mod animation;
pub mod camera;
pub mod controls;
pub mod fresnel;
pub mod geometry;
pub mod starfield;
pub mod texture;

use glam::{Mat4, Vec3};

use crate::config::{CameraConfig, FresnelParams, GlobeConfig, StarfieldConfig};
use animation::Spin;
use geometry::{GeometryData, MeshData};
use texture::{ColorSpace, TextureRole, TextureSpec};

/// Index into SceneGraph::textures
pub type TextureSlot = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blending {
    Normal,
    Additive,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MaterialDesc {
    /// Lit opaque surface with specular and bump maps
    Phong {
        map: TextureSlot,
        specular_map: TextureSlot,
        bump_map: TextureSlot,
        bump_scale: f32,
    },
    /// Unlit texture, additive
    Emissive { map: TextureSlot },
    /// Lit translucent layer with a separate alpha map, additive
    Clouds {
        map: TextureSlot,
        alpha_map: TextureSlot,
        opacity: f32,
    },
    /// View-angle glow
    Fresnel(FresnelParams),
    /// Vertex-coloured sprites
    Points { map: TextureSlot, size: f32 },
}

impl MaterialDesc {
    pub fn blending(&self) -> Blending {
        match self {
            MaterialDesc::Phong { .. } | MaterialDesc::Points { .. } => Blending::Normal,
            _ => Blending::Additive,
        }
    }

    pub fn is_transparent(&self) -> bool {
        !matches!(self, MaterialDesc::Phong { .. } | MaterialDesc::Points { .. })
    }

    pub fn textures(&self) -> Vec<TextureSlot> {
        match *self {
            MaterialDesc::Phong { map, specular_map, bump_map, .. } => vec![map, specular_map, bump_map],
            MaterialDesc::Emissive { map } => vec![map],
            MaterialDesc::Clouds { map, alpha_map, .. } => vec![map, alpha_map],
            MaterialDesc::Fresnel(_) => Vec::new(),
            MaterialDesc::Points { map, .. } => vec![map],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: &'static str,
    pub material: MaterialDesc,
    pub scale: f32,
    pub spin: Spin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Offset in camera space
    pub offset: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    pub geometry: GeometryData,
    pub textures: Vec<TextureSpec>,
    pub layers: Vec<Layer>,
    /// Group rotation about Z, radians
    pub tilt: f32,
    pub light: Option<DirectionalLight>,
    pub camera: CameraConfig,
    pub clear_color: [f32; 4],
    /// Orbit controls as (damping, rotate speed); None for static scenes
    pub orbit: Option<(f32, f32)>,
}

impl SceneGraph {
    /// Earth with night lights, clouds and atmosphere
    pub fn globe(config: &GlobeConfig) -> Self {
        let textures = texture::earth_textures(&config.texture_path);
        let slot = |role: TextureRole| {
            textures
                .iter()
                .position(|t| t.role == role)
                .unwrap_or_default()
        };

        let surface = Spin::new(config.surface_spin);
        let layers = vec![
            Layer {
                name: "surface",
                material: MaterialDesc::Phong {
                    map: slot(TextureRole::Surface),
                    specular_map: slot(TextureRole::Specular),
                    bump_map: slot(TextureRole::Bump),
                    bump_scale: config.bump_scale,
                },
                scale: 1.0,
                spin: surface,
            },
            Layer {
                name: "lights",
                material: MaterialDesc::Emissive { map: slot(TextureRole::NightLights) },
                scale: 1.0,
                spin: surface,
            },
            Layer {
                name: "clouds",
                material: MaterialDesc::Clouds {
                    map: slot(TextureRole::CloudColor),
                    alpha_map: slot(TextureRole::CloudAlpha),
                    opacity: config.clouds_opacity,
                },
                scale: config.clouds_scale,
                spin: Spin::new(config.clouds_spin),
            },
            Layer {
                name: "glow",
                material: MaterialDesc::Fresnel(config.fresnel.clone()),
                scale: config.glow_scale,
                spin: surface,
            },
        ];

        Self {
            geometry: GeometryData::Mesh(MeshData::sphere(
                config.radius,
                config.width_segments,
                config.height_segments,
            )),
            textures,
            layers,
            tilt: config.tilt_degrees.to_radians(),
            light: Some(DirectionalLight {
                color: [1.0, 1.0, 1.0],
                intensity: config.light_intensity,
                offset: Vec3::from_array(config.light_offset),
            }),
            camera: config.camera.clone(),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            orbit: Some((config.damping, config.rotate_speed)),
        }
    }

    /// Slowly turning star cloud on an opaque black background
    pub fn starfield(config: &StarfieldConfig) -> Self {
        Self {
            geometry: GeometryData::Points(starfield::generate(config)),
            textures: vec![TextureSpec {
                role: TextureRole::StarSprite,
                url: config.sprite.clone(),
                color_space: ColorSpace::Linear,
            }],
            layers: vec![Layer {
                name: "stars",
                material: MaterialDesc::Points { map: 0, size: config.size },
                scale: 1.0,
                spin: Spin::new(config.spin),
            }],
            tilt: 0.0,
            light: None,
            camera: config.camera.clone(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            orbit: None,
        }
    }

    pub fn layer_model(&self, layer: &Layer) -> Mat4 {
        Mat4::from_rotation_z(self.tilt)
            * Mat4::from_rotation_y(layer.spin.angle)
            * Mat4::from_scale(Vec3::splat(layer.scale))
    }

    pub fn advance(&mut self) {
        for layer in &mut self.layers {
            layer.spin.advance();
        }
    }
}
