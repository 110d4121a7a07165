// config.rs - Component configuration
//
// Every field has a default matching the shipped site. JSON overrides are
// partial: missing keys keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Perspective camera shared by both scenes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

/// Atmosphere shell shading
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FresnelParams {
    pub rim_color: u32,
    pub facing_color: u32,
    pub bias: f32,
    pub scale: f32,
    pub power: f32,
    pub opacity: f32,
}

impl Default for FresnelParams {
    fn default() -> Self {
        Self {
            rim_color: 0x0088ff,
            facing_color: 0x000000,
            bias: 0.1,
            scale: 1.0,
            power: 4.0,
            opacity: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub camera: CameraConfig,
    pub max_pixel_ratio: f64,
    pub texture_path: String,
    pub radius: f32,
    pub tilt_degrees: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub bump_scale: f32,
    pub clouds_opacity: f32,
    pub clouds_scale: f32,
    pub glow_scale: f32,
    pub light_intensity: f32,
    pub light_offset: [f32; 3],
    pub damping: f32,
    pub rotate_speed: f32,
    pub surface_spin: f32,
    pub clouds_spin: f32,
    pub fresnel: FresnelParams,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            max_pixel_ratio: 1.75,
            texture_path: "/textures/earth/".into(),
            radius: 2.592,
            tilt_degrees: -23.4,
            width_segments: 96,
            height_segments: 64,
            bump_scale: 0.04,
            clouds_opacity: 0.8,
            clouds_scale: 1.003,
            glow_scale: 1.01,
            light_intensity: 2.0,
            light_offset: [-5.0, 0.0, 0.0],
            damping: 0.05,
            rotate_speed: 0.5,
            surface_spin: 0.002,
            clouds_spin: 0.0023,
            fresnel: FresnelParams::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_camera(&self.camera)?;
        positive("max_pixel_ratio", self.max_pixel_ratio as f32)?;
        positive("radius", self.radius)?;
        positive("clouds_scale", self.clouds_scale)?;
        positive("glow_scale", self.glow_scale)?;
        if self.width_segments < 3 || self.height_segments < 2 {
            return Err(EngineError::Config("sphere needs at least 3x2 segments".into()));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(EngineError::Config("damping must be within [0, 1]".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub camera: CameraConfig,
    pub max_pixel_ratio: f64,
    pub count: usize,
    pub sprite: String,
    pub radius_min: f32,
    pub radius_max: f32,
    pub hue: f32,
    pub saturation: f32,
    pub size: f32,
    pub spin: f32,
    pub seed: u32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            max_pixel_ratio: 1.75,
            count: 1500,
            sprite: "/textures/earth/stars/circle.png".into(),
            radius_min: 25.0,
            radius_max: 50.0,
            hue: 0.6,
            saturation: 0.2,
            size: 0.2,
            spin: -0.0002,
            seed: 0x5EED_0001,
        }
    }
}

impl StarfieldConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_camera(&self.camera)?;
        positive("max_pixel_ratio", self.max_pixel_ratio as f32)?;
        positive("size", self.size)?;
        positive("radius_min", self.radius_min)?;
        if self.radius_max < self.radius_min {
            return Err(EngineError::Config("radius_max below radius_min".into()));
        }
        Ok(())
    }
}

/// Timing for the metrics sampler
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub fps_window_ms: f64,
    pub memory_period_ms: u32,
    pub initial_fps: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            fps_window_ms: 1000.0,
            memory_period_ms: 1000,
            initial_fps: 60,
        }
    }
}

fn validate_camera(camera: &CameraConfig) -> Result<()> {
    positive("camera.fov_degrees", camera.fov_degrees)?;
    positive("camera.near", camera.near)?;
    if camera.far <= camera.near {
        return Err(EngineError::Config("camera.far must exceed camera.near".into()));
    }
    Ok(())
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::Config(format!("{name} must be positive")))
    }
}
