// device.rs - Graphics device seam
//
// The renderer only ever talks to a Device. Handles are opaque ids minted
// by the device; every id returned by a create/load call must be passed to
// the matching release call exactly once.

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::scene::MaterialDesc;
use crate::scene::geometry::GeometryData;
use crate::scene::texture::TextureSpec;
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub model: Mat4,
}

/// Everything needed to render one frame
#[derive(Debug)]
pub struct Frame<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub light: Option<FrameLight>,
    pub clear_color: [f32; 4],
    /// Opaque items first, then blended items in draw order
    pub items: &'a [DrawItem],
}

pub trait Device {
    /// Match the surface to the viewport's CSS size and drawing buffer.
    fn resize(&mut self, viewport: &Viewport);

    fn create_geometry(&mut self, data: &GeometryData) -> Result<GeometryId>;

    /// Start loading a texture. The handle is usable immediately and samples
    /// a placeholder until the image arrives.
    fn load_texture(&mut self, spec: &TextureSpec) -> Result<TextureId>;

    /// `textures[slot]` resolves the texture slots named in `desc`.
    fn create_material(&mut self, desc: &MaterialDesc, textures: &[TextureId]) -> Result<MaterialId>;

    fn draw(&mut self, frame: &Frame<'_>);

    fn release_geometry(&mut self, id: GeometryId);
    fn release_material(&mut self, id: MaterialId);
    fn release_texture(&mut self, id: TextureId);

    /// Give the rendering context back to the host. Safe to call twice.
    fn dispose_context(&mut self);

    /// Remove the surface from its container if it was ever inserted.
    fn detach_surface(&mut self);
}
