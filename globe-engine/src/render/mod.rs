// render/ - Scene renderer
//
// Turns a SceneGraph into device resources, animates it one step per frame
// and releases everything on teardown. Acquisitions are recorded in
// GpuResources as they happen so a partial build can be unwound.

pub mod device;
pub mod view;

use glam::Mat4;

use crate::error::Result;
use crate::scene::SceneGraph;
use crate::scene::animation::light_position;
use crate::scene::camera::Camera;
use crate::scene::controls::OrbitControls;
use crate::viewport::Viewport;
use device::{Device, DrawItem, Frame, FrameLight, GeometryId, MaterialId, TextureId};

#[derive(Debug, Default)]
struct GpuResources {
    geometry: Option<GeometryId>,
    textures: Vec<TextureId>,
    materials: Vec<MaterialId>,
}

impl GpuResources {
    fn is_empty(&self) -> bool {
        self.geometry.is_none() && self.textures.is_empty() && self.materials.is_empty()
    }
}

pub struct SceneRenderer<D: Device> {
    device: D,
    graph: SceneGraph,
    camera: Camera,
    controls: Option<OrbitControls>,
    viewport: Viewport,
    gpu: GpuResources,
    // Layer index per draw slot, opaque layers first
    order: Vec<usize>,
    items: Vec<DrawItem>,
    frames: u64,
    torn_down: bool,
}

impl<D: Device> SceneRenderer<D> {
    /// Size the surface, upload the shared geometry, start every texture
    /// load and create one material per layer. On failure everything
    /// acquired so far is released before the error is returned.
    pub fn build(device: D, graph: SceneGraph, viewport: Viewport) -> Result<Self> {
        let camera = Camera::new(&graph.camera, viewport.aspect());
        let controls = graph
            .orbit
            .map(|(damping, speed)| OrbitControls::new(&camera, damping, speed));

        let mut order: Vec<usize> = (0..graph.layers.len()).collect();
        order.sort_by_key(|&i| graph.layers[i].material.is_transparent());

        let mut renderer = Self {
            device,
            graph,
            camera,
            controls,
            viewport,
            gpu: GpuResources::default(),
            order,
            items: Vec::new(),
            frames: 0,
            torn_down: false,
        };

        if let Err(e) = renderer.acquire() {
            log::warn!("scene build failed: {e}");
            renderer.teardown();
            return Err(e);
        }

        log::debug!(
            "scene built: {} layers, {} textures, {} vertices",
            renderer.graph.layers.len(),
            renderer.gpu.textures.len(),
            renderer.graph.geometry.vertex_count(),
        );
        Ok(renderer)
    }

    fn acquire(&mut self) -> Result<()> {
        self.device.resize(&self.viewport);

        let geometry = self.device.create_geometry(&self.graph.geometry)?;
        self.gpu.geometry = Some(geometry);

        for spec in &self.graph.textures {
            let id = self.device.load_texture(spec)?;
            self.gpu.textures.push(id);
        }

        for layer in &self.graph.layers {
            let id = self.device.create_material(&layer.material, &self.gpu.textures)?;
            self.gpu.materials.push(id);
        }

        self.items = self
            .order
            .iter()
            .map(|&i| DrawItem {
                geometry,
                material: self.gpu.materials[i],
                model: Mat4::IDENTITY,
            })
            .collect();
        Ok(())
    }

    /// One animation step followed by one draw.
    pub fn frame(&mut self) {
        if self.torn_down {
            return;
        }

        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        let light = self.graph.light.map(|l| FrameLight {
            position: light_position(self.camera.orientation(), l.offset),
            color: l.color,
            intensity: l.intensity,
        });

        self.graph.advance();
        for (item, &i) in self.items.iter_mut().zip(&self.order) {
            item.model = self.graph.layer_model(&self.graph.layers[i]);
        }

        let frame = Frame {
            view: self.camera.view(),
            projection: self.camera.projection(),
            camera_position: self.camera.position,
            light,
            clear_color: self.graph.clear_color,
            items: &self.items,
        };
        self.device.draw(&frame);
        self.frames += 1;
    }

    /// New container size in CSS pixels; zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.torn_down {
            return;
        }
        let Some(viewport) = self.viewport.resized(width, height) else {
            return;
        };
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.device.resize(&viewport);
    }

    /// Pointer drag in CSS pixels. Static scenes ignore it.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if let Some(controls) = self.controls.as_mut() {
            controls.drag(dx, dy, self.viewport.height as f32);
        }
    }

    /// Release every device resource, then the context, then the surface.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.items.clear();

        for id in self.gpu.materials.drain(..) {
            self.device.release_material(id);
        }
        for id in self.gpu.textures.drain(..) {
            self.device.release_texture(id);
        }
        if let Some(id) = self.gpu.geometry.take() {
            self.device.release_geometry(id);
        }

        self.device.dispose_context();
        self.device.detach_surface();
        debug_assert!(self.gpu.is_empty());
        log::debug!("scene torn down after {} frames", self.frames);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }
}

impl<D: Device> Drop for SceneRenderer<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
