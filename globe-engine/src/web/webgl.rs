// webgl.rs - WebGL2 Device
//
// One canvas per device, appended to the container on creation. Programs
// are compiled once per material kind and shared between materials.
// Textures sample a 1x1 placeholder until their image arrives.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, HtmlElement, HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlTexture, WebGlVertexArrayObject, WebglLoseContext,
};

use super::shaders;
use crate::error::{EngineError, Result};
use crate::render::device::{Device, Frame, GeometryId, MaterialId, TextureId};
use crate::scene::fresnel::rgb;
use crate::scene::geometry::GeometryData;
use crate::scene::texture::{ColorSpace, TextureSpec};
use crate::scene::{Blending, MaterialDesc};
use crate::viewport::Viewport;

const POSITION: u32 = 0;
const NORMAL: u32 = 1;
const UV: u32 = 2;
const COLOR: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ProgramKind {
    Phong,
    Emissive,
    Clouds,
    Fresnel,
    Points,
}

impl ProgramKind {
    fn of(desc: &MaterialDesc) -> Self {
        match desc {
            MaterialDesc::Phong { .. } => ProgramKind::Phong,
            MaterialDesc::Emissive { .. } => ProgramKind::Emissive,
            MaterialDesc::Clouds { .. } => ProgramKind::Clouds,
            MaterialDesc::Fresnel(_) => ProgramKind::Fresnel,
            MaterialDesc::Points { .. } => ProgramKind::Points,
        }
    }

    fn sources(self) -> (&'static str, String) {
        match self {
            ProgramKind::Phong => (shaders::MESH_VERT, shaders::phong_frag()),
            ProgramKind::Emissive => (shaders::MESH_VERT, shaders::EMISSIVE_FRAG.to_string()),
            ProgramKind::Clouds => (shaders::MESH_VERT, shaders::clouds_frag()),
            ProgramKind::Fresnel => (shaders::MESH_VERT, shaders::FRESNEL_FRAG.to_string()),
            ProgramKind::Points => (shaders::POINTS_VERT, shaders::POINTS_FRAG.to_string()),
        }
    }
}

struct GpuGeometry {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    count: i32,
    indexed: bool,
    points: bool,
}

struct GpuTexture {
    texture: WebGlTexture,
    image: HtmlImageElement,
    alive: Rc<Cell<bool>>,
    _onload: Closure<dyn FnMut()>,
}

struct GpuMaterial {
    kind: ProgramKind,
    desc: MaterialDesc,
    textures: Vec<WebGlTexture>,
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader> {
    let shader = gl.create_shader(shader_type).ok_or(EngineError::Resource("shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(EngineError::ShaderCompile(info));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let prog = gl.create_program().ok_or(EngineError::Resource("program"))?;
    gl.attach_shader(&prog, &vert);
    gl.attach_shader(&prog, &frag);
    gl.link_program(&prog);
    // Shaders are only needed until link
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    if !gl.get_program_parameter(&prog, GL::LINK_STATUS).as_bool().unwrap_or(false) {
        let info = gl.get_program_info_log(&prog).unwrap_or_default();
        gl.delete_program(Some(&prog));
        return Err(EngineError::ProgramLink(info));
    }
    Ok(prog)
}

pub struct WebGlDevice {
    gl: GL,
    canvas: HtmlCanvasElement,
    viewport: Option<Viewport>,
    programs: HashMap<ProgramKind, WebGlProgram>,
    geometries: HashMap<GeometryId, GpuGeometry>,
    textures: HashMap<TextureId, GpuTexture>,
    materials: HashMap<MaterialId, GpuMaterial>,
    next_id: u32,
    context_lost: bool,
}

impl WebGlDevice {
    /// Create a canvas filling `container` and a WebGL2 context on it.
    /// The canvas is removed again when no context can be had.
    pub fn create(container: &HtmlElement) -> Result<Self> {
        let document = super::document()?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| EngineError::Resource("canvas"))?;
        let style = canvas.style();
        style.set_property("display", "block")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;

        let options = Object::new();
        Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)?;
        Reflect::set(&options, &"alpha".into(), &JsValue::TRUE)?;
        Reflect::set(&options, &"premultipliedAlpha".into(), &JsValue::FALSE)?;

        // Context first: the canvas joins the page only once it can draw
        let gl = match canvas.get_context_with_context_options("webgl2", &options) {
            Ok(Some(context)) => context
                .dyn_into::<GL>()
                .map_err(|_| EngineError::ContextUnavailable("webgl2".into()))?,
            _ => return Err(EngineError::ContextUnavailable("webgl2".into())),
        };
        container.append_child(&canvas)?;

        gl.enable(GL::DEPTH_TEST);
        gl.depth_func(GL::LEQUAL);
        gl.enable(GL::CULL_FACE);
        gl.cull_face(GL::BACK);

        Ok(Self {
            gl,
            canvas,
            viewport: None,
            programs: HashMap::new(),
            geometries: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            next_id: 0,
            context_lost: false,
        })
    }

    fn mint(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn program(&mut self, kind: ProgramKind) -> Result<WebGlProgram> {
        if let Some(prog) = self.programs.get(&kind) {
            return Ok(prog.clone());
        }
        let (vert, frag) = kind.sources();
        let prog = link_program(&self.gl, vert, &frag)?;
        self.programs.insert(kind, prog.clone());
        Ok(prog)
    }

    fn upload(&self, location: u32, size: i32, data: &[f32]) -> Result<WebGlBuffer> {
        let gl = &self.gl;
        let buffer = gl.create_buffer().ok_or(EngineError::Resource("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &Float32Array::from(data), GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
        Ok(buffer)
    }

    /// Upload into the bound VAO; every buffer created lands in `buffers`
    /// even when a later one fails. Returns (draw count, indexed).
    fn fill_vertex_array(&self, data: &GeometryData, buffers: &mut Vec<WebGlBuffer>) -> Result<(i32, bool)> {
        match data {
            GeometryData::Mesh(mesh) => {
                buffers.push(self.upload(POSITION, 3, &mesh.positions)?);
                buffers.push(self.upload(NORMAL, 3, &mesh.normals)?);
                buffers.push(self.upload(UV, 2, &mesh.uvs)?);
                let indices = self.gl.create_buffer().ok_or(EngineError::Resource("index buffer"))?;
                self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
                self.gl.buffer_data_with_array_buffer_view(
                    GL::ELEMENT_ARRAY_BUFFER,
                    &Uint32Array::from(mesh.indices.as_slice()),
                    GL::STATIC_DRAW,
                );
                buffers.push(indices);
                Ok((mesh.indices.len() as i32, true))
            }
            GeometryData::Points(points) => {
                buffers.push(self.upload(POSITION, 3, &points.positions)?);
                buffers.push(self.upload(COLOR, 3, &points.colors)?);
                Ok((data.vertex_count() as i32, false))
            }
        }
    }

    fn bind_texture(&self, prog: &WebGlProgram, name: &str, unit: u32, texture: &WebGlTexture) {
        let gl = &self.gl;
        gl.active_texture(GL::TEXTURE0 + unit);
        gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        gl.uniform1i(gl.get_uniform_location(prog, name).as_ref(), unit as i32);
    }

    fn set_f32(&self, prog: &WebGlProgram, name: &str, value: f32) {
        self.gl.uniform1f(self.gl.get_uniform_location(prog, name).as_ref(), value);
    }

    fn set_vec3(&self, prog: &WebGlProgram, name: &str, v: [f32; 3]) {
        self.gl.uniform3f(self.gl.get_uniform_location(prog, name).as_ref(), v[0], v[1], v[2]);
    }

    fn set_mat4(&self, prog: &WebGlProgram, name: &str, m: &glam::Mat4) {
        self.gl
            .uniform_matrix4fv_with_f32_array(self.gl.get_uniform_location(prog, name).as_ref(), false, &m.to_cols_array());
    }

    fn apply_blending(&self, desc: &MaterialDesc) {
        let gl = &self.gl;
        if !desc.is_transparent() {
            gl.disable(GL::BLEND);
            gl.depth_mask(true);
            return;
        }
        gl.enable(GL::BLEND);
        gl.depth_mask(false);
        match desc.blending() {
            Blending::Additive => gl.blend_func(GL::SRC_ALPHA, GL::ONE),
            Blending::Normal => gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA),
        }
    }

    fn set_material_uniforms(&self, material: &GpuMaterial, prog: &WebGlProgram, frame: &Frame<'_>) {
        if let Some(light) = frame.light {
            self.set_vec3(prog, "u_light_position", light.position.to_array());
            self.set_vec3(prog, "u_light_color", light.color);
            self.set_f32(prog, "u_light_intensity", light.intensity);
        }
        self.set_vec3(prog, "u_camera_position", frame.camera_position.to_array());

        match &material.desc {
            MaterialDesc::Phong { bump_scale, .. } => {
                self.bind_texture(prog, "u_map", 0, &material.textures[0]);
                self.bind_texture(prog, "u_specular_map", 1, &material.textures[1]);
                self.bind_texture(prog, "u_bump_map", 2, &material.textures[2]);
                self.set_f32(prog, "u_bump_scale", *bump_scale);
            }
            MaterialDesc::Emissive { .. } => {
                self.bind_texture(prog, "u_map", 0, &material.textures[0]);
            }
            MaterialDesc::Clouds { opacity, .. } => {
                self.bind_texture(prog, "u_map", 0, &material.textures[0]);
                self.bind_texture(prog, "u_alpha_map", 1, &material.textures[1]);
                self.set_f32(prog, "u_opacity", *opacity);
            }
            MaterialDesc::Fresnel(params) => {
                self.set_vec3(prog, "u_rim_color", rgb(params.rim_color));
                self.set_vec3(prog, "u_facing_color", rgb(params.facing_color));
                self.set_f32(prog, "u_bias", params.bias);
                self.set_f32(prog, "u_scale", params.scale);
                self.set_f32(prog, "u_power", params.power);
                self.set_f32(prog, "u_opacity", params.opacity);
            }
            MaterialDesc::Points { size, .. } => {
                self.bind_texture(prog, "u_map", 0, &material.textures[0]);
                self.set_f32(prog, "u_size", *size);
                let height = self.viewport.map(|v| v.buffer_size().1).unwrap_or(1);
                self.set_f32(prog, "u_point_scale", height as f32 / 2.0);
            }
        }
    }
}

impl Device for WebGlDevice {
    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.buffer_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.viewport = Some(*viewport);
    }

    fn create_geometry(&mut self, data: &GeometryData) -> Result<GeometryId> {
        let vao = self.gl.create_vertex_array().ok_or(EngineError::Resource("vertex array"))?;
        self.gl.bind_vertex_array(Some(&vao));
        let mut buffers = Vec::new();
        let uploaded = self.fill_vertex_array(data, &mut buffers);
        self.gl.bind_vertex_array(None);

        let geometry = match uploaded {
            Ok((count, indexed)) => GpuGeometry {
                vao,
                buffers,
                count,
                indexed,
                points: matches!(data, GeometryData::Points(_)),
            },
            Err(e) => {
                for buffer in &buffers {
                    self.gl.delete_buffer(Some(buffer));
                }
                self.gl.delete_vertex_array(Some(&vao));
                return Err(e);
            }
        };

        let id = GeometryId(self.mint());
        self.geometries.insert(id, geometry);
        Ok(id)
    }

    fn load_texture(&mut self, spec: &TextureSpec) -> Result<TextureId> {
        let gl = self.gl.clone();
        let texture = gl.create_texture().ok_or(EngineError::Resource("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            1,
            1,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            Some(&[0u8, 0, 0, 0][..]),
        )?;

        let internal_format = match spec.color_space {
            ColorSpace::Srgb => GL::SRGB8_ALPHA8,
            ColorSpace::Linear => GL::RGBA8,
        };
        let image = HtmlImageElement::new()?;
        image.set_cross_origin(Some("anonymous"));
        let alive = Rc::new(Cell::new(true));

        let loaded = image.clone();
        let target = texture.clone();
        let still_alive = alive.clone();
        let url = spec.url.clone();
        let onload = Closure::wrap(Box::new(move || {
            if !still_alive.get() || gl.is_context_lost() {
                return;
            }
            gl.bind_texture(GL::TEXTURE_2D, Some(&target));
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
            let uploaded = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                internal_format as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                &loaded,
            );
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
            if uploaded.is_err() {
                log::warn!("texture upload failed: {url}");
                return;
            }
            gl.generate_mipmap(GL::TEXTURE_2D);
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR_MIPMAP_LINEAR as i32);
            gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        }) as Box<dyn FnMut()>);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_src(&spec.url);

        let id = TextureId(self.mint());
        self.textures.insert(id, GpuTexture { texture, image, alive, _onload: onload });
        Ok(id)
    }

    fn create_material(&mut self, desc: &MaterialDesc, textures: &[TextureId]) -> Result<MaterialId> {
        let kind = ProgramKind::of(desc);
        self.program(kind)?;
        let bound = desc
            .textures()
            .into_iter()
            .map(|slot| {
                textures
                    .get(slot)
                    .and_then(|id| self.textures.get(id))
                    .map(|t| t.texture.clone())
                    .ok_or(EngineError::Resource("material texture"))
            })
            .collect::<Result<Vec<_>>>()?;

        let id = MaterialId(self.mint());
        self.materials.insert(id, GpuMaterial { kind, desc: desc.clone(), textures: bound });
        Ok(id)
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        if self.context_lost || self.gl.is_context_lost() {
            return;
        }
        let gl = &self.gl;
        let [r, g, b, a] = frame.clear_color;
        gl.clear_color(r, g, b, a);
        gl.depth_mask(true);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        for item in frame.items {
            let (Some(geometry), Some(material)) =
                (self.geometries.get(&item.geometry), self.materials.get(&item.material))
            else {
                continue;
            };
            let Some(prog) = self.programs.get(&material.kind) else {
                continue;
            };

            gl.use_program(Some(prog));
            self.apply_blending(&material.desc);
            self.set_mat4(prog, "u_model", &item.model);
            self.set_mat4(prog, "u_view", &frame.view);
            self.set_mat4(prog, "u_projection", &frame.projection);
            self.set_material_uniforms(material, prog, frame);

            gl.bind_vertex_array(Some(&geometry.vao));
            if geometry.points {
                gl.draw_arrays(GL::POINTS, 0, geometry.count);
            } else if geometry.indexed {
                gl.draw_elements_with_i32(GL::TRIANGLES, geometry.count, GL::UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(GL::TRIANGLES, 0, geometry.count);
            }
        }
        gl.bind_vertex_array(None);
        gl.depth_mask(true);
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if let Some(geometry) = self.geometries.remove(&id) {
            for buffer in &geometry.buffers {
                self.gl.delete_buffer(Some(buffer));
            }
            self.gl.delete_vertex_array(Some(&geometry.vao));
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        // Programs are shared and go with the context
        self.materials.remove(&id);
    }

    fn release_texture(&mut self, id: TextureId) {
        if let Some(texture) = self.textures.remove(&id) {
            texture.alive.set(false);
            texture.image.set_onload(None);
            self.gl.delete_texture(Some(&texture.texture));
        }
    }

    fn dispose_context(&mut self) {
        if self.context_lost {
            return;
        }
        self.context_lost = true;
        for prog in self.programs.values() {
            self.gl.delete_program(Some(prog));
        }
        self.programs.clear();
        if let Ok(Some(ext)) = self.gl.get_extension("WEBGL_lose_context") {
            ext.unchecked_into::<WebglLoseContext>().lose_context();
        }
    }

    fn detach_surface(&mut self) {
        if self.canvas.parent_node().is_some() {
            self.canvas.remove();
        }
    }
}
