//! A [`Backend`] drawing with WebGL 1.

use std::collections::HashMap;

use web_sys::js_sys::{Float32Array, Uint16Array};
use web_sys::{
    HtmlCanvasElement as Canvas, WebGlBuffer, WebGlProgram,
    WebGlRenderingContext as Gl, WebGlShader, WebGlTexture,
    WebGlUniformLocation,
};

use glimmer_core::gl::{
    Attrib, Backend, BlendFactor, ClearMask, DrawMode, Error, Feature, Image,
    Result, TexParam, TexValue, TextureHandle, Uniform, UniformValue,
    Viewport, Winding,
};
use glimmer_core::math::Color4f;

// The numeric values of the enumerations passed through as is must match
// the WebGL constants.
const _: () = {
    assert!(DrawMode::Points.code() == Gl::POINTS);
    assert!(DrawMode::Lines.code() == Gl::LINES);
    assert!(DrawMode::LineLoop.code() == Gl::LINE_LOOP);
    assert!(DrawMode::LineStrip.code() == Gl::LINE_STRIP);
    assert!(DrawMode::Triangles.code() == Gl::TRIANGLES);
    assert!(DrawMode::TriangleStrip.code() == Gl::TRIANGLE_STRIP);
    assert!(DrawMode::TriangleFan.code() == Gl::TRIANGLE_FAN);

    assert!(BlendFactor::Zero.code() == Gl::ZERO);
    assert!(BlendFactor::One.code() == Gl::ONE);
    assert!(BlendFactor::SrcColor.code() == Gl::SRC_COLOR);
    assert!(BlendFactor::OneMinusSrcColor.code() == Gl::ONE_MINUS_SRC_COLOR);
    assert!(BlendFactor::SrcAlpha.code() == Gl::SRC_ALPHA);
    assert!(BlendFactor::OneMinusSrcAlpha.code() == Gl::ONE_MINUS_SRC_ALPHA);
    assert!(BlendFactor::DstAlpha.code() == Gl::DST_ALPHA);
    assert!(BlendFactor::OneMinusDstAlpha.code() == Gl::ONE_MINUS_DST_ALPHA);
    assert!(BlendFactor::DstColor.code() == Gl::DST_COLOR);
    assert!(BlendFactor::OneMinusDstColor.code() == Gl::ONE_MINUS_DST_COLOR);

    assert!(Winding::Cw.code() == Gl::CW);
    assert!(Winding::Ccw.code() == Gl::CCW);

    assert!(ClearMask::COLOR.bits() == Gl::COLOR_BUFFER_BIT);
    assert!(ClearMask::DEPTH.bits() == Gl::DEPTH_BUFFER_BIT);

    assert!(TexParam::MagFilter.code() == Gl::TEXTURE_MAG_FILTER);
    assert!(TexParam::MinFilter.code() == Gl::TEXTURE_MIN_FILTER);
    assert!(TexParam::WrapS.code() == Gl::TEXTURE_WRAP_S);
    assert!(TexParam::WrapT.code() == Gl::TEXTURE_WRAP_T);

    assert!(TexValue::Nearest.code() == Gl::NEAREST);
    assert!(TexValue::Linear.code() == Gl::LINEAR);
    assert!(TexValue::NearestMipmapNearest.code() == Gl::NEAREST_MIPMAP_NEAREST);
    assert!(TexValue::LinearMipmapNearest.code() == Gl::LINEAR_MIPMAP_NEAREST);
    assert!(TexValue::NearestMipmapLinear.code() == Gl::NEAREST_MIPMAP_LINEAR);
    assert!(TexValue::LinearMipmapLinear.code() == Gl::LINEAR_MIPMAP_LINEAR);
    assert!(TexValue::Repeat.code() == Gl::REPEAT);
};

/// A shader pipeline backed by a WebGL 1 rendering context.
#[derive(Debug)]
pub struct WebGl {
    gl: Gl,
    canvas: Canvas,
    program: Option<WebGlProgram>,
    attribs: HashMap<Attrib, (u32, WebGlBuffer)>,
    uniforms: HashMap<Uniform, Option<WebGlUniformLocation>>,
    index_buf: Option<WebGlBuffer>,
    textures: Vec<WebGlTexture>,
    viewport: Viewport,
}

impl WebGl {
    /// Creates a backend drawing with `gl` to `canvas`, with the viewport
    /// covering the whole canvas.
    pub fn new(gl: Gl, canvas: Canvas) -> Self {
        let viewport = Viewport {
            x: 0,
            y: 0,
            width: canvas.width() as i32,
            height: canvas.height() as i32,
        };
        Self {
            gl,
            canvas,
            program: None,
            attribs: HashMap::new(),
            uniforms: HashMap::new(),
            index_buf: None,
            textures: Vec::new(),
            viewport,
        }
    }

    /// Returns the underlying rendering context.
    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn compile(&self, kind: u32, src: &str) -> Result<WebGlShader> {
        let gl = &self.gl;
        let shader = gl
            .create_shader(kind)
            .ok_or_else(|| failure("could not create shader"))?;
        gl.shader_source(&shader, src);
        gl.compile_shader(&shader);
        let ok = gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(shader)
        } else {
            let info = gl.get_shader_info_log(&shader).unwrap_or_default();
            Err(failure(format!("shader compilation failed: {info}")))
        }
    }

    fn location(&mut self, u: Uniform) -> Option<&WebGlUniformLocation> {
        let Self { gl, program, uniforms, .. } = self;
        uniforms
            .entry(u)
            .or_insert_with(|| {
                let loc = gl.get_uniform_location(program.as_ref()?, &u.name());
                if loc.is_none() {
                    log::debug!("uniform {} not active", u.name());
                }
                loc
            })
            .as_ref()
    }
}

fn failure(msg: impl Into<String>) -> Error {
    let e = Error::Backend(msg.into());
    log::error!("{e}");
    e
}

impl Backend for WebGl {
    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<()> {
        let vs = self.compile(Gl::VERTEX_SHADER, vertex_src)?;
        let fs = self.compile(Gl::FRAGMENT_SHADER, fragment_src)?;
        let gl = &self.gl;
        let prog = gl
            .create_program()
            .ok_or_else(|| failure("could not create program"))?;
        gl.attach_shader(&prog, &vs);
        gl.attach_shader(&prog, &fs);
        gl.link_program(&prog);
        let linked = gl
            .get_program_parameter(&prog, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let info = gl.get_program_info_log(&prog).unwrap_or_default();
            return Err(failure(format!("program linking failed: {info}")));
        }
        gl.use_program(Some(&prog));

        for a in Attrib::all() {
            // Attributes the compiler optimized out have no location
            let Ok(loc) = u32::try_from(gl.get_attrib_location(&prog, a.name())) else {
                log::debug!("attribute {} not active", a.name());
                continue;
            };
            let buf = gl
                .create_buffer()
                .ok_or_else(|| failure("could not create buffer"))?;
            self.attribs.insert(a, (loc, buf));
        }
        self.index_buf = gl.create_buffer();
        self.uniforms.clear();
        self.program = Some(prog);
        log::info!("shader program ready, {} attributes", self.attribs.len());
        Ok(())
    }

    fn set_flip_y(&mut self, flip: bool) {
        self.gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, flip.into());
    }

    fn set_uniform(&mut self, u: Uniform, val: UniformValue) {
        let gl = self.gl.clone();
        let Some(loc) = self.location(u) else {
            return;
        };
        let loc = Some(loc);
        match val {
            UniformValue::Int(i) => gl.uniform1i(loc, i),
            UniformValue::Float(f) => gl.uniform1f(loc, f),
            UniformValue::Vec3(v) => gl.uniform3fv_with_f32_array(loc, &v),
            UniformValue::Vec4(v) => gl.uniform4fv_with_f32_array(loc, &v),
            UniformValue::Mat3(m) => {
                gl.uniform_matrix3fv_with_f32_array(loc, false, &m)
            }
            UniformValue::Mat4(m) => {
                gl.uniform_matrix4fv_with_f32_array(loc, false, &m)
            }
        }
    }

    fn upload_attrib(&mut self, attr: Attrib, data: &[f32]) {
        let Some((loc, buf)) = self.attribs.get(&attr) else {
            return;
        };
        let gl = &self.gl;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buf));
        let arr = Float32Array::from(data);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &arr, Gl::STREAM_DRAW);
        gl.enable_vertex_attrib_array(*loc);
        let size = attr.size() as i32;
        gl.vertex_attrib_pointer_with_i32(*loc, size, Gl::FLOAT, false, 0, 0);
    }

    fn attrib_constant(&mut self, attr: Attrib, val: &[f32]) {
        let Some(&(loc, _)) = self.attribs.get(&attr) else {
            return;
        };
        let gl = &self.gl;
        gl.disable_vertex_attrib_array(loc);
        match *val {
            [x] => gl.vertex_attrib1f(loc, x),
            [x, y] => gl.vertex_attrib2f(loc, x, y),
            [x, y, z] => gl.vertex_attrib3f(loc, x, y, z),
            [x, y, z, w] => gl.vertex_attrib4f(loc, x, y, z, w),
            _ => log::warn!("constant {} has {} components", attr.name(), val.len()),
        }
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: usize, count: usize) {
        self.gl.draw_arrays(mode.code(), first as i32, count as i32);
    }

    fn draw_elements(&mut self, mode: DrawMode, indices: &[u16]) {
        let gl = &self.gl;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, self.index_buf.as_ref());
        let arr = Uint16Array::from(indices);
        gl.buffer_data_with_array_buffer_view(
            Gl::ELEMENT_ARRAY_BUFFER,
            &arr,
            Gl::STREAM_DRAW,
        );
        let n = indices.len() as i32;
        gl.draw_elements_with_i32(mode.code(), n, Gl::UNSIGNED_SHORT, 0);
    }

    fn set_feature(&mut self, f: Feature, enabled: bool) {
        let cap = match f {
            Feature::DepthTest => Gl::DEPTH_TEST,
            Feature::Blend => Gl::BLEND,
            Feature::PolygonOffsetFill => Gl::POLYGON_OFFSET_FILL,
        };
        if enabled {
            self.gl.enable(cap);
        } else {
            self.gl.disable(cap);
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, vp: Viewport) {
        self.gl.viewport(vp.x, vp.y, vp.width, vp.height);
        self.viewport = vp;
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn create_texture(&mut self) -> Result<TextureHandle> {
        let tex = self
            .gl
            .create_texture()
            .ok_or_else(|| failure("could not create texture"))?;
        self.textures.push(tex);
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn delete_texture(&mut self, tex: TextureHandle) {
        // The slot stays so that later handles keep their indices
        self.gl.delete_texture(self.textures.get(tex.0 as usize));
    }

    fn bind_texture(&mut self, tex: TextureHandle) {
        let t = self.textures.get(tex.0 as usize);
        self.gl.bind_texture(Gl::TEXTURE_2D, t);
    }

    fn tex_parameter(&mut self, param: TexParam, val: TexValue) {
        let v = match val {
            TexValue::Clamp => Gl::CLAMP_TO_EDGE,
            _ => val.code(),
        };
        self.gl.tex_parameteri(Gl::TEXTURE_2D, param.code(), v as i32);
    }

    fn tex_image_2d(&mut self, level: u32, img: Image<'_>) -> Result<()> {
        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                Gl::TEXTURE_2D,
                level as i32,
                Gl::RGBA as i32,
                img.width as i32,
                img.height as i32,
                0,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                Some(img.data),
            )
            .map_err(|e| failure(format!("texture upload failed: {e:?}")))
    }

    fn copy_tex_image_2d(&mut self, level: u32, rect: Viewport) {
        let Viewport { x, y, width, height } = rect;
        self.gl.copy_tex_image_2d(
            Gl::TEXTURE_2D,
            level as i32,
            Gl::RGBA,
            x,
            y,
            width,
            height,
            0,
        );
    }

    fn clear(&mut self, mask: ClearMask) {
        self.gl.clear(mask.bits());
    }

    fn clear_color(&mut self, c: Color4f) {
        let [r, g, b, a] = c.0;
        self.gl.clear_color(r, g, b, a);
    }

    fn depth_mask(&mut self, write: bool) {
        self.gl.depth_mask(write);
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.gl.blend_func(src.code(), dst.code());
    }

    fn front_face(&mut self, w: Winding) {
        self.gl.front_face(w.code());
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.gl.polygon_offset(factor, units);
    }

    fn line_width(&mut self, w: f32) {
        self.gl.line_width(w);
    }
}
