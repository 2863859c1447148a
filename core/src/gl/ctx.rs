//! The graphics context and its state-setting operations.

use alloc::{format, vec::Vec};
use core::ops::Range;

use super::arrays::{ArrayData, ClientArrays, gather};
use super::attrib::Snapshot;
use super::backend::{Backend, Image, Uniform, UniformValue, Viewport};
use super::enums::*;
use super::error::{Degeneracy, Stack, degenerate, inside, invalid, underflow};
use super::immediate::Primitive;
use super::shader::{FRAGMENT_SOURCE, vertex_source};
use super::state::*;
use super::tex::Textures;
use super::Result;
use crate::math::{
    Color4f, Mat4x4, frustum, orthographic, rgba, vec2, vec3, vec4,
};

/// The largest supported number of light sources.
pub const MAX_LIGHTS: usize = 8;

/// Configuration fixed at context creation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Number of light sources, and of light uniforms in the generated
    /// shader. Must be between 1 and [`MAX_LIGHTS`].
    pub light_count: usize,

    /// Whether uploaded texture images are flipped vertically, so that
    /// texture coordinate `t` = 0 addresses the bottom row of the image.
    pub flip_texture_y: bool,
}

impl Default for Config {
    /// Returns a configuration with four lights and flipped textures.
    fn default() -> Self {
        Self { light_count: 4, flip_texture_y: true }
    }
}

/// Emulated fixed-function state bound to one drawing surface.
///
/// All state-setting operations take effect immediately on the emulated
/// state; the state is mirrored into the shader program right before each
/// draw. Operations that fail return an [`Error`][super::Error] and leave
/// the state unchanged.
pub struct Context<B> {
    pub(super) backend: B,
    pub(super) config: Config,
    pub(super) matrix_mode: MatrixMode,
    pub(super) matrices: [MatrixStack; 3],
    pub(super) current: Current,
    pub(super) color_material: ColorMaterial,
    pub(super) materials: [Material; 2],
    pub(super) lights: Vec<Light>,
    pub(super) light_model: LightModel,
    pub(super) enables: Enables,
    pub(super) arrays: ClientArrays,
    pub(super) attrib_stack: Vec<Snapshot>,
    pub(super) textures: Textures,
    pub(super) line_width: f32,
    pub(super) point_size: f32,
    pub(super) primitive: Option<Primitive>,
}

impl<B: Backend> Context<B> {
    /// Creates a context with the default configuration.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_config(backend, Config::default())
    }

    /// Creates a context, compiling the shader program and creating the
    /// default texture.
    pub fn with_config(mut backend: B, config: Config) -> Result<Self> {
        let n = config.light_count;
        if !(1..=MAX_LIGHTS).contains(&n) {
            return Err(invalid(
                "Context::with_config",
                format!("light count must be between 1 and {MAX_LIGHTS}, got {n}"),
            ));
        }
        backend.create_program(&vertex_source(n), FRAGMENT_SOURCE)?;
        log::debug!("created shader program with {n} lights");
        backend.set_flip_y(config.flip_texture_y);
        backend.set_uniform(Uniform::Texture, UniformValue::Int(0));
        let textures = Textures::new(&mut backend)?;

        Ok(Self {
            backend,
            config,
            matrix_mode: MatrixMode::Modelview,
            matrices: Default::default(),
            current: Current::default(),
            color_material: ColorMaterial::default(),
            materials: [Material::default(); 2],
            lights: (0..n).map(Light::initial).collect(),
            light_model: LightModel::default(),
            enables: Enables::new(n),
            arrays: ClientArrays::default(),
            attrib_stack: Vec::new(),
            textures,
            line_width: 1.0,
            point_size: 1.0,
            primitive: None,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
    pub fn into_backend(self) -> B {
        self.backend
    }
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns whether a primitive is being recorded.
    pub fn in_primitive(&self) -> bool {
        self.primitive.is_some()
    }

    /// Fails if a primitive is being recorded.
    pub(super) fn check_idle(&self, op: &'static str) -> Result<()> {
        match self.primitive {
            Some(_) => Err(inside(op)),
            None => Ok(()),
        }
    }

    //
    // Capabilities
    //

    /// Enables a capability.
    pub fn enable(&mut self, cap: Capability) -> Result<()> {
        self.set_capability("enable", cap, true)
    }

    /// Disables a capability.
    pub fn disable(&mut self, cap: Capability) -> Result<()> {
        self.set_capability("disable", cap, false)
    }

    fn set_capability(&mut self, op: &'static str, cap: Capability, on: bool) -> Result<()> {
        self.check_idle(op)?;
        if let Capability::Light(i) = cap
            && i >= self.lights.len()
        {
            return Err(invalid(op, format!("no light {i}")));
        }
        self.enables.set(cap, on);
        Ok(())
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enables.get(cap)
    }

    pub fn enable_client_state(&mut self, arr: ClientArray) {
        self.arrays.set_enabled(arr, true);
    }
    pub fn disable_client_state(&mut self, arr: ClientArray) {
        self.arrays.set_enabled(arr, false);
    }
    pub fn is_client_state_enabled(&self, arr: ClientArray) -> bool {
        self.arrays.is_enabled(arr)
    }

    //
    // Current vertex attributes
    //

    /// Sets the current color, with alpha 1.
    pub fn color3f(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.color4f(r, g, b, 1.0)
    }

    /// Sets the current color.
    ///
    /// Components are clamped to [0, 1]. If color tracking is enabled, also
    /// sets the tracked material property to the new color.
    pub fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<()> {
        numeric("color", &[r, g, b, a])?;
        self.current.color = rgba(r, g, b, a).clamp();
        if self.enables.has(Caps::COLOR_MATERIAL) {
            let ColorMaterial { face, prop } = self.color_material;
            self.set_material(face, prop, self.current.color);
        }
        Ok(())
    }

    /// Sets the current color from 8-bit components, with alpha 255.
    pub fn color3ub(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        self.color4ub(r, g, b, 0xFF)
    }

    /// Sets the current color from 8-bit components.
    pub fn color4ub(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        let [r, g, b, a] = crate::math::color::rgba_u8(r, g, b, a).0;
        self.color4f(r, g, b, a)
    }

    /// Sets the current color from three or four components.
    pub fn color_fv(&mut self, c: &[f32]) -> Result<()> {
        match *c {
            [r, g, b] => self.color4f(r, g, b, 1.0),
            [r, g, b, a] => self.color4f(r, g, b, a),
            _ => Err(invalid("color_fv", count_msg("3 or 4", c.len()))),
        }
    }

    pub fn normal3f(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        numeric("normal", &[x, y, z])?;
        self.current.normal = vec3(x, y, z);
        Ok(())
    }

    /// Sets the current normal from the first three values of `n`.
    pub fn normal_fv(&mut self, n: &[f32]) -> Result<()> {
        match *n {
            [x, y, z, ..] => self.normal3f(x, y, z),
            _ => Err(invalid("normal_fv", count_msg("at least 3", n.len()))),
        }
    }

    pub fn tex_coord2f(&mut self, s: f32, t: f32) -> Result<()> {
        numeric("tex_coord", &[s, t])?;
        self.current.tex_coords = vec2(s, t);
        Ok(())
    }

    /// Sets the current texture coordinates from the first two values of `st`.
    pub fn tex_coord_fv(&mut self, st: &[f32]) -> Result<()> {
        match *st {
            [s, t, ..] => self.tex_coord2f(s, t),
            _ => Err(invalid("tex_coord_fv", count_msg("at least 2", st.len()))),
        }
    }

    /// Returns the current color, normal, and texture coordinates.
    pub fn current(&self) -> &Current {
        &self.current
    }

    //
    // Materials and lighting
    //

    /// Selects the material property tracking the current color.
    pub fn color_material(&mut self, face: Face, prop: MaterialProp) -> Result<()> {
        self.check_idle("color_material")?;
        if prop == MaterialProp::Shininess {
            return Err(invalid("color_material", "shininess cannot track the color"));
        }
        self.color_material = ColorMaterial { face, prop };
        Ok(())
    }

    /// Sets a color property of the material of `face`.
    ///
    /// `val` holds three or four components; alpha defaults to 1 and only
    /// matters for the diffuse color. Use [`materialf`][Self::materialf]
    /// for shininess.
    pub fn material_fv(&mut self, face: Face, prop: MaterialProp, val: &[f32]) -> Result<()> {
        const OP: &str = "material_fv";
        if prop == MaterialProp::Shininess {
            return Err(invalid(OP, "shininess must be set with materialf"));
        }
        let c = color_arg(OP, val)?;
        self.set_material(face, prop, c);
        Ok(())
    }

    /// Sets the shininess (specular exponent) of the material of `face`.
    pub fn materialf(&mut self, face: Face, prop: MaterialProp, val: f32) -> Result<()> {
        const OP: &str = "materialf";
        if prop != MaterialProp::Shininess {
            return Err(invalid(OP, "only shininess is a scalar property"));
        }
        numeric(OP, &[val])?;
        self.set_material(face, prop, rgba(val, val, val, val));
        Ok(())
    }

    fn set_material(&mut self, face: Face, prop: MaterialProp, c: Color4f) {
        for side in [Side::Front, Side::Back] {
            if face.includes(side) {
                self.materials[side as usize].set(prop, c);
            }
        }
        if let Some(p) = &mut self.primitive {
            p.material_changed = true;
        }
    }

    /// Returns the material of `side`.
    pub fn material(&self, side: Side) -> &Material {
        &self.materials[side as usize]
    }

    /// Sets a property of light `i`.
    ///
    /// Colors take three or four values, of which alpha is ignored. The
    /// position takes three or four values, `w` defaulting to 0, and is
    /// transformed to eye coordinates by the modelview matrix in effect
    /// at the time of this call.
    pub fn light_fv(&mut self, i: usize, prop: LightProp, val: &[f32]) -> Result<()> {
        const OP: &str = "light_fv";
        if i >= self.lights.len() {
            return Err(invalid(OP, format!("no light {i}")));
        }
        if !(3..=4).contains(&val.len()) {
            return Err(invalid(OP, count_msg("3 or 4", val.len())));
        }
        numeric(OP, val)?;
        let rgb = crate::math::rgb(val[0], val[1], val[2]);
        let light = &mut self.lights[i];
        match prop {
            LightProp::Ambient => light.ambient = rgb,
            LightProp::Diffuse => light.diffuse = rgb,
            LightProp::Specular => light.specular = rgb,
            LightProp::Position => {
                let w = val.get(3).copied().unwrap_or(0.0);
                let pos = vec4(val[0], val[1], val[2], w);
                light.position = self.matrices[0].current.apply(&pos);
            }
        }
        Ok(())
    }

    /// Returns light `i`, if it exists.
    pub fn light(&self, i: usize) -> Option<&Light> {
        self.lights.get(i)
    }

    /// Sets the global ambient light color from three or four values.
    pub fn light_model_fv(&mut self, param: LightModelParam, val: &[f32]) -> Result<()> {
        const OP: &str = "light_model_fv";
        if param != LightModelParam::Ambient {
            return Err(invalid(OP, "only the ambient color is a vector parameter"));
        }
        self.light_model.ambient = color_arg(OP, val)?.to_rgb();
        Ok(())
    }

    /// Turns two-sided lighting or the local viewer on (nonzero) or off.
    ///
    /// Not allowed between `begin` and `end`, as the primitive being
    /// assembled records back-face materials only if two-sided lighting was
    /// on at `begin`.
    pub fn light_model_i(&mut self, param: LightModelParam, val: i32) -> Result<()> {
        self.check_idle("light_model_i")?;
        match param {
            LightModelParam::TwoSide => self.light_model.two_side = val != 0,
            LightModelParam::LocalViewer => self.light_model.local_viewer = val != 0,
            LightModelParam::Ambient => {
                return Err(invalid("light_model_i", "ambient is a vector parameter"));
            }
        }
        Ok(())
    }

    pub fn light_model(&self) -> &LightModel {
        &self.light_model
    }

    //
    // Odds and ends passed to the pipeline
    //

    /// Sets the viewport. Width and height must be positive.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Err(invalid("viewport", "width and height must be positive"));
        }
        self.backend.set_viewport(Viewport { x, y, width, height });
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.backend.viewport()
    }

    pub fn clear(&mut self, mask: ClearMask) {
        self.backend.clear(mask);
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<()> {
        numeric("clear_color", &[r, g, b, a])?;
        self.backend.clear_color(rgba(r, g, b, a));
        Ok(())
    }

    pub fn depth_mask(&mut self, write: bool) {
        self.backend.depth_mask(write);
    }

    pub fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.backend.blend_func(src, dst);
    }

    pub fn front_face(&mut self, w: Winding) {
        self.backend.front_face(w);
    }

    pub fn polygon_offset(&mut self, factor: f32, units: f32) -> Result<()> {
        numeric("polygon_offset", &[factor, units])?;
        self.backend.polygon_offset(factor, units);
        Ok(())
    }

    /// Sets the width of lines, applied at the next draw.
    pub fn line_width(&mut self, w: f32) -> Result<()> {
        positive("line_width", w)?;
        self.line_width = w;
        Ok(())
    }

    /// Sets the diameter of points, applied at the next draw.
    pub fn point_size(&mut self, s: f32) -> Result<()> {
        positive("point_size", s)?;
        self.point_size = s;
        Ok(())
    }

    //
    // Matrices
    //

    /// Selects the matrix that subsequent matrix operations apply to.
    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrix_mode = mode;
    }

    fn active(&mut self) -> &mut MatrixStack {
        &mut self.matrices[self.matrix_mode as usize]
    }

    /// Saves a copy of the active matrix on its stack.
    pub fn push_matrix(&mut self) {
        self.active().push();
    }

    /// Restores the most recently pushed copy of the active matrix.
    pub fn pop_matrix(&mut self) -> Result<()> {
        let stack = match self.matrix_mode {
            MatrixMode::Modelview => Stack::Modelview,
            MatrixMode::Projection => Stack::Projection,
            MatrixMode::Texture => Stack::Texture,
        };
        self.active().pop().ok_or_else(|| underflow(stack))
    }

    pub fn load_identity(&mut self) {
        self.active().current = Mat4x4::IDENTITY;
    }

    pub fn load_matrix(&mut self, m: &Mat4x4) -> Result<()> {
        numeric("load_matrix", &m.0)?;
        self.active().current = *m;
        Ok(())
    }

    /// Multiplies the active matrix by `m` on the right.
    pub fn mult_matrix(&mut self, m: &Mat4x4) -> Result<()> {
        numeric("mult_matrix", &m.0)?;
        self.multiply(m);
        Ok(())
    }

    fn multiply(&mut self, m: &Mat4x4) {
        let a = self.active();
        a.current = a.current.compose(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        numeric("translate", &[x, y, z])?;
        let a = self.active();
        a.current = a.current.translate(vec3(x, y, z));
        Ok(())
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        numeric("scale", &[x, y, z])?;
        let a = self.active();
        a.current = a.current.scale(vec3(x, y, z));
        Ok(())
    }

    /// Rotates by `degrees` counterclockwise about the axis (x, y, z).
    ///
    /// # Errors
    /// If the axis has (nearly) zero length.
    #[cfg(feature = "fp")]
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> Result<()> {
        numeric("rotate", &[degrees, x, y, z])?;
        let r = crate::math::rotate(crate::math::degs(degrees), vec3(x, y, z))
            .ok_or_else(|| degenerate("rotate", Degeneracy::ZeroAxis))?;
        self.multiply(&r);
        Ok(())
    }

    /// Multiplies by an orthographic projection.
    pub fn ortho(&mut self, l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Result<()> {
        numeric("ortho", &[l, r, b, t, n, f])?;
        self.multiply(&orthographic(l..r, b..t, n..f));
        Ok(())
    }

    /// Multiplies by a 2D orthographic projection with depth range [-1, 1].
    pub fn ortho_2d(&mut self, l: f32, r: f32, b: f32, t: f32) -> Result<()> {
        self.ortho(l, r, b, t, -1.0, 1.0)
    }

    /// Multiplies by a perspective projection of the given frustum.
    pub fn frustum(&mut self, l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Result<()> {
        numeric("frustum", &[l, r, b, t, n, f])?;
        self.multiply(&frustum(l..r, b..t, n..f));
        Ok(())
    }

    /// Multiplies by a symmetric perspective projection with a vertical
    /// field of view of `fovy` degrees.
    #[cfg(feature = "fp")]
    pub fn perspective(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        numeric("perspective", &[fovy, aspect, near, far])?;
        let p = crate::math::perspective(crate::math::degs(fovy), aspect, near..far);
        self.multiply(&p);
        Ok(())
    }

    /// Multiplies by a viewing transform placing the eye at `eye`, looking
    /// towards `center`, with `up` pointing up.
    #[cfg(feature = "fp")]
    pub fn look_at(
        &mut self,
        eye: crate::math::Vec3,
        center: crate::math::Vec3,
        up: crate::math::Vec3,
    ) -> Result<()> {
        for v in [eye, center, up] {
            numeric("look_at", &v.0)?;
        }
        self.multiply(&crate::math::look_at(eye, center, up));
        Ok(())
    }

    /// Returns the current value of the matrix selected by `mode`.
    pub fn matrix(&self, mode: MatrixMode) -> &Mat4x4 {
        &self.matrices[mode as usize].current
    }
    pub fn modelview(&self) -> &Mat4x4 {
        self.matrix(MatrixMode::Modelview)
    }
    pub fn projection(&self) -> &Mat4x4 {
        self.matrix(MatrixMode::Projection)
    }
    pub fn texture_matrix(&self) -> &Mat4x4 {
        self.matrix(MatrixMode::Texture)
    }

    //
    // Client arrays
    //

    /// Sets the vertex position array.
    ///
    /// `size` is 2 or 3 components per vertex; with 2, `z` is 0. `stride`
    /// is in elements, 0 meaning tightly packed.
    pub fn vertex_pointer<'a>(
        &mut self,
        size: usize,
        stride: usize,
        data: impl Into<ArrayData<'a>>,
    ) -> Result<()> {
        self.set_array("vertex_pointer", ClientArray::Vertex, size, stride, data.into())
    }

    /// Sets the normal array, three components per vertex.
    pub fn normal_pointer<'a>(
        &mut self,
        stride: usize,
        data: impl Into<ArrayData<'a>>,
    ) -> Result<()> {
        self.set_array("normal_pointer", ClientArray::Normal, 3, stride, data.into())
    }

    /// Sets the color array of 3 or 4 components per vertex. With 3,
    /// alpha is 1; byte data is scaled to [0, 1].
    pub fn color_pointer<'a>(
        &mut self,
        size: usize,
        stride: usize,
        data: impl Into<ArrayData<'a>>,
    ) -> Result<()> {
        self.set_array("color_pointer", ClientArray::Color, size, stride, data.into())
    }

    /// Sets the texture coordinate array. `size` must be 2.
    pub fn tex_coord_pointer<'a>(
        &mut self,
        size: usize,
        stride: usize,
        data: impl Into<ArrayData<'a>>,
    ) -> Result<()> {
        let op = "tex_coord_pointer";
        self.set_array(op, ClientArray::TexCoord, size, stride, data.into())
    }

    fn set_array(
        &mut self,
        op: &'static str,
        arr: ClientArray,
        size: usize,
        stride: usize,
        data: ArrayData<'_>,
    ) -> Result<()> {
        let dense = gather(op, arr, size, stride, data)?;
        self.arrays.set(arr, dense);
        Ok(())
    }

    //
    // Textures
    //

    /// Creates `n` texture objects and returns their names.
    pub fn gen_textures(&mut self, n: u32) -> Result<Range<u32>> {
        self.textures.r#gen(&mut self.backend, n)
    }

    /// Binds texture `id`. Unknown names are ignored.
    pub fn bind_texture(&mut self, id: u32) {
        self.textures.bind(&mut self.backend, id);
    }

    /// Returns the name of the bound texture.
    pub fn bound_texture(&self) -> u32 {
        self.textures.bound()
    }

    /// Sets a parameter of the bound texture.
    pub fn tex_parameter(&mut self, param: TexParam, val: TexValue) -> Result<()> {
        if !param.accepts(val) {
            return Err(invalid("tex_parameter", format!("{val:?} is not a valid {param:?}")));
        }
        self.backend.tex_parameter(param, val);
        Ok(())
    }

    /// Uploads an RGBA image to mipmap `level` of the bound texture.
    pub fn tex_image_2d(&mut self, level: u32, img: Image<'_>) -> Result<()> {
        let expected = img.width as usize * img.height as usize * 4;
        if img.data.len() != expected {
            return Err(invalid(
                "tex_image_2d",
                format!(
                    "{}x{} RGBA image needs {expected} bytes, got {}",
                    img.width,
                    img.height,
                    img.data.len()
                ),
            ));
        }
        self.backend.tex_image_2d(level, img)
    }

    /// Copies a rectangle of the drawing surface into the bound texture.
    pub fn copy_tex_image_2d(&mut self, level: u32, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Err(invalid("copy_tex_image_2d", "width and height must be positive"));
        }
        let rect = Viewport { x, y, width, height };
        self.backend.copy_tex_image_2d(level, rect);
        Ok(())
    }
}

/// Fails if any of `vals` is NaN.
pub(super) fn numeric(op: &'static str, vals: &[f32]) -> Result<()> {
    if vals.iter().any(|v| v.is_nan()) {
        return Err(invalid(op, "arguments must be numbers"));
    }
    Ok(())
}

fn positive(op: &'static str, v: f32) -> Result<()> {
    if v > 0.0 {
        Ok(())
    } else {
        Err(invalid(op, format!("{v} is not positive")))
    }
}

fn color_arg(op: &'static str, val: &[f32]) -> Result<Color4f> {
    let c = match *val {
        [r, g, b] => rgba(r, g, b, 1.0),
        [r, g, b, a] => rgba(r, g, b, a),
        _ => return Err(invalid(op, count_msg("3 or 4", val.len()))),
    };
    numeric(op, &c.0)?;
    Ok(c)
}

pub(super) fn count_msg(expected: &str, got: usize) -> alloc::string::String {
    format!("expected {expected} values, got {got}")
}
