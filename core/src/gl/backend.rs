//! The interface to the programmable shader pipeline.
//!
//! The [`Context`][super::Context] never talks to a graphics API directly.
//! Instead it drives an implementation of [`Backend`], which owns the
//! compiled program, vertex buffers, and texture objects. The names in
//! [`Attrib`] and [`Uniform`] are the attribute and uniform names of the
//! generated [shader source][super::shader].

use alloc::borrow::Cow;
use alloc::format;

use super::Result;
use super::enums::{BlendFactor, ClearMask, DrawMode, Side, TexParam, TexValue, Winding};
use crate::math::Color4f;

/// A per-vertex attribute of the shader program.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Attrib {
    Coords,
    Color,
    Normal,
    TexCoords,
    /// A material property of the front or back face.
    Material(Side, MaterialField),
}

/// The material properties fed to the shader per vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MaterialField {
    Ambient,
    Diffuse,
    Specular,
    Emission,
    Shininess,
}

/// The light source properties fed to the shader.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LightField {
    Position,
    Ambient,
    Diffuse,
    Specular,
    Enabled,
}

/// A uniform variable of the shader program.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Uniform {
    Modelview,
    Projection,
    TextureMatrix,
    NormalMatrix,
    UnitNormals,
    Lit,
    Textured,
    Texture,
    TwoSided,
    PointMode,
    PointSize,
    LocalViewer,
    GlobalAmbient,
    /// A property of the light source with the given index.
    Light(usize, LightField),
}

/// A value uploaded to a uniform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
}

/// Pipeline capabilities toggled directly on the backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    DepthTest,
    Blend,
    PolygonOffsetFill,
}

/// A viewport rectangle in pixels, origin at the bottom left.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// An RGBA image with 8-bit channels, rows top to bottom.
#[derive(Copy, Clone, Debug)]
pub struct Image<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// An opaque handle to a texture object owned by the backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u32);

impl Attrib {
    /// Returns the name of the attribute in the shader source.
    pub const fn name(self) -> &'static str {
        use {Attrib::*, MaterialField::*, Side::*};
        match self {
            Coords => "coords",
            Color => "color",
            Normal => "normal",
            TexCoords => "texCoords",
            Material(Front, Ambient) => "front_ambient",
            Material(Front, Diffuse) => "front_diffuse",
            Material(Front, Specular) => "front_specular",
            Material(Front, Emission) => "front_emission",
            Material(Front, Shininess) => "front_shininess",
            Material(Back, Ambient) => "back_ambient",
            Material(Back, Diffuse) => "back_diffuse",
            Material(Back, Specular) => "back_specular",
            Material(Back, Emission) => "back_emission",
            Material(Back, Shininess) => "back_shininess",
        }
    }

    /// Returns the number of components per vertex.
    pub const fn size(self) -> usize {
        use MaterialField::*;
        match self {
            Attrib::Coords | Attrib::Normal => 3,
            Attrib::Color => 4,
            Attrib::TexCoords => 2,
            Attrib::Material(_, Diffuse) => 4,
            Attrib::Material(_, Shininess) => 1,
            Attrib::Material(_, _) => 3,
        }
    }

    /// Every attribute, in declaration order.
    pub fn all() -> impl Iterator<Item = Attrib> {
        use MaterialField::*;
        let base = [Attrib::Coords, Attrib::TexCoords, Attrib::Normal, Attrib::Color];
        let mats = [Side::Front, Side::Back].into_iter().flat_map(|s| {
            [Ambient, Diffuse, Specular, Emission, Shininess]
                .map(move |f| Attrib::Material(s, f))
        });
        base.into_iter().chain(mats)
    }
}

impl Uniform {
    /// Returns the name of the uniform in the shader source.
    pub fn name(self) -> Cow<'static, str> {
        use Uniform::*;
        Cow::Borrowed(match self {
            Modelview => "modelview",
            Projection => "projection",
            TextureMatrix => "textureMatrix",
            NormalMatrix => "normalMatrix",
            UnitNormals => "unitNormals",
            Lit => "lit",
            Textured => "textured",
            Texture => "texture",
            TwoSided => "twoSided",
            PointMode => "pointMode",
            PointSize => "pointSize",
            LocalViewer => "localViewer",
            GlobalAmbient => "globalAmbient",
            Light(i, field) => {
                let f = match field {
                    LightField::Position => "position",
                    LightField::Ambient => "ambient",
                    LightField::Diffuse => "diffuse",
                    LightField::Specular => "specular",
                    LightField::Enabled => "enabled",
                };
                return Cow::Owned(format!("light[{i}].{f}"));
            }
        })
    }
}

impl From<bool> for UniformValue {
    fn from(b: bool) -> Self {
        Self::Int(b.into())
    }
}

/// A shader pipeline the graphics context can drive.
///
/// Methods mirror the small subset of a WebGL-style API the fixed-function
/// emulation needs. Apart from program creation and texture uploads, calls
/// are fire-and-forget: failures are the implementation's to log.
pub trait Backend {
    /// Compiles and links the program from the given sources and makes it
    /// current. Called once, when the context is created.
    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Result<()>;

    /// Sets whether uploaded images are flipped vertically.
    fn set_flip_y(&mut self, flip: bool);

    fn set_uniform(&mut self, u: Uniform, val: UniformValue);

    /// Uploads per-vertex data for `attr` and enables the attribute array.
    ///
    /// `data` holds [`Attrib::size`] floats per vertex.
    fn upload_attrib(&mut self, attr: Attrib, data: &[f32]);

    /// Disables the attribute array of `attr` and sets its constant value.
    fn attrib_constant(&mut self, attr: Attrib, val: &[f32]);

    /// Draws `count` vertices from the enabled arrays starting at `first`.
    fn draw_arrays(&mut self, mode: DrawMode, first: usize, count: usize);

    /// Uploads `indices` and draws the indexed vertices.
    fn draw_elements(&mut self, mode: DrawMode, indices: &[u16]);

    fn set_feature(&mut self, f: Feature, enabled: bool);

    fn viewport(&self) -> Viewport;
    fn set_viewport(&mut self, vp: Viewport);

    /// Returns the size of the drawing surface in pixels.
    fn surface_size(&self) -> (u32, u32);

    fn create_texture(&mut self) -> Result<TextureHandle>;
    /// Releases a texture created with `create_texture`.
    fn delete_texture(&mut self, tex: TextureHandle);
    fn bind_texture(&mut self, tex: TextureHandle);
    fn tex_parameter(&mut self, param: TexParam, val: TexValue);
    fn tex_image_2d(&mut self, level: u32, img: Image<'_>) -> Result<()>;

    /// Copies a rectangle of the drawing surface into the bound texture.
    fn copy_tex_image_2d(&mut self, level: u32, rect: Viewport);

    fn clear(&mut self, mask: ClearMask);
    fn clear_color(&mut self, c: Color4f);
    fn depth_mask(&mut self, write: bool);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn front_face(&mut self, w: Winding);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn line_width(&mut self, w: f32);
}

impl<B: Backend + ?Sized> Backend for alloc::boxed::Box<B> {
    fn create_program(&mut self, vs: &str, fs: &str) -> Result<()> {
        (**self).create_program(vs, fs)
    }
    fn set_flip_y(&mut self, flip: bool) {
        (**self).set_flip_y(flip)
    }
    fn set_uniform(&mut self, u: Uniform, val: UniformValue) {
        (**self).set_uniform(u, val)
    }
    fn upload_attrib(&mut self, attr: Attrib, data: &[f32]) {
        (**self).upload_attrib(attr, data)
    }
    fn attrib_constant(&mut self, attr: Attrib, val: &[f32]) {
        (**self).attrib_constant(attr, val)
    }
    fn draw_arrays(&mut self, mode: DrawMode, first: usize, count: usize) {
        (**self).draw_arrays(mode, first, count)
    }
    fn draw_elements(&mut self, mode: DrawMode, indices: &[u16]) {
        (**self).draw_elements(mode, indices)
    }
    fn set_feature(&mut self, f: Feature, enabled: bool) {
        (**self).set_feature(f, enabled)
    }
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }
    fn set_viewport(&mut self, vp: Viewport) {
        (**self).set_viewport(vp)
    }
    fn surface_size(&self) -> (u32, u32) {
        (**self).surface_size()
    }
    fn create_texture(&mut self) -> Result<TextureHandle> {
        (**self).create_texture()
    }
    fn delete_texture(&mut self, tex: TextureHandle) {
        (**self).delete_texture(tex)
    }
    fn bind_texture(&mut self, tex: TextureHandle) {
        (**self).bind_texture(tex)
    }
    fn tex_parameter(&mut self, param: TexParam, val: TexValue) {
        (**self).tex_parameter(param, val)
    }
    fn tex_image_2d(&mut self, level: u32, img: Image<'_>) -> Result<()> {
        (**self).tex_image_2d(level, img)
    }
    fn copy_tex_image_2d(&mut self, level: u32, rect: Viewport) {
        (**self).copy_tex_image_2d(level, rect)
    }
    fn clear(&mut self, mask: ClearMask) {
        (**self).clear(mask)
    }
    fn clear_color(&mut self, c: Color4f) {
        (**self).clear_color(c)
    }
    fn depth_mask(&mut self, write: bool) {
        (**self).depth_mask(write)
    }
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        (**self).blend_func(src, dst)
    }
    fn front_face(&mut self, w: Winding) {
        (**self).front_face(w)
    }
    fn polygon_offset(&mut self, factor: f32, units: f32) {
        (**self).polygon_offset(factor, units)
    }
    fn line_width(&mut self, w: f32) {
        (**self).line_width(w)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn attrib_names_and_sizes() {
        let front_diffuse = Attrib::Material(Side::Front, MaterialField::Diffuse);
        assert_eq!(front_diffuse.name(), "front_diffuse");
        assert_eq!(front_diffuse.size(), 4);
        let back_shine = Attrib::Material(Side::Back, MaterialField::Shininess);
        assert_eq!(back_shine.name(), "back_shininess");
        assert_eq!(back_shine.size(), 1);
        assert_eq!(Attrib::TexCoords.size(), 2);
    }

    #[test]
    fn all_attribs_distinct() {
        let names: Vec<_> = Attrib::all().map(Attrib::name).collect();
        assert_eq!(names.len(), 14);
        for (i, a) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(a), "duplicate {a}");
        }
    }

    #[test]
    fn uniform_names() {
        assert_eq!(Uniform::NormalMatrix.name(), "normalMatrix");
        assert_eq!(
            Uniform::Light(3, LightField::Position).name(),
            "light[3].position"
        );
    }
}
