//! A backend that records every call instead of drawing.
//!
//! Useful for tests, and for inspecting what a sequence of fixed-function
//! calls translates to.

use alloc::{string::String, vec::Vec};

use super::Result;
use super::backend::*;
use super::enums::{BlendFactor, ClearMask, DrawMode, TexParam, TexValue, Winding};
use super::error::backend;
use crate::math::Color4f;

/// A call made to a [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateProgram,
    SetFlipY(bool),
    SetUniform(Uniform, UniformValue),
    UploadAttrib(Attrib, Vec<f32>),
    AttribConstant(Attrib, Vec<f32>),
    DrawArrays { mode: DrawMode, first: usize, count: usize },
    DrawElements { mode: DrawMode, indices: Vec<u16> },
    SetFeature(Feature, bool),
    SetViewport(Viewport),
    CreateTexture(TextureHandle),
    DeleteTexture(TextureHandle),
    BindTexture(TextureHandle),
    TexParameter(TexParam, TexValue),
    TexImage2d { level: u32, width: u32, height: u32 },
    CopyTexImage2d { level: u32, rect: Viewport },
    Clear(ClearMask),
    ClearColor(Color4f),
    DepthMask(bool),
    BlendFunc(BlendFactor, BlendFactor),
    FrontFace(Winding),
    PolygonOffset(f32, f32),
    LineWidth(f32),
}

/// A [`Backend`] that logs every call as a [`Command`].
#[derive(Clone, Debug)]
pub struct Recorder {
    /// The calls made so far, oldest first.
    pub commands: Vec<Command>,
    size: (u32, u32),
    viewport: Viewport,
    next_texture: u32,
    texture_limit: Option<u32>,
    program_error: Option<String>,
}

impl Recorder {
    /// Creates a recorder simulating a `width` × `height` surface, with the
    /// viewport covering the whole surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            commands: Vec::new(),
            size: (width, height),
            viewport: Viewport {
                x: 0,
                y: 0,
                width: width as i32,
                height: height as i32,
            },
            next_texture: 1,
            texture_limit: None,
            program_error: None,
        }
    }

    /// Makes program creation fail with the given message.
    #[must_use]
    pub fn with_program_error(mut self, msg: impl Into<String>) -> Self {
        self.program_error = Some(msg.into());
        self
    }

    /// Makes texture creation fail once `max` textures have been created.
    #[must_use]
    pub fn with_texture_limit(mut self, max: u32) -> Self {
        self.texture_limit = Some(max);
        self
    }

    /// Removes and returns the recorded commands.
    pub fn take(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    /// Returns the draw commands, oldest first.
    pub fn draws(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| {
            matches!(c, Command::DrawArrays { .. } | Command::DrawElements { .. })
        })
    }

    /// Returns the value most recently assigned to `u`.
    pub fn uniform(&self, u: &Uniform) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetUniform(v, val) if v == u => Some(*val),
            _ => None,
        })
    }

    /// Returns the data most recently uploaded to `attr`, unless a
    /// constant value was set more recently.
    pub fn last_upload(&self, attr: Attrib) -> Option<&[f32]> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::UploadAttrib(a, data) if *a == attr => Some(Some(&data[..])),
            Command::AttribConstant(a, _) if *a == attr => Some(None),
            _ => None,
        })?
    }

    /// Returns the constant most recently set for `attr`, unless per-vertex
    /// data was uploaded more recently.
    pub fn last_constant(&self, attr: Attrib) -> Option<&[f32]> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::AttribConstant(a, val) if *a == attr => Some(Some(&val[..])),
            Command::UploadAttrib(a, _) if *a == attr => Some(None),
            _ => None,
        })?
    }
}

impl Backend for Recorder {
    fn create_program(&mut self, _: &str, _: &str) -> Result<()> {
        if let Some(msg) = &self.program_error {
            return Err(backend(msg.clone()));
        }
        self.commands.push(Command::CreateProgram);
        Ok(())
    }
    fn set_flip_y(&mut self, flip: bool) {
        self.commands.push(Command::SetFlipY(flip));
    }
    fn set_uniform(&mut self, u: Uniform, val: UniformValue) {
        self.commands.push(Command::SetUniform(u, val));
    }
    fn upload_attrib(&mut self, attr: Attrib, data: &[f32]) {
        self.commands.push(Command::UploadAttrib(attr, data.to_vec()));
    }
    fn attrib_constant(&mut self, attr: Attrib, val: &[f32]) {
        self.commands.push(Command::AttribConstant(attr, val.to_vec()));
    }
    fn draw_arrays(&mut self, mode: DrawMode, first: usize, count: usize) {
        self.commands.push(Command::DrawArrays { mode, first, count });
    }
    fn draw_elements(&mut self, mode: DrawMode, indices: &[u16]) {
        let indices = indices.to_vec();
        self.commands.push(Command::DrawElements { mode, indices });
    }
    fn set_feature(&mut self, f: Feature, enabled: bool) {
        self.commands.push(Command::SetFeature(f, enabled));
    }
    fn viewport(&self) -> Viewport {
        self.viewport
    }
    fn set_viewport(&mut self, vp: Viewport) {
        self.viewport = vp;
        self.commands.push(Command::SetViewport(vp));
    }
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }
    fn create_texture(&mut self) -> Result<TextureHandle> {
        if self.texture_limit.is_some_and(|max| self.next_texture > max) {
            return Err(backend("out of texture memory"));
        }
        let h = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.commands.push(Command::CreateTexture(h));
        Ok(h)
    }
    fn delete_texture(&mut self, tex: TextureHandle) {
        self.commands.push(Command::DeleteTexture(tex));
    }
    fn bind_texture(&mut self, tex: TextureHandle) {
        self.commands.push(Command::BindTexture(tex));
    }
    fn tex_parameter(&mut self, param: TexParam, val: TexValue) {
        self.commands.push(Command::TexParameter(param, val));
    }
    fn tex_image_2d(&mut self, level: u32, img: Image<'_>) -> Result<()> {
        let Image { width, height, .. } = img;
        self.commands.push(Command::TexImage2d { level, width, height });
        Ok(())
    }
    fn copy_tex_image_2d(&mut self, level: u32, rect: Viewport) {
        self.commands.push(Command::CopyTexImage2d { level, rect });
    }
    fn clear(&mut self, mask: ClearMask) {
        self.commands.push(Command::Clear(mask));
    }
    fn clear_color(&mut self, c: Color4f) {
        self.commands.push(Command::ClearColor(c));
    }
    fn depth_mask(&mut self, write: bool) {
        self.commands.push(Command::DepthMask(write));
    }
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.commands.push(Command::BlendFunc(src, dst));
    }
    fn front_face(&mut self, w: Winding) {
        self.commands.push(Command::FrontFace(w));
    }
    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.commands.push(Command::PolygonOffset(factor, units));
    }
    fn line_width(&mut self, w: f32) {
        self.commands.push(Command::LineWidth(w));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_see_latest_value() {
        let mut r = Recorder::new(4, 4);
        r.set_uniform(Uniform::Lit, UniformValue::Int(0));
        r.upload_attrib(Attrib::Color, &[1.0, 0.0, 0.0, 1.0]);
        r.set_uniform(Uniform::Lit, UniformValue::Int(1));
        assert_eq!(r.uniform(&Uniform::Lit), Some(UniformValue::Int(1)));
        assert_eq!(r.uniform(&Uniform::Textured), None);
        assert_eq!(r.last_upload(Attrib::Color), Some(&[1.0, 0.0, 0.0, 1.0][..]));

        r.attrib_constant(Attrib::Color, &[0.0; 4]);
        assert_eq!(r.last_upload(Attrib::Color), None);
        assert_eq!(r.last_constant(Attrib::Color), Some(&[0.0; 4][..]));
    }

    #[test]
    fn viewport_tracks_sets() {
        let mut r = Recorder::new(640, 480);
        assert_eq!(r.viewport().width, 640);
        let vp = Viewport { x: 10, y: 20, width: 30, height: 40 };
        r.set_viewport(vp);
        assert_eq!(r.viewport(), vp);
        assert_eq!(r.take(), [Command::SetViewport(vp)]);
        assert_eq!(r.draws().count(), 0);
    }

    #[test]
    fn program_error() {
        let mut r = Recorder::new(1, 1).with_program_error("link failed");
        assert!(r.create_program("", "").is_err());
    }
}
