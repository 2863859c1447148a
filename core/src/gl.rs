//! Fixed-function graphics emulated over a shader pipeline.
//!
//! A [`Context`] holds the classic state machine of matrices and their
//! stacks, the current color, normal and texture coordinates, materials,
//! lights, and enable flags. Primitives are drawn either in immediate mode,
//! one vertex at a time between [`begin`][Context::begin] and
//! [`end`][Context::end], or from client-side arrays. Before each draw, the
//! context mirrors its state into a generated [shader program][shader]
//! driven through the [`Backend`] trait.
//!
//! # Examples
//! ```
//! use glimmer_core::gl::*;
//!
//! let mut gl = Context::new(Recorder::new(640, 480))?;
//! gl.matrix_mode(MatrixMode::Projection);
//! gl.ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)?;
//! gl.matrix_mode(MatrixMode::Modelview);
//!
//! gl.begin(PrimitiveKind::Quads)?;
//! gl.color3f(1.0, 0.5, 0.0)?;
//! for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
//!     gl.vertex2f(x, y)?;
//! }
//! gl.end()?;
//!
//! // Quads are drawn as pairs of triangles
//! assert_eq!(
//!     gl.backend().draws().last(),
//!     Some(&Command::DrawArrays { mode: DrawMode::Triangles, first: 0, count: 6 })
//! );
//! # Ok::<(), Error>(())
//! ```

pub use {
    arrays::{ArrayData, IndexData},
    backend::{
        Attrib, Backend, Feature, Image, LightField, MaterialField,
        TextureHandle, Uniform, UniformValue, Viewport,
    },
    ctx::{Config, Context, MAX_LIGHTS},
    draw::Model,
    enums::{
        AttribMask, BlendFactor, Capability, ClearMask, ClientArray,
        DrawMode, Face, LightModelParam, LightProp, MaterialProp, MatrixMode,
        PointMode, PrimitiveKind, Side, TexParam, TexValue, Winding,
    },
    error::{Degeneracy, Error, ErrorKind, Result, Stack},
    record::{Command, Recorder},
    state::{ColorMaterial, Current, Light, LightModel, Material},
};

mod arrays;
mod attrib;
pub mod backend;
mod ctx;
#[cfg(feature = "std")]
pub mod current;
mod draw;
mod enums;
pub(crate) mod error;
pub mod immediate;
pub mod record;
pub mod shader;
mod state;
mod tex;
