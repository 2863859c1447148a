//! Frontends for running `glimmer` programs.
//!
//! With the `wasm` feature, provides a WebGL implementation of the
//! [`Backend`] trait, a canvas [surface][wasm::Surface] with an animation
//! frame loop, and wiring from DOM pointer events to the drag controllers
//! of `glimmer_core::cam`.

use std::time::Duration;

use glimmer_core::gl::{Backend, Context};

#[cfg(feature = "wasm")]
pub mod pointer;
#[cfg(feature = "wasm")]
pub mod wasm;
#[cfg(feature = "wasm")]
pub mod webgl;

/// Per-frame state. The surface run method passes an instance of `Frame`
/// to the callback function on every iteration of the main loop.
pub struct Frame<'a, B: Backend> {
    /// Elapsed time since the start of the first frame.
    pub t: Duration,
    /// Elapsed time since the start of the previous frame.
    pub dt: Duration,
    /// The graphics context to draw with.
    pub gl: &'a mut Context<B>,
}

impl<B: Backend> Frame<'_, B> {
    /// Returns the size of the drawing surface in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.gl.backend().surface_size()
    }
}
