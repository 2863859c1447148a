//! Frontend using WebAssembly to render to a canvas element with WebGL.

use core::cell::RefCell;
use core::ops::ControlFlow::{self, *};
use std::rc::Rc;
use std::time::Duration;

use log::Level;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlCanvasElement as Canvas, WebGlContextAttributes,
    WebGlRenderingContext as Gl,
};

use glimmer_core::gl::{Config, Context, Error, Result};

use crate::{Frame, webgl::WebGl};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen]
    fn requestAnimationFrame(cb: &Closure<dyn FnMut(f64)>);
}

/// Options for creating a [`Surface`].
#[derive(Copy, Clone, Debug)]
pub struct SurfaceOptions {
    /// Whether the drawing buffer keeps its contents after compositing.
    /// Needed for reading back pixels after a frame has been presented.
    pub preserve_drawing_buffer: bool,
    /// Whether to request a multisampled drawing buffer.
    pub antialias: bool,
    /// The configuration of the graphics context.
    pub config: Config,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            preserve_drawing_buffer: true,
            antialias: true,
            config: Config::default(),
        }
    }
}

/// A canvas element with a graphics context drawing to it.
pub struct Surface {
    pub canvas: Canvas,
    pub gl: Context<WebGl>,
}

impl Surface {
    /// Creates a surface drawing to `canvas`.
    ///
    /// Returns [`Error::Backend`] if WebGL is not available or the shader
    /// program fails to build.
    pub fn new(canvas: Canvas, opts: &SurfaceOptions) -> Result<Self> {
        let attrs = WebGlContextAttributes::new();
        attrs.set_preserve_drawing_buffer(opts.preserve_drawing_buffer);
        attrs.set_antialias(opts.antialias);

        let gl: Gl = canvas
            .get_context_with_context_options("webgl", &attrs)
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into().ok())
            .ok_or_else(|| Error::Backend("WebGL is not supported".into()))?;

        let gl = Context::with_config(WebGl::new(gl, canvas.clone()), opts.config)?;
        log::info!(
            "created surface of {}x{} pixels",
            canvas.width(),
            canvas.height()
        );
        Ok(Self { canvas, gl })
    }

    /// Creates a surface drawing to the canvas element with the given id,
    /// using the default options.
    pub fn from_id(id: &str) -> Result<Self> {
        let canvas = document()
            .and_then(|doc| doc.get_element_by_id(id))
            .and_then(|elem| elem.dyn_into::<Canvas>().ok())
            .ok_or_else(|| Error::Backend(format!("no canvas with id {id:?}")))?;
        Self::new(canvas, &SurfaceOptions::default())
    }

    /// Runs `frame_fn` once per animation frame until it returns `Break`.
    ///
    /// Returns immediately; the frames are driven by the browser.
    pub fn run<F>(mut self, mut frame_fn: F)
    where
        F: FnMut(&mut Frame<WebGl>) -> ControlFlow<()> + 'static,
    {
        let mut t_first = None;
        let mut t_last = Duration::default();

        let outer: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::default();
        let inner = outer.clone();
        outer.borrow_mut().replace(Closure::new(move |ms: f64| {
            let now = Duration::from_secs_f64(ms / 1e3);
            let t = now - *t_first.get_or_insert(now);
            let dt = t - t_last;
            let mut frame = Frame { t, dt, gl: &mut self.gl };

            if let Continue(_) = frame_fn(&mut frame) {
                if let Some(cb) = inner.borrow().as_ref() {
                    requestAnimationFrame(cb);
                }
            } else {
                log::debug!("frame loop stopped at t={t:?}");
                let _ = inner.borrow_mut().take();
            }
            t_last = t;
        }));
        if let Some(cb) = outer.borrow().as_ref() {
            requestAnimationFrame(cb);
        }
    }
}

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Routes `log` records up to `level` to the browser console.
///
/// With the `wasm-dev` feature, also installs a panic hook that reports
/// panics to the console. Calls after the first leave the logger as is.
pub fn init_logging(level: Level) {
    #[cfg(feature = "wasm-dev")]
    console_error_panic_hook::set_once();

    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;
    use wasm_bindgen_test::*;

    use super::*;

    #[wasm_bindgen_test]
    fn logging_installed_once() {
        init_logging(Level::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        // A second call keeps the first logger and its level
        init_logging(Level::Error);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        log::info!("logging to the console");
    }

    #[wasm_bindgen_test]
    fn default_surface_options() {
        let opts = SurfaceOptions::default();
        assert!(opts.preserve_drawing_buffer);
        assert!(opts.antialias);
        assert_eq!(opts.config, Config::default());
    }
}
