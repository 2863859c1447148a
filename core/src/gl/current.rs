//! Free-function calls on a per-thread current context.
//!
//! Programs written against the classic API call drawing functions without
//! naming a context. This module keeps one [`Context`] per thread as the
//! *current* one and forwards free-function calls to it. Everything here is
//! single-threaded: a context made current on one thread is invisible to
//! others.
//!
//! # Examples
//! ```
//! use glimmer_core::gl::{Capability, Config, PrimitiveKind, Recorder};
//! use glimmer_core::gl::current::{self as gl, new_current};
//!
//! new_current(Recorder::new(100, 100), Config::default())?;
//! gl::enable(Capability::DepthTest)?;
//! gl::begin(PrimitiveKind::Lines)?;
//! gl::vertex2f(0.0, 0.0)?;
//! gl::vertex2f(1.0, 1.0)?;
//! gl::end()?;
//! assert!(gl::is_enabled(Capability::DepthTest)?);
//! # Ok::<(), glimmer_core::gl::Error>(())
//! ```

use core::cell::RefCell;
use core::ops::Range;
use std::rc::Rc;

use alloc::boxed::Box;

use super::arrays::{ArrayData, IndexData};
use super::backend::Backend;
use super::ctx::{Config, Context};
use super::enums::*;
use super::error::{Error, Result, invalid};
use crate::math::Mat4x4;

/// A context with a type-erased backend, shareable within a thread.
pub type SharedContext = Rc<RefCell<Context<Box<dyn Backend>>>>;

std::thread_local! {
    static CURRENT: RefCell<Option<SharedContext>> = const { RefCell::new(None) };
}

/// Makes `ctx` the current context of this thread.
pub fn make_current(ctx: SharedContext) {
    CURRENT.with_borrow_mut(|cur| *cur = Some(ctx));
}

/// Returns the current context of this thread, if any.
pub fn current() -> Option<SharedContext> {
    CURRENT.with_borrow(Clone::clone)
}

/// Clears and returns the current context of this thread.
pub fn release_current() -> Option<SharedContext> {
    CURRENT.with_borrow_mut(Option::take)
}

/// Creates a context drawing to `backend` and makes it current.
pub fn new_current(
    backend: impl Backend + 'static,
    config: Config,
) -> Result<SharedContext> {
    let b: Box<dyn Backend> = Box::new(backend);
    let ctx = Rc::new(RefCell::new(Context::with_config(b, config)?));
    make_current(ctx.clone());
    Ok(ctx)
}

/// Calls `f` with the current context.
///
/// # Errors
/// [`Error::NoContext`] if there is no current context, or an invalid
/// argument error if the current context is already borrowed, as happens
/// when `f` itself calls a free function of this module.
pub fn with_current<R>(
    f: impl FnOnce(&mut Context<Box<dyn Backend>>) -> R,
) -> Result<R> {
    let ctx = current().ok_or_else(|| {
        log::warn!("{}", Error::NoContext);
        Error::NoContext
    })?;
    let mut ctx = ctx
        .try_borrow_mut()
        .map_err(|_| invalid("with_current", "current context is already in use"))?;
    Ok(f(&mut ctx))
}

macro_rules! fallible {
    ($( $(#[$m:meta])* $name:ident($($arg:ident: $ty:ty),*) -> $ret:ty; )*) => {$(
        $(#[$m])*
        #[doc = concat!("Calls [`Context::", stringify!($name), "`] on the current context.")]
        pub fn $name($($arg: $ty),*) -> Result<$ret> {
            with_current(|c| c.$name($($arg),*))?
        }
    )*};
}

macro_rules! infallible {
    ($( $name:ident($($arg:ident: $ty:ty),*) -> $ret:ty; )*) => {$(
        #[doc = concat!("Calls [`Context::", stringify!($name), "`] on the current context.")]
        pub fn $name($($arg: $ty),*) -> Result<$ret> {
            with_current(|c| c.$name($($arg),*))
        }
    )*};
}

fallible! {
    enable(cap: Capability) -> ();
    disable(cap: Capability) -> ();
    color3f(r: f32, g: f32, b: f32) -> ();
    color4f(r: f32, g: f32, b: f32, a: f32) -> ();
    color3ub(r: u8, g: u8, b: u8) -> ();
    color_fv(c: &[f32]) -> ();
    normal3f(x: f32, y: f32, z: f32) -> ();
    tex_coord2f(s: f32, t: f32) -> ();
    color_material(face: Face, prop: MaterialProp) -> ();
    material_fv(face: Face, prop: MaterialProp, val: &[f32]) -> ();
    materialf(face: Face, prop: MaterialProp, val: f32) -> ();
    light_fv(i: usize, prop: LightProp, val: &[f32]) -> ();
    light_model_fv(param: LightModelParam, val: &[f32]) -> ();
    light_model_i(param: LightModelParam, val: i32) -> ();
    set_viewport(x: i32, y: i32, width: i32, height: i32) -> ();
    clear_color(r: f32, g: f32, b: f32, a: f32) -> ();
    line_width(w: f32) -> ();
    point_size(s: f32) -> ();
    pop_matrix() -> ();
    load_matrix(m: &Mat4x4) -> ();
    mult_matrix(m: &Mat4x4) -> ();
    translate(x: f32, y: f32, z: f32) -> ();
    scale(x: f32, y: f32, z: f32) -> ();
    rotate(degrees: f32, x: f32, y: f32, z: f32) -> ();
    ortho(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> ();
    frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> ();
    perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> ();
    push_attrib(mask: AttribMask) -> ();
    pop_attrib() -> ();
    begin(kind: PrimitiveKind) -> ();
    vertex2f(x: f32, y: f32) -> ();
    vertex3f(x: f32, y: f32, z: f32) -> ();
    vertex_fv(v: &[f32]) -> ();
    end() -> ();
    rect(x1: f32, y1: f32, x2: f32, y2: f32) -> ();
    vertex_pointer(size: usize, stride: usize, data: ArrayData<'_>) -> ();
    normal_pointer(stride: usize, data: ArrayData<'_>) -> ();
    color_pointer(size: usize, stride: usize, data: ArrayData<'_>) -> ();
    tex_coord_pointer(size: usize, stride: usize, data: ArrayData<'_>) -> ();
    draw_arrays(kind: PrimitiveKind, first: usize, count: usize) -> ();
    draw_elements(kind: PrimitiveKind, count: usize, indices: IndexData<'_>) -> ();
    gen_textures(n: u32) -> Range<u32>;
    tex_parameter(param: TexParam, val: TexValue) -> ();
}

infallible! {
    is_enabled(cap: Capability) -> bool;
    enable_client_state(arr: ClientArray) -> ();
    disable_client_state(arr: ClientArray) -> ();
    matrix_mode(mode: MatrixMode) -> ();
    push_matrix() -> ();
    load_identity() -> ();
    bind_texture(id: u32) -> ();
    clear(mask: ClearMask) -> ();
    depth_mask(write: bool) -> ();
    blend_func(src: BlendFactor, dst: BlendFactor) -> ();
    front_face(w: Winding) -> ();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{ErrorKind, Recorder};

    #[test]
    fn no_current_context() {
        release_current();
        assert!(current().is_none());
        assert_eq!(enable(Capability::Blend), Err(Error::NoContext));
        assert_eq!(push_matrix(), Err(Error::NoContext));
    }

    #[test]
    fn calls_forwarded() {
        let ctx = new_current(Recorder::new(10, 10), Config::default()).unwrap();
        matrix_mode(MatrixMode::Projection).unwrap();
        ortho(0.0, 10.0, 0.0, 10.0, -1.0, 1.0).unwrap();
        assert_eq!(gen_textures(2), Ok(1..3));
        bind_texture(2).unwrap();

        let c = ctx.borrow();
        assert_ne!(*c.projection(), Mat4x4::IDENTITY);
        assert_eq!(*c.modelview(), Mat4x4::IDENTITY);
        assert_eq!(c.bound_texture(), 2);
    }

    #[test]
    fn errors_pass_through() {
        new_current(Recorder::new(10, 10), Config::default()).unwrap();
        assert_eq!(end(), Err(Error::OutsidePrimitive { op: "end" }));
        assert_eq!(pop_attrib().unwrap_err().kind(), ErrorKind::Exhausted);
    }

    #[test]
    fn reentrant_call_rejected() {
        new_current(Recorder::new(10, 10), Config::default()).unwrap();
        let inner = with_current(|_| enable(Capability::Blend)).unwrap();
        assert_eq!(inner.unwrap_err().kind(), ErrorKind::Precondition);
    }

    #[test]
    fn switching_contexts() {
        let a = new_current(Recorder::new(10, 10), Config::default()).unwrap();
        let b = new_current(Recorder::new(10, 10), Config::default()).unwrap();
        enable(Capability::Lighting).unwrap();
        make_current(a.clone());
        assert_eq!(is_enabled(Capability::Lighting), Ok(false));
        assert!(b.borrow().is_enabled(Capability::Lighting));

        assert!(release_current().is_some());
        assert_eq!(is_enabled(Capability::Lighting), Err(Error::NoContext));
    }
}
