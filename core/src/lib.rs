//! ```text
//!          ___  _
//!    ___ _/  / (_)___ ___  ____ ___  ___  _____
//!   / _ `/  / / / __ `__ \/ __ `__ \/ _ \/ ___/
//!  / (_/ /  /_/ / / / / / / / / / / /  __/ /
//!  \__, /\___/_/_/ /_/ /_/_/ /_/ /_/\___/_/
//! /____/
//! ```
//!
//! Core functionality of the `glimmer` project.
//!
//! Glimmer emulates the classic fixed-function, immediate-mode 3D graphics
//! API on top of a programmable shader pipeline. Includes a math library
//! with vectors, matrices, colors, and angles; a graphics [context][gl]
//! tracking matrices, materials, lights and other fixed-function state and
//! translating `begin`/`vertex`/`end` sequences and array draws into buffer
//! uploads; and [camera utilities][cam] for interactive viewing.
//!
//! The shader pipeline itself is abstracted behind the [`gl::Backend`]
//! trait; `glimmer-front` provides a WebGL implementation, and
//! [`gl::Recorder`] records every call for inspection and testing.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring floating-point functions not included
//!   in `core`, using the standard library implementations, as well as the
//!   thread-local "current context" used by the free-function API.
//!   Enabled by default.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! Each of the above also enables the internal `fp` feature which gates
//! rotation, perspective, look-at, and the camera module.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

#[cfg(feature = "fp")]
pub mod cam;
pub mod gl;
pub mod math;

pub mod prelude {
    #[cfg(feature = "fp")]
    pub use crate::math::{look_at, perspective, rotate};
    pub use crate::math::{
        Angle, ApproxEq, Color3f, Color4f, Mat3x3, Mat4x4, Matrix, Vec2, Vec3,
        Vec4, Vector, degs, frustum, orthographic, rads, rgb, rgba, scale,
        translate, vec2, vec3, vec4,
    };

    pub use crate::gl::{
        Backend, Capability, ClientArray, Config, Context, Error, Face,
        MaterialProp, MatrixMode, PrimitiveKind, Result,
    };

    #[cfg(feature = "fp")]
    pub use crate::cam::{Camera, Orbit, Trackball};
}
