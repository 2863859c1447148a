//! Linear algebra and other useful mathematics.
//!
//! Includes [vectors][self::vec], [matrices][mat], [colors][color] and
//! [angles][angle], as well as utilities such as approximate equality
//! comparisons and a floating-point compatibility layer for `no_std`.
//!
//! Matrices follow the column-major convention of the shader pipeline
//! they are uploaded to. Transform-building functions come in two forms: a
//! free function returning the elementary matrix, and a method of the same
//! name that right-multiplies an existing matrix by it, matching the way
//! fixed-function transform calls compose onto the active matrix.

pub use {
    angle::{Angle, degs, rads},
    approx::ApproxEq,
    color::{Color, Color3f, Color4f, rgb, rgba},
    mat::{Mat3x3, Mat4x4, Matrix, frustum, orthographic, scale, translate},
    vec::{Vec2, Vec3, Vec4, Vector, vec2, vec3, vec4},
};
#[cfg(feature = "fp")]
pub use mat::{look_at, perspective, rotate};

pub mod angle;
pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod vec;
