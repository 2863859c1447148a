//! Colors with floating-point channels.

use core::fmt::{self, Debug, Formatter};
use core::ops::Index;

use crate::math::approx::ApproxEq;

/// A color, similar to [`Vector`][crate::math::Vector].
///
/// Channels are nominally in the range [0, 1], but material and light
/// colors are not clamped; only the current drawing color is.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Color<Repr>(pub Repr);

/// An RGB color with `f32` channels.
pub type Color3f = Color<[f32; 3]>;

/// An RGBA color with `f32` channels.
pub type Color4f = Color<[f32; 4]>;

/// Returns a new RGB color with `r`, `g`, and `b` components.
pub const fn rgb(r: f32, g: f32, b: f32) -> Color3f {
    Color([r, g, b])
}
/// Returns a new RGBA color with `r`, `g`, `b`, and `a` components.
pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color4f {
    Color([r, g, b, a])
}

/// Returns a new RGBA color from 8-bit channels, scaled to [0, 1].
///
/// # Examples
/// ```
/// # use glimmer_core::math::color::*;
/// assert_eq!(rgba_u8(0xFF, 0, 0x33, 0xFF), rgba(1.0, 0.0, 0.2, 1.0));
/// ```
pub fn rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Color4f {
    let ch = |c: u8| f32::from(c) / 255.0;
    rgba(ch(r), ch(g), ch(b), ch(a))
}

impl Color3f {
    /// Black, also the zero color.
    pub const BLACK: Self = rgb(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = rgb(1.0, 1.0, 1.0);

    /// Returns `self` with an alpha channel added.
    pub const fn to_rgba(self, a: f32) -> Color4f {
        let [r, g, b] = self.0;
        rgba(r, g, b, a)
    }
}

impl Color4f {
    /// Opaque black.
    pub const BLACK: Self = rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = rgba(1.0, 1.0, 1.0, 1.0);

    /// Returns the color channels of `self` without alpha.
    pub const fn to_rgb(self) -> Color3f {
        let [r, g, b, _] = self.0;
        rgb(r, g, b)
    }

    /// Returns the alpha channel of `self`.
    pub const fn a(&self) -> f32 {
        self.0[3]
    }

    /// Returns `self` with each channel clamped to [0, 1].
    #[must_use]
    pub fn clamp(self) -> Self {
        Self(self.0.map(|c| c.clamp(0.0, 1.0)))
    }
}

impl<const N: usize> Index<usize> for Color<[f32; N]> {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl<const N: usize> From<[f32; N]> for Color<[f32; N]> {
    fn from(chs: [f32; N]) -> Self {
        Self(chs)
    }
}

impl<const N: usize> Debug for Color<[f32; N]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = if N == 3 { "Rgb" } else { "Rgba" };
        write!(f, "{name}{:?}", self.0)
    }
}

impl<const N: usize> ApproxEq<Self, f32> for Color<[f32; N]> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}
