//! Real vectors in two, three and four dimensions.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, Div, Index, Mul, Neg, Sub};

use crate::math::approx::ApproxEq;

/// A vector of `f32` components.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vector<Repr>(pub Repr);

/// A 2-vector, used for texture coordinates and pointer positions.
pub type Vec2 = Vector<[f32; 2]>;
/// A 3-vector, used for positions, normals and directions.
pub type Vec3 = Vector<[f32; 3]>;
/// A homogeneous 4-vector.
pub type Vec4 = Vector<[f32; 4]>;

/// Returns a 2D vector with components `x` and `y`.
pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vector([x, y])
}
/// Returns a 3D vector with components `x`, `y`, and `z`.
pub const fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vector([x, y, z])
}
/// Returns a 4D vector with components `x`, `y`, `z`, and `w`.
pub const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vector([x, y, z, w])
}

impl<const N: usize> Vector<[f32; N]> {
    /// Returns the dot product of `self` and `other`.
    pub fn dot(&self, other: &Self) -> f32 {
        (0..N).map(|i| self.0[i] * other.0[i]).sum()
    }

    /// Returns the squared Euclidean length of `self`.
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the Euclidean length of `self`.
    #[cfg(feature = "fp")]
    pub fn len(&self) -> f32 {
        use crate::math::float::f32;
        f32::sqrt(self.len_sqr())
    }

    /// Returns `self` divided by its length.
    ///
    /// The result is unspecified (non-finite) if `self` is the zero vector.
    #[cfg(feature = "fp")]
    #[must_use]
    pub fn normalize(&self) -> Self {
        *self / self.len()
    }

    /// Returns whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut res = self;
        for i in 0..N {
            res.0[i] = f(self.0[i], other.0[i]);
        }
        res
    }
}

impl Vec2 {
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
}

impl Vec3 {
    /// Unit vector in the x direction.
    pub const X: Self = vec3(1.0, 0.0, 0.0);
    /// Unit vector in the y direction.
    pub const Y: Self = vec3(0.0, 1.0, 0.0);
    /// Unit vector in the z direction.
    pub const Z: Self = vec3(0.0, 0.0, 1.0);

    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`.
    pub fn cross(&self, other: &Self) -> Self {
        let [a, b, c] = self.0;
        let [d, e, f] = other.0;
        vec3(b * f - c * e, c * d - a * f, a * e - b * d)
    }

    /// Returns `self` reflected in the unit vector `axis`.
    ///
    /// That is, returns `2(axis·self)axis - self`: the image of `self` under
    /// a half-turn about `axis`.
    pub fn reflect_in(&self, axis: &Self) -> Self {
        *axis * (2.0 * axis.dot(self)) - *self
    }

    /// Extends `self` to a homogeneous vector with the given `w`.
    pub const fn to_vec4(self, w: f32) -> Vec4 {
        let [x, y, z] = self.0;
        vec4(x, y, z, w)
    }
}

impl Vec4 {
    #[inline]
    pub const fn w(&self) -> f32 {
        self.0[3]
    }
    /// Returns the first three components of `self`.
    pub const fn xyz(&self) -> Vec3 {
        let [x, y, z, _] = self.0;
        vec3(x, y, z)
    }
}

impl<const N: usize> Add for Vector<[f32; N]> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}
impl<const N: usize> Sub for Vector<[f32; N]> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}
impl<const N: usize> Mul<f32> for Vector<[f32; N]> {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        self.zip_with(self, |a, _| a * rhs)
    }
}
impl<const N: usize> Div<f32> for Vector<[f32; N]> {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        self.zip_with(self, |a, _| a / rhs)
    }
}
impl<const N: usize> Neg for Vector<[f32; N]> {
    type Output = Self;
    fn neg(self) -> Self {
        self.zip_with(self, |a, _| -a)
    }
}

impl<const N: usize> Index<usize> for Vector<[f32; N]> {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl<const N: usize> From<[f32; N]> for Vector<[f32; N]> {
    #[inline]
    fn from(els: [f32; N]) -> Self {
        Self(els)
    }
}

impl<const N: usize> Debug for Vector<[f32; N]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec{:?}", self.0)
    }
}

impl<const N: usize> ApproxEq<Self, f32> for Vector<[f32; N]> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn arithmetic() {
        let v = vec3(1.0, -2.0, 3.0);
        assert_eq!(v + Vec3::X, vec3(2.0, -2.0, 3.0));
        assert_eq!(v - v, Vec3::default());
        assert_eq!(v * 2.0, vec3(2.0, -4.0, 6.0));
        assert_eq!(-v / 2.0, vec3(-0.5, 1.0, -1.5));
    }

    #[test]
    fn dot_and_cross() {
        assert_eq!(Vec3::X.dot(&Vec3::Y), 0.0);
        assert_eq!(vec3(1.0, 2.0, 3.0).dot(&vec3(4.0, 5.0, 6.0)), 32.0);
        assert_eq!(Vec3::X.cross(&Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(&Vec3::X), -Vec3::Z);
    }

    #[test]
    fn reflect_in_axis() {
        assert_eq!(Vec3::X.reflect_in(&Vec3::Z), -Vec3::X);
        assert_eq!(Vec3::Z.reflect_in(&Vec3::Z), Vec3::Z);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn length_and_normalize() {
        assert_eq!(vec3(3.0, 0.0, 4.0).len(), 5.0);
        assert_approx_eq!(vec3(0.0, 3.0, 4.0).normalize(), vec3(0.0, 0.6, 0.8));
    }

    #[test]
    fn homogeneous() {
        let v = vec3(1.0, 2.0, 3.0).to_vec4(1.0);
        assert_eq!(v, vec4(1.0, 2.0, 3.0, 1.0));
        assert_eq!(v.xyz(), vec3(1.0, 2.0, 3.0));
        assert_eq!(v.w(), 1.0);
    }

    #[test]
    fn debug() {
        assert_eq!(alloc::format!("{:?}", vec2(1.0, -2.5)), "Vec[1.0, -2.5]");
    }
}
