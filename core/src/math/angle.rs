//! Angular quantities.

use core::f32::consts::{PI, TAU};
use core::fmt::{self, Debug, Display};
use core::ops::{Add, Mul, Neg, Sub};

use crate::math::approx::ApproxEq;

/// A scalar angular quantity.
///
/// Prevents confusion between degrees and radians by requiring the use of
/// one of the named constructors to create an `Angle`, as well as one of
/// the named getter methods to obtain the angle as a raw `f32` value.
/// The fixed-function API speaks degrees while the matrix code needs
/// radians, so every boundary between the two goes through this type.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Angle(f32);

/// Returns an angle of `a` radians.
pub const fn rads(a: f32) -> Angle {
    Angle(a)
}

/// Returns an angle of `a` degrees.
pub fn degs(a: f32) -> Angle {
    Angle(a * RADS_PER_DEG)
}

const RADS_PER_DEG: f32 = PI / 180.0;

impl Angle {
    /// A zero degree angle.
    pub const ZERO: Self = Self(0.0);
    /// A 90 degree angle.
    pub const RIGHT: Self = Self(TAU / 4.0);
    /// A 180 degree angle.
    pub const STRAIGHT: Self = Self(TAU / 2.0);

    /// Returns the value of `self` in radians.
    /// # Examples
    /// ```
    /// # use glimmer_core::{assert_approx_eq, math::degs};
    /// assert_approx_eq!(degs(90.0).to_rads(), core::f32::consts::FRAC_PI_2);
    /// ```
    pub const fn to_rads(self) -> f32 {
        self.0
    }
    /// Returns the value of `self` in degrees.
    pub fn to_degs(self) -> f32 {
        self.0 / RADS_PER_DEG
    }

    /// Returns `self` clamped to the range `min..=max`.
    ///
    /// # Examples
    /// ```
    /// # use glimmer_core::math::degs;
    /// let (min, max) = (degs(-85.0), degs(85.0));
    /// assert_eq!(degs(100.0).clamp(min, max), max);
    /// assert_eq!(degs(-10.0).clamp(min, max), degs(-10.0));
    /// ```
    #[must_use]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self(self.0.clamp(min.0, max.0))
    }
}

#[cfg(feature = "fp")]
impl Angle {
    /// Returns the sine of `self`.
    pub fn sin(self) -> f32 {
        use crate::math::float::f32;
        f32::sin(self.0)
    }
    /// Returns the cosine of `self`.
    pub fn cos(self) -> f32 {
        use crate::math::float::f32;
        f32::cos(self.0)
    }
    /// Simultaneously computes the sine and cosine of `self`.
    pub fn sin_cos(self) -> (f32, f32) {
        (self.sin(), self.cos())
    }
    /// Returns the tangent of `self`.
    pub fn tan(self) -> f32 {
        use crate::math::float::f32;
        f32::tan(self.0)
    }
}

impl Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}
impl Neg for Angle {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}
impl Mul<f32> for Angle {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self(self.0 * rhs)
    }
}

impl Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.to_degs())
    }
}
impl Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl ApproxEq<Self, f32> for Angle {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::{FRAC_PI_2, PI};

    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn degrees_to_radians() {
        assert_approx_eq!(degs(180.0).to_rads(), PI);
        assert_approx_eq!(degs(-90.0).to_rads(), -FRAC_PI_2);
        assert_approx_eq!(rads(PI).to_degs(), 180.0);
    }

    #[test]
    fn arithmetic() {
        assert_approx_eq!(degs(30.0) + degs(60.0), Angle::RIGHT);
        assert_approx_eq!(degs(200.0) - degs(20.0), Angle::STRAIGHT);
        assert_approx_eq!(-degs(45.0) * 2.0, -Angle::RIGHT);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn trig() {
        assert_approx_eq!(degs(30.0).sin(), 0.5);
        assert_approx_eq!(degs(60.0).cos(), 0.5);
        assert_approx_eq!(degs(45.0).tan(), 1.0);
    }

    #[test]
    fn debug_in_degrees() {
        assert_eq!(alloc::format!("{:?}", Angle::ZERO), "0°");
    }
}
