//! Floating-point compatibility API.
//!
//! Square roots and trigonometric functions are not available in `core`.
//! This module provides them using either the `libm` or `micromath` crate,
//! depending on which feature is enabled, and re-exports the chosen set as
//! the `f32` module so that call sites read the same as with `std`:
//! `f32::sqrt(x)`, `f32::sin(a)` and so on.
//!
//! Without any of the `fp` features only an approximate square root is
//! available; items needing trigonometry are compiled out.

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::sqrtf as sqrt;

    pub use libm::cosf as cos;
    pub use libm::sinf as sin;
    pub use libm::tanf as tan;
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext as mm;

    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        let y = mm::sqrt(x);
        // Two rounds of Newton's method
        let y = 0.5 * (y + (x / y));
        0.5 * (y + (x / y))
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        mm::sin(x)
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        mm::cos(x)
    }
    #[inline]
    pub fn tan(x: f32) -> f32 {
        mm::tan(x)
    }
}

pub mod fallback {
    use super::fast_recip_sqrt;

    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        if x == 0.0 { 0.0 } else { 1.0 / fast_recip_sqrt(x) }
    }
}

/// Returns a fast approximation of the reciprocal square root of a number.
#[inline]
pub fn fast_recip_sqrt(x: f32) -> f32 {
    // https://en.wikipedia.org/wiki/Fast_inverse_square_root
    const MAGIC: u32 = 0x5f37_5a86;
    let y = f32::from_bits(MAGIC.saturating_sub(x.to_bits() >> 1));
    // Two rounds of Newton's method
    let y = y * (1.5 - 0.5 * x * y * y);
    y * (1.5 - 0.5 * x * y * y)
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f32 = core::primitive::f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(not(feature = "fp"))]
pub use fallback as f32;

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use core::f32::consts::*;

    use super::*;
    use crate::assert_approx_eq;

    #[cfg(feature = "libm")]
    #[test]
    fn libm_functions() {
        assert_eq!(libm::sqrt(9.0), 3.0);
        assert!(libm::sqrt(-1.0).is_nan());
        assert_approx_eq!(libm::sin(FRAC_PI_6), 0.5);
        assert_eq!(libm::cos(PI), -1.0);
        assert_approx_eq!(libm::tan(FRAC_PI_4), 1.0);
    }

    #[cfg(feature = "mm")]
    #[test]
    fn mm_functions() {
        assert_approx_eq!(mm::sqrt(9.0), 3.0);
        assert_eq!(mm::sqrt(16.0), 4.0);
        assert_approx_eq!(mm::sin(FRAC_PI_6), 0.5, eps = 0.001);
        assert_approx_eq!(mm::tan(FRAC_PI_4), 1.0, eps = 0.001);
    }

    #[test]
    fn fallback_sqrt() {
        assert_eq!(fallback::sqrt(0.0), 0.0);
        assert_approx_eq!(fallback::sqrt(9.0), 3.0, eps = 1e-4);
        assert_approx_eq!(fallback::sqrt(2.0), SQRT_2, eps = 1e-4);
    }

    #[test]
    fn recip_sqrt_is_close() {
        assert_approx_eq!(fast_recip_sqrt(4.0), 0.5, eps = 1e-4);
        assert_approx_eq!(fast_recip_sqrt(100.0), 0.1, eps = 1e-4);
    }
}
