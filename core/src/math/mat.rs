//! Matrices and linear transforms.
//!
//! Matrices are stored in column-major order, the layout shader uniforms
//! expect: the element at row `r`, column `c` of a 4x4 matrix lives at index
//! `4 * c + r`. Every operation returns a new value instead of writing
//! through an output parameter, so an operand can never alias the result.
//!
//! Operations that can degenerate ([`Mat4x4::invert`], [`rotate`],
//! [`Mat4x4::normal_matrix`]) return `Option`, with `None` standing for a
//! singular matrix or a zero-length axis. No pseudo-inverse or fallback
//! direction is ever substituted.

use core::fmt::{self, Debug, Formatter};
use core::ops::Range;

use crate::math::approx::ApproxEq;
#[cfg(feature = "fp")]
use crate::math::angle::Angle;
use crate::math::vec::{Vec3, Vec4, vec3, vec4};

/// A square matrix of `f32` elements in column-major order.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq)]
pub struct Matrix<Repr>(pub Repr);

/// A 4x4 matrix, the type of modelview, projection and texture matrices.
pub type Mat4x4 = Matrix<[f32; 16]>;

/// A 3x3 matrix, the type of the normal matrix.
pub type Mat3x3 = Matrix<[f32; 9]>;

/// Threshold below which lengths and coordinate differences count as zero.
pub const EPSILON: f32 = 1e-6;

impl Mat4x4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Returns a matrix with the given elements in column-major order.
    pub const fn from_cols(els: [f32; 16]) -> Self {
        Self(els)
    }

    /// Returns a matrix with the given rows.
    ///
    /// Convenient for writing matrices out in the order they read on paper.
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut els = [0.0; 16];
        for (r, row) in rows.iter().enumerate() {
            for (c, &e) in row.iter().enumerate() {
                els[4 * c + r] = e;
            }
        }
        Self(els)
    }

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Returns the elements of `self` in column-major order.
    pub const fn to_cols(&self) -> [f32; 16] {
        self.0
    }

    /// Returns the element at row `r`, column `c`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.0[4 * c + r]
    }

    /// Returns the `i`th column of `self` as a vector.
    pub fn col(&self, i: usize) -> Vec4 {
        let e = &self.0[4 * i..4 * i + 4];
        vec4(e[0], e[1], e[2], e[3])
    }

    /// Returns the `i`th row of `self` as a vector.
    pub fn row(&self, i: usize) -> Vec4 {
        vec4(self.get(i, 0), self.get(i, 1), self.get(i, 2), self.get(i, 3))
    }

    /// Returns the matrix product `self · other`.
    ///
    /// As a transform, the result applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let mut els = [0.0; 16];
        for c in 0..4 {
            let col = other.col(c);
            for r in 0..4 {
                els[4 * c + r] = self.row(r).dot(&col);
            }
        }
        Self(els)
    }

    /// Returns the matrix product `other · self`.
    ///
    /// As a transform, the result applies `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        other.compose(self)
    }

    /// Returns the transpose of `self`.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut els = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                els[4 * r + c] = self.get(r, c);
            }
        }
        Self(els)
    }

    /// Returns the upper-left 3x3 block of `self`.
    pub fn linear(&self) -> Mat3x3 {
        let m = &self.0;
        Matrix([m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]])
    }

    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f32 {
        Cofactors::of(self).det
    }

    /// Returns the inverse of `self`, or `None` if `self` is singular.
    ///
    /// Computed by cofactor expansion. The determinant must be exactly
    /// zero for the matrix to count as singular; nearly singular input
    /// yields a numerically poor but finite result.
    ///
    /// # Examples
    /// ```
    /// # use glimmer_core::{assert_approx_eq, math::*};
    /// let m = translate(vec3(1.0, 2.0, 3.0)).compose(&scale(vec3(2.0, 2.0, 2.0)));
    /// let inv = m.invert().unwrap();
    /// assert_approx_eq!(inv.compose(&m), Mat4x4::IDENTITY);
    ///
    /// assert_eq!(scale(vec3(1.0, 0.0, 1.0)).invert(), None);
    /// ```
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let Cofactors { det, b } = Cofactors::of(self);
        if det == 0.0 {
            return None;
        }
        let d = 1.0 / det;
        let [a00, a01, a02, a03] = self.col(0).0;
        let [a10, a11, a12, a13] = self.col(1).0;
        let [a20, a21, a22, a23] = self.col(2).0;
        let [a30, a31, a32, a33] = self.col(3).0;
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = b;
        Some(Self([
            (a11 * b11 - a12 * b10 + a13 * b09) * d,
            (a02 * b10 - a01 * b11 - a03 * b09) * d,
            (a31 * b05 - a32 * b04 + a33 * b03) * d,
            (a22 * b04 - a21 * b05 - a23 * b03) * d,
            (a12 * b08 - a10 * b11 - a13 * b07) * d,
            (a00 * b11 - a02 * b08 + a03 * b07) * d,
            (a32 * b02 - a30 * b05 - a33 * b01) * d,
            (a20 * b05 - a22 * b02 + a23 * b01) * d,
            (a10 * b10 - a11 * b08 + a13 * b06) * d,
            (a01 * b08 - a00 * b10 - a03 * b06) * d,
            (a30 * b04 - a31 * b02 + a33 * b00) * d,
            (a21 * b02 - a20 * b04 - a23 * b00) * d,
            (a11 * b07 - a10 * b09 - a12 * b06) * d,
            (a00 * b09 - a01 * b07 + a02 * b06) * d,
            (a31 * b01 - a30 * b03 - a32 * b00) * d,
            (a20 * b03 - a21 * b01 + a22 * b00) * d,
        ]))
    }

    /// Returns `self · T`, where `T` translates by `t`.
    #[must_use]
    pub fn translate(&self, t: Vec3) -> Self {
        let mut res = *self;
        let col = self.col(0) * t.x() + self.col(1) * t.y()
            + self.col(2) * t.z()
            + self.col(3);
        res.0[12..16].copy_from_slice(&col.0);
        res
    }

    /// Returns `self · S`, where `S` scales by `s` along the axes.
    #[must_use]
    pub fn scale(&self, s: Vec3) -> Self {
        let mut res = *self;
        for (c, k) in s.0.into_iter().enumerate() {
            for e in &mut res.0[4 * c..4 * c + 4] {
                *e *= k;
            }
        }
        res
    }

    /// Returns `self · R`, where `R` rotates by `angle` about `axis`,
    /// or `None` if `axis` has (nearly) zero length.
    #[cfg(feature = "fp")]
    #[must_use]
    pub fn rotate(&self, angle: Angle, axis: Vec3) -> Option<Self> {
        Some(self.compose(&rotate(angle, axis)?))
    }

    /// Returns the normal matrix of `self`: the inverse transpose of its
    /// upper-left 3x3 block, or `None` if that block is singular.
    ///
    /// Normals must be transformed by this matrix rather than by `self`
    /// itself, or non-uniform scaling would skew them.
    pub fn normal_matrix(&self) -> Option<Mat3x3> {
        Some(self.linear().invert()?.transpose())
    }

    /// Returns the homogeneous product `self · v`.
    pub fn apply(&self, v: &Vec4) -> Vec4 {
        self.col(0) * v.0[0]
            + self.col(1) * v.0[1]
            + self.col(2) * v.0[2]
            + self.col(3) * v.0[3]
    }

    /// Transforms the point `p` by `self`, assuming `w` = 1 and ignoring
    /// the resulting `w`.
    pub fn apply_pt(&self, p: &Vec3) -> Vec3 {
        self.apply(&p.to_vec4(1.0)).xyz()
    }
}

/// The twelve 2x2 sub-determinants used by both the determinant and the
/// inverse of a 4x4 matrix.
struct Cofactors {
    b: [f32; 12],
    det: f32,
}

impl Cofactors {
    fn of(m: &Mat4x4) -> Self {
        let [a00, a01, a02, a03] = m.col(0).0;
        let [a10, a11, a12, a13] = m.col(1).0;
        let [a20, a21, a22, a23] = m.col(2).0;
        let [a30, a31, a32, a33] = m.col(3).0;
        let b = [
            a00 * a11 - a01 * a10,
            a00 * a12 - a02 * a10,
            a00 * a13 - a03 * a10,
            a01 * a12 - a02 * a11,
            a01 * a13 - a03 * a11,
            a02 * a13 - a03 * a12,
            a20 * a31 - a21 * a30,
            a20 * a32 - a22 * a30,
            a20 * a33 - a23 * a30,
            a21 * a32 - a22 * a31,
            a21 * a33 - a23 * a31,
            a22 * a33 - a23 * a32,
        ];
        let det = b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8]
            - b[4] * b[7]
            + b[5] * b[6];
        Self { b, det }
    }
}

impl Mat3x3 {
    /// The identity matrix.
    pub const IDENTITY: Self =
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Returns the element at row `r`, column `c`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.0[3 * c + r]
    }

    /// Returns the elements of `self` in column-major order.
    pub const fn to_cols(&self) -> [f32; 9] {
        self.0
    }

    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f32 {
        let m = |r, c| self.get(r, c);
        m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
            - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
            + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))
    }

    /// Returns the inverse of `self`, or `None` if `self` is singular.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        let m = |r: usize, c: usize| self.get(r % 3, c % 3);
        // Cofactor of element (r, c), with the sign folded in by the
        // cyclic index order.
        let cof = |r: usize, c: usize| {
            m(r + 1, c + 1) * m(r + 2, c + 2) - m(r + 1, c + 2) * m(r + 2, c + 1)
        };
        let mut els = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                // inverse = adjugate / det = transpose(cofactors) / det
                els[3 * c + r] = cof(c, r) / det;
            }
        }
        Some(Self(els))
    }

    /// Returns the transpose of `self`.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut els = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                els[3 * r + c] = self.get(r, c);
            }
        }
        Self(els)
    }

    /// Returns the product `self · v`.
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        let m = |r, c| self.get(r, c);
        let [x, y, z] = v.0;
        vec3(
            m(0, 0) * x + m(0, 1) * y + m(0, 2) * z,
            m(1, 0) * x + m(1, 1) * y + m(1, 2) * z,
            m(2, 0) * x + m(2, 1) * y + m(2, 2) * z,
        )
    }
}

impl Default for Mat4x4 {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<const N: usize> Debug for Matrix<[f32; N]> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let dim = if N == 16 { 4 } else { 3 };
        writeln!(f, "Matrix[")?;
        for r in 0..dim {
            write!(f, "    [")?;
            for c in 0..dim {
                let sep = if c + 1 < dim { ", " } else { "" };
                write!(f, "{:6.2?}{sep}", self.0[dim * c + r])?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl<const N: usize> ApproxEq<Self, f32> for Matrix<[f32; N]> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

/// Returns a matrix translating by `t`.
pub fn translate(t: Vec3) -> Mat4x4 {
    Mat4x4::IDENTITY.translate(t)
}

/// Returns a matrix scaling by `s` along the coordinate axes.
pub fn scale(s: Vec3) -> Mat4x4 {
    Mat4x4::IDENTITY.scale(s)
}

/// Returns a matrix rotating by `angle` counterclockwise about `axis`,
/// or `None` if the length of `axis` is less than [`EPSILON`].
///
/// `axis` need not be normalized.
///
/// # Examples
/// ```
/// # use glimmer_core::{assert_approx_eq, math::*};
/// let r = rotate(degs(90.0), vec3(0.0, 0.0, 2.0)).unwrap();
/// assert_approx_eq!(r.apply_pt(&Vec3::X), Vec3::Y);
///
/// assert_eq!(rotate(degs(90.0), vec3(0.0, 0.0, 0.0)), None);
/// ```
#[cfg(feature = "fp")]
pub fn rotate(angle: Angle, axis: Vec3) -> Option<Mat4x4> {
    let len = axis.len();
    if len < EPSILON {
        return None;
    }
    let [x, y, z] = (axis / len).0;
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    Some(Mat4x4::from_cols([
        x * x * t + c,
        y * x * t + z * s,
        z * x * t - y * s,
        0.0,
        x * y * t - z * s,
        y * y * t + c,
        z * y * t + x * s,
        0.0,
        x * z * t + y * s,
        y * z * t - x * s,
        z * z * t + c,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]))
}

/// Returns an off-center perspective projection matrix.
///
/// The view volume is the frustum with apex at the eye, the near-plane
/// window `left_right` × `bottom_top`, and depth range `near_far`, measured
/// as positive distances along the −z axis. Maps it to the clip-space cube
/// with depth in [−1, 1].
pub fn frustum(
    left_right: Range<f32>,
    bottom_top: Range<f32>,
    near_far: Range<f32>,
) -> Mat4x4 {
    let Range { start: l, end: r } = left_right;
    let Range { start: b, end: t } = bottom_top;
    let Range { start: n, end: f } = near_far;
    let rl = 1.0 / (r - l);
    let tb = 1.0 / (t - b);
    let nf = 1.0 / (n - f);
    Mat4x4::from_rows([
        [2.0 * n * rl, 0.0, (r + l) * rl, 0.0],
        [0.0, 2.0 * n * tb, (t + b) * tb, 0.0],
        [0.0, 0.0, (f + n) * nf, 2.0 * f * n * nf],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Returns a symmetric perspective projection matrix with vertical field
/// of view `fovy` and the given aspect ratio (width / height).
#[cfg(feature = "fp")]
pub fn perspective(fovy: Angle, aspect: f32, near_far: Range<f32>) -> Mat4x4 {
    let f = 1.0 / (fovy * 0.5).tan();
    let Range { start: n, end: far } = near_far;
    let nf = 1.0 / (n - far);
    Mat4x4::from_rows([
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + n) * nf, 2.0 * far * n * nf],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Returns an orthographic projection matrix mapping the given box to the
/// clip-space cube. As with [`frustum`], depths are distances along −z.
pub fn orthographic(
    left_right: Range<f32>,
    bottom_top: Range<f32>,
    near_far: Range<f32>,
) -> Mat4x4 {
    let Range { start: l, end: r } = left_right;
    let Range { start: b, end: t } = bottom_top;
    let Range { start: n, end: f } = near_far;
    let lr = 1.0 / (l - r);
    let bt = 1.0 / (b - t);
    let nf = 1.0 / (n - f);
    Mat4x4::from_rows([
        [-2.0 * lr, 0.0, 0.0, (l + r) * lr],
        [0.0, -2.0 * bt, 0.0, (t + b) * bt],
        [0.0, 0.0, 2.0 * nf, (f + n) * nf],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a view matrix placing the eye at `eye`, looking at `center`,
/// with `up` pointing up on the screen.
///
/// If `eye` and `center` coincide (within [`EPSILON`] per coordinate),
/// returns the identity matrix. If `up` is parallel to the view direction,
/// the right vector has zero length and is left as the zero vector, which
/// yields a singular matrix rather than a division by zero.
#[cfg(feature = "fp")]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4x4 {
    let d = eye - center;
    if d.0.iter().all(|c| c.abs() < EPSILON) {
        return Mat4x4::IDENTITY;
    }
    let normalize_or_zero = |v: Vec3| {
        let len = v.len();
        if len == 0.0 { Vec3::default() } else { v / len }
    };
    let z = d.normalize();
    let x = normalize_or_zero(up.cross(&z));
    let y = normalize_or_zero(z.cross(&x));

    Mat4x4::from_rows([
        [x.x(), x.y(), x.z(), -x.dot(&eye)],
        [y.x(), y.y(), y.z(), -y.dot(&eye)],
        [z.x(), z.y(), z.z(), -z.dot(&eye)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use crate::assert_approx_eq;
    #[cfg(feature = "fp")]
    use crate::math::angle::degs;
    use crate::math::vec::vec3;

    use super::*;

    fn sample() -> Mat4x4 {
        Mat4x4::from_rows([
            [2.0, 0.0, 1.0, 3.0],
            [1.0, 3.0, 0.0, -1.0],
            [0.0, 1.0, 4.0, 2.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn matrix_debug() {
        let m = Mat4x4::from_rows([
            [0.0, 1.0, 2.0, 3.0],
            [10.0, 11.0, 12.0, 13.0],
            [20.0, 21.0, 22.0, 23.0],
            [30.0, 31.0, 32.0, 33.0],
        ]);
        let expected = r#"Matrix[
    [  0.00,   1.00,   2.00,   3.00]
    [ 10.00,  11.00,  12.00,  13.00]
    [ 20.00,  21.00,  22.00,  23.00]
    [ 30.00,  31.00,  32.00,  33.00]
]"#;
        assert_eq!(format!("{m:?}"), expected);
    }

    #[test]
    fn column_major_layout() {
        let m = translate(vec3(1.0, 2.0, 3.0));
        assert_eq!(&m.to_cols()[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(m.get(0, 3), 1.0);
        assert_eq!(m.row(1), vec4(0.0, 1.0, 0.0, 2.0));
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let t = translate(vec3(1.0, 0.0, 0.0));
        let s = scale(vec3(2.0, 2.0, 2.0));
        let p = vec3(1.0, 1.0, 1.0);
        assert_eq!(t.compose(&s).apply_pt(&p), vec3(3.0, 2.0, 2.0));
        assert_eq!(t.then(&s).apply_pt(&p), vec3(4.0, 2.0, 2.0));
    }

    #[test]
    fn translate_and_scale_right_multiply() {
        let m = sample();
        let t = vec3(1.0, -2.0, 0.5);
        assert_eq!(m.translate(t), m.compose(&translate(t)));
        let s = vec3(2.0, 3.0, -1.0);
        assert_eq!(m.scale(s), m.compose(&scale(s)));
    }

    #[test]
    fn invert_then_compose_is_identity() {
        let m = sample();
        let inv = m.invert().expect("sample should be invertible");
        assert_approx_eq!(inv.compose(&m), Mat4x4::IDENTITY);
        assert_approx_eq!(m.compose(&inv), Mat4x4::IDENTITY);
        assert_approx_eq!(m.determinant(), 25.0);
    }

    #[test]
    fn invert_singular_is_none() {
        let m = Mat4x4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(m.invert(), None);
        assert_eq!(Mat4x4::from_cols([0.0; 16]).invert(), None);
    }

    #[test]
    fn normal_matrix_of_nonuniform_scale() {
        let m = scale(vec3(2.0, 4.0, 1.0)).translate(vec3(5.0, 5.0, 5.0));
        let n = m.normal_matrix().expect("should be invertible");
        let expected: Mat3x3 =
            Matrix([0.5, 0.0, 0.0, 0.0, 0.25, 0.0, 0.0, 0.0, 1.0]);
        assert_approx_eq!(n, expected);

        assert_eq!(scale(vec3(1.0, 0.0, 1.0)).normal_matrix(), None);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let m = sample();
        let n = m.normal_matrix().expect("should be invertible");
        let lin = m.linear();
        // nᵀ · lin = I
        let prod = |r: usize, c: usize| {
            (0..3).map(|k| n.get(k, r) * lin.get(k, c)).sum::<f32>()
        };
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_approx_eq!(prod(r, c), expected);
            }
        }
    }

    #[test]
    fn mat3_invert() {
        let m: Mat3x3 = Matrix([2.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 4.0]);
        let inv = m.invert().expect("should be invertible");
        assert_approx_eq!(
            inv.apply(&m.apply(&vec3(1.0, 2.0, 3.0))),
            vec3(1.0, 2.0, 3.0)
        );
        let zero: Mat3x3 = Matrix([0.0; 9]);
        assert_eq!(zero.invert(), None);
    }

    #[test]
    fn apply_to_vec4() {
        let m = translate(vec3(1.0, 2.0, 3.0));
        assert_eq!(m.apply(&vec4(1.0, 1.0, 1.0, 1.0)), vec4(2.0, 3.0, 4.0, 1.0));
        // Directions are unaffected by translation
        assert_eq!(m.apply(&vec4(1.0, 1.0, 1.0, 0.0)), vec4(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn frustum_maps_near_and_far_planes() {
        let m = frustum(-1.0..1.0, -1.0..1.0, 1.0..10.0);
        let near = m.apply(&vec4(1.0, 1.0, -1.0, 1.0));
        assert_approx_eq!(near.xyz() / near.w(), vec3(1.0, 1.0, -1.0));
        let far = m.apply(&vec4(0.0, 0.0, -10.0, 1.0));
        assert_approx_eq!(far.0[2] / far.w(), 1.0);
    }

    #[test]
    fn orthographic_maps_box_to_cube() {
        let m = orthographic(0.0..4.0, -2.0..2.0, -1.0..1.0);
        assert_approx_eq!(m.apply_pt(&vec3(0.0, -2.0, 1.0)), vec3(-1.0, -1.0, -1.0));
        assert_approx_eq!(m.apply_pt(&vec3(4.0, 2.0, -1.0)), vec3(1.0, 1.0, 1.0));
    }

    #[cfg(feature = "fp")]
    #[test]
    fn perspective_matches_symmetric_frustum() {
        let p = perspective(degs(90.0), 2.0, 1.0..100.0);
        let f = frustum(-2.0..2.0, -1.0..1.0, 1.0..100.0);
        assert_approx_eq!(p, f);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn rotate_then_unrotate_is_identity() {
        let m = sample();
        let axis = vec3(1.0, -2.0, 0.5);
        for a in [-170.0, -45.0, 0.0, 30.0, 90.0, 123.0] {
            let r = m.rotate(degs(a), axis).unwrap();
            let back = r.rotate(degs(-a), axis).unwrap();
            assert_approx_eq!(back, m, eps = 1e-4);
        }
    }

    #[cfg(feature = "fp")]
    #[test]
    fn rotate_zero_axis_is_none() {
        assert_eq!(Mat4x4::IDENTITY.rotate(degs(10.0), vec3(0.0, 0.0, 0.0)), None);
        assert_eq!(rotate(degs(10.0), vec3(1e-7, 0.0, 0.0)), None);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn look_at_same_eye_and_center_is_identity() {
        let eye = vec3(1.0, 2.0, 3.0);
        assert_eq!(look_at(eye, eye, Vec3::Y), Mat4x4::IDENTITY);
        assert_eq!(look_at(eye, eye, vec3(0.0, 0.0, 0.0)), Mat4x4::IDENTITY);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn look_at_maps_center_to_negative_z() {
        let m = look_at(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, 0.0), Vec3::Y);
        assert_approx_eq!(m.apply_pt(&vec3(0.0, 0.0, 0.0)), vec3(0.0, 0.0, -5.0));
        let m = look_at(vec3(3.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0), Vec3::Y);
        assert_approx_eq!(m.apply_pt(&vec3(0.0, 0.0, 0.0)), vec3(0.0, 0.0, -3.0));
        assert_approx_eq!(m.apply_pt(&vec3(3.0, 1.0, 0.0)), vec3(0.0, 1.0, 0.0));
    }

    #[cfg(feature = "fp")]
    #[test]
    fn look_at_with_parallel_up_has_zero_right_vector() {
        let m = look_at(vec3(0.0, 5.0, 0.0), vec3(0.0, 0.0, 0.0), Vec3::Y);
        assert_eq!(m.row(0), vec4(0.0, 0.0, 0.0, 0.0));
        assert_eq!(m.invert(), None);
    }
}
