//! Cameras and interactive view rotation.
//!
//! [`Camera`] sets up the projection and modelview matrices of a
//! [`Context`][crate::gl::Context] from an eye point and a box of
//! coordinates that should be visible. [`Orbit`] and [`Trackball`] turn
//! pointer drags into a view matrix. [`DragController`] routes raw pointer
//! events to any of them.

use crate::math::{Mat4x4, Vec3};

pub use {
    camera::{Camera, Limits},
    drag::{DragController, DragEvent, Draggable, Pointer, Source},
    orbit::Orbit,
    trackball::Trackball,
};

mod camera;
mod drag;
mod orbit;
mod trackball;

/// Trait for rotators that track a viewing transform.
pub trait View {
    /// Returns the current world-to-view matrix.
    fn view_matrix(&self) -> Mat4x4;
}

/// Makes the rotation `m` pivot about `center` and moves the result
/// `distance` units away from the viewer.
fn pivot(mut m: Mat4x4, center: Vec3, distance: f32) -> Mat4x4 {
    let rc = m.apply_pt(&center);
    let t = center - rc;
    m.0[12] = t.x();
    m.0[13] = t.y();
    m.0[14] = t.z() - distance;
    m
}

/// Rotates each of `axes` by the rotation taking `to` onto `from`.
///
/// Seen through a frame of `axes` turned this way, the scene appears to
/// turn from `from` to `to`. The rotation is composed of two half-turns,
/// first about the bisector of `from` and `to`, then about `from`. Does
/// nothing if either vector is zero or the two point in opposite
/// directions.
fn transvect(from: Vec3, to: Vec3, axes: &mut [&mut Vec3]) {
    const MIN: f32 = 1e-12;
    if from.len_sqr() < MIN || to.len_sqr() < MIN {
        return;
    }
    let (e1, e2) = (from.normalize(), to.normalize());
    let sum = e1 + e2;
    if sum.len_sqr() < MIN {
        return;
    }
    let e = sum.normalize();
    for a in axes {
        **a = a.reflect_in(&e).reflect_in(&e1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::math::vec3;

    #[test]
    fn pivot_keeps_center_fixed() {
        let m = crate::math::rotate(crate::math::degs(90.0), Vec3::Y).unwrap();
        let c = vec3(1.0, 2.0, 3.0);
        let v = pivot(m, c, 0.0);
        assert_approx_eq!(v.apply_pt(&c), c);
        let v = pivot(m, c, 5.0);
        assert_approx_eq!(v.apply_pt(&c), vec3(1.0, 2.0, -2.0));
    }

    #[test]
    fn transvection_turns_frame_backwards() {
        let mut a = Vec3::X;
        let mut b = Vec3::Z;
        transvect(Vec3::X, Vec3::Y, &mut [&mut a, &mut b]);
        assert_approx_eq!(a, -Vec3::Y);
        assert_approx_eq!(b, Vec3::Z);
    }

    #[test]
    fn opposite_vectors_ignored() {
        let mut a = Vec3::X;
        transvect(Vec3::X, -Vec3::X, &mut [&mut a]);
        assert_eq!(a, Vec3::X);
    }
}
