use core::ops::Range;

use crate::gl::error::{degenerate, invalid};
use crate::gl::{Backend, Context, Degeneracy, MatrixMode, Result};
use alloc::format;

use crate::math::{Vec3, frustum, look_at, orthographic, vec3};

use super::transvect;

/// The region of view coordinates a [`Camera`] should show.
///
/// The limits are relative to the view center: x and y span the screen,
/// and z points out of the screen towards the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct Limits {
    pub x: Range<f32>,
    pub y: Range<f32>,
    pub z: Range<f32>,
}

/// A camera that sets up both projection and viewing transforms.
///
/// The view is given as an eye point looking towards a view center, and the
/// projection as a box of [`Limits`] around the view center. When
/// `preserve_aspect` is set, the x or y limits are widened on
/// [`apply`][Self::apply] to match the shape of the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Whether to use an orthographic instead of a perspective projection.
    pub orthographic: bool,
    /// Whether to widen the limits to the aspect ratio of the viewport.
    pub preserve_aspect: bool,
    limits: Limits,
    actual: (Range<f32>, Range<f32>),
}

impl Camera {
    /// The smallest distance from the eye to the near plane in perspective.
    pub const MIN_NEAR: f32 = 0.1;

    /// Creates a camera at (0, 0, 30) looking at the origin with y up,
    /// showing x and y in -5..5 and z in -10..10.
    pub fn new() -> Self {
        let limits = Limits { x: -5.0..5.0, y: -5.0..5.0, z: -10.0..10.0 };
        Self {
            eye: vec3(0.0, 0.0, 30.0),
            center: Vec3::default(),
            up: Vec3::Y,
            orthographic: false,
            preserve_aspect: true,
            actual: (limits.x.clone(), limits.y.clone()),
            limits,
        }
    }

    /// Returns the requested limits.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the x and y limits used by the latest [`apply`][Self::apply],
    /// after any widening to the viewport aspect.
    pub fn actual_limits(&self) -> (Range<f32>, Range<f32>) {
        self.actual.clone()
    }

    /// Sets the requested limits.
    ///
    /// # Errors
    /// If any range is empty, reversed, or not finite.
    pub fn set_limits(&mut self, limits: Limits) -> Result<()> {
        for r in [&limits.x, &limits.y, &limits.z] {
            if !(r.start.is_finite() && r.end.is_finite() && r.start < r.end) {
                return Err(invalid(
                    "set_limits",
                    format!("limits must be finite and increasing, got {r:?}"),
                ));
            }
        }
        self.actual = (limits.x.clone(), limits.y.clone());
        self.limits = limits;
        Ok(())
    }

    /// Sets the limits to ±`limit` in x and y, and ±2·`limit` in z.
    ///
    /// # Errors
    /// If `limit` is zero or not finite.
    pub fn set_scale(&mut self, limit: f32) -> Result<()> {
        if limit == 0.0 || !limit.is_finite() {
            return Err(invalid("set_scale", "limit must be finite and nonzero"));
        }
        let l = limit.abs();
        self.set_limits(Limits {
            x: -l..l,
            y: -l..l,
            z: -2.0 * l..2.0 * l,
        })
    }

    /// Sets the eye point, view center, and up vector.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.eye = eye;
        self.center = center;
        self.up = up;
    }

    /// Replaces the projection and modelview matrices of `gl` with the
    /// transforms of this camera, leaving the matrix mode at modelview.
    /// On error, `gl` is left unchanged.
    ///
    /// # Errors
    /// [`Degenerate`][crate::gl::Error::Degenerate] if the eye is at the
    /// view center, [`InvalidArgument`][crate::gl::Error::InvalidArgument]
    /// if the resulting transforms are not finite.
    pub fn apply<B: Backend>(&mut self, gl: &mut Context<B>) -> Result<()> {
        const OP: &str = "Camera::apply";
        let dist = (self.eye - self.center).len();
        if !(dist > 0.0) {
            return Err(degenerate(OP, Degeneracy::ZeroAxis));
        }
        let (x, y) = self.fit_aspect(gl.viewport().width, gl.viewport().height);
        let z = &self.limits.z;

        let proj = if self.orthographic {
            orthographic(x.clone(), y.clone(), dist - z.end..dist - z.start)
        } else {
            let near = (dist - z.end).max(Self::MIN_NEAR);
            let (cx, cy) = ((x.start + x.end) / 2.0, (y.start + y.end) / 2.0);
            let w = near / dist * (x.end - x.start) / 2.0;
            let h = near / dist * (y.end - y.start) / 2.0;
            frustum(cx - w..cx + w, cy - h..cy + h, near..dist - z.start)
        };
        let view = look_at(self.eye, self.center, self.up);
        if !proj.0.iter().chain(&view.0).all(|v| v.is_finite()) {
            return Err(invalid(OP, "camera transforms are not finite"));
        }

        gl.matrix_mode(MatrixMode::Projection);
        gl.load_matrix(&proj)?;
        gl.matrix_mode(MatrixMode::Modelview);
        gl.load_matrix(&view)?;

        self.actual = (x, y);
        Ok(())
    }

    fn fit_aspect(&self, width: i32, height: i32) -> (Range<f32>, Range<f32>) {
        let Limits { x, y, .. } = self.limits.clone();
        if !self.preserve_aspect || width <= 0 || height <= 0 {
            return (x, y);
        }
        let (w, h) = (x.end - x.start, y.end - y.start);
        let aspect = height as f32 / width as f32;
        let desired = h / w;
        if desired > aspect {
            let extra = (desired / aspect - 1.0) * w / 2.0;
            (x.start - extra..x.end + extra, y)
        } else if aspect > desired {
            let extra = (aspect / desired - 1.0) * h / 2.0;
            (x, y.start - extra..y.end + extra)
        } else {
            (x, y)
        }
    }

    /// Rotates the eye and up vector about the view center by a pointer
    /// drag from `from` to `to`, in pixels on a viewport of `size`.
    ///
    /// Pointer positions are mapped onto a sphere with a radius of 80% of
    /// the smaller half-dimension of the viewport.
    pub fn rotate_by_drag(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) {
        let d = self.eye - self.center;
        let dist = d.len();
        if !(dist > 0.0) {
            return;
        }
        let mut z = d / dist;
        let up_len = self.up.len();
        let y = self.up - z * z.dot(&self.up);
        if !(y.len_sqr() > 0.0) {
            return;
        }
        let mut y = y.normalize();
        let mut x = y.cross(&z);

        let to_world = |v: Vec3| x * v.x() + y * v.y() + z * v.z();
        let e1 = to_world(ray(from, size));
        let e2 = to_world(ray(to, size));
        transvect(e1, e2, &mut [&mut z, &mut x, &mut y]);

        self.eye = self.center + z * dist;
        self.up = y * up_len;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn ray((px, py): (f32, f32), (w, h): (u32, u32)) -> Vec3 {
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let r = 0.8 * cx.min(cy);
    let (dx, dy) = (px - cx, cy - py);
    let d2 = dx * dx + dy * dy;
    let dz = if d2 >= r * r {
        0.0
    } else {
        use crate::math::float::f32;
        f32::sqrt(r * r - d2)
    };
    vec3(dx, dy, dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::gl::{ErrorKind, Recorder};
    use crate::math::Mat4x4;

    #[test]
    fn defaults() {
        let cam = Camera::default();
        assert_eq!(cam.eye, vec3(0.0, 0.0, 30.0));
        assert_eq!(cam.limits().z, -10.0..10.0);
        assert!(!cam.orthographic);
        assert!(cam.preserve_aspect);
    }

    #[test]
    fn set_scale_rejects_zero() {
        let mut cam = Camera::new();
        assert_eq!(
            cam.set_scale(0.0).unwrap_err().kind(),
            ErrorKind::Precondition
        );
        cam.set_scale(2.0).unwrap();
        assert_eq!(
            cam.limits(),
            &Limits { x: -2.0..2.0, y: -2.0..2.0, z: -4.0..4.0 }
        );
    }

    #[test]
    fn perspective_widens_to_aspect() {
        let mut gl = Context::new(Recorder::new(200, 100)).unwrap();
        let mut cam = Camera::new();
        cam.apply(&mut gl).unwrap();

        assert_eq!(cam.actual_limits(), (-10.0..10.0, -5.0..5.0));
        let (w, h) = (20.0 / 3.0, 10.0 / 3.0);
        assert_approx_eq!(*gl.projection(), frustum(-w..w, -h..h, 20.0..40.0));
        let view = look_at(cam.eye, Vec3::default(), Vec3::Y);
        assert_approx_eq!(*gl.modelview(), view);
    }

    #[test]
    fn orthographic_projection() {
        let mut gl = Context::new(Recorder::new(100, 100)).unwrap();
        gl.matrix_mode(MatrixMode::Projection);
        gl.translate(1.0, 2.0, 3.0).unwrap();

        let mut cam = Camera::new();
        cam.orthographic = true;
        cam.set_scale(2.0).unwrap();
        cam.apply(&mut gl).unwrap();

        let proj = orthographic(-2.0..2.0, -2.0..2.0, 26.0..34.0);
        assert_approx_eq!(*gl.projection(), proj);
        // Left in modelview mode
        gl.load_identity();
        assert_eq!(*gl.modelview(), Mat4x4::IDENTITY);
    }

    #[test]
    fn near_plane_clamped() {
        let mut gl = Context::new(Recorder::new(100, 100)).unwrap();
        let mut cam = Camera::new();
        cam.look_at(vec3(0.0, 0.0, 5.0), Vec3::default(), Vec3::Y);
        cam.apply(&mut gl).unwrap();
        let (w, h) = (0.1 / 5.0 * 5.0, 0.1 / 5.0 * 5.0);
        let proj = frustum(-w..w, -h..h, 0.1..15.0);
        assert_approx_eq!(*gl.projection(), proj);
    }

    #[test]
    fn eye_at_center_is_degenerate() {
        let mut gl = Context::new(Recorder::new(100, 100)).unwrap();
        let mut cam = Camera::new();
        cam.look_at(Vec3::default(), Vec3::default(), Vec3::Y);
        let e = cam.apply(&mut gl).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Degenerate);
        assert_eq!(*gl.projection(), Mat4x4::IDENTITY);
    }

    #[test]
    fn bad_limits_rejected() {
        let mut cam = Camera::new();
        let ok = cam.limits().clone();
        for bad in [
            Limits { x: -1.0..f32::INFINITY, ..ok.clone() },
            Limits { y: 1.0..-1.0, ..ok.clone() },
            Limits { z: 0.0..0.0, ..ok.clone() },
            Limits { x: f32::NAN..1.0, ..ok.clone() },
        ] {
            let e = cam.set_limits(bad).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Precondition);
            assert_eq!(cam.limits(), &ok);
        }
    }

    #[test]
    fn failed_apply_leaves_context_unchanged() {
        let mut gl = Context::new(Recorder::new(100, 100)).unwrap();
        gl.matrix_mode(MatrixMode::Projection);
        gl.translate(1.0, 2.0, 3.0).unwrap();
        let proj = *gl.projection();
        gl.matrix_mode(MatrixMode::Modelview);
        gl.translate(4.0, 5.0, 6.0).unwrap();
        let view = *gl.modelview();

        let mut cam = Camera::new();
        cam.up = vec3(f32::NAN, 1.0, 0.0);
        let e = cam.apply(&mut gl).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Precondition);
        assert_eq!(*gl.projection(), proj);
        assert_eq!(*gl.modelview(), view);
    }

    #[test]
    fn horizontal_drag_moves_eye_around() {
        let mut cam = Camera::new();
        // From the center to outside the sphere on the right
        cam.rotate_by_drag((100.0, 100.0), (180.0, 100.0), (200, 200));
        assert_approx_eq!(cam.eye, vec3(-30.0, 0.0, 0.0), eps = 1e-4);
        assert_approx_eq!(cam.up, Vec3::Y, eps = 1e-5);
    }

    #[test]
    fn drag_keeps_distance_and_up_length() {
        let mut cam = Camera::new();
        cam.up = vec3(0.0, 2.0, 0.0);
        cam.center = vec3(1.0, 1.0, 1.0);
        let dist = (cam.eye - cam.center).len();
        cam.rotate_by_drag((30.0, 40.0), (70.0, 20.0), (200, 100));
        assert_approx_eq!((cam.eye - cam.center).len(), dist, eps = 1e-4);
        assert_approx_eq!(cam.up.len(), 2.0, eps = 1e-4);
    }
}
