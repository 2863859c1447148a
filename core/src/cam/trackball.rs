use crate::math::{Mat4x4, Vec3, vec3};

use super::{View, pivot, transvect};

/// A rotator that turns the view freely, as if rolling a ball.
///
/// The view frame is kept as three orthonormal axes. A drag maps both
/// pointer positions onto a virtual hemisphere facing the viewer and turns
/// the frame so that the point under the pointer follows it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trackball {
    x: Vec3,
    y: Vec3,
    z: Vec3,
    /// Distance from the viewer to the center of rotation.
    pub distance: f32,
    /// The point the view rotates about.
    pub center: Vec3,
}

impl Trackball {
    /// Creates a trackball viewing from the direction (0, 0, 10) with y up,
    /// from `distance` units away.
    pub fn new(distance: f32) -> Self {
        let res = Self::with_view(distance, vec3(0.0, 0.0, 10.0), Vec3::Y);
        // Both default directions are nonzero and orthogonal
        res.unwrap_or(Self {
            x: Vec3::X,
            y: Vec3::Y,
            z: Vec3::Z,
            distance,
            center: Vec3::default(),
        })
    }

    /// Creates a trackball viewing from the direction `dir` towards the
    /// center, with `up` pointing up on the screen.
    ///
    /// Returns `None` if `dir` is zero or `up` is parallel to it.
    pub fn with_view(distance: f32, dir: Vec3, up: Vec3) -> Option<Self> {
        let (x, y, z) = frame(dir, up)?;
        Some(Self { x, y, z, distance, center: Vec3::default() })
    }

    /// Re-orients the view as in [`with_view`][Self::with_view], keeping
    /// the distance and center. Returns whether the view was valid.
    pub fn set_view(&mut self, dir: Vec3, up: Vec3) -> bool {
        let Some((x, y, z)) = frame(dir, up) else {
            return false;
        };
        (self.x, self.y, self.z) = (x, y, z);
        true
    }

    /// Returns the direction from the center towards the viewer.
    pub fn dir(&self) -> Vec3 {
        self.z
    }

    /// Returns the up direction of the view.
    pub fn up(&self) -> Vec3 {
        self.y
    }

    /// Turns the view by a pointer drag from `from` to `to`, in pixels on a
    /// surface of `size`.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) {
        let r1 = self.to_ray(from, size);
        let r2 = self.to_ray(to, size);
        transvect(r1, r2, &mut [&mut self.x, &mut self.y, &mut self.z]);
    }

    /// Maps a pixel position to a point on the hemisphere whose equator is
    /// the largest circle centered on the surface. Points outside the
    /// circle map to themselves in the image plane.
    fn to_ray(&self, (px, py): (f32, f32), (w, h): (u32, u32)) -> Vec3 {
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let r2 = cx.min(cy) * cx.min(cy);
        let v = self.x * (px - cx) + self.y * (cy - py);
        let d2 = v.len_sqr();
        if d2 > r2 {
            v
        } else {
            use crate::math::float::f32;
            v + self.z * f32::sqrt(r2 - d2)
        }
    }
}

/// Returns the right, up, and backward unit vectors of a view from `dir`.
fn frame(dir: Vec3, up: Vec3) -> Option<(Vec3, Vec3, Vec3)> {
    const MIN: f32 = 1e-12;
    if dir.len_sqr() < MIN {
        return None;
    }
    let z = dir.normalize();
    let y = up - z * z.dot(&up);
    if y.len_sqr() < MIN {
        return None;
    }
    let y = y.normalize();
    Some((y.cross(&z), y, z))
}

impl View for Trackball {
    fn view_matrix(&self) -> Mat4x4 {
        let (x, y, z) = (self.x, self.y, self.z);
        let rot = Mat4x4::from_rows([
            [x.x(), x.y(), x.z(), 0.0],
            [y.x(), y.y(), y.z(), 0.0],
            [z.x(), z.y(), z.z(), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        pivot(rot, self.center, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::math::vec4;

    #[test]
    fn default_view_looks_down_z() {
        let t = Trackball::new(10.0);
        assert_approx_eq!(
            t.view_matrix().apply(&vec4(1.0, 2.0, 3.0, 1.0)),
            vec4(1.0, 2.0, -7.0, 1.0)
        );
    }

    #[test]
    fn degenerate_views_rejected() {
        assert!(Trackball::with_view(1.0, Vec3::default(), Vec3::Y).is_none());
        assert!(Trackball::with_view(1.0, Vec3::Y, -Vec3::Y * 2.0).is_none());
        let mut t = Trackball::new(1.0);
        assert!(!t.set_view(Vec3::X, Vec3::X));
        assert_eq!(t.dir(), Vec3::Z);
    }

    #[test]
    fn view_from_side() {
        let t = Trackball::with_view(0.0, vec3(5.0, 0.0, 0.0), vec3(1.0, 3.0, 0.0))
            .unwrap();
        assert_approx_eq!(t.dir(), Vec3::X);
        assert_approx_eq!(t.up(), Vec3::Y);
        // The viewer looks along -x, so +x comes towards the eye
        assert_approx_eq!(t.view_matrix().apply_pt(&Vec3::X), Vec3::Z);
    }

    #[test]
    fn horizontal_drag_turns_about_up() {
        let mut t = Trackball::new(0.0);
        // From the center of a 200x200 surface to the rim
        t.drag((100.0, 100.0), (200.0, 100.0), (200, 200));
        assert_approx_eq!(t.up(), Vec3::Y, eps = 1e-5);
        // The point in front now appears to the right
        assert_approx_eq!(t.view_matrix().apply_pt(&Vec3::Z), Vec3::X, eps = 1e-5);
    }

    #[test]
    fn frame_stays_orthonormal() {
        let mut t = Trackball::new(0.0);
        for i in 0..50 {
            let f = i as f32;
            t.drag((90.0 + f, 80.0), (95.0 + f, 70.0 + f), (200, 160));
        }
        assert_approx_eq!(t.x.len(), 1.0, eps = 1e-4);
        assert_approx_eq!(t.x.dot(&t.y), 0.0, eps = 1e-4);
        assert_approx_eq!(t.y.cross(&t.z), t.x, eps = 1e-4);
    }
}
