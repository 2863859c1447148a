use crate::math::{Angle, Mat4x4, Vec3, degs};

use super::{View, pivot};

/// A rotator keeping the y axis upright.
///
/// Horizontal drags rotate the view about the y axis; vertical drags rotate
/// it about the x axis, within a limited range so that the view never goes
/// over the top.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    about_x: Angle,
    about_y: Angle,
    x_limit: Angle,
    /// Distance from the viewer to the center of rotation.
    pub distance: f32,
    /// The point the view rotates about.
    pub center: Vec3,
}

impl Orbit {
    /// The largest allowed rotation about the x axis, in degrees.
    pub const MAX_X_LIMIT: f32 = 85.0;

    /// Creates a rotator with no rotation, viewing the origin from
    /// `distance` units away.
    pub fn new(distance: f32) -> Self {
        Self {
            about_x: Angle::ZERO,
            about_y: Angle::ZERO,
            x_limit: degs(Self::MAX_X_LIMIT),
            distance,
            center: Vec3::default(),
        }
    }

    /// Returns the limit of rotation about the x axis.
    pub fn x_limit(&self) -> Angle {
        self.x_limit
    }

    /// Limits rotation about the x axis to ±`limit`, clamped to 0°..=85°.
    ///
    /// A zero limit allows rotation about the y axis only. The current
    /// angles are left unchanged until the next rotation.
    pub fn set_x_limit(&mut self, limit: Angle) {
        self.x_limit = limit.clamp(Angle::ZERO, degs(Self::MAX_X_LIMIT));
    }

    /// Returns the rotations about the y and x axes.
    pub fn angles(&self) -> (Angle, Angle) {
        (self.about_y, self.about_x)
    }

    /// Sets the rotations about the y and x axes, the latter clamped to
    /// the x limit.
    pub fn set_angles(&mut self, about_y: Angle, about_x: Angle) {
        self.about_y = about_y;
        self.about_x = about_x.clamp(-self.x_limit, self.x_limit);
    }

    /// Rotates the view by a pointer drag from `from` to `to`, in pixels on
    /// a surface of `size`. Returns whether the angles changed.
    ///
    /// A drag across the full height turns the view 90° about the x axis,
    /// and one across the full width 180° about the y axis.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) -> bool {
        let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
        let dx = degs(90.0 / h) * (to.1 - from.1);
        let dy = degs(180.0 / w) * (to.0 - from.0);
        let old = self.angles();
        self.set_angles(self.about_y + dy, self.about_x + dx);
        self.angles() != old
    }
}

impl View for Orbit {
    fn view_matrix(&self) -> Mat4x4 {
        let (sx, cx) = self.about_x.sin_cos();
        let (sy, cy) = self.about_y.sin_cos();
        let rot = Mat4x4::from_cols([
            cy, sx * sy, -cx * sy, 0.0, //
            0.0, cx, sx, 0.0, //
            sy, -sx * cy, cx * cy, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        pivot(rot, self.center, self.distance)
    }
}

impl Default for Orbit {
    /// Returns `Orbit::new(0.0)`, suitable for orthographic projection.
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::math::{vec3, vec4};

    #[test]
    fn x_limit_clamped() {
        let mut o = Orbit::default();
        o.set_x_limit(degs(100.0));
        assert_eq!(o.x_limit(), degs(85.0));
        o.set_x_limit(degs(-5.0));
        assert_eq!(o.x_limit(), Angle::ZERO);
        o.set_angles(degs(30.0), degs(20.0));
        assert_eq!(o.angles(), (degs(30.0), Angle::ZERO));
    }

    #[test]
    fn drag_scales_by_surface_size() {
        let mut o = Orbit::new(10.0);
        assert!(o.drag((0.0, 0.0), (50.0, 25.0), (200, 100)));
        let (y, x) = o.angles();
        assert_approx_eq!(y.to_degs(), 45.0, eps = 1e-4);
        assert_approx_eq!(x.to_degs(), 22.5, eps = 1e-4);

        // Past the limit
        o.drag((0.0, 0.0), (0.0, 1000.0), (200, 100));
        assert_approx_eq!(o.angles().1.to_degs(), 85.0, eps = 1e-4);
        assert!(!o.drag((0.0, 0.0), (0.0, 10.0), (200, 100)));
    }

    #[test]
    fn unrotated_view_is_translation() {
        let o = Orbit::new(10.0);
        assert_approx_eq!(
            o.view_matrix().apply(&vec4(1.0, 2.0, 3.0, 1.0)),
            vec4(1.0, 2.0, -7.0, 1.0)
        );
    }

    #[test]
    fn rotation_about_y() {
        let mut o = Orbit::new(0.0);
        o.set_angles(degs(90.0), Angle::ZERO);
        assert_approx_eq!(
            o.view_matrix().apply_pt(&Vec3::X),
            vec3(0.0, 0.0, -1.0),
            eps = 1e-6
        );
    }
}
