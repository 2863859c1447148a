//! Records of fixed-function state: materials, lights, enables, matrices.

use alloc::{vec, vec::Vec};

use bitflags::bitflags;

use super::enums::{Capability, Face, MaterialProp};
use crate::math::{Color3f, Color4f, Mat4x4, Vec2, Vec3, Vec4, rgb, rgba, vec4};

/// Surface material properties of one face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: Color3f,
    /// The alpha of the diffuse color is the alpha of lit vertices.
    pub diffuse: Color4f,
    pub specular: Color3f,
    pub emission: Color3f,
    /// The specular exponent.
    pub shininess: f32,
}

/// A light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    /// Position in eye coordinates, or direction if `w` is zero.
    pub position: Vec4,
    pub ambient: Color3f,
    pub diffuse: Color3f,
    pub specular: Color3f,
}

/// Global lighting parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LightModel {
    /// Ambient light present even without any light source.
    pub ambient: Color3f,
    /// Whether back faces are lit using the back material.
    pub two_side: bool,
    /// Whether specular highlights are computed relative to the actual
    /// eye position instead of a viewer infinitely far along +z.
    pub local_viewer: bool,
}

/// Per-vertex values applied to subsequent vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Current {
    pub color: Color4f,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

/// Which material property the current color is tracked into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColorMaterial {
    pub face: Face,
    pub prop: MaterialProp,
}

bitflags! {
    /// The boolean capabilities other than light enables.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Caps: u16 {
        const DEPTH_TEST = 1 << 0;
        const COLOR_MATERIAL = 1 << 1;
        const BLEND = 1 << 2;
        const LIGHTING = 1 << 3;
        const NORMALIZE = 1 << 4;
        const POINT_SMOOTH = 1 << 5;
        const POLYGON_OFFSET_FILL = 1 << 6;
        const TEXTURE_2D = 1 << 7;
    }
}

/// The enable flag of every capability.
#[derive(Clone, Debug, PartialEq)]
pub struct Enables {
    pub caps: Caps,
    pub lights: Vec<bool>,
}

/// A matrix with its stack of saved copies.
#[derive(Clone, Debug, Default)]
pub struct MatrixStack {
    pub current: Mat4x4,
    pub saved: Vec<Mat4x4>,
}

impl Material {
    /// Sets `prop` to the color `c`.
    ///
    /// Only the diffuse color keeps the alpha channel. Shininess is set
    /// from the red channel, although the context never passes it here.
    pub fn set(&mut self, prop: MaterialProp, c: Color4f) {
        match prop {
            MaterialProp::Ambient => self.ambient = c.to_rgb(),
            MaterialProp::Diffuse => self.diffuse = c,
            MaterialProp::AmbientAndDiffuse => {
                self.ambient = c.to_rgb();
                self.diffuse = c;
            }
            MaterialProp::Specular => self.specular = c.to_rgb(),
            MaterialProp::Emission => self.emission = c.to_rgb(),
            MaterialProp::Shininess => self.shininess = c[0],
        }
    }
}

impl Default for Material {
    /// Returns the initial material: dim gray ambient, light gray opaque
    /// diffuse, no specular or emission, and zero shininess.
    fn default() -> Self {
        Self {
            ambient: rgb(0.2, 0.2, 0.2),
            diffuse: rgba(0.8, 0.8, 0.8, 1.0),
            specular: Color3f::BLACK,
            emission: Color3f::BLACK,
            shininess: 0.0,
        }
    }
}

impl Light {
    /// Returns the initial state of light `i`.
    ///
    /// All lights are directional lights shining along the -z axis with
    /// black colors, except that light 0 has a white diffuse color.
    pub fn initial(i: usize) -> Self {
        Self {
            position: vec4(0.0, 0.0, 1.0, 0.0),
            ambient: Color3f::BLACK,
            diffuse: if i == 0 { Color3f::WHITE } else { Color3f::BLACK },
            specular: Color3f::BLACK,
        }
    }
}

impl Default for Current {
    fn default() -> Self {
        Self {
            color: Color4f::BLACK,
            normal: Vec3::Z,
            tex_coords: Vec2::default(),
        }
    }
}

impl Default for ColorMaterial {
    fn default() -> Self {
        Self {
            face: Face::FrontAndBack,
            prop: MaterialProp::AmbientAndDiffuse,
        }
    }
}

impl Caps {
    /// Returns the flag of `cap`, or `None` for a light.
    pub const fn of(cap: Capability) -> Option<Self> {
        use Capability::*;
        Some(match cap {
            DepthTest => Self::DEPTH_TEST,
            ColorMaterial => Self::COLOR_MATERIAL,
            Blend => Self::BLEND,
            Lighting => Self::LIGHTING,
            Normalize => Self::NORMALIZE,
            PointSmooth => Self::POINT_SMOOTH,
            PolygonOffsetFill => Self::POLYGON_OFFSET_FILL,
            Texture2d => Self::TEXTURE_2D,
            Light(_) => return None,
        })
    }
}

impl Enables {
    /// Returns everything disabled, with `light_count` light flags.
    pub fn new(light_count: usize) -> Self {
        Self {
            caps: Caps::empty(),
            lights: vec![false; light_count],
        }
    }

    /// Returns whether `cap` is enabled. Unknown lights are disabled.
    pub fn get(&self, cap: Capability) -> bool {
        match (Caps::of(cap), cap) {
            (Some(c), _) => self.caps.contains(c),
            (None, Capability::Light(i)) => {
                self.lights.get(i).copied().unwrap_or(false)
            }
            (None, _) => false,
        }
    }

    /// Sets the flag of `cap`. The caller checks light indices.
    pub fn set(&mut self, cap: Capability, on: bool) {
        match (Caps::of(cap), cap) {
            (Some(c), _) => self.caps.set(c, on),
            (None, Capability::Light(i)) => {
                if let Some(l) = self.lights.get_mut(i) {
                    *l = on;
                }
            }
            (None, _) => {}
        }
    }

    /// Shorthand for testing a non-light capability.
    pub fn has(&self, caps: Caps) -> bool {
        self.caps.contains(caps)
    }
}

impl MatrixStack {
    /// Saves a copy of the current matrix.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recently saved matrix, or returns `None` if there
    /// is none, leaving `self` unchanged.
    pub fn pop(&mut self) -> Option<()> {
        self.current = self.saved.pop()?;
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::translate;
    use crate::math::vec3;

    #[test]
    fn material_defaults() {
        let m = Material::default();
        assert_eq!(m.ambient, rgb(0.2, 0.2, 0.2));
        assert_eq!(m.diffuse, rgba(0.8, 0.8, 0.8, 1.0));
        assert_eq!(m.specular, Color3f::BLACK);
        assert_eq!(m.shininess, 0.0);
    }

    #[test]
    fn material_set_ambient_and_diffuse() {
        let mut m = Material::default();
        m.set(MaterialProp::AmbientAndDiffuse, rgba(0.1, 0.2, 0.3, 0.4));
        assert_eq!(m.ambient, rgb(0.1, 0.2, 0.3));
        assert_eq!(m.diffuse, rgba(0.1, 0.2, 0.3, 0.4));
        assert_eq!(m.specular, Color3f::BLACK);
        assert_eq!(m.emission, Color3f::BLACK);
    }

    #[test]
    fn light_defaults() {
        assert_eq!(Light::initial(0).diffuse, Color3f::WHITE);
        assert_eq!(Light::initial(1).diffuse, Color3f::BLACK);
        assert_eq!(Light::initial(3).position, vec4(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn enables() {
        let mut e = Enables::new(2);
        e.set(Capability::Lighting, true);
        e.set(Capability::Light(1), true);
        assert!(e.get(Capability::Lighting));
        assert!(e.has(Caps::LIGHTING));
        assert!(!e.get(Capability::Light(0)));
        assert!(e.get(Capability::Light(1)));
        assert!(!e.get(Capability::Light(5)));
    }

    #[test]
    fn matrix_stack_push_pop() {
        let mut s = MatrixStack::default();
        s.push();
        s.current = translate(vec3(1.0, 2.0, 3.0));
        assert_eq!(s.pop(), Some(()));
        assert_eq!(s.current, Mat4x4::identity());
        assert_eq!(s.pop(), None);
        assert_eq!(s.current, Mat4x4::identity());
    }
}
