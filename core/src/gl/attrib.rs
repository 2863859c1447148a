//! Saving and restoring groups of state.

use alloc::{boxed::Box, vec::Vec};

use super::Result;
use super::backend::{Backend, Viewport};
use super::ctx::Context;
use super::enums::{AttribMask, Capability};
use super::error::{Stack, invalid, underflow};
use super::state::{ColorMaterial, Current, Enables, Light, LightModel, Material};

/// The state groups saved by one `push_attrib`.
///
/// Every group is an independent copy of the live state, so later changes
/// to the context never leak into saved snapshots.
#[derive(Clone, Debug)]
pub struct Snapshot {
    current: Option<Current>,
    enables: Option<Enables>,
    viewport: Option<Viewport>,
    lighting: Option<Box<LightingState>>,
    texture: Option<u32>,
}

#[derive(Clone, Debug)]
struct LightingState {
    lighting_on: bool,
    color_material_on: bool,
    color_material: ColorMaterial,
    light_model: LightModel,
    materials: [Material; 2],
    lights: Vec<Light>,
    light_enables: Vec<bool>,
}

impl<B: Backend> Context<B> {
    /// Saves the state groups selected by `mask` on the attribute stack.
    ///
    /// # Errors
    /// If `mask` selects no known group, or if called between `begin`
    /// and `end`.
    pub fn push_attrib(&mut self, mask: AttribMask) -> Result<()> {
        const OP: &str = "push_attrib";
        self.check_idle(OP)?;
        if mask.is_empty() {
            return Err(invalid(OP, "mask selects no state"));
        }
        let has = |m| mask.contains(m);
        let snap = Snapshot {
            current: has(AttribMask::CURRENT).then_some(self.current),
            enables: has(AttribMask::ENABLE).then(|| self.enables.clone()),
            viewport: has(AttribMask::VIEWPORT).then(|| self.backend.viewport()),
            lighting: has(AttribMask::LIGHTING).then(|| {
                Box::new(LightingState {
                    lighting_on: self.enables.get(Capability::Lighting),
                    color_material_on: self.enables.get(Capability::ColorMaterial),
                    color_material: self.color_material,
                    light_model: self.light_model,
                    materials: self.materials,
                    lights: self.lights.clone(),
                    light_enables: self.enables.lights.clone(),
                })
            }),
            texture: has(AttribMask::TEXTURE).then(|| self.textures.bound()),
        };
        self.attrib_stack.push(snap);
        Ok(())
    }

    /// Restores the state groups saved by the matching `push_attrib`.
    ///
    /// # Errors
    /// If the attribute stack is empty, or if called between `begin`
    /// and `end`.
    pub fn pop_attrib(&mut self) -> Result<()> {
        self.check_idle("pop_attrib")?;
        let snap = self
            .attrib_stack
            .pop()
            .ok_or_else(|| underflow(Stack::Attrib))?;

        if let Some(cur) = snap.current {
            self.current = cur;
        }
        if let Some(en) = snap.enables {
            self.enables = en;
        }
        if let Some(vp) = snap.viewport {
            self.backend.set_viewport(vp);
        }
        if let Some(l) = snap.lighting {
            let LightingState {
                lighting_on,
                color_material_on,
                color_material,
                light_model,
                materials,
                lights,
                light_enables,
            } = *l;
            self.enables.set(Capability::Lighting, lighting_on);
            self.enables.set(Capability::ColorMaterial, color_material_on);
            self.enables.lights = light_enables;
            self.color_material = color_material;
            self.light_model = light_model;
            self.materials = materials;
            self.lights = lights;
        }
        if let Some(id) = snap.texture {
            self.textures.bind(&mut self.backend, id);
        }
        Ok(())
    }

    /// Returns the depth of the attribute stack.
    pub fn attrib_depth(&self) -> usize {
        self.attrib_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::enums::{Face, LightProp, MaterialProp, Side};
    use crate::gl::record::Recorder;
    use crate::math::{rgb, rgba};

    fn ctx() -> Context<Recorder> {
        Context::new(Recorder::new(64, 32)).unwrap()
    }

    #[test]
    fn empty_mask_rejected() {
        let mut c = ctx();
        assert!(c.push_attrib(AttribMask::empty()).is_err());
        assert_eq!(c.attrib_depth(), 0);
    }

    #[test]
    fn pop_empty_stack() {
        let mut c = ctx();
        assert_eq!(
            c.pop_attrib(),
            Err(crate::gl::Error::StackUnderflow(Stack::Attrib))
        );
    }

    #[test]
    fn restores_only_saved_groups() {
        let mut c = ctx();
        c.color3f(1.0, 0.0, 0.0).unwrap();
        c.push_attrib(AttribMask::CURRENT).unwrap();
        c.color3f(0.0, 1.0, 0.0).unwrap();
        c.enable(Capability::DepthTest).unwrap();
        c.pop_attrib().unwrap();
        assert_eq!(c.current().color, rgba(1.0, 0.0, 0.0, 1.0));
        assert!(c.is_enabled(Capability::DepthTest));
    }

    #[test]
    fn lighting_snapshot_is_deep() {
        let mut c = ctx();
        c.push_attrib(AttribMask::LIGHTING).unwrap();
        c.enable(Capability::Lighting).unwrap();
        c.enable(Capability::Light(2)).unwrap();
        c.material_fv(Face::Back, MaterialProp::Emission, &[1.0, 1.0, 0.0])
            .unwrap();
        c.light_fv(1, LightProp::Specular, &[0.5; 3]).unwrap();
        c.enable(Capability::DepthTest).unwrap();

        c.pop_attrib().unwrap();
        assert!(!c.is_enabled(Capability::Lighting));
        assert!(!c.is_enabled(Capability::Light(2)));
        assert_eq!(c.material(Side::Back).emission, rgb(0.0, 0.0, 0.0));
        assert_eq!(c.light(1).unwrap().specular, rgb(0.0, 0.0, 0.0));
        // Not part of the lighting group
        assert!(c.is_enabled(Capability::DepthTest));
    }

    #[test]
    fn viewport_restored_through_backend() {
        let mut c = ctx();
        c.push_attrib(AttribMask::VIEWPORT | AttribMask::ENABLE).unwrap();
        c.set_viewport(1, 2, 3, 4).unwrap();
        c.enable(Capability::Blend).unwrap();
        c.pop_attrib().unwrap();
        assert_eq!(c.viewport(), Viewport { x: 0, y: 0, width: 64, height: 32 });
        assert!(!c.is_enabled(Capability::Blend));
    }

    #[test]
    fn texture_binding_restored() {
        let mut c = ctx();
        c.gen_textures(2).unwrap();
        c.bind_texture(1);
        c.push_attrib(AttribMask::TEXTURE).unwrap();
        c.bind_texture(2);
        c.pop_attrib().unwrap();
        assert_eq!(c.bound_texture(), 1);
    }

    #[test]
    fn not_allowed_inside_primitive() {
        let mut c = ctx();
        c.begin(crate::gl::PrimitiveKind::Points).unwrap();
        assert!(c.push_attrib(AttribMask::CURRENT).is_err());
    }
}
