//! Vertex assembly between `begin` and `end`.

use alloc::vec::Vec;

use super::backend::MaterialField;
use super::enums::{PrimitiveKind, Side};
use super::state::{Current, Material};
use crate::math::Vec3;

/// A primitive being recorded.
///
/// Every vertex appends one item to each stream, so the streams always
/// describe the same number of vertices.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub coords: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
    /// Per-vertex front and back materials. Present only if lighting was
    /// enabled at `begin`, the back one only if lighting was two-sided.
    pub materials: [Option<MaterialStream>; 2],
    /// Whether any material was changed since `begin`.
    pub material_changed: bool,
}

/// Per-vertex material properties of one face.
#[derive(Clone, Debug, Default)]
pub struct MaterialStream {
    pub ambient: Vec<f32>,
    pub diffuse: Vec<f32>,
    pub specular: Vec<f32>,
    pub emission: Vec<f32>,
    pub shininess: Vec<f32>,
}

impl Primitive {
    /// Starts recording a primitive of the given kind.
    pub fn new(kind: PrimitiveKind, lit: bool, two_sided: bool) -> Self {
        let stream = |on: bool| on.then(MaterialStream::default);
        Self {
            kind,
            coords: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            materials: [stream(lit), stream(lit && two_sided)],
            material_changed: false,
        }
    }

    /// Returns the number of vertices recorded so far.
    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Appends a vertex at `pos` with the current attributes and materials.
    pub fn push(&mut self, pos: Vec3, cur: &Current, mats: &[Material; 2]) {
        self.coords.extend_from_slice(&pos.0);
        self.colors.extend_from_slice(&cur.color.0);
        self.normals.extend_from_slice(&cur.normal.0);
        self.tex_coords.extend_from_slice(&cur.tex_coords.0);
        for (stream, mat) in self.materials.iter_mut().zip(mats) {
            if let Some(s) = stream {
                s.push(mat);
            }
        }
    }

    /// Returns the material stream of `side`, if recorded.
    pub fn material(&self, side: Side) -> Option<&MaterialStream> {
        self.materials[side as usize].as_ref()
    }

    /// Expands the streams of a quad primitive into triangles, or returns
    /// `self` unchanged for other kinds.
    #[must_use]
    pub fn expand(mut self) -> Self {
        if self.kind != PrimitiveKind::Quads {
            return self;
        }
        self.coords = expand_quads(&self.coords, 3);
        self.colors = expand_quads(&self.colors, 4);
        self.normals = expand_quads(&self.normals, 3);
        self.tex_coords = expand_quads(&self.tex_coords, 2);
        for s in self.materials.iter_mut().flatten() {
            *s = s.expand();
        }
        self
    }
}

impl MaterialStream {
    fn push(&mut self, m: &Material) {
        self.ambient.extend_from_slice(&m.ambient.0);
        self.diffuse.extend_from_slice(&m.diffuse.0);
        self.specular.extend_from_slice(&m.specular.0);
        self.emission.extend_from_slice(&m.emission.0);
        self.shininess.push(m.shininess);
    }

    /// Returns the data of `field`.
    pub fn field(&self, field: MaterialField) -> &[f32] {
        match field {
            MaterialField::Ambient => &self.ambient,
            MaterialField::Diffuse => &self.diffuse,
            MaterialField::Specular => &self.specular,
            MaterialField::Emission => &self.emission,
            MaterialField::Shininess => &self.shininess,
        }
    }

    fn expand(&self) -> Self {
        Self {
            ambient: expand_quads(&self.ambient, 3),
            diffuse: expand_quads(&self.diffuse, 4),
            specular: expand_quads(&self.specular, 3),
            emission: expand_quads(&self.emission, 3),
            shininess: expand_quads(&self.shininess, 1),
        }
    }
}

/// Splits each group of four items in `data` into two triangles.
///
/// Each item is `item_size` elements long. Items 0, 1, 2, 3 of a quad
/// become items 0, 1, 2, 0, 2, 3, preserving the winding. A trailing
/// incomplete quad is dropped.
///
/// # Examples
/// ```
/// # use glimmer_core::gl::immediate::expand_quads;
/// assert_eq!(expand_quads(&[0, 1, 2, 3, 4], 1), [0, 1, 2, 0, 2, 3]);
/// assert_eq!(
///     expand_quads(&[0, 0, 1, 1, 2, 2, 3, 3], 2),
///     [0, 0, 1, 1, 2, 2, 0, 0, 2, 2, 3, 3]
/// );
/// ```
pub fn expand_quads<T: Copy>(data: &[T], item_size: usize) -> Vec<T> {
    let quad_len = 4 * item_size;
    let mut res = Vec::with_capacity(data.len() / quad_len * 6 * item_size);
    for quad in data.chunks_exact(quad_len) {
        for i in [0, 1, 2, 0, 2, 3] {
            res.extend_from_slice(&quad[i * item_size..][..item_size]);
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{rgba, vec2, vec3};

    fn cur(i: f32) -> Current {
        Current {
            color: rgba(i, 0.0, 0.0, 1.0),
            normal: vec3(0.0, i, 0.0),
            tex_coords: vec2(i, -i),
        }
    }

    #[test]
    fn streams_in_lockstep() {
        let mats = [Material::default(); 2];
        let mut p = Primitive::new(PrimitiveKind::Triangles, true, false);
        p.push(vec3(1.0, 2.0, 3.0), &cur(0.5), &mats);
        assert_eq!(p.len(), 1);
        assert_eq!(p.coords, [1.0, 2.0, 3.0]);
        assert_eq!(p.colors, [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(p.normals, [0.0, 0.5, 0.0]);
        assert_eq!(p.tex_coords, [0.5, -0.5]);
        let front = p.material(Side::Front).unwrap();
        assert_eq!(front.diffuse, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(front.shininess, [0.0]);
        assert!(p.material(Side::Back).is_none());
    }

    #[test]
    fn unlit_has_no_material_streams() {
        let p = Primitive::new(PrimitiveKind::Points, false, true);
        assert!(p.materials.iter().all(Option::is_none));
    }

    #[test]
    fn quads_expand_every_stream() {
        let mats = [Material::default(); 2];
        let mut p = Primitive::new(PrimitiveKind::Quads, true, true);
        for i in 0..4 {
            let i = i as f32;
            p.push(vec3(i, 0.0, 0.0), &cur(i), &mats);
        }
        let p = p.expand();
        assert_eq!(p.len(), 6);
        let xs: Vec<f32> = p.coords.chunks(3).map(|c| c[0]).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0, 0.0, 2.0, 3.0]);
        let ss: Vec<f32> = p.tex_coords.chunks(2).map(|c| c[0]).collect();
        assert_eq!(ss, [0.0, 1.0, 2.0, 0.0, 2.0, 3.0]);
        assert_eq!(p.colors.len(), 24);
        let back = p.material(Side::Back).unwrap();
        assert_eq!(back.shininess.len(), 6);
        assert_eq!(back.diffuse.len(), 24);
    }

    #[test]
    fn other_kinds_not_expanded() {
        let mats = [Material::default(); 2];
        let mut p = Primitive::new(PrimitiveKind::QuadStrip, false, false);
        for _ in 0..4 {
            p.push(Vec3::X, &cur(1.0), &mats);
        }
        assert_eq!(p.expand().len(), 4);
    }

    #[test]
    fn incomplete_quad_dropped() {
        assert_eq!(expand_quads(&[1, 2, 3], 1), [] as [i32; 0]);
        assert_eq!(expand_quads(&[1, 2, 3, 4, 5, 6, 7], 1).len(), 6);
    }
}
