//! Drawing: immediate mode, client arrays, and shader synchronization.

use alloc::{borrow::Cow, format, vec::Vec};
use core::ops::Range;

use super::Result;
use super::arrays::{ClientArrays, IndexData, gather};
use super::backend::{
    Attrib, Backend, Feature, LightField, MaterialField, Uniform, UniformValue,
};
use super::ctx::{Context, count_msg, numeric};
use super::enums::{ClientArray, MaterialProp, PointMode, PrimitiveKind, Side};
use super::error::{Degeneracy, degenerate, invalid, outside};
use super::immediate::{Primitive, expand_quads};
use super::state::{Caps, ColorMaterial, Material};
use crate::math::{Matrix, Vec3, vec3};

/// An indexed triangle mesh with per-vertex normals.
#[derive(Copy, Clone, Debug)]
pub struct Model<'a> {
    /// Vertex positions, three values per vertex.
    pub positions: &'a [f32],
    /// Vertex normals, three values per vertex.
    pub normals: &'a [f32],
    /// Triangle vertex indices, three per triangle.
    pub indices: &'a [u16],
}

impl<B: Backend> Context<B> {
    //
    // Immediate mode
    //

    /// Starts recording a primitive.
    ///
    /// # Errors
    /// If a primitive is already being recorded.
    pub fn begin(&mut self, kind: PrimitiveKind) -> Result<()> {
        self.check_idle("begin")?;
        let lit = self.enables.has(Caps::LIGHTING);
        self.primitive = Some(Primitive::new(kind, lit, self.light_model.two_side));
        Ok(())
    }

    /// Adds a vertex at (x, y, z) with the current attributes.
    ///
    /// # Errors
    /// If no primitive is being recorded.
    pub fn vertex3f(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        let Some(prim) = &mut self.primitive else {
            return Err(outside("vertex"));
        };
        numeric("vertex", &[x, y, z])?;
        prim.push(vec3(x, y, z), &self.current, &self.materials);
        Ok(())
    }

    /// Adds a vertex at (x, y, 0).
    pub fn vertex2f(&mut self, x: f32, y: f32) -> Result<()> {
        self.vertex3f(x, y, 0.0)
    }

    /// Adds a vertex from two or three coordinates.
    pub fn vertex_fv(&mut self, v: &[f32]) -> Result<()> {
        match *v {
            [x, y] => self.vertex3f(x, y, 0.0),
            [x, y, z] => self.vertex3f(x, y, z),
            _ => Err(invalid("vertex_fv", count_msg("2 or 3", v.len()))),
        }
    }

    /// Finishes the primitive and draws it.
    ///
    /// # Errors
    /// If no primitive is being recorded.
    pub fn end(&mut self) -> Result<()> {
        let prim = self.primitive.take().ok_or_else(|| outside("end"))?;
        let prim = prim.expand();
        let kind = prim.kind;
        let n = prim.len();
        if n == 0 {
            log::debug!("end: empty {kind:?}, nothing drawn");
            return Ok(());
        }
        self.sync_shader(kind);

        let lit = self.enables.has(Caps::LIGHTING);
        let textured = self.enables.has(Caps::TEXTURE_2D);
        let cur = self.current;
        let b = &mut self.backend;
        b.upload_attrib(Attrib::Coords, &prim.coords);
        if lit {
            b.upload_attrib(Attrib::Normal, &prim.normals);
            b.attrib_constant(Attrib::Color, &cur.color.0);
        } else {
            b.attrib_constant(Attrib::Normal, &cur.normal.0);
            b.upload_attrib(Attrib::Color, &prim.colors);
        }
        if textured {
            b.upload_attrib(Attrib::TexCoords, &prim.tex_coords);
        } else {
            b.attrib_constant(Attrib::TexCoords, &cur.tex_coords.0);
        }
        if lit && prim.material_changed {
            for side in [Side::Front, Side::Back] {
                let Some(stream) = prim.material(side) else {
                    continue;
                };
                for f in MATERIAL_FIELDS {
                    b.upload_attrib(Attrib::Material(side, f), stream.field(f));
                }
            }
        }
        let mode = kind.draw_mode();
        log::trace!("end: {mode:?} with {n} vertices");
        b.draw_arrays(mode, 0, n);
        Ok(())
    }

    /// Draws the rectangle with corners (x1, y1) and (x2, y2) at z = 0.
    pub fn rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        numeric("rect", &[x1, y1, x2, y2])?;
        self.begin(PrimitiveKind::TriangleFan)?;
        self.vertex2f(x1, y1)?;
        self.vertex2f(x2, y1)?;
        self.vertex2f(x2, y2)?;
        self.vertex2f(x1, y2)?;
        self.end()
    }

    //
    // Client arrays
    //

    /// Draws `count` vertices of the enabled arrays starting at `first`.
    ///
    /// Does nothing if the vertex array is not both set and enabled.
    ///
    /// # Errors
    /// If called between `begin` and `end`, or if a consulted array has
    /// fewer than `first + count` vertices.
    pub fn draw_arrays(&mut self, kind: PrimitiveKind, first: usize, count: usize) -> Result<()> {
        const OP: &str = "draw_arrays";
        self.check_idle(OP)?;
        if self.arrays.active(ClientArray::Vertex).is_none() {
            log::debug!("{OP}: vertex array not enabled, nothing drawn");
            return Ok(());
        }
        let end = first
            .checked_add(count)
            .ok_or_else(|| invalid(OP, "range overflows"))?;
        self.check_array_lens(OP, end)?;

        self.sync_shader(kind);
        let mode = kind.draw_mode();
        if kind == PrimitiveKind::Quads {
            self.upload_arrays(Some(first..end));
            let n = count / 4 * 6;
            log::trace!("{OP}: {mode:?} with {n} vertices");
            self.backend.draw_arrays(mode, 0, n);
        } else {
            self.upload_arrays(None);
            log::trace!("{OP}: {mode:?} with {count} vertices from {first}");
            self.backend.draw_arrays(mode, first, count);
        }
        Ok(())
    }

    /// Draws the vertices of the enabled arrays given by the first `count`
    /// of `indices`.
    ///
    /// Does nothing if the vertex array is not both set and enabled.
    ///
    /// # Errors
    /// If called between `begin` and `end`, if `count` exceeds the number
    /// of indices, or if an index is out of range of a consulted array.
    pub fn draw_elements<'a>(
        &mut self,
        kind: PrimitiveKind,
        count: usize,
        indices: impl Into<IndexData<'a>>,
    ) -> Result<()> {
        const OP: &str = "draw_elements";
        self.check_idle(OP)?;
        if self.arrays.active(ClientArray::Vertex).is_none() {
            log::debug!("{OP}: vertex array not enabled, nothing drawn");
            return Ok(());
        }
        let mut idx = indices.into().to_u16(OP, count)?;
        if let Some(&max) = idx.iter().max() {
            self.check_array_lens(OP, usize::from(max) + 1)?;
        }
        if kind == PrimitiveKind::Quads {
            idx = expand_quads(&idx, 1);
        }

        self.sync_shader(kind);
        self.upload_arrays(None);
        let mode = kind.draw_mode();
        log::trace!("{OP}: {mode:?} with {} indices", idx.len());
        self.backend.draw_elements(mode, &idx);
        Ok(())
    }

    /// Draws `model` as indexed triangles.
    ///
    /// Replaces the vertex and normal arrays with the model data. Their
    /// enable flags are left as they were before the call.
    pub fn draw_model(&mut self, model: &Model<'_>) -> Result<()> {
        const OP: &str = "draw_model";
        self.check_idle(OP)?;
        let pos = gather(OP, ClientArray::Vertex, 3, 0, model.positions.into())?;
        let nrm = gather(OP, ClientArray::Normal, 3, 0, model.normals.into())?;
        if nrm.len() != pos.len() {
            return Err(invalid(OP, "positions and normals differ in length"));
        }
        let n = pos.len() / 3;
        if let Some(&i) = model.indices.iter().find(|&&i| usize::from(i) >= n) {
            return Err(invalid(OP, format!("index {i} out of range of {n} vertices")));
        }

        let arrs = [ClientArray::Vertex, ClientArray::Normal];
        let was_enabled = arrs.map(|a| self.arrays.is_enabled(a));
        self.arrays.set(ClientArray::Vertex, pos);
        self.arrays.set(ClientArray::Normal, nrm);
        for a in arrs {
            self.arrays.set_enabled(a, true);
        }
        let res = self.draw_elements(
            PrimitiveKind::Triangles,
            model.indices.len(),
            model.indices,
        );
        for (a, on) in arrs.into_iter().zip(was_enabled) {
            self.arrays.set_enabled(a, on);
        }
        res
    }

    /// Returns the arrays a draw with the current state reads from.
    fn consulted_arrays(&self) -> impl Iterator<Item = ClientArray> + '_ {
        let lit = self.enables.has(Caps::LIGHTING);
        let tracking = lit && self.enables.has(Caps::COLOR_MATERIAL);
        let textured = self.enables.has(Caps::TEXTURE_2D);
        [
            (ClientArray::Vertex, true),
            (ClientArray::Normal, lit),
            (ClientArray::Color, !lit || tracking),
            (ClientArray::TexCoord, textured),
        ]
        .into_iter()
        .filter(|&(a, used)| used && self.arrays.active(a).is_some())
        .map(|(a, _)| a)
    }

    fn check_array_lens(&self, op: &'static str, needed: usize) -> Result<()> {
        for arr in self.consulted_arrays() {
            let len = self.arrays.active_len(arr).unwrap_or(0);
            if len < needed {
                return Err(invalid(
                    op,
                    format!("{arr:?} array has {len} vertices, {needed} needed"),
                ));
            }
        }
        Ok(())
    }

    /// Uploads the arrays the current state consults, and constants for
    /// the attributes without an array.
    ///
    /// If `quads` is given, only that range of vertices is uploaded,
    /// expanded from quads into triangles.
    fn upload_arrays(&mut self, quads: Option<Range<usize>>) {
        let lit = self.enables.has(Caps::LIGHTING);
        let tracking = lit && self.enables.has(Caps::COLOR_MATERIAL);
        let textured = self.enables.has(Caps::TEXTURE_2D);
        let cur = self.current;
        let arrays = &self.arrays;
        let b = &mut self.backend;
        let q = quads.as_ref();

        if let Some(v) = prepared(arrays, ClientArray::Vertex, q) {
            b.upload_attrib(Attrib::Coords, &v);
        }
        match prepared(arrays, ClientArray::Normal, q).filter(|_| lit) {
            Some(n) => b.upload_attrib(Attrib::Normal, &n),
            None => b.attrib_constant(Attrib::Normal, &cur.normal.0),
        }
        let colors = prepared(arrays, ClientArray::Color, q);
        match colors.as_deref().filter(|_| !lit) {
            Some(c) => b.upload_attrib(Attrib::Color, c),
            None => b.attrib_constant(Attrib::Color, &cur.color.0),
        }
        match prepared(arrays, ClientArray::TexCoord, q).filter(|_| textured) {
            Some(t) => b.upload_attrib(Attrib::TexCoords, &t),
            None => b.attrib_constant(Attrib::TexCoords, &cur.tex_coords.0),
        }

        // The color array drives the tracked material per vertex
        if let Some(rgba) = colors.as_deref().filter(|_| tracking) {
            let ColorMaterial { face, prop } = self.color_material;
            let rgb: Vec<f32> = rgba
                .chunks_exact(4)
                .flat_map(|c| &c[..3])
                .copied()
                .collect();
            let fields: &[MaterialField] = match prop {
                MaterialProp::Ambient => &[MaterialField::Ambient],
                MaterialProp::Diffuse => &[MaterialField::Diffuse],
                MaterialProp::AmbientAndDiffuse => {
                    &[MaterialField::Ambient, MaterialField::Diffuse]
                }
                MaterialProp::Specular => &[MaterialField::Specular],
                MaterialProp::Emission => &[MaterialField::Emission],
                MaterialProp::Shininess => &[],
            };
            for side in [Side::Front, Side::Back] {
                if !face.includes(side) {
                    continue;
                }
                for &f in fields {
                    let data = if f == MaterialField::Diffuse { rgba } else { &rgb };
                    b.upload_attrib(Attrib::Material(side, f), data);
                }
            }
        }
    }

    /// Mirrors the emulated state into the shader program.
    fn sync_shader(&mut self, kind: PrimitiveKind) {
        use UniformValue as V;
        let en = &self.enables;
        let b = &mut self.backend;

        b.set_feature(Feature::DepthTest, en.has(Caps::DEPTH_TEST));
        b.set_feature(Feature::Blend, en.has(Caps::BLEND));
        b.set_feature(Feature::PolygonOffsetFill, en.has(Caps::POLYGON_OFFSET_FILL));

        let [mv, proj, tex] = &self.matrices;
        b.set_uniform(Uniform::Modelview, V::Mat4(mv.current.to_cols()));
        b.set_uniform(Uniform::Projection, V::Mat4(proj.current.to_cols()));
        b.set_uniform(Uniform::TextureMatrix, V::Mat4(tex.current.to_cols()));
        let nm = mv.current.normal_matrix().unwrap_or_else(|| {
            log::debug!("modelview is singular, using a zero normal matrix");
            Matrix([0.0; 9])
        });
        b.set_uniform(Uniform::NormalMatrix, V::Mat3(nm.to_cols()));

        b.set_uniform(Uniform::Lit, en.has(Caps::LIGHTING).into());
        b.set_uniform(Uniform::Textured, en.has(Caps::TEXTURE_2D).into());
        b.set_uniform(Uniform::UnitNormals, en.has(Caps::NORMALIZE).into());

        for side in [Side::Front, Side::Back] {
            let m = &self.materials[side as usize];
            for f in MATERIAL_FIELDS {
                b.attrib_constant(Attrib::Material(side, f), material_field(m, f));
            }
        }

        let lm = &self.light_model;
        b.set_uniform(Uniform::GlobalAmbient, V::Vec3(lm.ambient.0));
        b.set_uniform(Uniform::TwoSided, lm.two_side.into());
        b.set_uniform(Uniform::LocalViewer, lm.local_viewer.into());

        let point_mode = match kind {
            PrimitiveKind::Points if en.has(Caps::POINT_SMOOTH) => PointMode::Smooth,
            PrimitiveKind::Points => PointMode::Hard,
            _ => PointMode::Off,
        };
        b.set_uniform(Uniform::PointMode, V::Int(point_mode as i32));
        b.set_uniform(Uniform::PointSize, V::Float(self.point_size));
        b.line_width(self.line_width);

        for (i, (l, &on)) in self.lights.iter().zip(&en.lights).enumerate() {
            let u = |f| Uniform::Light(i, f);
            b.set_uniform(u(LightField::Enabled), on.into());
            b.set_uniform(u(LightField::Position), V::Vec4(l.position.0));
            b.set_uniform(u(LightField::Ambient), V::Vec3(l.ambient.0));
            b.set_uniform(u(LightField::Diffuse), V::Vec3(l.diffuse.0));
            b.set_uniform(u(LightField::Specular), V::Vec3(l.specular.0));
        }
    }

    //
    // Coordinate mapping
    //

    /// Maps `p` from object coordinates to normalized device coordinates
    /// by the current modelview and projection matrices.
    ///
    /// # Errors
    /// If `p` maps to a point at infinity.
    pub fn project(&self, p: Vec3) -> Result<Vec3> {
        let mvp = self.projection().compose(self.modelview());
        let clip = mvp.apply(&p.to_vec4(1.0));
        if clip.w() == 0.0 {
            return Err(degenerate("project", Degeneracy::AtInfinity));
        }
        Ok(clip.xyz() / clip.w())
    }

    /// Maps `ndc` from normalized device coordinates back to object
    /// coordinates.
    ///
    /// # Errors
    /// If the combined modelview and projection matrix is singular.
    pub fn unproject(&self, ndc: Vec3) -> Result<Vec3> {
        const OP: &str = "unproject";
        let inv = self
            .projection()
            .compose(self.modelview())
            .invert()
            .ok_or_else(|| degenerate(OP, Degeneracy::SingularMatrix))?;
        let obj = inv.apply(&ndc.to_vec4(1.0));
        if obj.w() == 0.0 {
            return Err(degenerate(OP, Degeneracy::AtInfinity));
        }
        Ok(obj.xyz() / obj.w())
    }

    /// Maps `p` from object coordinates to pixel coordinates of the
    /// surface, with y growing downwards and depth in [0, 1].
    pub fn project_to_pixel(&self, p: Vec3) -> Result<Vec3> {
        let ndc = self.project(p)?;
        let vp = self.viewport();
        let (_, h) = self.backend.surface_size();
        let x = vp.x as f32 + (ndc.x() + 1.0) * 0.5 * vp.width as f32;
        let y = vp.y as f32 + (ndc.y() + 1.0) * 0.5 * vp.height as f32;
        Ok(vec3(x, h as f32 - y, (ndc.z() + 1.0) * 0.5))
    }

    /// Inverse of [`project_to_pixel`][Self::project_to_pixel].
    pub fn unproject_from_pixel(&self, px: Vec3) -> Result<Vec3> {
        let vp = self.viewport();
        let (_, h) = self.backend.surface_size();
        let y = h as f32 - px.y();
        let ndc = vec3(
            (px.x() - vp.x as f32) / vp.width as f32 * 2.0 - 1.0,
            (y - vp.y as f32) / vp.height as f32 * 2.0 - 1.0,
            px.z() * 2.0 - 1.0,
        );
        self.unproject(ndc)
    }
}

const MATERIAL_FIELDS: [MaterialField; 5] = [
    MaterialField::Ambient,
    MaterialField::Diffuse,
    MaterialField::Specular,
    MaterialField::Emission,
    MaterialField::Shininess,
];

fn material_field(m: &Material, f: MaterialField) -> &[f32] {
    match f {
        MaterialField::Ambient => &m.ambient.0,
        MaterialField::Diffuse => &m.diffuse.0,
        MaterialField::Specular => &m.specular.0,
        MaterialField::Emission => &m.emission.0,
        MaterialField::Shininess => core::slice::from_ref(&m.shininess),
    }
}

/// Returns the data of `arr` if active, restricted to the range of vertices
/// in `quads` and expanded into triangles if given.
fn prepared<'a>(
    arrays: &'a ClientArrays,
    arr: ClientArray,
    quads: Option<&Range<usize>>,
) -> Option<Cow<'a, [f32]>> {
    let data = arrays.active(arr)?;
    Some(match quads {
        Some(r) => {
            let s = arr.size();
            Cow::Owned(expand_quads(&data[r.start * s..r.end * s], s))
        }
        None => Cow::Borrowed(data),
    })
}
