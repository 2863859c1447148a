use glimmer_core::assert_approx_eq;
use glimmer_core::gl::*;
use glimmer_core::math::{Mat4x4, degs, look_at, rotate, rgb, rgba, vec3, vec4};

fn ctx() -> Context<Recorder> {
    Context::new(Recorder::new(100, 100)).unwrap()
}

#[test]
fn inverse_times_matrix_is_identity() {
    let ms = [
        rotate(degs(33.0), vec3(1.0, 2.0, 3.0))
            .unwrap()
            .translate(vec3(4.0, -5.0, 6.0))
            .scale(vec3(2.0, 0.5, 3.0)),
        Mat4x4::from_rows([
            [2.0, 0.0, 1.0, 0.0],
            [1.0, 3.0, 0.0, -1.0],
            [0.0, 1.0, 4.0, 2.0],
            [0.0, 0.0, 1.0, 1.0],
        ]),
    ];
    for m in ms {
        let inv = m.invert().unwrap();
        assert_approx_eq!(inv.compose(&m), Mat4x4::IDENTITY, eps = 1e-5);
        assert_approx_eq!(m.compose(&inv), Mat4x4::IDENTITY, eps = 1e-5);
    }
}

#[test]
fn rotation_undone_by_opposite_angle() {
    let m = Mat4x4::IDENTITY.translate(vec3(1.0, 2.0, 3.0));
    for (a, axis) in [
        (17.0, vec3(0.0, 0.0, 1.0)),
        (-120.0, vec3(1.0, 1.0, 0.0)),
        (300.0, vec3(-2.0, 0.5, 7.0)),
    ] {
        let there = m.rotate(degs(a), axis).unwrap();
        let back = there.rotate(degs(-a), axis).unwrap();
        assert_approx_eq!(back, m, eps = 1e-5);
    }
}

#[test]
fn look_at_eye_equals_center_is_identity() {
    let eye = vec3(3.0, -1.0, 2.0);
    assert_eq!(look_at(eye, eye, vec3(0.0, 1.0, 0.0)), Mat4x4::IDENTITY);
    assert_eq!(look_at(eye, eye, vec3(5.0, 5.0, 5.0)), Mat4x4::IDENTITY);
}

#[test]
fn push_pop_restores_matrix() {
    let mut gl = ctx();
    for mode in [MatrixMode::Modelview, MatrixMode::Projection, MatrixMode::Texture] {
        gl.matrix_mode(mode);
        gl.translate(1.0, 2.0, 3.0).unwrap();
        let before = *gl.matrix(mode);
        gl.push_matrix();
        gl.scale(2.0, 2.0, 2.0).unwrap();
        gl.rotate(45.0, 0.0, 1.0, 0.0).unwrap();
        gl.pop_matrix().unwrap();
        assert_eq!(*gl.matrix(mode), before);

        let e = gl.pop_matrix().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Exhausted);
        assert_eq!(*gl.matrix(mode), before);
    }
}

#[test]
fn textures_named_in_order() {
    let mut gl = ctx();
    assert_eq!(gl.bound_texture(), 0);
    assert_eq!(gl.gen_textures(3), Ok(1..4));
    assert_eq!(gl.gen_textures(2), Ok(4..6));

    gl.bind_texture(5);
    assert_eq!(gl.bound_texture(), 5);
    // Unknown names are ignored
    gl.bind_texture(6);
    gl.bind_texture(1000);
    assert_eq!(gl.bound_texture(), 5);
    gl.bind_texture(0);
    assert_eq!(gl.bound_texture(), 0);
}

#[test]
fn attrib_stack_restores_captured_groups_only() {
    let mut gl = ctx();
    gl.color3f(1.0, 0.0, 0.0).unwrap();
    gl.material_fv(Face::Front, MaterialProp::Ambient, &[0.5, 0.5, 0.5])
        .unwrap();
    gl.push_attrib(AttribMask::CURRENT | AttribMask::LIGHTING).unwrap();

    gl.color3f(0.0, 1.0, 0.0).unwrap();
    gl.material_fv(Face::Front, MaterialProp::Ambient, &[0.1, 0.1, 0.1])
        .unwrap();
    gl.enable(Capability::Lighting).unwrap();
    gl.enable(Capability::DepthTest).unwrap();
    gl.set_viewport(10, 10, 50, 50).unwrap();

    gl.pop_attrib().unwrap();
    assert_eq!(gl.current().color, rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(gl.material(Side::Front).ambient, rgb(0.5, 0.5, 0.5));
    assert!(!gl.is_enabled(Capability::Lighting));
    // Not captured
    assert!(gl.is_enabled(Capability::DepthTest));
    assert_eq!(gl.viewport().width, 50);

    assert_eq!(gl.pop_attrib().unwrap_err().kind(), ErrorKind::Exhausted);
}

#[test]
fn snapshots_do_not_alias_live_state() {
    let mut gl = ctx();
    gl.push_attrib(AttribMask::LIGHTING).unwrap();
    gl.material_fv(Face::Front, MaterialProp::Diffuse, &[0.1, 0.2, 0.3, 1.0])
        .unwrap();
    gl.push_attrib(AttribMask::LIGHTING).unwrap();
    gl.material_fv(Face::Front, MaterialProp::Diffuse, &[0.9, 0.9, 0.9, 1.0])
        .unwrap();

    gl.pop_attrib().unwrap();
    assert_eq!(gl.material(Side::Front).diffuse.0, [0.1, 0.2, 0.3, 1.0]);
    gl.pop_attrib().unwrap();
    assert_eq!(gl.material(Side::Front).diffuse.0, [0.8, 0.8, 0.8, 1.0]);
    assert_eq!(gl.attrib_depth(), 0);
}

#[test]
fn light_position_fixed_at_set_time() {
    let mut gl = ctx();
    gl.translate(0.0, 0.0, -5.0).unwrap();
    gl.light_fv(0, LightProp::Position, &[1.0, 2.0, 3.0, 1.0])
        .unwrap();
    // Later transforms do not move the light
    gl.load_identity();
    gl.rotate(90.0, 0.0, 1.0, 0.0).unwrap();

    let pos = gl.light(0).unwrap().position;
    assert_approx_eq!(pos, vec4(1.0, 2.0, -2.0, 1.0));

    gl.enable(Capability::Lighting).unwrap();
    gl.enable(Capability::Light(0)).unwrap();
    gl.begin(PrimitiveKind::Points).unwrap();
    gl.vertex2f(0.0, 0.0).unwrap();
    gl.end().unwrap();
    assert_eq!(
        gl.backend()
            .uniform(&Uniform::Light(0, LightField::Position)),
        Some(UniformValue::Vec4([1.0, 2.0, -2.0, 1.0]))
    );
}

#[test]
fn failed_calls_leave_state_unchanged() {
    let mut gl = ctx();
    gl.color3f(0.5, 0.5, 0.5).unwrap();
    let cur = *gl.current();
    assert!(gl.color_fv(&[1.0, 0.0]).is_err());
    assert!(gl.color3f(f32::NAN, 0.0, 0.0).is_err());
    assert_eq!(*gl.current(), cur);

    assert!(gl.enable(Capability::Light(MAX_LIGHTS)).is_err());
    assert!(gl.light_fv(99, LightProp::Diffuse, &[1.0; 4]).is_err());
}

#[cfg(feature = "std")]
mod free_functions {
    use glimmer_core::gl::current::{self as gl, new_current, release_current};
    use glimmer_core::gl::{Capability, Config, Error, Recorder};

    #[test]
    fn calls_reach_current_context() {
        let ctx = new_current(Recorder::new(8, 8), Config::default()).unwrap();
        gl::enable(Capability::DepthTest).unwrap();
        gl::translate(1.0, 0.0, 0.0).unwrap();
        assert!(ctx.borrow().is_enabled(Capability::DepthTest));

        release_current();
        assert_eq!(gl::enable(Capability::Blend), Err(Error::NoContext));
    }
}
