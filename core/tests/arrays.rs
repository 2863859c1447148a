use glimmer_core::gl::*;

const SQUARE: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

fn ctx() -> Context<Recorder> {
    Context::new(Recorder::new(32, 32)).unwrap()
}

#[test]
fn disabled_vertex_array_draws_nothing() {
    let mut gl = ctx();
    gl.vertex_pointer(2, 0, &SQUARE).unwrap();
    gl.draw_arrays(PrimitiveKind::TriangleFan, 0, 4).unwrap();
    gl.draw_elements(PrimitiveKind::Triangles, 3, &[0u16, 1, 2])
        .unwrap();
    assert_eq!(gl.backend().draws().count(), 0);

    gl.enable_client_state(ClientArray::Vertex);
    gl.draw_arrays(PrimitiveKind::TriangleFan, 0, 4).unwrap();
    assert_eq!(gl.backend().draws().count(), 1);
}

#[test]
fn unbound_vertex_array_draws_nothing() {
    let mut gl = ctx();
    gl.enable_client_state(ClientArray::Vertex);
    gl.draw_arrays(PrimitiveKind::Points, 0, 10).unwrap();
    assert_eq!(gl.backend().draws().count(), 0);
}

#[test]
fn positions_stored_densely() {
    let mut gl = ctx();
    // Two floats of padding after each position
    let strided = [1.0, 2.0, -1.0, -1.0, 3.0, 4.0, -1.0, -1.0];
    gl.vertex_pointer(2, 4, &strided).unwrap();
    gl.enable_client_state(ClientArray::Vertex);
    gl.draw_arrays(PrimitiveKind::Lines, 0, 2).unwrap();
    assert_eq!(
        gl.backend().last_upload(Attrib::Coords),
        Some(&[1.0, 2.0, 0.0, 3.0, 4.0, 0.0][..])
    );
}

#[test]
fn quads_from_arrays_expanded() {
    let mut gl = ctx();
    let colors: [u8; 16] = [
        255, 0, 0, 255, //
        0, 255, 0, 255, //
        0, 0, 255, 255, //
        255, 255, 255, 255,
    ];
    gl.vertex_pointer(2, 0, &SQUARE).unwrap();
    gl.color_pointer(4, 0, &colors).unwrap();
    gl.enable_client_state(ClientArray::Vertex);
    gl.enable_client_state(ClientArray::Color);
    gl.draw_arrays(PrimitiveKind::Quads, 0, 4).unwrap();

    let b = gl.backend();
    let coords = b.last_upload(Attrib::Coords).unwrap();
    let xs: Vec<f32> = coords.chunks(3).map(|v| v[0]).collect();
    assert_eq!(xs, [0.0, 1.0, 1.0, 0.0, 1.0, 0.0]);
    let reds: Vec<f32> = b
        .last_upload(Attrib::Color)
        .unwrap()
        .chunks(4)
        .map(|c| c[0])
        .collect();
    assert_eq!(reds, [1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
    assert_eq!(
        b.draws().last(),
        Some(&Command::DrawArrays { mode: DrawMode::Triangles, first: 0, count: 6 })
    );
}

#[test]
fn indexed_quads_expanded() {
    let mut gl = ctx();
    gl.vertex_pointer(2, 0, &SQUARE).unwrap();
    gl.enable_client_state(ClientArray::Vertex);
    gl.draw_elements(PrimitiveKind::Quads, 4, IndexData::bytes(&[3, 2, 1, 0])).unwrap();
    assert_eq!(
        gl.backend().draws().last(),
        Some(&Command::DrawElements {
            mode: DrawMode::Triangles,
            indices: vec![3, 2, 1, 3, 1, 0],
        })
    );
}

#[test]
fn out_of_range_draws_rejected() {
    let mut gl = ctx();
    gl.vertex_pointer(2, 0, &SQUARE).unwrap();
    gl.enable_client_state(ClientArray::Vertex);

    let e = gl.draw_arrays(PrimitiveKind::Points, 2, 3).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Precondition);
    let e = gl
        .draw_elements(PrimitiveKind::Points, 1, &[4u32])
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Precondition);
    let e = gl
        .draw_elements(PrimitiveKind::Points, 3, &[0u16, 1])
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Precondition);
    assert_eq!(gl.backend().draws().count(), 0);
}

#[test]
fn array_draws_refused_inside_primitive() {
    let mut gl = ctx();
    gl.vertex_pointer(2, 0, &SQUARE).unwrap();
    gl.enable_client_state(ClientArray::Vertex);
    gl.begin(PrimitiveKind::Points).unwrap();
    assert_eq!(
        gl.draw_arrays(PrimitiveKind::Points, 0, 1),
        Err(Error::InsidePrimitive { op: "draw_arrays" })
    );
}

#[test]
fn model_drawn_without_touching_enables() {
    let mut gl = ctx();
    gl.enable(Capability::Lighting).unwrap();
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let normals = [0.0, 0.0, 1.0].repeat(3);
    let model = Model {
        positions: &positions,
        normals: &normals,
        indices: &[0, 1, 2],
    };
    gl.draw_model(&model).unwrap();

    assert!(!gl.is_client_state_enabled(ClientArray::Vertex));
    assert!(!gl.is_client_state_enabled(ClientArray::Normal));
    let b = gl.backend();
    assert_eq!(b.last_upload(Attrib::Normal), Some(&normals[..]));
    assert_eq!(
        b.draws().last(),
        Some(&Command::DrawElements {
            mode: DrawMode::Triangles,
            indices: vec![0, 1, 2],
        })
    );

    let bad = Model { indices: &[0, 1, 3], ..model };
    assert!(gl.draw_model(&bad).is_err());
}
