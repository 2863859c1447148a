use core::ops::ControlFlow::*;

use wasm_bindgen::prelude::*;

use glimmer_core::cam::View;
use glimmer_core::gl::{ClearMask, Model};
use glimmer_core::prelude::*;

use glimmer_front::{pointer::PointerInput, wasm};

/// The corners of a unit cube, one quad of four per face.
fn cube_mesh() -> (Vec<f32>, Vec<f32>, Vec<u16>) {
    let (mut pos, mut nrm, mut idx) = (vec![], vec![], vec![]);
    for n in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
        let u = if n.x() == 0.0 { Vec3::X } else { Vec3::Y };
        let v = n.cross(&u);
        let base = (pos.len() / 3) as u16;
        for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            pos.extend((n + u * a + v * b).0);
            nrm.extend(n.0);
        }
        idx.extend([0, 1, 2, 0, 2, 3].map(|i| base + i));
    }
    (pos, nrm, idx)
}

/// Draws one frame: a lit cube seen through `view`, spinning about the
/// vertical axis at `t` seconds.
pub fn draw<B: Backend>(gl: &mut Context<B>, view: &impl View, t: f32) -> Result<()> {
    let (w, h) = gl.backend().surface_size();
    gl.clear(ClearMask::COLOR | ClearMask::DEPTH);

    gl.matrix_mode(MatrixMode::Projection);
    gl.load_identity();
    gl.perspective(45.0, w as f32 / h.max(1) as f32, 1.0, 100.0)?;
    gl.matrix_mode(MatrixMode::Modelview);
    gl.load_matrix(&view.view_matrix())?;
    gl.rotate(20.0 * t, 0.0, 1.0, 0.0)?;

    gl.color3f(0.9, 0.6, 0.2)?;
    let (positions, normals, indices) = cube_mesh();
    gl.draw_model(&Model {
        positions: &positions,
        normals: &normals,
        indices: &indices,
    })
}

fn setup<B: Backend>(gl: &mut Context<B>) -> Result<()> {
    gl.clear_color(0.1, 0.1, 0.15, 1.0)?;
    gl.enable(Capability::DepthTest)?;
    gl.enable(Capability::Lighting)?;
    gl.enable(Capability::Light(0))?;
    gl.enable(Capability::ColorMaterial)?;
    gl.enable(Capability::Normalize)
}

// Entry point from JS
#[wasm_bindgen(start)]
pub fn start() -> core::result::Result<(), JsValue> {
    wasm::init_logging(log::Level::Debug);

    let to_js = |e: Error| JsValue::from_str(&e.to_string());

    let mut surface = wasm::Surface::from_id("glimmer").map_err(to_js)?;
    setup(&mut surface.gl).map_err(to_js)?;
    let input = PointerInput::new(&surface.canvas, Trackball::new(8.0))
        .map_err(to_js)?;

    surface.run(move |frame| {
        let t = frame.t.as_secs_f32();
        let res = input.with_target(|ball| draw(frame.gl, &*ball, t));
        match res {
            Ok(()) => Continue(()),
            Err(e) => {
                log::error!("stopping: {e}");
                Break(())
            }
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use glimmer_core::gl::{Command, DrawMode, Recorder};
    use wasm_bindgen_test::*;

    use super::*;

    #[wasm_bindgen_test]
    fn cube_has_outward_normals() {
        let (pos, nrm, idx) = cube_mesh();
        assert_eq!(pos.len(), 24 * 3);
        assert_eq!(idx.len(), 36);
        for (p, n) in pos.chunks(3).zip(nrm.chunks(3)) {
            let d: f32 = p.iter().zip(n).map(|(a, b)| a * b).sum();
            assert_eq!(d, 1.0);
        }
    }

    #[wasm_bindgen_test]
    fn frame_draws_indexed_triangles() {
        let mut gl = Context::new(Recorder::new(200, 100)).unwrap();
        setup(&mut gl).unwrap();
        draw(&mut gl, &Trackball::new(8.0), 0.5).unwrap();

        let cmds = gl.backend().commands.clone();
        assert!(cmds.contains(&Command::Clear(ClearMask::COLOR | ClearMask::DEPTH)));
        assert!(matches!(
            gl.backend().draws().last(),
            Some(Command::DrawElements { mode: DrawMode::Triangles, indices })
                if indices.len() == 36
        ));
    }
}
