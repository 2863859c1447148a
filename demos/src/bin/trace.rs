//! Draws a lit, color-tracked cube in immediate mode and prints the
//! resulting stream of backend calls.

use glimmer_core::gl::{Command, Recorder};
use glimmer_core::prelude::*;

const FACES: [([f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [1.0, 0.2, 0.2]),
    ([-1.0, 0.0, 0.0], [0.2, 1.0, 1.0]),
    ([0.0, 1.0, 0.0], [0.2, 1.0, 0.2]),
    ([0.0, -1.0, 0.0], [1.0, 0.2, 1.0]),
    ([0.0, 0.0, 1.0], [0.2, 0.2, 1.0]),
    ([0.0, 0.0, -1.0], [1.0, 1.0, 0.2]),
];

fn cube(gl: &mut Context<Recorder>) -> Result<()> {
    gl.begin(PrimitiveKind::Quads)?;
    for (n, c) in FACES {
        let n = Vec3::from(n);
        // Two edge vectors spanning the face, counterclockwise seen from
        // outside
        let u = if n.x() == 0.0 { vec3(1.0, 0.0, 0.0) } else { vec3(0.0, 1.0, 0.0) };
        let v = n.cross(&u);
        gl.color3f(c[0], c[1], c[2])?;
        gl.normal3f(n.x(), n.y(), n.z())?;
        for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = n + u * a + v * b;
            gl.vertex3f(p.x(), p.y(), p.z())?;
        }
    }
    gl.end()
}

fn main() -> Result<()> {
    let mut gl = Context::new(Recorder::new(640, 480))?;
    gl.backend_mut().take();

    let mut cam = Camera::new();
    cam.set_scale(2.0)?;
    cam.look_at(vec3(4.0, 3.0, 6.0), Vec3::default(), vec3(0.0, 1.0, 0.0));
    cam.apply(&mut gl)?;

    gl.enable(Capability::DepthTest)?;
    gl.enable(Capability::Lighting)?;
    gl.enable(Capability::Light(0))?;
    gl.enable(Capability::ColorMaterial)?;
    gl.rotate(30.0, 0.0, 1.0, 0.0)?;
    cube(&mut gl)?;

    for cmd in gl.backend_mut().take() {
        match cmd {
            Command::UploadAttrib(a, data) => {
                println!("upload {:<24} {} floats", a.name(), data.len());
            }
            Command::SetUniform(u, val) => println!("uniform {:<23} {val:?}", u.name()),
            other => println!("{other:?}"),
        }
    }
    Ok(())
}
