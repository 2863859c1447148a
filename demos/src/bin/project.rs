//! Projects the corners of a cube to window coordinates and back, after
//! rotating the camera with a simulated mouse drag.

use glimmer_core::cam::{DragController, DragEvent, Pointer, Source};
use glimmer_core::gl::Recorder;
use glimmer_core::prelude::*;

const SIZE: (u32, u32) = (320, 240);

fn main() -> Result<()> {
    let mut gl = Context::new(Recorder::new(SIZE.0, SIZE.1))?;

    let mut cam = Camera::new();
    cam.set_scale(1.5)?;
    let mut drag = DragController::new(cam, SIZE);
    let at = |x, y| Pointer { source: Source::Mouse, x, y, touches: 1 };
    drag.handle(DragEvent::Down(at(160.0, 120.0)));
    drag.handle(DragEvent::Move(at(200.0, 100.0)));
    drag.handle(DragEvent::Up(Source::Mouse));
    let mut cam = drag.target;
    println!("eye after drag: {:?}", cam.eye);

    cam.apply(&mut gl)?;

    for i in 0..8 {
        let sign = |bit| if i & bit == 0 { -1.0 } else { 1.0 };
        let p = vec3(sign(1), sign(2), sign(4));
        let win = gl.project_to_pixel(p)?;
        let back = gl.unproject_from_pixel(win)?;
        println!(
            "{:>5.1} {:>5.1} {:>5.1}  ->  x {:>6.1}  y {:>6.1}  z {:.4}  ->  {:?}",
            p.x(),
            p.y(),
            p.z(),
            win.x(),
            win.y(),
            win.z(),
            back.0
        );
    }
    Ok(())
}
