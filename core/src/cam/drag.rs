use super::{Camera, Orbit, Trackball};

/// The kind of device a pointer event comes from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Source {
    Mouse,
    Touch,
}

/// A pointer position in pixels relative to the top left of the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pointer {
    pub source: Source,
    pub x: f32,
    pub y: f32,
    /// The number of touch points currently down, or 1 for a mouse.
    pub touches: u32,
}

/// A raw pointer event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragEvent {
    Down(Pointer),
    Move(Pointer),
    Up(Source),
    Cancel(Source),
}

/// Trait for things that respond to pointer drags.
pub trait Draggable {
    /// Called on a pointer down event. Returns whether a drag should start.
    fn drag_start(&mut self, _x: f32, _y: f32) -> bool {
        true
    }
    /// Called for each move during a drag, with the previous and current
    /// pointer positions and the surface size in pixels.
    fn drag_move(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32));
    /// Called when a drag ends or is canceled.
    fn drag_end(&mut self) {}
}

/// Routes pointer events to a [`Draggable`] target.
///
/// A down event starts a drag if the target accepts it; moves are then
/// delivered to the target until a matching up or cancel event. At most one
/// drag is active per pointer source. A touch drag is canceled as soon as
/// more than one finger touches the surface.
#[derive(Clone, Debug)]
pub struct DragController<T> {
    pub target: T,
    size: (u32, u32),
    active: [Option<(f32, f32)>; 2],
}

impl<T: Draggable> DragController<T> {
    /// Creates a controller for a surface of `size` pixels.
    pub fn new(target: T, size: (u32, u32)) -> Self {
        Self { target, size, active: [None; 2] }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn set_size(&mut self, size: (u32, u32)) {
        self.size = size;
    }

    /// Returns whether a drag from `src` is in progress.
    pub fn is_dragging(&self, src: Source) -> bool {
        self.active[src as usize].is_some()
    }

    /// Handles a pointer event. Returns whether the event was part of a
    /// drag, in which case the caller should not act on it further.
    pub fn handle(&mut self, ev: DragEvent) -> bool {
        match ev {
            DragEvent::Down(p) => {
                if p.touches != 1 {
                    return self.end(p.source);
                }
                if self.is_dragging(p.source) {
                    return false;
                }
                if !self.target.drag_start(p.x, p.y) {
                    return false;
                }
                log::trace!("{:?} drag started at ({}, {})", p.source, p.x, p.y);
                self.active[p.source as usize] = Some((p.x, p.y));
                true
            }
            DragEvent::Move(p) => {
                if p.touches != 1 {
                    return self.end(p.source);
                }
                let Some(prev) = self.active[p.source as usize] else {
                    return false;
                };
                let to = (p.x, p.y);
                if to != prev {
                    self.target.drag_move(prev, to, self.size);
                    self.active[p.source as usize] = Some(to);
                }
                true
            }
            DragEvent::Up(src) | DragEvent::Cancel(src) => self.end(src),
        }
    }

    fn end(&mut self, src: Source) -> bool {
        if self.active[src as usize].take().is_none() {
            return false;
        }
        log::trace!("{src:?} drag ended");
        self.target.drag_end();
        true
    }
}

impl Draggable for Orbit {
    fn drag_move(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) {
        self.drag(from, to, size);
    }
}

impl Draggable for Trackball {
    fn drag_move(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) {
        self.drag(from, to, size);
    }
}

impl Draggable for Camera {
    fn drag_move(&mut self, from: (f32, f32), to: (f32, f32), size: (u32, u32)) {
        self.rotate_by_drag(from, to, size);
    }
}
