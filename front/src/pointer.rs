//! Routing of DOM mouse and touch events to a [`DragController`].

use core::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, prelude::Closure};
use web_sys::{
    Event, EventTarget, HtmlCanvasElement as Canvas, MouseEvent, TouchEvent,
};

use glimmer_core::cam::{DragController, DragEvent, Draggable, Pointer, Source};
use glimmer_core::gl::{Error, Result};

use crate::wasm::document;

type Shared<T> = Rc<RefCell<DragController<T>>>;
type ToDrag = fn(&Canvas, &Event) -> Option<DragEvent>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    cb: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let f = self.cb.as_ref().unchecked_ref();
        let _ = self.target.remove_event_listener_with_callback(self.kind, f);
    }
}

/// Drags of a target with the mouse and single-finger touch on a canvas.
///
/// A mouse drag starts on the canvas and continues anywhere in the
/// document. The event listeners stay installed for the lifetime of this
/// value.
pub struct PointerInput<T> {
    ctl: Shared<T>,
    _listeners: Vec<Listener>,
}

impl<T: Draggable + 'static> PointerInput<T> {
    /// Installs listeners on `canvas` and its document that route pointer
    /// events to `target`.
    pub fn new(canvas: &Canvas, target: T) -> Result<Self> {
        let size = (canvas.width(), canvas.height());
        let ctl: Shared<T> = Rc::new(RefCell::new(DragController::new(target, size)));
        let doc: EventTarget = document()
            .ok_or_else(|| Error::Backend("document not found".into()))?
            .into();
        let cvs: EventTarget = canvas.clone().into();

        let mut listeners = Vec::new();
        let mut listen = |target: &EventTarget, kind: &'static str, f: ToDrag| {
            let (ctl, canvas) = (ctl.clone(), canvas.clone());
            let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
                let Some(drag) = f(&canvas, &ev) else {
                    return;
                };
                let mut ctl = ctl.borrow_mut();
                ctl.set_size((canvas.width(), canvas.height()));
                if ctl.handle(drag) && drag_source(&drag) == Source::Touch {
                    // Keep the page from scrolling under the finger
                    ev.prevent_default();
                }
            });
            target
                .add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())
                .map_err(|e| {
                    Error::Backend(format!("could not listen to {kind}: {e:?}"))
                })?;
            listeners.push(Listener { target: target.clone(), kind, cb });
            Ok::<_, Error>(())
        };

        listen(&cvs, "mousedown", |c, e| mouse(c, e).map(DragEvent::Down))?;
        listen(&doc, "mousemove", |c, e| mouse(c, e).map(DragEvent::Move))?;
        listen(&doc, "mouseup", |_, _| Some(DragEvent::Up(Source::Mouse)))?;
        listen(&cvs, "touchstart", |c, e| touch(c, e).map(DragEvent::Down))?;
        listen(&cvs, "touchmove", |c, e| touch(c, e).map(DragEvent::Move))?;
        listen(&cvs, "touchend", |_, _| Some(DragEvent::Up(Source::Touch)))?;
        listen(&cvs, "touchcancel", |_, _| Some(DragEvent::Cancel(Source::Touch)))?;

        log::debug!("installed {} pointer listeners", listeners.len());
        Ok(Self { ctl, _listeners: listeners })
    }

    /// Returns the shared controller, for reading or updating the target.
    pub fn controller(&self) -> &Rc<RefCell<DragController<T>>> {
        &self.ctl
    }

    /// Calls `f` with the drag target.
    pub fn with_target<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.ctl.borrow_mut().target)
    }
}

fn drag_source(ev: &DragEvent) -> Source {
    match *ev {
        DragEvent::Down(p) | DragEvent::Move(p) => p.source,
        DragEvent::Up(s) | DragEvent::Cancel(s) => s,
    }
}

/// Converts client coordinates to canvas pixels.
fn to_canvas(canvas: &Canvas, cx: f64, cy: f64) -> (f32, f32) {
    let r = canvas.get_bounding_client_rect();
    let sx = if r.width() > 0.0 { canvas.width() as f64 / r.width() } else { 1.0 };
    let sy = if r.height() > 0.0 { canvas.height() as f64 / r.height() } else { 1.0 };
    (((cx - r.left()) * sx) as f32, ((cy - r.top()) * sy) as f32)
}

fn mouse(canvas: &Canvas, ev: &Event) -> Option<Pointer> {
    let ev = ev.dyn_ref::<MouseEvent>()?;
    let (x, y) = to_canvas(canvas, ev.client_x().into(), ev.client_y().into());
    Some(Pointer { source: Source::Mouse, x, y, touches: 1 })
}

fn touch(canvas: &Canvas, ev: &Event) -> Option<Pointer> {
    let touches = ev.dyn_ref::<TouchEvent>()?.touches();
    let t = touches.get(0)?;
    let (x, y) = to_canvas(canvas, t.client_x().into(), t.client_y().into());
    Some(Pointer { source: Source::Touch, x, y, touches: touches.length() })
}
