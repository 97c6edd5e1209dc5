use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self re-arming `requestAnimationFrame` loop.
///
/// The callback holds only a weak handle to itself, so the closure is freed
/// with the owning `FrameLoop` instead of leaking.
pub struct FrameLoop {
    tick: Tick,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    /// `on_frame` receives the rAF timestamp and returns whether to continue.
    pub fn start(mut on_frame: impl FnMut(f64) -> bool + 'static) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let tick_weak: Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::downgrade(&tick);
        let pending_tick = pending.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            pending_tick.set(None);
            if !on_frame(timestamp) {
                return;
            }
            if let Some(tick) = tick_weak.upgrade() {
                pending_tick.set(request(&tick));
            }
        }) as Box<dyn FnMut(f64)>));

        pending.set(request(&tick));
        Self { tick, pending }
    }

    /// Cancel the scheduled callback, if any.
    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}

fn request(tick: &Tick) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
