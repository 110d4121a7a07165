// scheduler.rs - requestAnimationFrame and setInterval tasks
//
// The frame closure re-arms itself after each tick. It lives in a shared
// slot so cancelling can both cancel the pending frame and drop it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::error::Result;
use crate::task::{Scheduler, TaskHandle, Tick};

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new() -> Result<Self> {
        Ok(Self { window: super::window()? })
    }

    fn now(window: &Window) -> f64 {
        window.performance().map(|p| p.now()).unwrap_or_default()
    }
}

impl Scheduler for BrowserScheduler {
    fn every_frame(&self, mut tick: Tick) -> Result<TaskHandle> {
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None::<i32>));
        let cancelled = Rc::new(Cell::new(false));

        let next = slot.clone();
        let frame_id = pending.clone();
        let stop = cancelled.clone();
        let window = self.window.clone();
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            frame_id.set(None);
            if stop.get() {
                return;
            }
            tick(now);
            if stop.get() {
                return;
            }
            if let Some(callback) = next.borrow().as_ref() {
                frame_id.set(window.request_animation_frame(callback.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(callback) = slot.borrow().as_ref() {
            pending.set(Some(self.window.request_animation_frame(callback.as_ref().unchecked_ref())?));
        }

        let window = self.window.clone();
        Ok(TaskHandle::new(move || {
            cancelled.set(true);
            if let Some(id) = pending.take() {
                let _ = window.cancel_animation_frame(id);
            }
            // Breaks the closure's reference to its own slot
            slot.borrow_mut().take();
        }))
    }

    fn every(&self, period_ms: u32, mut tick: Tick) -> Result<TaskHandle> {
        let clock = self.window.clone();
        let callback = Closure::wrap(Box::new(move || tick(Self::now(&clock))) as Box<dyn FnMut()>);
        let id = self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms.min(i32::MAX as u32) as i32,
        )?;

        let window = self.window.clone();
        Ok(TaskHandle::new(move || {
            window.clear_interval_with_handle(id);
            drop(callback);
        }))
    }
}
