// task.rs - Cancellable repeating work
//
// Animation loops, timers and observer subscriptions all hand back a
// TaskHandle. Once a handle is cancelled (or dropped) its callback never
// runs again.

use crate::error::Result;

/// Callback receiving a monotonic timestamp in milliseconds
pub type Tick = Box<dyn FnMut(f64)>;

/// Host capability for scheduling recurring callbacks
pub trait Scheduler {
    /// Run `tick` once per display refresh until the handle is cancelled.
    fn every_frame(&self, tick: Tick) -> Result<TaskHandle>;

    /// Run `tick` every `period_ms` until the handle is cancelled.
    fn every(&self, period_ms: u32, tick: Tick) -> Result<TaskHandle>;
}

/// Owned cancellation for one recurring task or subscription
#[must_use = "dropping a TaskHandle cancels the task"]
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A handle with nothing to cancel
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("active", &self.is_active()).finish()
    }
}
