// source.rs - Performance observation seam
//
// What the sampler needs from the host: a clock, one-shot navigation and
// paint readings, heap introspection, and subscriptions to entry streams.
// Each of these may be missing on older engines; absence is reported as
// None and never as an error.

use serde::Serialize;

use crate::task::TaskHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    LargestContentfulPaint,
    LayoutShift,
    Event,
}

impl EntryKind {
    /// Entry type name as the host spells it
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::LargestContentfulPaint => "largest-contentful-paint",
            EntryKind::LayoutShift => "layout-shift",
            EntryKind::Event => "event",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerfEntry {
    LargestContentfulPaint { start_time: f64 },
    LayoutShift { value: f64, had_recent_input: bool },
    Event { duration: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationTiming {
    pub request_start: f64,
    pub response_start: f64,
}

impl NavigationTiming {
    pub fn time_to_first_byte(&self) -> f64 {
        self.response_start - self.request_start
    }
}

/// Heap sizes in bytes
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeapUsage {
    pub used: f64,
    pub total: f64,
    pub limit: f64,
}

impl HeapUsage {
    /// Share of the limit in use, as a percentage
    pub fn used_percent(&self) -> f64 {
        if self.limit > 0.0 {
            (self.used / self.limit * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

pub type EntryBatch = Box<dyn FnMut(&[PerfEntry])>;

pub trait PerformanceSource {
    fn navigation(&self) -> Option<NavigationTiming>;

    /// Start time of the named paint entry, if recorded by now
    fn paint(&self, name: &str) -> Option<f64>;

    fn memory(&self) -> Option<HeapUsage>;

    /// Deliver batches of `kind` entries until the handle is cancelled.
    /// None when the host cannot observe this kind.
    fn observe(&self, kind: EntryKind, on_batch: EntryBatch) -> Option<TaskHandle>;
}

/// Host without a Performance object: every reading is None and nothing
/// can be observed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unobservable;

impl PerformanceSource for Unobservable {
    fn navigation(&self) -> Option<NavigationTiming> {
        None
    }

    fn paint(&self, _name: &str) -> Option<f64> {
        None
    }

    fn memory(&self) -> Option<HeapUsage> {
        None
    }

    fn observe(&self, _kind: EntryKind, _on_batch: EntryBatch) -> Option<TaskHandle> {
        None
    }
}
