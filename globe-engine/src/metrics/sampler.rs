// sampler.rs - Live metrics collection
//
// Owns every subscription feeding the record: three entry observers, the
// heap timer and the frame-rate loop. Each callback reads the latest
// published record, applies its change and publishes the result before
// returning, so callbacks never interleave mid-update.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::fps::FpsCounter;
use super::record::{MetricsRecord, ShiftScore, WorstInteraction, latest_paint};
use super::source::{EntryKind, PerformanceSource};
use crate::config::SamplerConfig;
use crate::task::{Scheduler, TaskHandle};

const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

pub type Listener = Box<dyn Fn(&MetricsRecord, u32)>;

struct Shared {
    record: Cell<MetricsRecord>,
    fps: Cell<u32>,
    listeners: RefCell<Vec<Listener>>,
}

impl Shared {
    fn publish(&self, update: impl FnOnce(&mut MetricsRecord)) {
        let mut next = self.record.get();
        update(&mut next);
        self.record.set(next);
        self.notify();
    }

    fn notify(&self) {
        let record = self.record.get();
        let fps = self.fps.get();
        for listener in self.listeners.borrow().iter() {
            listener(&record, fps);
        }
    }
}

pub struct MetricsSampler {
    shared: Rc<Shared>,
    tasks: Vec<TaskHandle>,
}

impl MetricsSampler {
    pub fn start(source: Rc<dyn PerformanceSource>, scheduler: &dyn Scheduler, config: &SamplerConfig) -> Self {
        let shared = Rc::new(Shared {
            record: Cell::new(MetricsRecord::default()),
            fps: Cell::new(config.initial_fps),
            listeners: RefCell::new(Vec::new()),
        });
        let mut tasks = Vec::new();

        // Frame rate; the baseline is the first frame's timestamp
        let fps_shared = shared.clone();
        let window = config.fps_window_ms;
        let initial = config.initial_fps;
        let mut counter: Option<FpsCounter> = None;
        let fps_task = scheduler.every_frame(Box::new(move |now| {
            if counter.is_none() {
                counter = Some(FpsCounter::new(now, window, initial));
                return;
            }
            if let Some(fps) = counter.as_mut().and_then(|c| c.frame(now)) {
                fps_shared.fps.set(fps);
                fps_shared.notify();
            }
        }));
        match fps_task {
            Ok(task) => tasks.push(task),
            Err(e) => log::warn!("fps counter not started: {e}"),
        }

        // Largest contentful paint: last entry of each batch replaces the value
        let lcp_shared = shared.clone();
        if let Some(task) = source.observe(
            EntryKind::LargestContentfulPaint,
            Box::new(move |batch| {
                if let Some(lcp) = latest_paint(batch) {
                    lcp_shared.publish(|r| r.lcp = Some(lcp));
                }
            }),
        ) {
            tasks.push(task);
        }

        let cls_shared = shared.clone();
        let mut score = ShiftScore::default();
        if let Some(task) = source.observe(
            EntryKind::LayoutShift,
            Box::new(move |batch| {
                for total in score.accumulate(batch) {
                    cls_shared.publish(|r| r.cls = Some(total));
                }
            }),
        ) {
            tasks.push(task);
        }

        let inp_shared = shared.clone();
        let mut worst = WorstInteraction::default();
        if let Some(task) = source.observe(
            EntryKind::Event,
            Box::new(move |batch| {
                for max in worst.observe(batch) {
                    inp_shared.publish(|r| r.inp = Some(max));
                }
            }),
        ) {
            tasks.push(task);
        }

        // One-shot readings, no retry when absent
        if let Some(nav) = source.navigation() {
            shared.publish(|r| r.ttfb = Some(nav.time_to_first_byte()));
        }
        if let Some(fcp) = source.paint(FIRST_CONTENTFUL_PAINT) {
            shared.publish(|r| r.fcp = Some(fcp));
        }

        if let Some(memory) = source.memory() {
            shared.publish(|r| r.memory = Some(memory));
        }
        let mem_shared = shared.clone();
        let mem_source = source.clone();
        match scheduler.every(
            config.memory_period_ms,
            Box::new(move |_| {
                if let Some(memory) = mem_source.memory() {
                    mem_shared.publish(|r| r.memory = Some(memory));
                }
            }),
        ) {
            Ok(task) => tasks.push(task),
            Err(e) => log::warn!("memory timer not started: {e}"),
        }

        log::debug!("metrics sampler started with {} subscriptions", tasks.len());
        Self { shared, tasks }
    }

    pub fn snapshot(&self) -> MetricsRecord {
        self.shared.record.get()
    }

    pub fn fps(&self) -> u32 {
        self.shared.fps.get()
    }

    /// Called after every publish. Register before the host starts
    /// delivering events; listeners must not register further listeners.
    pub fn subscribe(&self, listener: Listener) {
        self.shared.listeners.borrow_mut().push(listener);
    }

    pub fn snapshot_json(&self) -> String {
        #[derive(serde::Serialize)]
        struct Snapshot {
            #[serde(flatten)]
            record: MetricsRecord,
            fps: u32,
        }
        serde_json::to_string(&Snapshot { record: self.snapshot(), fps: self.fps() })
            .unwrap_or_else(|_| "{}".into())
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Disconnect every observer and clear every timer.
    pub fn stop(&mut self) {
        for mut task in self.tasks.drain(..) {
            task.cancel();
        }
        self.shared.listeners.borrow_mut().clear();
    }
}

impl Drop for MetricsSampler {
    fn drop(&mut self) {
        self.stop();
    }
}
