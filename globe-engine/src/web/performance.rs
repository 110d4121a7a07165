// performance.rs - Performance API as a PerformanceSource
//
// Every reading goes through Reflect so engines that lack an attribute
// (heap size, event timing, observers) read as None.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Performance, PerformanceEntry, PerformanceObserver, PerformanceObserverEntryList};

use crate::error::Result;
use crate::metrics::source::{
    EntryBatch, EntryKind, HeapUsage, NavigationTiming, PerfEntry, PerformanceSource,
};
use crate::task::TaskHandle;

pub struct BrowserPerformance {
    performance: Performance,
    observers_supported: bool,
}

impl BrowserPerformance {
    /// None when the host has no window.performance
    pub fn new() -> Option<Self> {
        let window = super::window().ok()?;
        let performance = window.performance()?;
        let observers_supported = Reflect::has(&window, &JsValue::from_str("PerformanceObserver")).unwrap_or(false);
        Some(Self { performance, observers_supported })
    }

    fn start(&self, kind: EntryKind, mut on_batch: EntryBatch) -> Result<TaskHandle> {
        let callback = Closure::wrap(Box::new(move |list: PerformanceObserverEntryList, _: PerformanceObserver| {
            let batch: Vec<PerfEntry> = list.get_entries().iter().filter_map(|e| entry(kind, &e)).collect();
            if !batch.is_empty() {
                on_batch(&batch);
            }
        }) as Box<dyn FnMut(PerformanceObserverEntryList, PerformanceObserver)>);

        let observer = PerformanceObserver::new(callback.as_ref().unchecked_ref())?;
        let options = Object::new();
        match kind {
            // Event timing only reports through the single-type form
            EntryKind::Event => {
                Reflect::set(&options, &"type".into(), &kind.as_str().into())?;
                Reflect::set(&options, &"buffered".into(), &JsValue::TRUE)?;
            }
            _ => {
                let types = Array::of1(&kind.as_str().into());
                Reflect::set(&options, &"entryTypes".into(), &types)?;
            }
        }
        let observe: Function = Reflect::get(&observer, &"observe".into())?.dyn_into()?;
        observe.call1(&observer, &options)?;

        Ok(TaskHandle::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

fn entry(kind: EntryKind, value: &JsValue) -> Option<PerfEntry> {
    let timing = value.dyn_ref::<PerformanceEntry>()?;
    Some(match kind {
        EntryKind::LargestContentfulPaint => PerfEntry::LargestContentfulPaint { start_time: timing.start_time() },
        EntryKind::LayoutShift => PerfEntry::LayoutShift {
            value: number(value, "value")?,
            had_recent_input: Reflect::get(value, &"hadRecentInput".into()).ok()?.is_truthy(),
        },
        EntryKind::Event => PerfEntry::Event { duration: timing.duration() },
    })
}

impl PerformanceSource for BrowserPerformance {
    fn navigation(&self) -> Option<NavigationTiming> {
        let nav = self.performance.get_entries_by_type("navigation").get(0);
        if nav.is_undefined() {
            return None;
        }
        Some(NavigationTiming {
            request_start: number(&nav, "requestStart")?,
            response_start: number(&nav, "responseStart")?,
        })
    }

    fn paint(&self, name: &str) -> Option<f64> {
        self.performance
            .get_entries_by_type("paint")
            .iter()
            .filter_map(|e| e.dyn_into::<PerformanceEntry>().ok())
            .find(|e| e.name() == name)
            .map(|e| e.start_time())
    }

    fn memory(&self) -> Option<HeapUsage> {
        let memory = Reflect::get(&self.performance, &"memory".into()).ok()?;
        if memory.is_undefined() || memory.is_null() {
            return None;
        }
        Some(HeapUsage {
            used: number(&memory, "usedJSHeapSize")?,
            total: number(&memory, "totalJSHeapSize")?,
            limit: number(&memory, "jsHeapSizeLimit")?,
        })
    }

    fn observe(&self, kind: EntryKind, on_batch: EntryBatch) -> Option<TaskHandle> {
        if !self.observers_supported {
            return None;
        }
        match self.start(kind, on_batch) {
            Ok(task) => Some(task),
            Err(e) => {
                log::warn!("{} observer not supported: {e}", kind.as_str());
                None
            }
        }
    }
}
