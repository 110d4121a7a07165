// testing.rs - Test doubles for the host seams
//
// Deterministic stand-ins: a scheduler driven by hand, a device that only
// bookkeeps handles, a container with a settable size and a performance
// source that replays scripted entries.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};

use crate::error::{EngineError, Result};
use crate::metrics::source::{
    EntryBatch, EntryKind, HeapUsage, NavigationTiming, PerfEntry, PerformanceSource,
};
use crate::render::device::{Device, DrawItem, Frame, FrameLight, GeometryId, MaterialId, TextureId};
use crate::render::view::Container;
use crate::scene::MaterialDesc;
use crate::scene::geometry::GeometryData;
use crate::scene::texture::TextureSpec;
use crate::task::{Scheduler, TaskHandle, Tick};
use crate::viewport::Viewport;

// ============================================================================
// Scheduler
// ============================================================================

type SharedTick = Rc<RefCell<Tick>>;

struct Timer {
    id: u64,
    period: f64,
    due: f64,
    tick: SharedTick,
}

#[derive(Default)]
struct Clock {
    now: f64,
    next_id: u64,
    frames: Vec<(u64, SharedTick)>,
    timers: Vec<Timer>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.clock.borrow().now
    }

    pub fn active_tasks(&self) -> usize {
        let clock = self.clock.borrow();
        clock.frames.len() + clock.timers.len()
    }

    /// Move the clock by `dt` and fire every frame callback once.
    pub fn advance_frame(&self, dt: f64) {
        let (now, pending) = {
            let mut clock = self.clock.borrow_mut();
            clock.now += dt;
            (clock.now, clock.frames.clone())
        };
        for (id, tick) in pending {
            let live = self.clock.borrow().frames.iter().any(|(f, _)| *f == id);
            if live {
                (tick.borrow_mut())(now);
            }
        }
    }

    /// Move the clock by `ms`, firing timers in due order.
    pub fn advance_time(&self, ms: f64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .timers
                    .iter_mut()
                    .filter(|t| t.due <= target)
                    .min_by(|a, b| a.due.total_cmp(&b.due));
                match due {
                    Some(timer) => {
                        let at = timer.due;
                        timer.due += timer.period;
                        let tick = timer.tick.clone();
                        clock.now = at;
                        Some((at, tick))
                    }
                    None => None,
                }
            };
            let Some((at, tick)) = next else { break };
            (tick.borrow_mut())(at);
        }
        self.clock.borrow_mut().now = target;
    }

    fn cancel_with(clock: Weak<RefCell<Clock>>, id: u64) -> TaskHandle {
        TaskHandle::new(move || {
            if let Some(clock) = clock.upgrade() {
                let mut clock = clock.borrow_mut();
                clock.frames.retain(|(f, _)| *f != id);
                clock.timers.retain(|t| t.id != id);
            }
        })
    }
}

impl Scheduler for ManualScheduler {
    fn every_frame(&self, tick: Tick) -> Result<TaskHandle> {
        let id = {
            let mut clock = self.clock.borrow_mut();
            clock.next_id += 1;
            let id = clock.next_id;
            clock.frames.push((id, Rc::new(RefCell::new(tick))));
            id
        };
        Ok(Self::cancel_with(Rc::downgrade(&self.clock), id))
    }

    fn every(&self, period_ms: u32, tick: Tick) -> Result<TaskHandle> {
        let id = {
            let mut clock = self.clock.borrow_mut();
            clock.next_id += 1;
            let id = clock.next_id;
            let period = period_ms.max(1) as f64;
            let due = clock.now + period;
            clock.timers.push(Timer { id, period, due, tick: Rc::new(RefCell::new(tick)) });
            id
        };
        Ok(Self::cancel_with(Rc::downgrade(&self.clock), id))
    }
}

// ============================================================================
// Device
// ============================================================================

#[derive(Clone, Debug)]
pub struct RecordedFrame {
    pub items: Vec<DrawItem>,
    pub light: Option<FrameLight>,
    pub clear_color: [f32; 4],
}

#[derive(Debug, Default)]
pub struct DeviceLog {
    pub live_geometries: BTreeSet<GeometryId>,
    pub live_materials: BTreeSet<MaterialId>,
    pub live_textures: BTreeSet<TextureId>,
    pub materials_in_order: Vec<MaterialId>,
    pub acquired: usize,
    pub double_releases: usize,
    pub draws: usize,
    pub last_frame: Option<RecordedFrame>,
    pub viewport: Option<Viewport>,
    pub surface_attached: bool,
    pub surface_detaches: usize,
    pub context_disposals: usize,
}

impl DeviceLog {
    pub fn all_released(&self) -> bool {
        self.live_geometries.is_empty() && self.live_materials.is_empty() && self.live_textures.is_empty()
    }

    pub fn total_acquired(&self) -> usize {
        self.acquired
    }
}

/// Device that hands out ids and records what happens to them
pub struct RecordingDevice {
    log: Rc<RefCell<DeviceLog>>,
    next: u32,
    materials_left: Option<usize>,
    geometry_fails: bool,
    context_lost: bool,
}

impl RecordingDevice {
    /// Surface already inserted, as a device factory would leave it
    pub fn new() -> Self {
        let log = DeviceLog { surface_attached: true, ..Default::default() };
        Self {
            log: Rc::new(RefCell::new(log)),
            next: 0,
            materials_left: None,
            geometry_fails: false,
            context_lost: false,
        }
    }

    /// Fails material creation after `n` successes
    pub fn failing_material_after(n: usize) -> Self {
        Self { materials_left: Some(n), ..Self::new() }
    }

    /// Fails the geometry upload, as a device out of buffers would
    pub fn failing_geometry() -> Self {
        Self { geometry_fails: true, ..Self::new() }
    }

    pub fn log(&self) -> Rc<RefCell<DeviceLog>> {
        self.log.clone()
    }

    fn mint(&mut self) -> u32 {
        self.next += 1;
        self.log.borrow_mut().acquired += 1;
        self.next
    }
}

impl Device for RecordingDevice {
    fn resize(&mut self, viewport: &Viewport) {
        self.log.borrow_mut().viewport = Some(*viewport);
    }

    fn create_geometry(&mut self, _data: &GeometryData) -> Result<GeometryId> {
        if self.geometry_fails {
            return Err(EngineError::Resource("buffer"));
        }
        let id = GeometryId(self.mint());
        self.log.borrow_mut().live_geometries.insert(id);
        Ok(id)
    }

    fn load_texture(&mut self, _spec: &TextureSpec) -> Result<TextureId> {
        let id = TextureId(self.mint());
        self.log.borrow_mut().live_textures.insert(id);
        Ok(id)
    }

    fn create_material(&mut self, desc: &MaterialDesc, textures: &[TextureId]) -> Result<MaterialId> {
        if let Some(left) = self.materials_left.as_mut() {
            if *left == 0 {
                return Err(EngineError::Resource("material"));
            }
            *left -= 1;
        }
        assert!(desc.textures().iter().all(|&slot| slot < textures.len()));
        let id = MaterialId(self.mint());
        let mut log = self.log.borrow_mut();
        log.live_materials.insert(id);
        log.materials_in_order.push(id);
        Ok(id)
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.last_frame = Some(RecordedFrame {
            items: frame.items.to_vec(),
            light: frame.light,
            clear_color: frame.clear_color,
        });
    }

    fn release_geometry(&mut self, id: GeometryId) {
        let mut log = self.log.borrow_mut();
        if !log.live_geometries.remove(&id) {
            log.double_releases += 1;
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        let mut log = self.log.borrow_mut();
        if !log.live_materials.remove(&id) {
            log.double_releases += 1;
        }
    }

    fn release_texture(&mut self, id: TextureId) {
        let mut log = self.log.borrow_mut();
        if !log.live_textures.remove(&id) {
            log.double_releases += 1;
        }
    }

    fn dispose_context(&mut self) {
        if !self.context_lost {
            self.context_lost = true;
            self.log.borrow_mut().context_disposals += 1;
        }
    }

    fn detach_surface(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.surface_attached {
            log.surface_attached = false;
            log.surface_detaches += 1;
        }
    }
}

// ============================================================================
// Container
// ============================================================================

type ResizeSlot = Rc<RefCell<Option<Box<dyn FnMut(u32, u32)>>>>;

pub struct FakeContainer {
    size: Cell<Option<(u32, u32)>>,
    dpr: f64,
    handlers: RefCell<Vec<ResizeSlot>>,
}

impl FakeContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Cell::new(Some((width, height))),
            dpr: 2.0,
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn detached() -> Self {
        Self { size: Cell::new(None), ..Self::new(0, 0) }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set(Some((width, height)));
        let handlers: Vec<ResizeSlot> = self.handlers.borrow().clone();
        for slot in handlers {
            if let Some(handler) = slot.borrow_mut().as_mut() {
                handler(width, height);
            }
        }
    }

    pub fn resize_listeners(&self) -> usize {
        self.handlers.borrow().iter().filter(|s| s.borrow().is_some()).count()
    }
}

impl Container for FakeContainer {
    fn client_size(&self) -> Option<(u32, u32)> {
        self.size.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn watch_resize(&self, on_resize: Box<dyn FnMut(u32, u32)>) -> Result<TaskHandle> {
        let slot: ResizeSlot = Rc::new(RefCell::new(Some(on_resize)));
        self.handlers.borrow_mut().push(slot.clone());
        Ok(TaskHandle::new(move || {
            slot.borrow_mut().take();
        }))
    }
}

// ============================================================================
// Performance source
// ============================================================================

type SharedBatch = Rc<RefCell<EntryBatch>>;

pub struct ScriptedSource {
    observers_supported: bool,
    navigation: Cell<Option<NavigationTiming>>,
    paints: RefCell<HashMap<String, f64>>,
    memory: Cell<Option<HeapUsage>>,
    observers: Rc<RefCell<HashMap<EntryKind, SharedBatch>>>,
}

impl ScriptedSource {
    /// Host with every observer available and nothing recorded yet
    pub fn full() -> Self {
        Self {
            observers_supported: true,
            navigation: Cell::new(None),
            paints: RefCell::new(HashMap::new()),
            memory: Cell::new(None),
            observers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Host without performance observation at all
    pub fn bare() -> Self {
        Self { observers_supported: false, ..Self::full() }
    }

    pub fn set_navigation(&self, timing: NavigationTiming) {
        self.navigation.set(Some(timing));
    }

    pub fn set_paint(&self, name: &str, start_time: f64) {
        self.paints.borrow_mut().insert(name.to_string(), start_time);
    }

    pub fn set_memory(&self, memory: Option<HeapUsage>) {
        self.memory.set(memory);
    }

    pub fn emit(&self, kind: EntryKind, batch: &[PerfEntry]) {
        let observer = self.observers.borrow().get(&kind).cloned();
        if let Some(observer) = observer {
            (observer.borrow_mut())(batch);
        }
    }

    pub fn active_observers(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl PerformanceSource for ScriptedSource {
    fn navigation(&self) -> Option<NavigationTiming> {
        self.navigation.get()
    }

    fn paint(&self, name: &str) -> Option<f64> {
        self.paints.borrow().get(name).copied()
    }

    fn memory(&self) -> Option<HeapUsage> {
        self.memory.get()
    }

    fn observe(&self, kind: EntryKind, on_batch: EntryBatch) -> Option<TaskHandle> {
        if !self.observers_supported {
            return None;
        }
        self.observers.borrow_mut().insert(kind, Rc::new(RefCell::new(on_batch)));
        let observers = Rc::downgrade(&self.observers);
        Some(TaskHandle::new(move || {
            if let Some(observers) = observers.upgrade() {
                observers.borrow_mut().remove(&kind);
            }
        }))
    }
}
