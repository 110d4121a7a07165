// bindings.rs - JS-facing components
//
// GlobeView, StarfieldView and PerfPanel each mount into an element by id
// and stay inert when the element is missing or the host lacks an API they
// need. Only malformed config JSON is reported back to the caller.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, PointerEvent};

use super::container::DomContainer;
use super::panel;
use super::performance::BrowserPerformance;
use super::scheduler::BrowserScheduler;
use super::webgl::WebGlDevice;
use crate::config::{GlobeConfig, SamplerConfig, StarfieldConfig};
use crate::error::{EngineError, Result};
use crate::metrics::source::{PerformanceSource, Unobservable};
use crate::render::view::SceneView;
use crate::scene::SceneGraph;
use crate::task::TaskHandle;

type SharedView = Rc<RefCell<SceneView<WebGlDevice>>>;

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn try_mount_scene(element: HtmlElement, graph: SceneGraph, max_pixel_ratio: f64) -> Result<SceneView<WebGlDevice>> {
    let container = DomContainer::new(element)?;
    let scheduler = BrowserScheduler::new()?;
    Ok(SceneView::mount(&container, &scheduler, graph, max_pixel_ratio, |_| {
        WebGlDevice::create(container.element())
    }))
}

fn mount_scene(container_id: &str, graph: SceneGraph, max_pixel_ratio: f64) -> SharedView {
    let view = match super::element_by_id(container_id) {
        Some(element) => try_mount_scene(element, graph, max_pixel_ratio).unwrap_or_else(|e| {
            log::warn!("scene not mounted: {e}");
            SceneView::inert()
        }),
        None => {
            log::debug!("#{container_id} not found, scene skipped");
            SceneView::inert()
        }
    };
    Rc::new(RefCell::new(view))
}

fn on_pointer(target: &HtmlElement, event: &'static str, mut handler: impl FnMut(PointerEvent) + 'static) -> Result<TaskHandle> {
    let listener = Closure::wrap(Box::new(move |e: PointerEvent| handler(e)) as Box<dyn FnMut(PointerEvent)>);
    target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(TaskHandle::new(move || {
        let _ = target.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
    }))
}

/// Pointer drags on `element` rotate the view's camera.
fn attach_drag(element: &HtmlElement, view: &SharedView) -> Result<Vec<TaskHandle>> {
    let last: Rc<Cell<Option<(i32, i32)>>> = Rc::new(Cell::new(None));
    let weak: Weak<RefCell<SceneView<WebGlDevice>>> = Rc::downgrade(view);

    let down_last = last.clone();
    let down_target = element.clone();
    let down = on_pointer(element, "pointerdown", move |e| {
        down_last.set(Some((e.client_x(), e.client_y())));
        let _ = down_target.set_pointer_capture(e.pointer_id());
    })?;

    let move_last = last.clone();
    let moved = on_pointer(element, "pointermove", move |e| {
        let Some((x, y)) = move_last.get() else {
            return;
        };
        let (nx, ny) = (e.client_x(), e.client_y());
        move_last.set(Some((nx, ny)));
        if let Some(view) = weak.upgrade() {
            view.borrow().drag((nx - x) as f32, (ny - y) as f32);
        }
    })?;

    let up_last = last.clone();
    let up = on_pointer(element, "pointerup", move |_| up_last.set(None))?;
    let cancel = on_pointer(element, "pointercancel", move |_| last.set(None))?;

    Ok(vec![down, moved, up, cancel])
}

#[wasm_bindgen]
pub struct GlobeView {
    view: SharedView,
}

#[wasm_bindgen]
impl GlobeView {
    /// Mount the earth into the element with id `container_id`.
    pub fn mount(container_id: &str, config_json: Option<String>) -> std::result::Result<GlobeView, JsValue> {
        let config = match config_json {
            Some(json) => GlobeConfig::from_json(&json).map_err(to_js)?,
            None => GlobeConfig::default(),
        };
        let view = mount_scene(container_id, SceneGraph::globe(&config), config.max_pixel_ratio);

        if view.borrow().is_live() {
            if let Some(element) = super::element_by_id(container_id) {
                match attach_drag(&element, &view) {
                    Ok(tasks) => {
                        let mut live = view.borrow_mut();
                        for task in tasks {
                            live.retain(task);
                        }
                    }
                    Err(e) => log::warn!("drag controls not attached: {e}"),
                }
            }
        }
        Ok(GlobeView { view })
    }

    #[wasm_bindgen(js_name = isLive)]
    pub fn is_live(&self) -> bool {
        self.view.borrow().is_live()
    }

    pub fn unmount(&self) {
        self.view.borrow_mut().unmount();
    }
}

#[wasm_bindgen]
pub struct StarfieldView {
    view: SharedView,
}

#[wasm_bindgen]
impl StarfieldView {
    /// Mount the background starfield into the element with id `container_id`.
    pub fn mount(container_id: &str, config_json: Option<String>) -> std::result::Result<StarfieldView, JsValue> {
        let config = match config_json {
            Some(json) => StarfieldConfig::from_json(&json).map_err(to_js)?,
            None => StarfieldConfig::default(),
        };
        let view = mount_scene(container_id, SceneGraph::starfield(&config), config.max_pixel_ratio);
        Ok(StarfieldView { view })
    }

    #[wasm_bindgen(js_name = isLive)]
    pub fn is_live(&self) -> bool {
        self.view.borrow().is_live()
    }

    pub fn unmount(&self) {
        self.view.borrow_mut().unmount();
    }
}

#[wasm_bindgen(js_name = PerfPanel)]
pub struct PerfPanelView {
    panel: Option<panel::PerfPanel>,
}

#[wasm_bindgen(js_class = PerfPanel)]
impl PerfPanelView {
    /// Append the performance overlay to the element with id `parent_id`.
    pub fn mount(parent_id: &str) -> std::result::Result<PerfPanelView, JsValue> {
        let Some(parent) = super::element_by_id(parent_id) else {
            log::debug!("#{parent_id} not found, performance panel skipped");
            return Ok(PerfPanelView { panel: None });
        };
        let source: Rc<dyn PerformanceSource> = match BrowserPerformance::new() {
            Some(performance) => Rc::new(performance),
            None => {
                log::warn!("window.performance unavailable, metrics left unset");
                Rc::new(Unobservable)
            }
        };
        let panel = BrowserScheduler::new()
            .and_then(|scheduler| panel::PerfPanel::mount(&parent, source, &scheduler, &SamplerConfig::default()));
        match panel {
            Ok(panel) => Ok(PerfPanelView { panel: Some(panel) }),
            Err(e) => {
                log::warn!("performance panel not mounted: {e}");
                Ok(PerfPanelView { panel: None })
            }
        }
    }

    /// Latest metrics and fps as a flat JSON object
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        match &self.panel {
            Some(panel) => panel.sampler().snapshot_json(),
            None => "{}".into(),
        }
    }

    pub fn unmount(&mut self) {
        if let Some(mut panel) = self.panel.take() {
            panel.unmount();
        }
    }
}
