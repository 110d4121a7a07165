// web/ - Browser host
//
// wasm32-only implementations of the host seams: requestAnimationFrame and
// setInterval scheduling, DOM containers, WebGL2, the Performance API and
// the overlay panel. bindings.rs is the JS-facing surface.

pub mod bindings;
mod container;
mod panel;
mod performance;
mod scheduler;
mod shaders;
mod webgl;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::error::{EngineError, Result};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

pub(crate) fn window() -> Result<Window> {
    web_sys::window().ok_or(EngineError::HostUnavailable("window"))
}

pub(crate) fn document() -> Result<Document> {
    window()?.document().ok_or(EngineError::HostUnavailable("document"))
}

/// Element by id, None when it is missing or not an HTML element
pub(crate) fn element_by_id(id: &str) -> Option<HtmlElement> {
    document().ok()?.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}
