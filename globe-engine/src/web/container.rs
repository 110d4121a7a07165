// container.rs - DOM element as a render container

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlElement, Window};

use crate::error::Result;
use crate::render::view::Container;
use crate::task::TaskHandle;

pub struct DomContainer {
    element: HtmlElement,
    window: Window,
}

impl DomContainer {
    pub fn new(element: HtmlElement) -> Result<Self> {
        Ok(Self { element, window: super::window()? })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl Container for DomContainer {
    fn client_size(&self) -> Option<(u32, u32)> {
        if !self.element.is_connected() {
            return None;
        }
        let width = self.element.client_width().max(0) as u32;
        let height = self.element.client_height().max(0) as u32;
        Some((width, height))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    /// Follows window resizes, reading the element's new client size.
    fn watch_resize(&self, mut on_resize: Box<dyn FnMut(u32, u32)>) -> Result<TaskHandle> {
        let element = self.element.clone();
        let listener = Closure::wrap(Box::new(move || {
            if element.is_connected() {
                on_resize(element.client_width().max(0) as u32, element.client_height().max(0) as u32);
            }
        }) as Box<dyn FnMut()>);
        self.window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;

        let window = self.window.clone();
        Ok(TaskHandle::new(move || {
            let _ = window.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        }))
    }
}
