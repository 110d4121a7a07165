// panel.rs - Performance overlay
//
// A toggle button and a collapsible panel rendered from metrics::format's
// PanelModel. Nodes are built once; each publish only rewrites text,
// rating classes and the memory bar width.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement};

use crate::config::SamplerConfig;
use crate::error::{EngineError, Result};
use crate::metrics::format::{PanelModel, panel};
use crate::metrics::rating::Rating;
use crate::metrics::sampler::MetricsSampler;
use crate::metrics::source::PerformanceSource;
use crate::task::{Scheduler, TaskHandle};

fn el(document: &Document, tag: &str, class: &str) -> Result<HtmlElement> {
    let node: HtmlElement = document
        .create_element(tag)?
        .dyn_into()
        .map_err(|_| EngineError::Resource("element"))?;
    if !class.is_empty() {
        node.set_class_name(class);
    }
    Ok(node)
}

fn value_class(rating: Rating) -> String {
    format!("performance-metric__value performance-metric__value--{}", rating.as_str())
}

/// One label/value pair; returns the value node
fn metric_row(document: &Document, parent: &HtmlElement, label: &str, hint: &str) -> Result<HtmlElement> {
    let row = el(document, "div", "performance-metric")?;
    let label_box = el(document, "div", "performance-metric__label")?;
    let text = el(document, "span", "")?;
    text.set_text_content(Some(label));
    let info = el(document, "span", "performance-metric__info")?;
    info.set_title(hint);
    info.set_text_content(Some("ℹ"));
    label_box.append_child(&text)?;
    label_box.append_child(&info)?;

    let value = el(document, "div", &value_class(Rating::Neutral))?;
    row.append_child(&label_box)?;
    row.append_child(&value)?;
    parent.append_child(&row)?;
    Ok(value)
}

fn section(document: &Document, parent: &HtmlElement, title: &str) -> Result<HtmlElement> {
    let section = el(document, "div", "performance-section")?;
    let heading = el(document, "h4", "")?;
    heading.set_text_content(Some(title));
    section.append_child(&heading)?;
    parent.append_child(&section)?;
    Ok(section)
}

struct PanelNodes {
    fps: HtmlElement,
    vitals: Vec<HtmlElement>,
    memory_section: HtmlElement,
    memory_value: HtmlElement,
    memory_fill: HtmlElement,
}

impl PanelNodes {
    fn render(&self, model: &PanelModel) {
        self.fps.set_text_content(Some(&model.fps.value));
        self.fps.set_class_name(&value_class(model.fps.rating));
        for (node, row) in self.vitals.iter().zip(&model.vitals) {
            node.set_text_content(Some(&row.value));
            node.set_class_name(&value_class(row.rating));
        }

        match &model.memory {
            Some(memory) => {
                self.memory_section.set_hidden(false);
                self.memory_value.set_text_content(Some(&memory.value));
                let _ = self
                    .memory_fill
                    .style()
                    .set_property("width", &format!("{:.1}%", memory.fill_percent));
            }
            None => self.memory_section.set_hidden(true),
        }
    }
}

fn on_click(target: &HtmlElement, mut handler: impl FnMut() + 'static) -> Result<TaskHandle> {
    let listener = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    target.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(TaskHandle::new(move || {
        let _ = target.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
    }))
}

fn set_open(button: &HtmlElement, body: &HtmlElement, open: bool) {
    body.set_hidden(!open);
    let _ = button.set_attribute("aria-expanded", if open { "true" } else { "false" });
}

pub struct PerfPanel {
    root: HtmlElement,
    sampler: MetricsSampler,
    listeners: Vec<TaskHandle>,
}

impl PerfPanel {
    pub fn mount(
        parent: &HtmlElement,
        source: Rc<dyn PerformanceSource>,
        scheduler: &dyn Scheduler,
        config: &SamplerConfig,
    ) -> Result<Self> {
        let document = super::document()?;
        let root = el(&document, "div", "performance-toggle")?;

        let button = el(&document, "button", "performance-toggle__button")?;
        button.set_attribute("type", "button")?;
        button.set_attribute("aria-label", "Toggle performance metrics")?;
        button.set_text_content(Some("Performance"));

        let body = el(&document, "div", "performance-panel")?;
        let header = el(&document, "div", "performance-panel__header")?;
        let title = el(&document, "h3", "")?;
        title.set_text_content(Some("Performance Metrics"));
        let close = el(&document, "button", "performance-panel__close")?;
        close.set_attribute("type", "button")?;
        close.set_attribute("aria-label", "Close performance panel")?;
        close.set_text_content(Some("×"));
        header.append_child(&title)?;
        header.append_child(&close)?;

        let content = el(&document, "div", "performance-panel__content")?;
        let initial = panel(&Default::default(), config.initial_fps);
        let fps = metric_row(&document, &content, initial.fps.label, initial.fps.hint)?;

        let vitals_section = section(&document, &content, "Core Web Vitals")?;
        let vitals = initial
            .vitals
            .iter()
            .map(|row| metric_row(&document, &vitals_section, row.label, row.hint))
            .collect::<Result<Vec<_>>>()?;

        let memory_section = section(&document, &content, "Memory Usage")?;
        let memory_value =
            metric_row(&document, &memory_section, "JS Heap Size", "Current JavaScript memory usage")?;
        let bar = el(&document, "div", "performance-memory-bar")?;
        let memory_fill = el(&document, "div", "performance-memory-bar__fill")?;
        bar.append_child(&memory_fill)?;
        memory_section.append_child(&bar)?;

        body.append_child(&header)?;
        body.append_child(&content)?;
        root.append_child(&button)?;
        root.append_child(&body)?;
        set_open(&button, &body, false);

        let nodes = Rc::new(PanelNodes { fps, vitals, memory_section, memory_value, memory_fill });

        let mut listeners = Vec::new();
        let (toggle_button, toggle_body) = (button.clone(), body.clone());
        listeners.push(on_click(&button, move || {
            set_open(&toggle_button, &toggle_body, toggle_body.hidden());
        })?);
        let (close_button, close_body) = (button.clone(), body.clone());
        listeners.push(on_click(&close, move || set_open(&close_button, &close_body, false))?);

        let sampler = MetricsSampler::start(source, scheduler, config);
        nodes.render(&panel(&sampler.snapshot(), sampler.fps()));
        let renderer = nodes.clone();
        sampler.subscribe(Box::new(move |record, fps| renderer.render(&panel(record, fps))));

        parent.append_child(&root)?;
        log::debug!("performance panel mounted");
        Ok(Self { root, sampler, listeners })
    }

    pub fn sampler(&self) -> &MetricsSampler {
        &self.sampler
    }

    /// Stop sampling, drop listeners and remove the overlay.
    pub fn unmount(&mut self) {
        self.sampler.stop();
        for mut listener in self.listeners.drain(..) {
            listener.cancel();
        }
        if self.root.parent_node().is_some() {
            self.root.remove();
        }
    }
}

impl Drop for PerfPanel {
    fn drop(&mut self) {
        self.unmount();
    }
}
