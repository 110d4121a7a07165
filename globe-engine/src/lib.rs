// ============================================================================
// GLOBE ENGINE - Hero globe, starfield backdrop and performance overlay
// ============================================================================
//
// Scene description, animation and metrics are host-independent and run
// natively under `cargo test`. Everything that touches the browser lives in
// web/ and only builds for wasm32.

pub mod config;
pub mod error;
pub mod metrics;
pub mod render;
pub mod scene;
pub mod task;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{GlobeConfig, SamplerConfig, StarfieldConfig};
pub use error::{EngineError, Result};
pub use metrics::{MetricsRecord, MetricsSampler};
pub use render::SceneRenderer;
pub use render::view::SceneView;
pub use scene::SceneGraph;

#[cfg(target_arch = "wasm32")]
pub use web::bindings::{GlobeView, PerfPanelView, StarfieldView};
