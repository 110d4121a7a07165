// error.rs - Engine error type
//
// Host failures only. Unsupported capabilities and unmounted containers are
// not errors: callers treat them as a silent no-op.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("host environment unavailable: {0}")]
    HostUnavailable(&'static str),

    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("could not create {0}")]
    Resource(&'static str),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("javascript exception: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EngineError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        EngineError::Js(format!("{value:?}"))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
