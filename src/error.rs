use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Problems with the page-supplied configuration block.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("reveal threshold must be positive, got {0}")]
    NonPositiveReveal(f64),
    #[error("arm threshold ({arm}) must exceed reveal threshold ({reveal})")]
    ArmNotBeyondReveal { reveal: f64, arm: f64 },
    #[error("dead band ({deadband}) must lie in [0, {reveal})")]
    DeadbandOutOfRange { deadband: f64, reveal: f64 },
    #[error("no item kinds configured")]
    NoKinds,
    #[error("malformed config json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("a confirmation dialog is already open for this item")]
    AlreadyOpen,
    #[error("no confirmation dialog is open")]
    NotOpen,
}

#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("dom operation failed: {0}")]
    Dom(String),
    #[error("no global window")]
    NoWindow,
    #[error("item has no parent element to wrap")]
    MissingParent,
    #[error("item has no resolvable delete endpoint")]
    MissingEndpoint,
    #[error("unknown item kind `{0}`")]
    UnknownKind(String),
}

impl From<JsValue> for SwipeError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        SwipeError::Dom(text)
    }
}

pub type Result<T, E = SwipeError> = std::result::Result<T, E>;
