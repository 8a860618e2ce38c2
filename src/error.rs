//! Structured error types for xlgrid.
//!
//! The grid recovers locally from its own invariant violations (hit-test
//! misses, stray pointer events, commits without an editing session). The
//! errors here are the ones it cannot absorb: collaborator rejections, which
//! are passed through unmodified, and host-side setup failures.

/// All errors that can surface from xlgrid.
#[derive(Debug, thiserror::Error)]
pub enum XlgridError {
    /// The calculation engine rejected an intent (resize, autofill, input...).
    #[error("{0}")]
    Engine(String),

    /// Drawing surface failure.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A JavaScript collaborator threw.
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlgridError>;

#[cfg(target_arch = "wasm32")]
impl From<XlgridError> for wasm_bindgen::JsValue {
    fn from(e: XlgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for XlgridError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

/// Text of a thrown JavaScript value: the string itself or its `message`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
