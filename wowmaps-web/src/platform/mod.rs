//! Browser implementations of the core seams: HTTP transport, gate clock,
//! native ad bridge and clipboard, plus the [`Services`] bundle that picks
//! between them at start-up.
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
pub mod admob;
pub mod clipboard;
pub mod clock;
#[cfg(target_arch = "wasm32")]
pub mod http;
pub mod services;

pub use clock::BrowserClock;
pub use services::Services;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("browser context unavailable")]
    NoBrowser,
    #[error("{0} is not available")]
    Missing(&'static str),
    #[error("javascript call failed: {0}")]
    Js(String),
}

impl From<JsValue> for PlatformError {
    fn from(value: JsValue) -> Self {
        Self::Js(crate::dom::js_error_message(&value))
    }
}
