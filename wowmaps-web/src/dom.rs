use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, ScrollBehavior, ScrollToOptions, Window};

/// The global `window`, absent outside a browser.
///
/// Native builds (server rendering, tests) never touch the JS bindings.
#[must_use]
pub fn window() -> Option<Window> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// The active document, absent outside a browser.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Smooth-scroll the page back to the top, as every view change does.
pub fn scroll_to_top() {
    if let Some(win) = window() {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&opts);
    }
}

/// Milliseconds since page load from the high-resolution timer.
#[must_use]
pub fn performance_now_ms() -> Option<f64> {
    window()
        .and_then(|win| win.performance())
        .map(|perf| perf.now())
}
