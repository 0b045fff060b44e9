use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlTextAreaElement;

use super::PlatformError;
use crate::dom;

/// Label on the copy button, swapped while the confirmation is showing.
#[must_use]
pub const fn copy_label(copied: bool) -> &'static str {
    if copied { "TRANSFERRED" } else { "COPY CODE" }
}

/// Write `text` to the system clipboard.
///
/// Uses the async Clipboard API and falls back to a hidden textarea selection
/// when the browser rejects it (insecure origin, older webviews).
///
/// # Errors
/// Returns an error when neither path is available.
pub async fn copy_text(text: &str) -> Result<(), PlatformError> {
    let win = dom::window().ok_or(PlatformError::NoBrowser)?;
    let promise = win.navigator().clipboard().write_text(text);
    match JsFuture::from(promise).await {
        Ok(_) => Ok(()),
        Err(err) => {
            log::warn!(
                "Clipboard API rejected write: {}",
                dom::js_error_message(&err)
            );
            fallback_copy(text)
        }
    }
}

fn fallback_copy(text: &str) -> Result<(), PlatformError> {
    let document = dom::document().ok_or(PlatformError::NoBrowser)?;
    let body = document
        .body()
        .ok_or(PlatformError::Missing("document body"))?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()?;
    textarea.set_value(text);
    textarea.set_attribute("style", "position:fixed;top:-1000px;left:-1000px")?;
    body.append_child(&textarea)?;
    textarea.select();
    let exec: js_sys::Function =
        js_sys::Reflect::get(&document, &"execCommand".into())?.dyn_into()?;
    let copied = exec.call1(&document, &"copy".into());
    body.remove_child(&textarea)?;
    copied?;
    Ok(())
}
