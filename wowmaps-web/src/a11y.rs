// Accessibility helpers

/// Id of the polite live region rendered by the app shell.
pub const STATUS_REGION_ID: &str = "app-status";

/// Focus ring and screen-reader utility CSS, injected once at start-up.
#[must_use]
pub const fn visible_focus_css() -> &'static str {
    ":focus-visible{outline:3px solid #60A5FA;outline-offset:2px} \
     .sr-only{position:absolute;width:1px;height:1px;margin:-1px;overflow:hidden;\
     clip:rect(0 0 0 0);white-space:nowrap;}"
}

/// Append the focus styles to the document body.
pub fn install_focus_styles() {
    let Some(doc) = crate::dom::document() else {
        return;
    };
    let (Ok(style), Some(body)) = (doc.create_element("style"), doc.body()) else {
        return;
    };
    style.set_text_content(Some(visible_focus_css()));
    _ = body.append_child(&style);
}

/// Announce `msg` through the live region, if it is mounted.
pub fn set_status(msg: &str) {
    if let Some(node) =
        crate::dom::document().and_then(|doc| doc.get_element_by_id(STATUS_REGION_ID))
    {
        node.set_text_content(Some(msg));
    }
}
