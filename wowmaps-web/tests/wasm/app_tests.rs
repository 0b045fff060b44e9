use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;
use yew::Renderer;

use wowmaps_web::app::App;
use wowmaps_web::dom;

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

fn query(selector: &str) -> Option<web_sys::Element> {
    dom::document()
        .expect("document")
        .query_selector(selector)
        .expect("valid selector")
}

fn click(selector: &str) {
    query(selector)
        .unwrap_or_else(|| panic!("{selector} present"))
        .dyn_into::<HtmlElement>()
        .expect("html element")
        .click();
}

#[wasm_bindgen_test]
async fn splash_hands_over_to_home() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    assert!(query("[data-view='splash']").is_some());
    assert!(query("#app-status").is_some());

    TimeoutFuture::new(3_200).await;
    assert!(query("[data-view='home']").is_some());
    assert!(query(".bottom-nav").is_some());
}

#[wasm_bindgen_test]
async fn practice_map_unlocks_after_the_countdown() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    TimeoutFuture::new(3_200).await;

    click("[data-category-id='practice_cat']");
    TimeoutFuture::new(200).await;
    click("[data-map-id='test_map_001']");
    TimeoutFuture::new(100).await;
    assert!(query(".access-locked").is_some());
    assert!(query(".bottom-nav").is_none());

    click("#watch-code");
    TimeoutFuture::new(100).await;
    assert!(query(".gate-loading").is_some());

    // connecting delay, countdown, close window tick and finishing delay
    TimeoutFuture::new(8_500).await;
    assert!(query(".gate-overlay").is_none());
    let code = query(".map-code").expect("code revealed");
    assert_eq!(code.text_content().as_deref(), Some("9999-0000-1111"));
}
