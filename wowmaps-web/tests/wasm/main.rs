#![cfg(target_arch = "wasm32")]

mod app_tests;
mod platform_tests;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
