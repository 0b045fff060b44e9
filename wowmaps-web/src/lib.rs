#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod a11y;
pub mod app;
pub mod components;
pub mod dom;
pub mod pages;
pub mod platform;
pub mod router;

/// Map a configured level name onto the `log` facade, defaulting to `Info`.
#[must_use]
pub fn log_level_from_name(name: &str) -> log::Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => log::Level::Error,
        "warn" | "warning" => log::Level::Warn,
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        _ => log::Level::Info,
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let cfg = wowmaps_core::AppConfig::load_from_static();
    _ = console_log::init_with_level(log_level_from_name(&cfg.app.log_level));
    a11y::install_focus_styles();
    yew::Renderer::<app::App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::log_level_from_name;

    #[test]
    fn log_levels_parse_with_info_fallback() {
        assert_eq!(log_level_from_name("debug"), log::Level::Debug);
        assert_eq!(log_level_from_name(" WARN "), log::Level::Warn);
        assert_eq!(log_level_from_name("warning"), log::Level::Warn);
        assert_eq!(log_level_from_name(""), log::Level::Info);
        assert_eq!(log_level_from_name("chatty"), log::Level::Info);
    }
}
