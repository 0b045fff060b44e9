#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod bootstrap;
pub mod routing;
pub mod state;
pub mod view;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::router::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let app_state = state::use_app_state();
    bootstrap::use_bootstrap(&app_state);

    let navigator = use_navigator();
    let route = use_route::<Route>();

    routing::use_sync_route_with_snapshot(&app_state.nav, navigator, route.clone());
    routing::use_sync_snapshot_with_route(&app_state.nav, route);

    view::render_app(&app_state)
}

#[cfg(test)]
mod tests {
    use super::state::use_app_state;
    use super::view::render_app;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;
    use yew::prelude::*;

    #[function_component(Shell)]
    fn shell() -> Html {
        render_app(&use_app_state())
    }

    #[test]
    fn shell_starts_on_the_splash_without_navigation() {
        let html = block_on(LocalServerRenderer::<Shell>::new().render());
        assert!(html.contains("SECURE UPLINK"));
        assert!(html.contains("data-view=\"splash\""));
        assert!(!html.contains("bottom-nav"));
        assert!(html.contains("id=\"app-status\""));
    }
}
