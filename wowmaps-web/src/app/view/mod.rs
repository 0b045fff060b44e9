mod handlers;
mod screens;

pub use handlers::AppHandlers;

use yew::prelude::*;

use crate::a11y::STATUS_REGION_ID;
use crate::app::state::AppState;
use crate::components::BottomNav;

pub fn render_app(state: &AppState) -> Html {
    let handlers = AppHandlers::new(state);
    let snapshot = state.snapshot();
    let main_view = screens::render_main_view(state, &handlers);

    html! {
        <div class="app-shell relative w-full min-h-screen bg-[#E6F0FF] flex flex-col items-center">
            <main id="main" role="main" class="w-full max-w-screen-xl min-h-screen flex-1 relative"
                data-view={snapshot.current_view.as_str()}>
                { main_view }
            </main>
            if snapshot.shows_bottom_nav() {
                <BottomNav active={snapshot.active_tab} on_select={handlers.select_tab.clone()} />
            }
            <div id={STATUS_REGION_ID} class="sr-only" aria-live="polite"></div>
        </div>
    }
}
