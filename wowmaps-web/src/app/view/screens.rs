use wowmaps_core::View;
use yew::prelude::*;

use crate::app::state::AppState;
use crate::app::view::handlers::AppHandlers;
use crate::pages::{
    AdminPage, ExplorePage, FavoritePage, HomePage, MapDetailPage, MapListPage, SplashPage,
};

pub fn render_main_view(state: &AppState, handlers: &AppHandlers) -> Html {
    let snapshot = state.snapshot();
    match snapshot.current_view {
        View::Splash => html! { <SplashPage /> },
        View::Home => html! {
            <HomePage
                categories={(*state.categories).clone()}
                on_select_category={handlers.open_category.clone()}
                on_admin={handlers.open_admin.clone()}
            />
        },
        View::List => render_list(state, handlers),
        View::Detail => render_detail(state, handlers),
        View::Search => html! {
            <ExplorePage
                services={(*state.services).clone()}
                seed={(*state.seed).clone()}
                on_select_map={handlers.open_map.clone()}
            />
        },
        View::Favorite => {
            let maps = state.boot_ready.then(|| {
                snapshot
                    .favorite_maps(&state.maps)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
            });
            html! { <FavoritePage {maps} on_select_map={handlers.open_map.clone()} /> }
        }
        View::Admin => html! {
            <AdminPage
                config={(*state.config).clone()}
                services={(*state.services).clone()}
                on_back={handlers.leave_admin.clone()}
            />
        },
    }
}

fn render_list(state: &AppState, handlers: &AppHandlers) -> Html {
    let Some(category_id) = state.snapshot().selected_category_id.clone() else {
        return html! {
            <HomePage
                categories={(*state.categories).clone()}
                on_select_category={handlers.open_category.clone()}
                on_admin={handlers.open_admin.clone()}
            />
        };
    };
    let category = state
        .categories
        .iter()
        .find(|c| c.id == category_id)
        .cloned();
    html! {
        <MapListPage
            key={category_id.clone()}
            category_id={category_id}
            {category}
            services={(*state.services).clone()}
            seed={(*state.seed).clone()}
            on_back={handlers.go_home.clone()}
            on_select_map={handlers.open_map.clone()}
        />
    }
}

fn render_detail(state: &AppState, handlers: &AppHandlers) -> Html {
    let snapshot = state.snapshot();
    let map = snapshot.selected_map(&state.maps).cloned();
    let (unlocked, favorite) = map.as_ref().map_or((false, false), |m| {
        (snapshot.is_unlocked(&m.id), snapshot.is_favorite(&m.id))
    });
    html! {
        <MapDetailPage
            key={snapshot.selected_map_id.clone().unwrap_or_default()}
            {map}
            {unlocked}
            {favorite}
            services={(*state.services).clone()}
            ads={state.config.ads.clone()}
            copy_confirm_ms={state.config.app.copy_confirm_ms}
            on_back={handlers.go_home.clone()}
            on_toggle_favorite={handlers.toggle_favorite.clone()}
            on_gate_closed={handlers.gate_closed.clone()}
        />
    }
}
