use wowmaps_core::{GateOutcome, View};
use yew::prelude::*;

use crate::app::state::{AppState, NavAction};

/// Callbacks shared by the pages, built once per render.
#[derive(Clone)]
pub struct AppHandlers {
    pub select_tab: Callback<View>,
    pub open_category: Callback<String>,
    pub open_map: Callback<String>,
    pub go_home: Callback<()>,
    pub toggle_favorite: Callback<()>,
    pub gate_closed: Callback<GateOutcome>,
    pub open_admin: Callback<()>,
    pub leave_admin: Callback<()>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            select_tab: build_select_tab(state),
            open_category: build_open_category(state),
            open_map: build_open_map(state),
            go_home: build_go(state, View::Home),
            toggle_favorite: build_toggle_favorite(state),
            gate_closed: build_gate_closed(state),
            open_admin: build_go(state, View::Admin),
            leave_admin: build_leave_admin(state),
        }
    }
}

fn build_select_tab(state: &AppState) -> Callback<View> {
    let nav = state.nav.clone();
    Callback::from(move |view: View| nav.dispatch(NavAction::go(view)))
}

fn build_go(state: &AppState, view: View) -> Callback<()> {
    let nav = state.nav.clone();
    Callback::from(move |()| nav.dispatch(NavAction::go(view)))
}

fn build_open_category(state: &AppState) -> Callback<String> {
    let nav = state.nav.clone();
    Callback::from(move |id: String| {
        nav.dispatch(NavAction::Navigate {
            view: View::List,
            category_id: Some(id),
            map_id: None,
        });
    })
}

fn build_open_map(state: &AppState) -> Callback<String> {
    let nav = state.nav.clone();
    Callback::from(move |id: String| {
        nav.dispatch(NavAction::Navigate {
            view: View::Detail,
            category_id: None,
            map_id: Some(id),
        });
    })
}

fn build_toggle_favorite(state: &AppState) -> Callback<()> {
    let nav = state.nav.clone();
    Callback::from(move |()| {
        if let Some(id) = nav.0.selected_map_id.clone() {
            nav.dispatch(NavAction::ToggleFavorite(id));
        }
    })
}

/// Outcomes are credited to the map selected when the gate was opened.
fn build_gate_closed(state: &AppState) -> Callback<GateOutcome> {
    let nav = state.nav.clone();
    let map_id = nav.0.selected_map_id.clone();
    Callback::from(move |outcome: GateOutcome| {
        if let Some(map_id) = map_id.clone() {
            if outcome.is_unlock() {
                crate::a11y::set_status("Code unlocked");
            }
            nav.dispatch(NavAction::GateClosed { map_id, outcome });
        }
    })
}

fn build_leave_admin(state: &AppState) -> Callback<()> {
    let nav = state.nav.clone();
    #[cfg(target_arch = "wasm32")]
    let state = state.clone();
    Callback::from(move |()| {
        #[cfg(target_arch = "wasm32")]
        crate::app::bootstrap::refresh_catalog(&state);
        nav.dispatch(NavAction::go(View::Home));
    })
}
