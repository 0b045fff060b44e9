use wowmaps_core::{AppSnapshot, View};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::Navigator;

#[cfg(target_arch = "wasm32")]
use crate::app::state::{NavAction, Navigation};
use crate::router::{Route, RouteTarget};

/// Route to push so the address bar matches `snapshot`, if it differs.
#[must_use]
pub fn next_route_for_snapshot(snapshot: &AppSnapshot, current: Option<&Route>) -> Option<Route> {
    let wanted = Route::from_snapshot(snapshot);
    (Some(&wanted) != current).then_some(wanted)
}

/// Navigation implied by a route change, if the snapshot should follow it.
#[must_use]
pub fn next_target_for_route(snapshot: &AppSnapshot, route: Option<&Route>) -> Option<RouteTarget> {
    let target = route.and_then(Route::to_target)?;
    if !is_route_transition_allowed(snapshot.current_view, target.0) {
        return None;
    }
    let (view, category_id, map_id) = &target;
    let unchanged = *view == snapshot.current_view
        && (category_id.is_none() || *category_id == snapshot.selected_category_id)
        && (map_id.is_none() || *map_id == snapshot.selected_map_id);
    (!unchanged).then_some(target)
}

/// The splash screen owns its exit; every other view accepts any route.
const fn is_route_transition_allowed(current: View, next: View) -> bool {
    !matches!(current, View::Splash) && !matches!(next, View::Splash)
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_sync_route_with_snapshot(
    nav: &UseReducerHandle<Navigation>,
    navigator: Option<Navigator>,
    active_route: Option<Route>,
) {
    let wanted = Route::from_snapshot(&nav.0);
    use_effect_with(wanted, move |wanted| {
        if let Some(nav) = navigator.as_ref()
            && active_route.as_ref() != Some(wanted)
        {
            nav.push(wanted);
            crate::dom::scroll_to_top();
        }
    });
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_sync_snapshot_with_route(nav: &UseReducerHandle<Navigation>, route: Option<Route>) {
    let nav = nav.clone();
    use_effect_with(route, move |route| {
        if let Some((view, category_id, map_id)) = next_target_for_route(&nav.0, route.as_ref()) {
            nav.dispatch(NavAction::Navigate {
                view,
                category_id,
                map_id,
            });
        }
    });
}
