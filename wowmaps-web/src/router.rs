use wowmaps_core::{AppSnapshot, View};
use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Splash,
    #[at("/home")]
    Home,
    #[at("/category/:id")]
    List { id: String },
    #[at("/map/:id")]
    Detail { id: String },
    #[at("/explore")]
    Search,
    #[at("/favorites")]
    Favorite,
    #[at("/admin")]
    Admin,
    #[at("/404")]
    #[not_found]
    NotFound,
}

/// Navigation target encoded by a route: view plus the ids it selects.
pub type RouteTarget = (View, Option<String>, Option<String>);

impl Route {
    /// Route that shows `snapshot`; list/detail without a selection fall back to home.
    #[must_use]
    pub fn from_snapshot(snapshot: &AppSnapshot) -> Self {
        match snapshot.current_view {
            View::Splash => Self::Splash,
            View::Home => Self::Home,
            View::Search => Self::Search,
            View::Favorite => Self::Favorite,
            View::Admin => Self::Admin,
            View::List => snapshot
                .selected_category_id
                .clone()
                .map_or(Self::Home, |id| Self::List { id }),
            View::Detail => snapshot
                .selected_map_id
                .clone()
                .map_or(Self::Home, |id| Self::Detail { id }),
        }
    }

    #[must_use]
    pub fn to_target(&self) -> Option<RouteTarget> {
        match self {
            Self::Splash | Self::NotFound => None,
            Self::Home => Some((View::Home, None, None)),
            Self::List { id } => Some((View::List, Some(id.clone()), None)),
            Self::Detail { id } => Some((View::Detail, None, Some(id.clone()))),
            Self::Search => Some((View::Search, None, None)),
            Self::Favorite => Some((View::Favorite, None, None)),
            Self::Admin => Some((View::Admin, None, None)),
        }
    }
}

/// Base path for the router when the app is hosted under a subdirectory.
///
/// Reads `PUBLIC_URL` at compile time; `None` keeps the router at the root.
#[must_use]
pub fn router_base() -> Option<String> {
    normalize_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

fn normalize_base(base: &str) -> Option<String> {
    let base = base.trim().trim_end_matches('/');
    (!base.is_empty()).then(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_view_round_trips_through_its_route() {
        let snap = AppSnapshot::new()
            .navigate(View::List, Some("cat1"), None)
            .navigate(View::Detail, None, Some("m1"));
        for view in [
            View::Home,
            View::List,
            View::Detail,
            View::Search,
            View::Favorite,
            View::Admin,
        ] {
            let at = snap.navigate(view, None, None);
            let (target, category, map) = Route::from_snapshot(&at)
                .to_target()
                .expect("non-splash views are routable");
            assert_eq!(target, view);
            let round_trip = at.navigate(target, category.as_deref(), map.as_deref());
            assert_eq!(round_trip, at);
        }
    }

    #[test]
    fn selections_are_required_for_list_and_detail() {
        let bare = AppSnapshot::new();
        assert_eq!(
            Route::from_snapshot(&bare.navigate(View::List, None, None)),
            Route::Home
        );
        assert_eq!(
            Route::from_snapshot(&bare.navigate(View::Detail, None, None)),
            Route::Home
        );
        assert_eq!(Route::from_snapshot(&bare), Route::Splash);
        assert!(Route::NotFound.to_target().is_none());
    }

    #[test]
    fn router_base_is_trimmed() {
        assert_eq!(router_base(), None);
        assert_eq!(normalize_base("/maps/"), Some(String::from("/maps")));
        assert_eq!(normalize_base("  "), None);
    }
}
