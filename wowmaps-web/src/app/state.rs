use std::rc::Rc;

use wowmaps_core::{AppConfig, AppSnapshot, Category, GateOutcome, MapEntry, SeedCatalog, View};
use yew::prelude::*;

use crate::platform::Services;

/// Navigation snapshot held in a reducer so late async results (gate
/// outcomes, boot timers) always apply to the latest snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navigation(pub AppSnapshot);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    Navigate {
        view: View,
        category_id: Option<String>,
        map_id: Option<String>,
    },
    ToggleFavorite(String),
    GateClosed {
        map_id: String,
        outcome: GateOutcome,
    },
}

impl NavAction {
    #[must_use]
    pub const fn go(view: View) -> Self {
        Self::Navigate {
            view,
            category_id: None,
            map_id: None,
        }
    }
}

impl Reducible for Navigation {
    type Action = NavAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            NavAction::Navigate {
                view,
                category_id,
                map_id,
            } => self
                .0
                .navigate(view, category_id.as_deref(), map_id.as_deref()),
            NavAction::ToggleFavorite(id) => self.0.toggle_favorite(&id),
            NavAction::GateClosed { map_id, outcome } => {
                log::info!("Gate for {map_id} closed: {outcome:?}");
                self.0.apply_gate_outcome(&map_id, outcome)
            }
        };
        if next == self.0 {
            self
        } else {
            Rc::new(Self(next))
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: UseStateHandle<AppConfig>,
    pub seed: UseStateHandle<SeedCatalog>,
    pub services: UseStateHandle<Services>,
    pub nav: UseReducerHandle<Navigation>,
    pub categories: UseStateHandle<Vec<Category>>,
    pub maps: UseStateHandle<Vec<MapEntry>>,
    pub boot_ready: UseStateHandle<bool>,
}

#[hook]
pub fn use_app_state() -> AppState {
    let config = use_state(AppConfig::load_from_static);
    let seed = use_state(SeedCatalog::load_from_static);
    let services = {
        let (config, seed) = (config.clone(), seed.clone());
        use_state(move || Services::from_config(&config, &seed))
    };
    let categories = {
        let seed = seed.clone();
        use_state(move || seed.categories.clone())
    };
    let maps = {
        let seed = seed.clone();
        use_state(move || seed.maps.clone())
    };
    AppState {
        config,
        seed,
        services,
        nav: use_reducer(Navigation::default),
        categories,
        maps,
        boot_ready: use_state(|| false),
    }
}

impl AppState {
    #[must_use]
    pub fn snapshot(&self) -> &AppSnapshot {
        &self.nav.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wowmaps_core::UnlockSource;

    fn reduce(state: Navigation, actions: impl IntoIterator<Item = NavAction>) -> Rc<Navigation> {
        actions
            .into_iter()
            .fold(Rc::new(state), |acc, action| acc.reduce(action))
    }

    #[test]
    fn navigation_actions_delegate_to_the_snapshot() {
        let nav = reduce(
            Navigation::default(),
            [
                NavAction::go(View::Home),
                NavAction::Navigate {
                    view: View::Detail,
                    category_id: None,
                    map_id: Some("m1".into()),
                },
                NavAction::ToggleFavorite("m1".into()),
                NavAction::GateClosed {
                    map_id: "m1".into(),
                    outcome: GateOutcome::Unlocked(UnlockSource::Countdown),
                },
            ],
        );
        assert_eq!(nav.0.current_view, View::Detail);
        assert_eq!(nav.0.active_tab, View::Home);
        assert!(nav.0.is_favorite("m1"));
        assert!(nav.0.is_unlocked("m1"));
    }

    #[test]
    fn unchanged_snapshots_keep_their_allocation() {
        let start = Rc::new(Navigation::default());
        let after = Rc::clone(&start).reduce(NavAction::GateClosed {
            map_id: "m1".into(),
            outcome: GateOutcome::Cancelled,
        });
        assert!(Rc::ptr_eq(&start, &after));
    }
}
