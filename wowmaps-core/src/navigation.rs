//! Screen selection and per-session sets, held as immutable snapshots.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ad_gate::GateOutcome;
use crate::model::MapEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Splash,
    Home,
    List,
    Detail,
    Search,
    Favorite,
    Admin,
}

impl View {
    /// Views reachable from the bottom navigation bar, in display order.
    pub const TABS: [Self; 3] = [Self::Home, Self::Search, Self::Favorite];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Home => "home",
            Self::List => "list",
            Self::Detail => "detail",
            Self::Search => "search",
            Self::Favorite => "favorite",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub const fn is_tab(self) -> bool {
        matches!(self, Self::Home | Self::Search | Self::Favorite)
    }

    /// Full-screen views hide the bottom navigation.
    #[must_use]
    pub const fn shows_bottom_nav(self) -> bool {
        !matches!(self, Self::Splash | Self::Detail | Self::Admin)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user is looking at plus the ids unlocked and favorited so far.
///
/// Every operation returns a new snapshot; the receiver is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub current_view: View,
    pub selected_category_id: Option<String>,
    pub selected_map_id: Option<String>,
    unlocked: BTreeSet<String>,
    favorites: BTreeSet<String>,
    pub active_tab: View,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self {
            current_view: View::Splash,
            selected_category_id: None,
            selected_map_id: None,
            unlocked: BTreeSet::new(),
            favorites: BTreeSet::new(),
            active_tab: View::Home,
        }
    }
}

impl AppSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `view`. A `None` id keeps the previous selection.
    #[must_use]
    pub fn navigate(&self, view: View, category_id: Option<&str>, map_id: Option<&str>) -> Self {
        let mut next = self.clone();
        next.current_view = view;
        if let Some(id) = category_id {
            next.selected_category_id = Some(id.to_string());
        }
        if let Some(id) = map_id {
            next.selected_map_id = Some(id.to_string());
        }
        if view.is_tab() {
            next.active_tab = view;
        }
        next
    }

    #[must_use]
    pub fn toggle_favorite(&self, map_id: &str) -> Self {
        let mut next = self.clone();
        if !next.favorites.remove(map_id) {
            next.favorites.insert(map_id.to_string());
        }
        next
    }

    /// Record `map_id` as unlocked. Unlocking twice is a no-op.
    #[must_use]
    pub fn unlock(&self, map_id: &str) -> Self {
        let mut next = self.clone();
        next.unlocked.insert(map_id.to_string());
        next
    }

    /// Apply a gate outcome for `map_id`; only an unlock changes anything.
    #[must_use]
    pub fn apply_gate_outcome(&self, map_id: &str, outcome: GateOutcome) -> Self {
        if outcome.is_unlock() {
            self.unlock(map_id)
        } else {
            self.clone()
        }
    }

    #[must_use]
    pub fn is_unlocked(&self, map_id: &str) -> bool {
        self.unlocked.contains(map_id)
    }

    #[must_use]
    pub fn is_favorite(&self, map_id: &str) -> bool {
        self.favorites.contains(map_id)
    }

    #[must_use]
    pub const fn unlocked(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    #[must_use]
    pub const fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    #[must_use]
    pub const fn shows_bottom_nav(&self) -> bool {
        self.current_view.shows_bottom_nav()
    }

    /// The selected map, looked up in `maps`.
    #[must_use]
    pub fn selected_map<'a>(&self, maps: &'a [MapEntry]) -> Option<&'a MapEntry> {
        let id = self.selected_map_id.as_deref()?;
        maps.iter().find(|m| m.id == id)
    }

    /// Known maps whose id is favorited, in catalog order.
    #[must_use]
    pub fn favorite_maps<'a>(&self, maps: &'a [MapEntry]) -> Vec<&'a MapEntry> {
        maps.iter().filter(|m| self.is_favorite(&m.id)).collect()
    }
}
