//! Local catalog bundled with the app.
//!
//! The seed is shown before the remote catalog answers and stays listed ahead
//! of remote records afterwards.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Category, MapEntry};

const DEFAULT_SEED_DATA: &str = include_str!("../../wowmaps-web/static/assets/data/catalog.json");

/// Id of the bundled practice category.
pub const PRACTICE_CATEGORY_ID: &str = "practice_cat";
/// Id of the bundled practice map.
pub const PRACTICE_MAP_ID: &str = "test_map_001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub maps: Vec<MapEntry>,
}

impl SeedCatalog {
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_SEED_DATA).unwrap_or_else(|err| {
            log::warn!("Bundled catalog unreadable: {err}");
            Self::default()
        })
    }

    /// Seed categories followed by remote ones whose id is not already seeded.
    #[must_use]
    pub fn merge_categories(&self, remote: Vec<Category>) -> Vec<Category> {
        merge_local_first(&self.categories, remote, |c| c.id.as_str())
    }

    /// Seed maps followed by remote ones whose id is not already seeded.
    #[must_use]
    pub fn merge_maps(&self, remote: Vec<MapEntry>) -> Vec<MapEntry> {
        merge_local_first(&self.maps, remote, |m| m.id.as_str())
    }

    /// Seeded maps belonging to `category_id`.
    #[must_use]
    pub fn maps_in(&self, category_id: &str) -> Vec<MapEntry> {
        self.maps
            .iter()
            .filter(|m| m.category_id == category_id)
            .cloned()
            .collect()
    }

    /// Seeded maps of `category_id` followed by the remote maps of that category.
    #[must_use]
    pub fn merge_category_maps(&self, category_id: &str, remote: Vec<MapEntry>) -> Vec<MapEntry> {
        let remote = remote
            .into_iter()
            .filter(|m| m.category_id == category_id)
            .collect();
        merge_local_first(&self.maps_in(category_id), remote, |m| m.id.as_str())
    }
}

fn merge_local_first<T: Clone>(local: &[T], remote: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let seen: HashSet<String> = local.iter().map(|item| id(item).to_string()).collect();
    let mut merged = local.to_vec();
    merged.extend(remote.into_iter().filter(|item| !seen.contains(id(item))));
    merged
}
