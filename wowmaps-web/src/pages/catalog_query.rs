//! Map lists fetched by the category and explore pages.
use wowmaps_core::{CatalogReader, CatalogStore, MapEntry, SeedCatalog};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::platform::Services;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapScope {
    All,
    Category(String),
}

/// Read maps for `scope` and put the bundled ones first. Store failures
/// degrade to the bundled maps alone.
pub async fn fetch_maps<S>(store: &S, seed: &SeedCatalog, scope: &MapScope) -> Vec<MapEntry>
where
    S: CatalogStore + ?Sized,
{
    let reader = CatalogReader::new(store);
    match scope {
        MapScope::All => seed.merge_maps(reader.maps().await),
        MapScope::Category(id) => seed.merge_category_maps(id, reader.maps_by_category(id).await),
    }
}

/// Maps for `scope`, or `None` while the first read is in flight.
#[hook]
pub fn use_maps(services: &Services, seed: &SeedCatalog, scope: MapScope) -> Option<Vec<MapEntry>> {
    let maps = use_state(|| None::<Vec<MapEntry>>);
    let generation = use_mut_ref(|| 0_u32);
    {
        let maps = maps.clone();
        let store = services.store.clone();
        let seed = seed.clone();
        use_effect_with(scope, move |scope| {
            let ticket = {
                let mut current = generation.borrow_mut();
                *current = current.wrapping_add(1);
                *current
            };
            maps.set(None);
            let scope = scope.clone();
            spawn_local(async move {
                let fetched = fetch_maps(store.as_ref(), &seed, &scope).await;
                if *generation.borrow() == ticket {
                    maps.set(Some(fetched));
                }
            });
        });
    }
    (*maps).clone()
}
