use wowmaps_core::{CatalogReader, CatalogStore, Category, MapEntry, SeedCatalog};
#[cfg(any(target_arch = "wasm32", test))]
use yew::prelude::*;

#[cfg(any(target_arch = "wasm32", test))]
use crate::app::state::AppState;

/// Catalog shown by the home and search views: seed first, remote after.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedCatalog {
    pub categories: Vec<Category>,
    pub maps: Vec<MapEntry>,
}

/// Read both collections through the degrading reader and merge them behind the seed.
pub async fn load_catalog<S>(store: &S, seed: &SeedCatalog) -> LoadedCatalog
where
    S: CatalogStore + ?Sized,
{
    let reader = CatalogReader::new(store);
    let categories = seed.merge_categories(reader.categories().await);
    let maps = seed.merge_maps(reader.maps().await);
    log::info!(
        "Catalog ready: {} categories, {} maps",
        categories.len(),
        maps.len()
    );
    LoadedCatalog { categories, maps }
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Clone)]
pub struct CatalogHandles {
    categories: UseStateHandle<Vec<Category>>,
    maps: UseStateHandle<Vec<MapEntry>>,
    boot_ready: UseStateHandle<bool>,
}

#[cfg(any(target_arch = "wasm32", test))]
#[must_use]
pub fn handles_from_state(app_state: &AppState) -> CatalogHandles {
    CatalogHandles {
        categories: app_state.categories.clone(),
        maps: app_state.maps.clone(),
        boot_ready: app_state.boot_ready.clone(),
    }
}

#[cfg(any(target_arch = "wasm32", test))]
pub fn apply_catalog(handles: &CatalogHandles, loaded: LoadedCatalog) {
    handles.categories.set(loaded.categories);
    handles.maps.set(loaded.maps);
    handles.boot_ready.set(true);
}

/// Refresh the merged catalog, e.g. after leaving the admin console.
#[cfg(target_arch = "wasm32")]
pub fn refresh_catalog(app_state: &AppState) {
    let handles = handles_from_state(app_state);
    let store = app_state.services.store.clone();
    let seed = (*app_state.seed).clone();
    wasm_bindgen_futures::spawn_local(async move {
        apply_catalog(&handles, load_catalog(store.as_ref(), &seed).await);
    });
}

/// Load the catalog, hold the splash for the configured delay, then go home.
#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    use crate::app::state::NavAction;
    use gloo::timers::future::TimeoutFuture;
    use wowmaps_core::View;

    let handles = handles_from_state(app_state);
    let store = app_state.services.store.clone();
    let seed = (*app_state.seed).clone();
    let splash_ms = app_state.config.app.splash_ms;
    let nav = app_state.nav.clone();

    use_effect_with((), move |()| {
        wasm_bindgen_futures::spawn_local(async move {
            apply_catalog(&handles, load_catalog(store.as_ref(), &seed).await);
            TimeoutFuture::new(u32::try_from(splash_ms).unwrap_or(u32::MAX)).await;
            nav.dispatch(NavAction::go(View::Home));
        });
        || {}
    });
}
