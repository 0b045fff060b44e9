use std::time::Duration;

use futures::executor::block_on;

use wowmaps_core::admin::{DATABASE_UPDATED, MAP_DEPLOYED, passphrase_digest};
use wowmaps_core::seed::{PRACTICE_CATEGORY_ID, PRACTICE_MAP_ID};
use wowmaps_core::{
    AdminPanel, AdminTab, AppConfig, AppSnapshot, CatalogError, CatalogReader, CatalogStore,
    MemoryCatalog, ScriptedAssistant, SeedCatalog, View, filter_maps,
};

const NOW: Duration = Duration::from_secs(60);

fn admin_config() -> AppConfig {
    let mut cfg = AppConfig::load_from_static();
    cfg.admin.passphrase_sha256 = passphrase_digest("letmein");
    cfg
}

#[test]
fn boot_merges_seed_before_remote_records() {
    let seed = SeedCatalog::load_from_static();
    let remote = MemoryCatalog::with_seed(42);
    let remote_cat = block_on(remote.create_category(&wowmaps_core::CategoryDraft {
        title: "ZONE WARS".into(),
        ..Default::default()
    }))
    .unwrap();

    let reader = CatalogReader::new(&remote);
    let categories = seed.merge_categories(block_on(reader.categories()));
    assert_eq!(categories[0].id, PRACTICE_CATEGORY_ID);
    assert_eq!(categories.last().unwrap().id, remote_cat);

    remote.fail_with(Some(CatalogError::Network("offline".into())));
    let maps = seed.merge_maps(block_on(reader.maps()));
    assert_eq!(maps.len(), seed.maps.len());
    assert_eq!(maps[0].id, PRACTICE_MAP_ID);
}

#[test]
fn browse_search_and_favorite_flow() {
    let seed = SeedCatalog::load_from_static();
    let store = MemoryCatalog::from_seed_catalog(&seed);
    let reader = CatalogReader::new(&store);

    let snap = AppSnapshot::new()
        .navigate(View::Home, None, None)
        .navigate(View::List, Some(PRACTICE_CATEGORY_ID), None);
    let in_category = block_on(reader.maps_by_category(PRACTICE_CATEGORY_ID));
    assert_eq!(in_category.len(), 1);

    let all = block_on(reader.maps());
    assert_eq!(filter_maps(&all, "").len(), all.len());
    assert_eq!(filter_maps(&all, "nothing matches this").len(), 0);

    let snap = snap
        .navigate(View::Detail, None, Some(PRACTICE_MAP_ID))
        .toggle_favorite(PRACTICE_MAP_ID)
        .navigate(View::Favorite, None, None);
    assert_eq!(snap.active_tab, View::Favorite);
    let favorites = snap.favorite_maps(&all);
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].code, "9999-0000-1111");
    assert!(!snap.is_unlocked(PRACTICE_MAP_ID));
}

#[test]
fn admin_session_round_trip() {
    let store = MemoryCatalog::default();
    let mut panel = AdminPanel::new(&admin_config());
    assert!(panel.login("letmein", NOW).is_ok());
    block_on(panel.reload(&store, NOW)).unwrap();
    assert!(panel.categories().is_empty());

    panel.category_form.title = "SNIPER ALLEY".into();
    panel.set_category_icon("Target");
    block_on(panel.save_category(&store, NOW)).unwrap();
    assert_eq!(panel.status(NOW).unwrap().text, DATABASE_UPDATED);
    let category_id = panel.categories()[0].id.clone();
    assert_eq!(panel.categories()[0].icon, "Target");

    panel.select_tab(AdminTab::Maps);
    panel.map_form.category_id = category_id.clone();
    panel.map_form.title = "Rooftops".into();
    panel.map_form.code = "1234-5678-9012".into();
    panel.map_form.description = "tall".into();
    let assistant = ScriptedAssistant::new([Ok("Hold the high ground.".into())]);
    block_on(panel.run_briefing(Some(&assistant), NOW)).unwrap();
    block_on(panel.save_map(&store, NOW)).unwrap();
    assert_eq!(panel.status(NOW).unwrap().text, MAP_DEPLOYED);

    let maps = block_on(store.list_maps_by_category(&category_id)).unwrap();
    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].description, "Hold the high ground.");

    let rooftops = panel.maps()[0].clone();
    panel.edit_map(&rooftops);
    panel.map_form.code = "0000-0000-0000".into();
    block_on(panel.save_map(&store, NOW)).unwrap();
    let maps = block_on(store.list_maps()).unwrap();
    assert_eq!(maps[0].code, "0000-0000-0000");
    assert_eq!(maps[0].title, "Rooftops");

    block_on(panel.delete_category(&store, &category_id, NOW)).unwrap();
    assert!(panel.categories().is_empty());
    assert!(
        panel
            .status(NOW + Duration::from_millis(3_000))
            .is_none()
    );
}

#[test]
fn shipped_digest_rejects_the_empty_key() {
    let cfg = AppConfig::load_from_static();
    let mut panel = AdminPanel::new(&cfg);
    assert!(panel.login("", NOW).is_err());
    assert!(panel.login("wowmaps-admin", NOW).is_ok());
}
