use futures::executor::block_on;
use wowmaps_core::seed::PRACTICE_MAP_ID;
use wowmaps_core::{AdConfig, AppConfig, MapEntry, SeedCatalog};
use wowmaps_web::pages::explore::{ExploreView, ExploreViewProps};
use wowmaps_web::pages::favorite::FavoritePageProps;
use wowmaps_web::pages::home::HomePageProps;
use wowmaps_web::pages::map_detail::MapDetailPageProps;
use wowmaps_web::pages::map_list::{MapListPageProps, MapListView, MapListViewProps};
use wowmaps_web::pages::{FavoritePage, HomePage, MapDetailPage, MapListPage, SplashPage};
use wowmaps_web::platform::Services;
use yew::{AttrValue, Callback, LocalServerRenderer};

fn seed() -> SeedCatalog {
    SeedCatalog::load_from_static()
}

fn practice_map() -> MapEntry {
    seed()
        .maps
        .into_iter()
        .find(|m| m.id == PRACTICE_MAP_ID)
        .unwrap()
}

#[test]
fn splash_shows_the_uplink_banner() {
    let html = block_on(LocalServerRenderer::<SplashPage>::new().render());
    assert!(html.contains("SECURE UPLINK"));
    assert!(html.contains("Authorized Access Protocol"));
}

#[test]
fn home_lists_seed_categories_first() {
    let seed = seed();
    let props = HomePageProps {
        categories: seed.categories.clone(),
        on_select_category: Callback::noop(),
        on_admin: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    assert!(html.contains("Tactical Global Network"));
    assert!(html.contains(&seed.categories[0].title));
    assert!(html.contains("admin-crown"));
    assert!(!html.contains("Syncing database..."));
}

#[test]
fn home_without_categories_shows_sync_placeholder() {
    let props = HomePageProps {
        categories: Vec::new(),
        on_select_category: Callback::noop(),
        on_admin: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    assert!(html.contains("Syncing database..."));
}

#[test]
fn category_list_scans_before_results_arrive() {
    let seed = seed();
    let props = MapListPageProps {
        category_id: AttrValue::from("practice_cat"),
        category: seed.categories.first().cloned(),
        services: Services::offline(&seed),
        seed: seed.clone(),
        on_back: Callback::noop(),
        on_select_map: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MapListPage>::with_props(props).render());
    assert!(html.contains("Scanning..."));
    assert!(html.contains("Search localized database..."));
}

#[test]
fn category_list_counts_filtered_units() {
    let map = practice_map();
    let view = |query: &'static str| MapListViewProps {
        title: AttrValue::from("Practice"),
        maps: Some(vec![map.clone()]),
        query: AttrValue::from(query),
        on_query: Callback::noop(),
        on_back: Callback::noop(),
        on_select_map: Callback::noop(),
    };
    let all = block_on(LocalServerRenderer::<MapListView>::with_props(view("")).render());
    assert!(all.contains("1 Units Identified"));
    assert!(all.contains(&map.title));

    let none = block_on(
        LocalServerRenderer::<MapListView>::with_props(view("zzzz-no-match")).render(),
    );
    assert!(none.contains("0 Units Identified"));
    assert!(none.contains("Signal Lost: No Data"));
}

#[test]
fn explore_reports_empty_search() {
    let props = ExploreViewProps {
        maps: Some(seed().maps),
        query: AttrValue::from("zzzz-no-match"),
        on_query: Callback::noop(),
        on_select_map: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ExploreView>::with_props(props).render());
    assert!(html.contains("GLOBAL"));
    assert!(html.contains("No Signal Found"));
}

#[test]
fn favorites_show_loading_empty_and_listed_states() {
    let render = |maps| {
        block_on(
            LocalServerRenderer::<FavoritePage>::with_props(FavoritePageProps {
                maps,
                on_select_map: Callback::noop(),
            })
            .render(),
        )
    };
    assert!(render(None).contains("Decrypting Data..."));
    assert!(render(Some(Vec::new())).contains("Favorites Isolated"));
    let listed = render(Some(vec![practice_map()]));
    assert!(listed.contains("Authorized"));
    assert!(listed.contains(PRACTICE_MAP_ID));
}

fn detail(map: Option<MapEntry>, unlocked: bool) -> String {
    let props = MapDetailPageProps {
        map,
        unlocked,
        favorite: false,
        services: Services::offline(&seed()),
        ads: AdConfig::default(),
        copy_confirm_ms: AppConfig::default().app.copy_confirm_ms,
        on_back: Callback::noop(),
        on_toggle_favorite: Callback::noop(),
        on_gate_closed: Callback::noop(),
    };
    block_on(LocalServerRenderer::<MapDetailPage>::with_props(props).render())
}

#[test]
fn locked_detail_hides_the_code() {
    let map = practice_map();
    let html = detail(Some(map.clone()), false);
    assert!(html.contains("WATCH CODE"));
    assert!(html.contains("Access Matrix"));
    assert!(!html.contains(&map.code));
    assert!(!html.contains("gate-overlay"));
}

#[test]
fn unlocked_detail_offers_copy() {
    let map = practice_map();
    let html = detail(Some(map.clone()), true);
    assert!(html.contains(&map.code));
    assert!(html.contains("Downlink Secured"));
    assert!(html.contains("COPY CODE"));
    assert!(!html.contains("WATCH CODE"));
}

#[test]
fn missing_map_reports_retrieval_failure() {
    assert!(detail(None, false).contains("Coordinate Retrieval Failed"));
}
