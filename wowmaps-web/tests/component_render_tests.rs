use futures::executor::block_on;
use std::time::Duration;
use wowmaps_core::{MapEntry, StatusKind, StatusMessage, View};
use wowmaps_web::components::{BottomNav, MapRow, MapTile, SearchBox, StatusToast};
use wowmaps_web::components::{bottom_nav, map_card, search_box, status_toast};
use yew::{AttrValue, Callback, LocalServerRenderer};

fn map() -> MapEntry {
    MapEntry {
        id: "m42".into(),
        category_id: "cat1".into(),
        title: "Box Fight Arena".into(),
        description: "Close quarters build battles".into(),
        thumbnail: "https://img.example/m42.png".into(),
        code: "1234-5678-9012".into(),
    }
}

#[test]
fn bottom_nav_marks_the_active_tab() {
    let props = bottom_nav::Props {
        active: View::Search,
        on_select: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<BottomNav>::with_props(props).render());
    assert!(html.contains("tab-home"));
    assert!(html.contains("tab-search"));
    assert!(html.contains("tab-favorite"));
    assert!(html.contains("Explore"));
    assert_eq!(html.matches("aria-current=\"page\"").count(), 1);
}

#[test]
fn map_cards_never_show_the_code() {
    let props = map_card::Props {
        map: map(),
        on_select: Callback::noop(),
        caption: None,
    };
    let tile = block_on(LocalServerRenderer::<MapTile>::with_props(props.clone()).render());
    assert!(tile.contains("Box Fight Arena"));
    assert!(tile.contains("View Code"));
    assert!(!tile.contains("1234-5678-9012"));

    let row = block_on(LocalServerRenderer::<MapRow>::with_props(props).render());
    assert!(row.contains("Close quarters build battles"));
    assert!(row.contains("data-map-id=\"m42\""));
}

#[test]
fn map_row_caption_replaces_description() {
    let props = map_card::Props {
        map: map(),
        on_select: Callback::noop(),
        caption: Some(AttrValue::from("Authorized")),
    };
    let row = block_on(LocalServerRenderer::<MapRow>::with_props(props).render());
    assert!(row.contains("Authorized"));
    assert!(!row.contains("Close quarters"));
}

#[test]
fn search_box_echoes_placeholder_and_value() {
    let props = search_box::Props {
        value: AttrValue::from("arena"),
        placeholder: AttrValue::from("Search Global Database..."),
        on_input: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<SearchBox>::with_props(props).render());
    assert!(html.contains("type=\"search\""));
    assert!(html.contains("Search Global Database..."));
}

#[test]
fn status_toast_uses_alert_role_for_errors() {
    let message = |kind| StatusMessage {
        text: "Operation Failed".into(),
        kind,
        expires_at: Duration::from_secs(3),
    };
    let error = block_on(
        LocalServerRenderer::<StatusToast>::with_props(status_toast::Props {
            message: Some(message(StatusKind::Error)),
        })
        .render(),
    );
    assert!(error.contains("role=\"alert\""));
    assert!(error.contains("Operation Failed"));

    let success = block_on(
        LocalServerRenderer::<StatusToast>::with_props(status_toast::Props {
            message: Some(message(StatusKind::Success)),
        })
        .render(),
    );
    assert!(success.contains("role=\"status\""));

    let empty = block_on(
        LocalServerRenderer::<StatusToast>::with_props(status_toast::Props { message: None })
            .render(),
    );
    assert!(!empty.contains("status-toast"));
}
