use wowmaps_core::{Category, MapEntry, SeedCatalog, filter_maps};
use yew::prelude::*;

use super::catalog_query::{MapScope, use_maps};
use crate::components::{MapTile, SearchBox};
use crate::platform::Services;

#[derive(Properties, Clone, PartialEq)]
pub struct MapListPageProps {
    pub category_id: AttrValue,
    #[prop_or_default]
    pub category: Option<Category>,
    pub services: Services,
    pub seed: SeedCatalog,
    pub on_back: Callback<()>,
    pub on_select_map: Callback<String>,
}

/// Maps of one category, fetched on entry and filtered locally.
#[function_component(MapListPage)]
pub fn map_list_page(props: &MapListPageProps) -> Html {
    let maps = use_maps(
        &props.services,
        &props.seed,
        MapScope::Category(props.category_id.to_string()),
    );
    let query = use_state(String::new);
    let on_query = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };
    let title = props
        .category
        .as_ref()
        .map_or_else(|| AttrValue::from("Data Sector"), |c| AttrValue::from(c.title.clone()));

    html! {
        <MapListView
            {title}
            {maps}
            query={AttrValue::from((*query).clone())}
            {on_query}
            on_back={props.on_back.clone()}
            on_select_map={props.on_select_map.clone()}
        />
    }
}

#[derive(Properties, Clone, PartialEq)]
pub struct MapListViewProps {
    pub title: AttrValue,
    /// `None` while loading.
    pub maps: Option<Vec<MapEntry>>,
    pub query: AttrValue,
    pub on_query: Callback<String>,
    pub on_back: Callback<()>,
    pub on_select_map: Callback<String>,
}

#[function_component(MapListView)]
pub fn map_list_view(props: &MapListViewProps) -> Html {
    let visible = props
        .maps
        .as_deref()
        .map(|maps| filter_maps(maps, &props.query));
    let subtitle = visible
        .as_ref()
        .map_or_else(|| "Scanning...".to_string(), |v| format!("{} Units Identified", v.len()));
    let on_back = props.on_back.reform(|_: MouseEvent| ());

    let body = match &visible {
        None => html! {
            <div class="flex flex-col items-center justify-center py-20 gap-4" aria-busy="true">
                <p class="text-[10px] text-[#60A5FA] font-black uppercase tracking-widest">{ "Establishing Uplink..." }</p>
            </div>
        },
        Some(maps) if maps.is_empty() => html! {
            <div class="col-span-full text-center py-24 opacity-30">
                <p class="text-[#60A5FA] font-black uppercase tracking-[0.5em] text-sm">{ "Signal Lost: No Data" }</p>
            </div>
        },
        Some(maps) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8">
                { for maps.iter().map(|map| html! {
                    <MapTile key={map.id.clone()} map={(*map).clone()} on_select={props.on_select_map.clone()} />
                }) }
            </div>
        },
    };

    html! {
        <section class="map-list w-full p-6 pb-32">
            <header class="flex items-center gap-6 mb-12">
                <button id="list-back" class="w-14 h-14 soft-button rounded-2xl text-[#60A5FA]" aria-label="Back" onclick={on_back}>
                    { "\u{2039}" }
                </button>
                <div>
                    <h1 class="text-3xl font-bold text-[#1E3A8A] uppercase tracking-tight">{ props.title.clone() }</h1>
                    <p class="text-[#60A5FA] text-[10px] uppercase font-black tracking-[0.3em] mt-1">{ subtitle }</p>
                </div>
            </header>
            <div class="mb-12 max-w-md">
                <SearchBox
                    value={props.query.clone()}
                    placeholder="Search localized database..."
                    on_input={props.on_query.clone()}
                />
            </div>
            { body }
        </section>
    }
}
