use wowmaps_core::{MapEntry, SeedCatalog, filter_maps};
use yew::prelude::*;

use super::catalog_query::{MapScope, use_maps};
use crate::components::{MapRow, SearchBox};
use crate::platform::Services;

#[derive(Properties, Clone, PartialEq)]
pub struct ExplorePageProps {
    pub services: Services,
    pub seed: SeedCatalog,
    pub on_select_map: Callback<String>,
}

/// Every known map with a global search box.
#[function_component(ExplorePage)]
pub fn explore_page(props: &ExplorePageProps) -> Html {
    let maps = use_maps(&props.services, &props.seed, MapScope::All);
    let query = use_state(String::new);
    let on_query = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };
    html! {
        <ExploreView
            {maps}
            query={AttrValue::from((*query).clone())}
            {on_query}
            on_select_map={props.on_select_map.clone()}
        />
    }
}

#[derive(Properties, Clone, PartialEq)]
pub struct ExploreViewProps {
    pub maps: Option<Vec<MapEntry>>,
    pub query: AttrValue,
    pub on_query: Callback<String>,
    pub on_select_map: Callback<String>,
}

#[function_component(ExploreView)]
pub fn explore_view(props: &ExploreViewProps) -> Html {
    let filtered = props
        .maps
        .as_deref()
        .map(|maps| filter_maps(maps, &props.query));
    let body = match filtered {
        None => html! {
            <div class="flex flex-col items-center justify-center py-20" aria-busy="true">
                <p class="text-[10px] text-[#60A5FA] font-black uppercase tracking-[0.4em]">{ "Establishing Uplink..." }</p>
            </div>
        },
        Some(found) if found.is_empty() => html! {
            <div class="flex flex-col items-center justify-center py-24 text-center space-y-2 opacity-40">
                <p class="text-[#1E3A8A] font-bold uppercase tracking-[0.2em] text-xs">{ "No Signal Found" }</p>
                <p class="text-[9px] text-[#60A5FA] uppercase font-black tracking-widest">{ "Database entry not identified" }</p>
            </div>
        },
        Some(found) => html! {
            <div class="space-y-6">
                { for found.into_iter().map(|map| html! {
                    <MapRow key={map.id.clone()} map={map.clone()} on_select={props.on_select_map.clone()} />
                }) }
            </div>
        },
    };

    html! {
        <section class="explore w-full p-8 pb-32 flex flex-col">
            <div class="mb-10 mt-4 text-center">
                <h1 class="text-3xl font-bold text-[#1E3A8A] tracking-tight uppercase">
                    { "GLOBAL " }<span class="text-[#60A5FA]">{ "FEED" }</span>
                </h1>
                <p class="text-[#60A5FA] text-[10px] uppercase font-black tracking-[0.3em] mt-2">{ "Syncing all known coordinates" }</p>
            </div>
            <div class="mb-10">
                <SearchBox
                    value={props.query.clone()}
                    placeholder="Search Global Database..."
                    on_input={props.on_query.clone()}
                />
            </div>
            { body }
        </section>
    }
}
