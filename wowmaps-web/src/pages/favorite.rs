use wowmaps_core::MapEntry;
use yew::prelude::*;

use crate::components::MapRow;

#[derive(Properties, Clone, PartialEq)]
pub struct FavoritePageProps {
    /// Favorited maps in catalog order, `None` until the catalog has loaded.
    pub maps: Option<Vec<MapEntry>>,
    pub on_select_map: Callback<String>,
}

#[function_component(FavoritePage)]
pub fn favorite_page(props: &FavoritePageProps) -> Html {
    let body = match &props.maps {
        None => html! {
            <div class="flex flex-col items-center justify-center py-20" aria-busy="true">
                <p class="text-[10px] text-[#60A5FA] font-black uppercase tracking-[0.4em]">{ "Decrypting Data..." }</p>
            </div>
        },
        Some(maps) if maps.is_empty() => html! {
            <div class="flex flex-col items-center justify-center py-24 text-center space-y-2 opacity-40">
                <p class="text-[#1E3A8A] font-bold uppercase tracking-[0.2em] text-xs">{ "Favorites Isolated" }</p>
                <p class="text-[9px] text-[#60A5FA] uppercase font-black tracking-widest">{ "No tactical data stored in memory" }</p>
            </div>
        },
        Some(maps) => html! {
            <div class="space-y-6">
                { for maps.iter().map(|map| html! {
                    <MapRow
                        key={map.id.clone()}
                        map={map.clone()}
                        caption="Authorized"
                        on_select={props.on_select_map.clone()}
                    />
                }) }
            </div>
        },
    };

    html! {
        <section class="favorites w-full p-8 pb-32 flex flex-col">
            <div class="mb-10 mt-4 text-center">
                <h1 class="text-3xl font-bold text-[#1E3A8A] tracking-tight uppercase">
                    { "SECURE " }<span class="text-[#60A5FA]">{ "FAVORITES" }</span>
                </h1>
                <p class="text-[#60A5FA] text-[10px] uppercase font-black tracking-[0.3em] mt-2">{ "Restricted access coordinates" }</p>
            </div>
            { body }
        </section>
    }
}
