use wowmaps_core::MapEntry;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub map: MapEntry,
    pub on_select: Callback<String>,
    /// Replaces the description line in the compact row.
    #[prop_or_default]
    pub caption: Option<AttrValue>,
}

fn select(p: &Props) -> Callback<MouseEvent> {
    let id = p.map.id.clone();
    p.on_select.reform(move |_| id.clone())
}

/// Grid card used by the category list.
#[function_component(MapTile)]
pub fn map_tile(p: &Props) -> Html {
    html! {
        <button
            class="map-tile soft-button rounded-[2.5rem] overflow-hidden p-6 flex flex-col gap-5 text-left"
            data-map-id={p.map.id.clone()}
            onclick={select(p)}
        >
            <div class="w-full h-48 soft-in rounded-3xl overflow-hidden border-4 border-[#E6F0FF]">
                <img src={p.map.thumbnail.clone()} alt={p.map.title.clone()} class="w-full h-full object-cover" loading="lazy" />
            </div>
            <h3 class="text-lg font-bold text-[#1E3A8A] uppercase tracking-wide truncate">{ &p.map.title }</h3>
            <p class="text-xs text-[#60A5FA] line-clamp-2 italic">{ &p.map.description }</p>
            <div class="flex items-center justify-between">
                <span class="text-[9px] soft-in px-4 py-1.5 rounded-full text-[#60A5FA] font-black uppercase">{ "Tactical" }</span>
                <span class="text-[#1E3A8A] text-[10px] font-black uppercase">{ "View Code \u{203A}" }</span>
            </div>
        </button>
    }
}

/// Compact row used by search and favorites.
#[function_component(MapRow)]
pub fn map_row(p: &Props) -> Html {
    let caption = p
        .caption
        .clone()
        .unwrap_or_else(|| AttrValue::from(p.map.description.clone()));
    html! {
        <button
            class="map-row soft-button rounded-[2.5rem] p-4 flex w-full items-center gap-5 text-left"
            data-map-id={p.map.id.clone()}
            onclick={select(p)}
        >
            <img src={p.map.thumbnail.clone()} alt="" class="w-16 h-16 soft-in rounded-3xl object-cover shrink-0" loading="lazy" />
            <span class="flex-1 min-w-0">
                <span class="block text-sm font-bold text-[#1E3A8A] uppercase truncate">{ &p.map.title }</span>
                <span class="block text-[10px] text-[#60A5FA] truncate">{ caption }</span>
            </span>
            <span class="text-[#60A5FA]" aria-hidden="true">{ "\u{203A}" }</span>
        </button>
    }
}
