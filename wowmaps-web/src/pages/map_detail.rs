use std::time::Duration;

use gloo::timers::future::TimeoutFuture;
use wowmaps_core::{AdConfig, GateOutcome, MapEntry};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::AdPlayer;
use crate::platform::clipboard::{copy_label, copy_text};
use crate::platform::{Services, clock};

pub const DETAIL_TAGS: [&str; 4] = ["Battle Royale", "Practice", "Competitive", "Creative"];

#[derive(Properties, Clone, PartialEq)]
pub struct MapDetailPageProps {
    pub map: Option<MapEntry>,
    pub unlocked: bool,
    pub favorite: bool,
    pub services: Services,
    pub ads: AdConfig,
    pub copy_confirm_ms: u64,
    pub on_back: Callback<()>,
    pub on_toggle_favorite: Callback<()>,
    pub on_gate_closed: Callback<GateOutcome>,
}

#[function_component(MapDetailPage)]
pub fn map_detail_page(props: &MapDetailPageProps) -> Html {
    let show_ad = use_state(|| false);
    let copied = use_state(|| false);

    let Some(map) = props.map.clone() else {
        return html! {
            <section class="map-detail h-full w-full flex items-center justify-center bg-[#E6F0FF]" role="alert">
                <p class="text-[#60A5FA] uppercase tracking-[0.3em] font-black animate-pulse text-[10px]">
                    { "Coordinate Retrieval Failed" }
                </p>
            </section>
        };
    };

    let on_watch = {
        let show_ad = show_ad.clone();
        Callback::from(move |_: MouseEvent| show_ad.set(true))
    };
    let on_gate_closed = {
        let show_ad = show_ad.clone();
        let on_gate_closed = props.on_gate_closed.clone();
        Callback::from(move |outcome: GateOutcome| {
            show_ad.set(false);
            on_gate_closed.emit(outcome);
        })
    };
    let on_copy = {
        let copied = copied.clone();
        let code = map.code.clone();
        let hold = clock::timer_ms(Duration::from_millis(props.copy_confirm_ms));
        Callback::from(move |_: MouseEvent| {
            let copied = copied.clone();
            let code = code.clone();
            spawn_local(async move {
                match copy_text(&code).await {
                    Ok(()) => {
                        crate::a11y::set_status("Code copied");
                        copied.set(true);
                        TimeoutFuture::new(hold).await;
                        copied.set(false);
                    }
                    Err(err) => log::warn!("Copy failed: {err}"),
                }
            });
        })
    };
    let on_back = props.on_back.reform(|_: MouseEvent| ());
    let on_favorite = props.on_toggle_favorite.reform(|_: MouseEvent| ());

    let access = if props.unlocked {
        html! {
            <div class="access-unlocked space-y-8 p-4">
                <div class="soft-in p-10 rounded-[2.5rem] flex flex-col items-center text-center">
                    <p class="text-[8px] text-[#60A5FA] font-black tracking-[0.5em] mb-4 uppercase">{ "Downlink Secured" }</p>
                    <p class="map-code text-3xl font-mono tracking-[0.2em] text-[#1E3A8A] font-black select-all">{ &map.code }</p>
                </div>
                <button id="copy-code" class="w-full py-5 soft-button rounded-2xl text-[#1E3A8A] font-black text-[10px] tracking-[0.2em] uppercase" onclick={on_copy}>
                    { copy_label(*copied) }
                </button>
            </div>
        }
    } else {
        html! {
            <div class="access-locked p-8 flex flex-col items-center space-y-8">
                <div class="w-20 h-20 soft-in rounded-[2rem] flex items-center justify-center text-3xl" aria-hidden="true">{ "\u{1F512}" }</div>
                <div class="text-center">
                    <h3 class="text-[#1E3A8A] font-black text-lg tracking-widest mb-2 uppercase">{ "HERE IS CODE" }</h3>
                    <p class="text-[#60A5FA] text-[10px] uppercase font-black tracking-widest">{ "CLICK HERE TO WATCH CODE" }</p>
                </div>
                <button id="watch-code" class="soft-button w-full py-5 rounded-[1.5rem] text-[#1E3A8A] font-black text-xs tracking-widest uppercase" onclick={on_watch}>
                    { "\u{25B6} WATCH CODE" }
                </button>
            </div>
        }
    };

    html! {
        <section class="map-detail h-full w-full bg-[#E6F0FF] flex flex-col" data-map-id={map.id.clone()}>
            <div class="relative h-80 w-full overflow-hidden shrink-0">
                <img src={map.thumbnail.clone()} alt={map.title.clone()} class="w-full h-full object-cover opacity-80" />
                <button id="detail-back" class="absolute top-8 left-8 w-12 h-12 soft-button rounded-2xl" aria-label="Back" onclick={on_back}>
                    { "\u{2039}" }
                </button>
                <button
                    id="toggle-favorite"
                    class="absolute top-8 right-8 w-12 h-12 soft-button rounded-2xl"
                    aria-label="Favorite"
                    aria-pressed={props.favorite.to_string()}
                    onclick={on_favorite}
                >
                    { if props.favorite { "\u{2665}" } else { "\u{2661}" } }
                </button>
                <div class="absolute bottom-8 left-8 right-8">
                    <span class="text-[8px] soft-out px-3 py-1 rounded-full text-[#60A5FA] font-black tracking-widest uppercase">{ "TACTICAL DATA" }</span>
                    <h1 class="text-3xl font-bold text-[#1E3A8A] leading-tight uppercase tracking-tight mt-3">{ &map.title }</h1>
                </div>
            </div>

            <div class="p-8 space-y-10 flex-1 pb-32">
                <div class="space-y-4">
                    <h2 class="text-[10px] font-black text-[#60A5FA] uppercase tracking-[0.4em]">{ "Description" }</h2>
                    <div class="soft-in p-8 rounded-[2.5rem]">
                        <p class="text-[#1E3A8A] text-sm leading-relaxed font-medium">{ &map.description }</p>
                    </div>
                </div>
                <div class="space-y-6">
                    <h2 class="text-[10px] font-black text-[#60A5FA] uppercase tracking-[0.4em]">{ "Access Matrix" }</h2>
                    <div class="soft-out rounded-[3rem] p-4">{ access }</div>
                </div>
                <div class="grid grid-cols-2 gap-4">
                    { for DETAIL_TAGS.iter().map(|tag| html! {
                        <div key={*tag} class="soft-in p-5 rounded-[1.5rem]">
                            <span class="text-[9px] text-[#60A5FA] font-black uppercase tracking-widest">{ *tag }</span>
                        </div>
                    }) }
                </div>
            </div>

            if *show_ad {
                <AdPlayer
                    map_id={map.id.clone()}
                    services={props.services.clone()}
                    ads={props.ads.clone()}
                    on_close={on_gate_closed}
                />
            }
        </section>
    }
}
