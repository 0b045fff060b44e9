use wowmaps_core::{CountdownSample, GateMode};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub mode: GateMode,
    pub sample: CountdownSample,
    pub can_close: bool,
    pub sponsor_url: AttrValue,
    pub on_close: Callback<()>,
}

/// Header line above the countdown.
#[must_use]
pub fn headline(mode: GateMode, sample: &CountdownSample) -> String {
    match mode {
        GateMode::Finishing => "Reward Activated".to_string(),
        _ if sample.display_seconds() > 0 => format!("Reward in {}s", sample.display_seconds()),
        _ => "Processing...".to_string(),
    }
}

fn overlay(children: Html) -> Html {
    html! {
        <div class="gate-overlay fixed inset-0 z-[200] bg-[#E6F0FF] flex flex-col" role="dialog" aria-modal="true" aria-label="Rewarded transmission">
            { children }
        </div>
    }
}

/// Full-screen view of one gate; all state comes from the driver.
#[function_component(GateScreen)]
pub fn gate_screen(p: &Props) -> Html {
    let on_close = p.on_close.reform(|_: MouseEvent| ());
    match p.mode {
        GateMode::Closed => Html::default(),
        GateMode::Loading => overlay(html! {
            <div class="gate-loading flex-1 flex flex-col items-center justify-center p-8 text-center" aria-busy="true">
                <div class="w-24 h-24 soft-out rounded-[2.5rem] animate-spin mb-8"></div>
                <h2 class="text-xl font-bold text-[#1E3A8A] uppercase tracking-widest">{ "Initialising Ad" }</h2>
                <p class="text-[#60A5FA] text-[9px] font-black uppercase mt-2">{ "Connecting to Secure Stream..." }</p>
            </div>
        }),
        GateMode::Error => overlay(html! {
            <div class="gate-error flex-1 flex flex-col items-center justify-center p-8 text-center" role="alert">
                <h2 class="text-xl font-bold text-[#1E3A8A] uppercase">{ "Link Interrupted" }</h2>
                <button id="gate-close" class="mt-8 px-10 py-4 soft-button rounded-2xl font-black uppercase text-xs" onclick={on_close}>
                    { "Close Console" }
                </button>
            </div>
        }),
        GateMode::Active | GateMode::Finishing => {
            let finishing = p.mode == GateMode::Finishing;
            let percent = p.sample.percent();
            overlay(html! {
                <>
                    <header class="p-8 flex justify-between items-center border-b border-white/40">
                        <div>
                            <span class="gate-headline block text-[#1E3A8A] text-[10px] font-black uppercase">
                                { headline(p.mode, &p.sample) }
                            </span>
                            <span class="text-[8px] text-[#60A5FA] font-bold uppercase">{ "Data Transmission" }</span>
                        </div>
                        if p.can_close {
                            <button id="gate-close" class="w-10 h-10 soft-button rounded-xl" aria-label="Close" onclick={on_close}>
                                { "\u{2715}" }
                            </button>
                        }
                    </header>
                    <section class="flex-1 flex flex-col items-center justify-center p-8">
                        <div class="soft-out w-full max-w-sm rounded-[3rem] p-8 text-center space-y-4">
                            <h3 class="text-[#1E3A8A] font-bold text-lg uppercase">{ "Sponsor Transmission" }</h3>
                            <p class="text-[10px] text-[#60A5FA]">
                                { "Uplink in progress. Please maintain connection to receive tactical data coordinates." }
                            </p>
                            <a href={p.sponsor_url.clone()} target="_blank" rel="noopener" class="block w-full py-4 soft-button rounded-2xl font-black text-[10px] uppercase">
                                { "Learn More" }
                            </a>
                        </div>
                    </section>
                    <footer class="p-10 space-y-6">
                        <div class="flex justify-between text-[9px] font-black uppercase">
                            <span class="text-[#60A5FA]">{ "Uplink Status" }</span>
                            <span class="text-[#1E3A8A]">{ format!("{percent}%") }</span>
                        </div>
                        <div
                            class="w-full h-4 soft-in rounded-full p-1 overflow-hidden"
                            role="progressbar"
                            aria-valuemin="0"
                            aria-valuemax="100"
                            aria-valuenow={percent.to_string()}
                        >
                            <div
                                class={classes!("h-full", "rounded-full", if finishing { "bg-emerald-400" } else { "bg-[#60A5FA]" })}
                                style={format!("width: {percent}%")}
                            ></div>
                        </div>
                        <p class="text-center text-[10px] font-black uppercase">
                            { if finishing { "Coordinates Unlocked" } else { "Securing Tactical Protocol..." } }
                        </p>
                    </footer>
                </>
            })
        }
    }
}
