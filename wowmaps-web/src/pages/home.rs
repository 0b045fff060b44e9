use std::time::Duration;

use wowmaps_core::Category;
use yew::prelude::*;

use crate::components::CategoryGlyph;

/// Taps on the crown needed to open the admin console.
pub const ADMIN_KNOCKS: u32 = 5;
/// Longest pause between two counted taps.
pub const ADMIN_KNOCK_WINDOW: Duration = Duration::from_millis(2_000);

const SHARE_URL: &str = "https://wa.me/?text=WOW%20MAPS%20-%20tactical%20map%20codes";

/// Counts rapid taps on the hidden admin entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdminKnock {
    count: u32,
    last_tap: Option<Duration>,
}

impl AdminKnock {
    /// Register a tap at `now`; returns `true` when the sequence completes.
    pub fn tap(&mut self, now: Duration) -> bool {
        let in_window = self
            .last_tap
            .is_some_and(|last| now.saturating_sub(last) <= ADMIN_KNOCK_WINDOW);
        self.count = if in_window { self.count + 1 } else { 1 };
        self.last_tap = Some(now);
        if self.count >= ADMIN_KNOCKS {
            *self = Self::default();
            return true;
        }
        false
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.count > 0
    }
}

#[derive(Properties, Clone, PartialEq)]
pub struct HomePageProps {
    pub categories: Vec<Category>,
    pub on_select_category: Callback<String>,
    pub on_admin: Callback<()>,
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    let knock = use_mut_ref(AdminKnock::default);
    let armed = use_state(|| false);

    let on_crown = {
        let knock = knock.clone();
        let armed = armed.clone();
        let on_admin = props.on_admin.clone();
        Callback::from(move |_: MouseEvent| {
            let opened = knock.borrow_mut().tap(crate::platform::clock::now());
            armed.set(knock.borrow().is_armed());
            if opened {
                on_admin.emit(());
            }
        })
    };

    let tiles = props.categories.iter().map(|cat| {
        let id = cat.id.clone();
        let onclick = props
            .on_select_category
            .reform(move |_: MouseEvent| id.clone());
        html! {
            <button
                key={cat.id.clone()}
                class="category-tile soft-button rounded-[2.5rem] p-8 flex flex-col items-center justify-center gap-4 text-center aspect-square"
                data-category-id={cat.id.clone()}
                {onclick}
            >
                <span class="w-16 h-16 soft-in rounded-[1.5rem] flex items-center justify-center text-[#60A5FA] text-2xl">
                    <CategoryGlyph icon={cat.icon.clone()} />
                </span>
                <span>
                    <span class="block text-sm font-bold text-[#1E3A8A] uppercase tracking-wider">{ &cat.title }</span>
                    <span class="text-[8px] font-black text-[#60A5FA] uppercase tracking-widest mt-1 block">{ "Initialize" }</span>
                </span>
            </button>
        }
    });

    html! {
        <section class="home w-full p-6 pb-40">
            <header class="flex justify-between items-center mb-12">
                <div>
                    <h1 class="text-4xl font-bold text-[#1E3A8A] tracking-tight">
                        { "WOW " }<span class="text-[#60A5FA]">{ "MAPS" }</span>
                    </h1>
                    <p class="text-[10px] font-black text-[#60A5FA] tracking-[0.4em] uppercase">{ "Tactical Global Network" }</p>
                </div>
                <button
                    id="admin-crown"
                    class={classes!("w-14", "h-14", "soft-button", "rounded-2xl", "text-2xl", armed.then_some("animate-pulse"))}
                    aria-label="Admin Access"
                    onclick={on_crown}
                >
                    { "\u{1F451}" }
                </button>
            </header>

            <h2 class="text-[11px] font-black text-[#60A5FA] tracking-[0.3em] uppercase mb-8">{ "Data Categories" }</h2>
            <div class="grid grid-cols-2 md:grid-cols-3 gap-6 mb-16">
                if props.categories.is_empty() {
                    <div class="col-span-full py-20 text-center opacity-40 italic text-[#60A5FA]">{ "Syncing database..." }</div>
                } else {
                    { for tiles }
                }
            </div>

            <div class="soft-out rounded-[3rem] p-10 flex flex-col items-center gap-6 text-center">
                <h3 class="text-xl font-bold text-[#1E3A8A] uppercase">{ "Expand the Network" }</h3>
                <p class="text-xs text-[#60A5FA] font-medium max-w-md uppercase tracking-wide">
                    { "Help the community grow by sharing this tactical coordinate database." }
                </p>
                <a
                    href={SHARE_URL}
                    target="_blank"
                    rel="noopener"
                    class="w-full max-w-xs py-5 soft-button rounded-2xl text-[#1E3A8A] font-black text-xs uppercase tracking-widest"
                >
                    { "Share via WhatsApp" }
                </a>
            </div>
        </section>
    }
}
