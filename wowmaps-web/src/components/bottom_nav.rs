use wowmaps_core::View;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub active: View,
    pub on_select: Callback<View>,
}

#[must_use]
pub const fn tab_label(view: View) -> &'static str {
    match view {
        View::Search => "Explore",
        View::Favorite => "Favorites",
        _ => "Home",
    }
}

#[function_component(BottomNav)]
pub fn bottom_nav(p: &Props) -> Html {
    html! {
        <nav class="bottom-nav fixed bottom-6 left-0 right-0 z-[100] flex justify-center px-6" aria-label="Primary">
            <div class="soft-out rounded-[2.5rem] p-2 flex w-full max-w-md items-center justify-between">
                { for View::TABS.into_iter().map(|tab| {
                    let active = tab == p.active;
                    let onclick = p.on_select.reform(move |_: MouseEvent| tab);
                    html! {
                        <button
                            id={format!("tab-{}", tab.as_str())}
                            class={classes!("flex-1", "py-2.5", "text-[8px]", "font-black", "uppercase",
                                if active { "text-[#1E3A8A] soft-in" } else { "text-[#60A5FA]" })}
                            aria-current={active.then_some("page")}
                            {onclick}
                        >
                            { tab_label(tab) }
                        </button>
                    }
                }) }
            </div>
        </nav>
    }
}
