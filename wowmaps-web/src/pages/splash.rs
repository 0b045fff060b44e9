use yew::prelude::*;

#[function_component(SplashPage)]
pub fn splash_page() -> Html {
    html! {
        <section
            class="splash fixed inset-0 bg-[#E6F0FF] flex flex-col items-center justify-center p-8"
            aria-busy="true"
            aria-live="polite"
        >
            <div class="w-32 h-32 soft-out rounded-[3rem] flex items-center justify-center mb-10 text-5xl" aria-hidden="true">
                { "\u{1F5FA}" }
            </div>
            <h1 class="text-5xl font-bold text-[#1E3A8A] tracking-tight">
                { "WOW " }<span class="text-[#60A5FA]">{ "MAPS" }</span>
            </h1>
            <p class="text-[10px] font-black text-[#60A5FA] tracking-[0.5em] uppercase mt-3">{ "SECURE UPLINK" }</p>
            <div class="w-48 h-2 soft-in rounded-full mt-12 overflow-hidden">
                <div class="splash-bar h-full bg-[#60A5FA] rounded-full"></div>
            </div>
            <p class="text-[9px] font-black text-[#60A5FA] uppercase tracking-[0.4em] mt-4">{ "Syncing..." }</p>
            <footer class="absolute bottom-12 text-[8px] font-black text-[#60A5FA]/60 uppercase tracking-[0.5em]">
                { "Authorized Access Protocol" }
            </footer>
        </section>
    }
}
