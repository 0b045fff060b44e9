use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub value: AttrValue,
    pub placeholder: AttrValue,
    pub on_input: Callback<String>,
}

#[function_component(SearchBox)]
pub fn search_box(p: &Props) -> Html {
    let oninput = p
        .on_input
        .reform(|e: InputEvent| e.target_unchecked_into::<HtmlInputElement>().value());
    html! {
        <label class="search-box relative block soft-in rounded-2xl">
            <span class="sr-only">{ p.placeholder.clone() }</span>
            <input
                type="search"
                class="w-full bg-transparent py-5 px-6 text-sm focus:outline-none text-[#1E3A8A]"
                value={p.value.clone()}
                placeholder={p.placeholder.clone()}
                {oninput}
            />
        </label>
    }
}
