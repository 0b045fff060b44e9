use wowmaps_core::{StatusKind, StatusMessage};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub message: Option<StatusMessage>,
}

#[function_component(StatusToast)]
pub fn status_toast(p: &Props) -> Html {
    let Some(message) = &p.message else {
        return Html::default();
    };
    let tone = match message.kind {
        StatusKind::Success => "status-success",
        StatusKind::Error => "status-error text-rose-500",
    };
    html! {
        <div
            class={classes!("status-toast", "fixed", "bottom-12", "left-1/2", "-translate-x-1/2",
                "px-8", "py-4", "soft-button", "rounded-full", "font-black", "text-[10px]", "uppercase", tone)}
            role={if message.kind == StatusKind::Error { "alert" } else { "status" }}
        >
            { &message.text }
        </div>
    }
}
