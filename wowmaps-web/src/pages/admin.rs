use std::future::Future;

use gloo::timers::future::TimeoutFuture;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use wowmaps_core::admin::monetization_rows;
use wowmaps_core::model::CATEGORY_ICONS;
use wowmaps_core::{AdminPanel, AdminTab, AdminTask, AppConfig};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::{CategoryGlyph, StatusToast};
use crate::platform::{Services, clock};

#[derive(Properties, Clone, PartialEq)]
pub struct AdminPageProps {
    pub config: AppConfig,
    pub services: Services,
    pub on_back: Callback<()>,
    /// Start from an existing console state instead of the login form.
    #[prop_or_default]
    pub initial: Option<AdminPanel>,
}

/// Run `op` on a copy of the panel marked with `task` and publish the result
/// when it finishes. The panel refuses edits and other tasks until then, so
/// the published copy cannot drop input.
fn run_op<F, Fut>(panel: &UseStateHandle<AdminPanel>, task: AdminTask, op: F)
where
    F: FnOnce(AdminPanel) -> Fut,
    Fut: Future<Output = AdminPanel> + 'static,
{
    let mut started = (**panel).clone();
    if !started.begin_task(task) {
        return;
    }
    panel.set(started.clone());
    let work = op(started);
    let panel = panel.clone();
    spawn_local(async move {
        let mut done = work.await;
        done.end_task();
        panel.set(done);
    });
}

fn edit<E, R>(
    panel: &UseStateHandle<AdminPanel>,
    read: R,
    apply: fn(&mut AdminPanel, String),
) -> Callback<E>
where
    E: 'static,
    R: Fn(E) -> String + 'static,
{
    let panel = panel.clone();
    Callback::from(move |event: E| {
        if panel.is_busy() {
            return;
        }
        let mut next = (*panel).clone();
        apply(&mut next, read(event));
        panel.set(next);
    })
}

fn input_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn textarea_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlTextAreaElement>().value()
}

fn select_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

#[function_component(AdminPage)]
pub fn admin_page(props: &AdminPageProps) -> Html {
    let panel = {
        let (config, initial) = (props.config.clone(), props.initial.clone());
        use_state(move || initial.unwrap_or_else(|| AdminPanel::new(&config)))
    };
    let access_key = use_state(String::new);
    let refresh = use_force_update();

    let message = panel.status(clock::now()).cloned();
    {
        let expires_at = message.as_ref().map(|m| m.expires_at);
        use_effect_with(expires_at, move |at| {
            if let Some(at) = *at {
                let wait = clock::timer_ms(at.saturating_sub(clock::now()));
                spawn_local(async move {
                    TimeoutFuture::new(wait).await;
                    refresh.force_update();
                });
            }
        });
    }
    let on_back = props.on_back.reform(|_: MouseEvent| ());

    if !panel.is_authenticated() {
        let on_key = {
            let access_key = access_key.clone();
            Callback::from(move |e: InputEvent| access_key.set(input_value(e)))
        };
        let on_login = {
            let (panel, access_key) = (panel.clone(), access_key.clone());
            let store = props.services.store.clone();
            Callback::from(move |e: SubmitEvent| {
                e.prevent_default();
                let (store, entered) = (store.clone(), (*access_key).clone());
                run_op(&panel, AdminTask::Write, move |mut p| async move {
                    if p.login(&entered, clock::now()).is_ok() {
                        _ = p.reload(store.as_ref(), clock::now()).await;
                    }
                    p
                });
            })
        };
        return html! {
            <section class="admin-login absolute inset-0 flex items-center justify-center p-8 bg-[#E6F0FF]">
                <div class="w-full max-w-xs space-y-10 text-center">
                    <div class="w-24 h-24 soft-out rounded-[2.5rem] flex items-center justify-center mx-auto text-4xl" aria-hidden="true">{ "\u{1F512}" }</div>
                    <h1 class="text-2xl font-bold text-[#1E3A8A] uppercase tracking-widest">{ "Admin Uplink" }</h1>
                    <form class="space-y-6" onsubmit={on_login}>
                        <div class="soft-in rounded-2xl p-1">
                            <input
                                id="access-key"
                                type="password"
                                aria-label="Access key"
                                class="w-full bg-transparent p-4 text-center text-[#1E3A8A] focus:outline-none font-bold"
                                placeholder="Access Key..."
                                value={(*access_key).clone()}
                                oninput={on_key}
                            />
                        </div>
                        <button type="submit" class="w-full py-5 soft-button rounded-2xl text-[#1E3A8A] font-black uppercase text-xs tracking-widest" disabled={panel.is_busy()}>
                            { "Establish Link" }
                        </button>
                        <button type="button" class="text-[#60A5FA] text-[10px] uppercase font-black tracking-widest" onclick={on_back}>
                            { "Return to Base" }
                        </button>
                    </form>
                </div>
                <StatusToast {message} />
            </section>
        };
    }

    let tabs = AdminTab::ALL.into_iter().map(|tab| {
        let panel = panel.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            let mut next = (*panel).clone();
            next.select_tab(tab);
            panel.set(next);
        });
        let active = panel.tab() == tab;
        html! {
            <button
                key={tab.label()}
                id={format!("admin-tab-{}", tab.label())}
                class={classes!("flex-1", "py-2.5", "rounded-xl", "text-[8px]", "font-black", "uppercase",
                    if active { "soft-button text-[#1E3A8A]" } else { "text-[#60A5FA]" })}
                aria-pressed={active.to_string()}
                disabled={panel.is_busy()}
                {onclick}
            >
                { tab.label() }
            </button>
        }
    });

    let body = match panel.tab() {
        AdminTab::Categories => categories_tab(&panel, &props.services),
        AdminTab::Maps => maps_tab(&panel, &props.services),
        AdminTab::Monetization => monetization_tab(&props.config),
    };

    html! {
        <section class="admin-console absolute inset-0 flex flex-col bg-[#E6F0FF] overflow-hidden">
            <header class="p-8 space-y-8 border-b border-white/20">
                <div class="flex items-center justify-between">
                    <div class="flex items-center gap-4">
                        <button id="admin-back" class="w-10 h-10 soft-button rounded-xl text-[#60A5FA]" aria-label="Back" onclick={on_back}>
                            { "\u{2039}" }
                        </button>
                        <h1 class="text-xl font-bold text-[#1E3A8A] uppercase">{ "Console" }</h1>
                    </div>
                    if panel.task() == Some(AdminTask::Write) {
                        <span class="admin-busy text-[#60A5FA] animate-spin" aria-label="Working">{ "\u{25CC}" }</span>
                    }
                </div>
                <div class="flex gap-2 p-1.5 soft-in rounded-[1.2rem]" role="group" aria-label="Console sections">
                    { for tabs }
                </div>
            </header>
            <div class="flex-1 overflow-y-scroll p-8">
                <div class="space-y-12 pb-40">{ body }</div>
            </div>
            <StatusToast {message} />
        </section>
    }
}

fn categories_tab(panel: &UseStateHandle<AdminPanel>, services: &Services) -> Html {
    let form = &panel.category_form;
    let locked = panel.is_busy();
    let on_save = {
        let (panel, store) = (panel.clone(), services.store.clone());
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            run_op(&panel, AdminTask::Write, move |mut p| async move {
                _ = p.save_category(store.as_ref(), clock::now()).await;
                p
            });
        })
    };
    let icons = CATEGORY_ICONS.into_iter().map(|icon| {
        let panel = panel.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            let mut next = (*panel).clone();
            next.set_category_icon(icon);
            panel.set(next);
        });
        let chosen = form.icon == icon;
        html! {
            <button
                key={icon}
                type="button"
                class={classes!("w-12", "h-12", "rounded-xl", if chosen { "soft-in" } else { "soft-button" })}
                aria-label={icon}
                aria-pressed={chosen.to_string()}
                {onclick}
            >
                <CategoryGlyph icon={icon} />
            </button>
        }
    });
    let rows = panel.categories().iter().map(|cat| {
        let on_edit = {
            let (panel, cat) = (panel.clone(), cat.clone());
            Callback::from(move |_: MouseEvent| {
                let mut next = (*panel).clone();
                next.edit_category(&cat);
                panel.set(next);
            })
        };
        let on_delete = {
            let (panel, store, id) = (panel.clone(), services.store.clone(), cat.id.clone());
            Callback::from(move |_: MouseEvent| {
                let (store, id) = (store.clone(), id.clone());
                run_op(&panel, AdminTask::Write, move |mut p| async move {
                    _ = p.delete_category(store.as_ref(), &id, clock::now()).await;
                    p
                });
            })
        };
        html! {
            <div key={cat.id.clone()} class="admin-row soft-out p-4 rounded-[2rem] flex items-center justify-between">
                <span class="text-xs font-bold text-[#1E3A8A] uppercase ml-2">{ &cat.title }</span>
                <div class="flex gap-2">
                    <button class="p-3 soft-button rounded-xl text-[#60A5FA]" aria-label={format!("Edit {}", cat.title)} onclick={on_edit}>{ "\u{270E}" }</button>
                    <button class="p-3 soft-button rounded-xl text-rose-400" aria-label={format!("Delete {}", cat.title)} onclick={on_delete}>{ "\u{2716}" }</button>
                </div>
            </div>
        }
    });

    html! {
        <div class="space-y-8">
            <fieldset class="soft-out p-8 rounded-[3rem] space-y-5" disabled={locked} aria-busy={locked.to_string()}>
                <h2 class="text-[10px] font-black text-[#60A5FA] uppercase tracking-[0.4em]">
                    { if panel.editing_id().is_some() { "Edit Category" } else { "New Category" } }
                </h2>
                <div class="space-y-4">
                    <div class="soft-in rounded-2xl p-1">
                        <input class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" placeholder="Title..."
                            value={form.title.clone()} oninput={edit(panel, input_value, |p, v| p.category_form.title = v)} />
                    </div>
                    <div class="flex gap-2 justify-between">{ for icons }</div>
                    <div class="soft-in rounded-2xl p-1">
                        <input class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" placeholder="Image URL..."
                            value={form.image.clone()} oninput={edit(panel, input_value, |p, v| p.category_form.image = v)} />
                    </div>
                </div>
                <button id="save-category" class="w-full py-4 soft-button rounded-2xl text-[#1E3A8A] font-black uppercase text-[10px] tracking-widest"
                    onclick={on_save}>
                    { if panel.editing_id().is_some() { "Update" } else { "Initialize" } }
                </button>
            </fieldset>
            <fieldset class="space-y-4" disabled={locked}>{ for rows }</fieldset>
        </div>
    }
}

fn maps_tab(panel: &UseStateHandle<AdminPanel>, services: &Services) -> Html {
    let form = &panel.map_form;
    let locked = panel.is_busy();
    let briefing = panel.task() == Some(AdminTask::Briefing);
    let on_save = {
        let (panel, store) = (panel.clone(), services.store.clone());
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            run_op(&panel, AdminTask::Write, move |mut p| async move {
                _ = p.save_map(store.as_ref(), clock::now()).await;
                p
            });
        })
    };
    let on_briefing = {
        let (panel, assistant) = (panel.clone(), services.assistant.clone());
        Callback::from(move |_: MouseEvent| {
            let assistant = assistant.clone();
            run_op(&panel, AdminTask::Briefing, move |mut p| async move {
                _ = p.run_briefing(assistant.as_deref(), clock::now()).await;
                p
            });
        })
    };
    let options = panel.categories().iter().map(|c| {
        html! {
            <option key={c.id.clone()} value={c.id.clone()} selected={form.category_id == c.id}>{ &c.title }</option>
        }
    });
    let rows = panel.maps().iter().map(|map| {
        let on_edit = {
            let (panel, map) = (panel.clone(), map.clone());
            Callback::from(move |_: MouseEvent| {
                let mut next = (*panel).clone();
                next.edit_map(&map);
                panel.set(next);
            })
        };
        let on_delete = {
            let (panel, store, id) = (panel.clone(), services.store.clone(), map.id.clone());
            Callback::from(move |_: MouseEvent| {
                let (store, id) = (store.clone(), id.clone());
                run_op(&panel, AdminTask::Write, move |mut p| async move {
                    _ = p.delete_map(store.as_ref(), &id, clock::now()).await;
                    p
                });
            })
        };
        html! {
            <div key={map.id.clone()} class="admin-row soft-out p-4 rounded-[2rem] flex items-center justify-between">
                <div class="ml-2 max-w-[60%]">
                    <p class="text-xs font-bold text-[#1E3A8A] uppercase truncate">{ &map.title }</p>
                    <p class="text-[9px] font-mono text-[#60A5FA] tracking-widest">{ &map.code }</p>
                </div>
                <div class="flex gap-2">
                    <button class="p-3 soft-button rounded-xl text-[#60A5FA]" aria-label={format!("Edit {}", map.title)} onclick={on_edit}>{ "\u{270E}" }</button>
                    <button class="p-3 soft-button rounded-xl text-rose-400" aria-label={format!("Delete {}", map.title)} onclick={on_delete}>{ "\u{2716}" }</button>
                </div>
            </div>
        }
    });

    html! {
        <div class="space-y-8">
            <fieldset class="soft-out p-8 rounded-[3rem] space-y-5" disabled={locked} aria-busy={locked.to_string()}>
                <h2 class="text-[10px] font-black text-[#60A5FA] uppercase tracking-[0.4em]">{ "Map Deployment" }</h2>
                <div class="space-y-4">
                    <div class="soft-in rounded-2xl p-1">
                        <select class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" aria-label="Category"
                            onchange={edit(panel, select_value, |p, v| p.map_form.category_id = v)}>
                            <option value="" selected={form.category_id.is_empty()}>{ "Select Category..." }</option>
                            { for options }
                        </select>
                    </div>
                    <div class="soft-in rounded-2xl p-1">
                        <input class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" placeholder="Title..."
                            value={form.title.clone()} oninput={edit(panel, input_value, |p, v| p.map_form.title = v)} />
                    </div>
                    <div class="soft-in rounded-2xl p-1">
                        <input class="w-full bg-transparent p-4 text-xs font-mono text-[#1E3A8A] focus:outline-none" placeholder="Map Code..."
                            value={form.code.clone()} oninput={edit(panel, input_value, |p, v| p.map_form.code = v)} />
                    </div>
                    <div class="space-y-2">
                        <div class="flex justify-between items-center px-2">
                            <span class="text-[8px] font-black text-[#60A5FA] uppercase tracking-widest">{ "Tactical Description" }</span>
                            <button id="ai-briefing" type="button" class="text-[8px] font-black uppercase tracking-widest text-[#60A5FA]"
                                aria-busy={briefing.to_string()} onclick={on_briefing}>
                                { "\u{2728} AI Intel Briefing" }
                            </button>
                        </div>
                        <div class="soft-in rounded-2xl p-1">
                            <textarea class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" rows="3" placeholder="Tactical description..."
                                value={form.description.clone()} oninput={edit(panel, textarea_value, |p, v| p.map_form.description = v)} />
                        </div>
                    </div>
                    <div class="soft-in rounded-2xl p-1">
                        <input class="w-full bg-transparent p-4 text-xs text-[#1E3A8A] focus:outline-none" placeholder="Thumbnail URL..."
                            value={form.thumbnail.clone()} oninput={edit(panel, input_value, |p, v| p.map_form.thumbnail = v)} />
                    </div>
                </div>
                <button id="save-map" class="w-full py-4 soft-button rounded-2xl text-[#1E3A8A] font-black uppercase text-[10px] tracking-widest"
                    onclick={on_save}>
                    { if panel.editing_id().is_some() { "Push Update" } else { "Broadcast Map" } }
                </button>
            </fieldset>
            <fieldset class="space-y-4" disabled={locked}>{ for rows }</fieldset>
        </div>
    }
}

fn monetization_tab(config: &AppConfig) -> Html {
    html! {
        <div class="space-y-8">
            <div class="soft-out p-10 rounded-[3rem] text-center space-y-6">
                <h2 class="text-lg font-bold text-[#1E3A8A] uppercase">{ "Monetization Active" }</h2>
                <p class="text-xs text-[#60A5FA] leading-relaxed">
                    { "Rewarded ad units are wired for every map code. Native builds show AdMob rewards; the web build runs the sponsor countdown." }
                </p>
                <dl class="text-left text-[10px] space-y-2">
                    { for monetization_rows(&config.ads).into_iter().map(|(label, value)| html! {
                        <div key={label} class="flex justify-between gap-4">
                            <dt class="font-black uppercase text-[#60A5FA]">{ label }</dt>
                            <dd class="font-mono text-[#1E3A8A] truncate">{ value }</dd>
                        </div>
                    }) }
                </dl>
            </div>
        </div>
    }
}
