use std::rc::Rc;

use wowmaps_core::{
    AdConfig, AdGate, CountdownSample, GateDriver, GateMode, GateOutcome, GateTiming,
    RewardRequest, SharedGate, UnlockRequest,
};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::gate_screen::GateScreen;
use crate::platform::{BrowserClock, Services};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub map_id: AttrValue,
    pub services: Services,
    pub ads: AdConfig,
    /// Fires once with the gate's outcome.
    pub on_close: Callback<GateOutcome>,
}

/// What the overlay shows for one gate state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateView {
    pub mode: GateMode,
    pub sample: CountdownSample,
    pub can_close: bool,
}

impl GateView {
    #[must_use]
    pub fn of(gate: &AdGate) -> Self {
        Self {
            mode: gate.mode(),
            sample: gate.sample(),
            can_close: gate.can_close(),
        }
    }

    #[must_use]
    pub const fn loading(timing: GateTiming) -> Self {
        Self {
            mode: GateMode::Loading,
            sample: CountdownSample::start(timing.duration),
            can_close: false,
        }
    }
}

async fn drive(
    services: Services,
    ads: AdConfig,
    gate: SharedGate,
    view: UseStateHandle<GateView>,
    on_close: Callback<GateOutcome>,
) {
    let request = RewardRequest::for_platform(&ads, services.ads.platform());
    let clock = BrowserClock;
    let outcome = GateDriver::new(services.ads.as_ref(), &clock)
        .run(&gate, &request, |current| view.set(GateView::of(current)))
        .await;
    services.gates.borrow_mut().release_closed();
    if let Some(outcome) = outcome {
        on_close.emit(outcome);
    }
}

/// Rewarded-ad overlay. Opens a gate in the app-wide slot on mount and
/// reports its single outcome through `on_close`.
#[function_component(AdPlayer)]
pub fn ad_player(p: &Props) -> Html {
    let timing = GateTiming::from_config(&p.ads);
    let view = use_state(|| GateView::loading(timing));
    let held = use_mut_ref(|| None::<SharedGate>);

    {
        let services = p.services.clone();
        let ads = p.ads.clone();
        let on_close = p.on_close.clone();
        let view = view.clone();
        let held = held.clone();
        use_effect_with(p.map_id.clone(), move |map_id| {
            let opened = services
                .gates
                .borrow_mut()
                .open(UnlockRequest::new(map_id.as_str()), timing);
            match opened {
                Ok(gate) => {
                    *held.borrow_mut() = Some(Rc::clone(&gate));
                    view.set(GateView::of(&gate.borrow()));
                    spawn_local(drive(services.clone(), ads, gate, view, on_close));
                }
                Err(err) => {
                    log::warn!("Ad gate not opened: {err}");
                    on_close.emit(GateOutcome::Cancelled);
                }
            }
            let gates = Rc::clone(&services.gates);
            move || {
                if let Some(gate) = held.borrow_mut().take() {
                    gate.borrow_mut().abandon();
                }
                gates.borrow_mut().release_closed();
            }
        });
    }

    let on_close = {
        let gates = Rc::clone(&p.services.gates);
        let on_close = p.on_close.clone();
        let view = view.clone();
        let held = held.clone();
        Callback::from(move |()| {
            let Some(gate) = held.borrow().clone() else {
                on_close.emit(GateOutcome::Cancelled);
                return;
            };
            let result = gate.borrow_mut().request_close();
            match result {
                Ok(outcome) => {
                    view.set(GateView::of(&gate.borrow()));
                    gates.borrow_mut().release_closed();
                    on_close.emit(outcome);
                }
                Err(err) => log::debug!("Close ignored: {err}"),
            }
        })
    };

    html! {
        <GateScreen
            mode={view.mode}
            sample={view.sample}
            can_close={view.can_close}
            sponsor_url={AttrValue::from(p.ads.web_sponsor_url.clone())}
            {on_close}
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::time::Duration;
    use wowmaps_core::{ProviderOutcome, SeedCatalog};
    use yew::LocalServerRenderer;

    #[test]
    fn view_mirrors_the_gate() {
        let mut gate = AdGate::open(UnlockRequest::new("m1"), GateTiming::default());
        assert_eq!(
            GateView::of(&gate),
            GateView::loading(GateTiming::default())
        );
        gate.resolve(ProviderOutcome::Error("no fill".into()), Duration::ZERO)
            .unwrap();
        let view = GateView::of(&gate);
        assert_eq!(view.mode, GateMode::Error);
        assert!(view.can_close);
    }

    #[test]
    fn first_render_shows_the_loading_screen() {
        let props = Props {
            map_id: AttrValue::from("m1"),
            services: Services::offline(&SeedCatalog::default()),
            ads: AdConfig::default(),
            on_close: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<AdPlayer>::with_props(props).render());
        assert!(html.contains("Initialising Ad"));
        assert!(!html.contains("gate-close"));
    }
}
