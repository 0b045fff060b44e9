use anyhow::{Context, Result, bail, ensure};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wowmaps_core::seed::PRACTICE_MAP_ID;
use wowmaps_core::{
    AdConfig, AdGate, AdRewardProvider, AppConfig, AppSnapshot, CatalogReader, CountdownSample,
    GateClock, GateDriver, GateError, GateMode, GateOutcome, GateSlot, GateTiming, MemoryCatalog,
    Platform, ProviderOutcome, RewardRequest, ScriptedProvider, SeedCatalog, SharedGate,
    SimulatedProvider, UnlockRequest, UnlockSource, View, VirtualClock,
};

use super::{IterationCtx, LogicScenario};

const FULL_RUN: [GateMode; 4] = [
    GateMode::Loading,
    GateMode::Active,
    GateMode::Finishing,
    GateMode::Closed,
];

/// Default timings with a countdown of 1 to 8 seconds.
fn sampled_timing(ctx: &mut IterationCtx) -> GateTiming {
    let secs = ctx.rng.gen_range(1..=8);
    GateTiming::from_config(&AdConfig::default()).with_duration(Duration::from_secs(secs))
}

fn web_request() -> RewardRequest {
    RewardRequest::for_platform(&AdConfig::default(), Platform::Web)
}

fn shared_gate(map_id: &str, timing: GateTiming) -> SharedGate {
    Rc::new(RefCell::new(AdGate::open(UnlockRequest::new(map_id), timing)))
}

/// What the driver reported while a gate ran.
#[derive(Debug, Default)]
struct Trace {
    fractions: Vec<f64>,
    at_finishing: Option<CountdownSample>,
}

impl Trace {
    fn observe(&mut self, gate: &AdGate) {
        match gate.mode() {
            GateMode::Active => self.fractions.push(gate.sample().elapsed_fraction),
            GateMode::Finishing if self.at_finishing.is_none() => {
                self.at_finishing = Some(gate.sample());
            }
            _ => {}
        }
    }

    fn check_countdown(&self) -> Result<()> {
        ensure!(
            self.fractions.windows(2).all(|pair| pair[0] <= pair[1]),
            "countdown went backwards: {:?}",
            self.fractions
        );
        ensure!(
            self.fractions.last().is_some_and(|f| *f >= 1.0),
            "countdown never reached 1.0 before finishing"
        );
        let at_finishing = self
            .at_finishing
            .context("gate never reported the finishing screen")?;
        ensure!(
            at_finishing.seconds_remaining <= 0.0,
            "entered finishing with {:.2}s left",
            at_finishing.seconds_remaining
        );
        Ok(())
    }
}

pub struct PracticeUnlock;

#[async_trait::async_trait(?Send)]
impl LogicScenario for PracticeUnlock {
    fn name(&self) -> &'static str {
        "Practice map unlocks end to end"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let seed = SeedCatalog::load_from_static();
        let store = MemoryCatalog::from_seed_catalog(&seed);
        let maps = seed.merge_maps(CatalogReader::new(&store).maps().await);
        let practice = maps
            .iter()
            .find(|m| m.id == PRACTICE_MAP_ID)
            .context("practice map missing from the bundled catalog")?;

        let snapshot = AppSnapshot::new()
            .navigate(View::Home, None, None)
            .navigate(View::List, Some(&practice.category_id), None)
            .navigate(View::Detail, None, Some(&practice.id));
        ensure!(
            !snapshot.is_unlocked(&practice.id),
            "practice map starts unlocked"
        );

        let cfg = AppConfig::load_from_static();
        let mut slot = GateSlot::new();
        let gate = slot.open(
            UnlockRequest::new(&practice.id),
            GateTiming::from_config(&cfg.ads),
        )?;
        let clock = VirtualClock::new();
        clock.set_jitter(ctx.jitter());
        let provider = SimulatedProvider;
        let request = RewardRequest::for_platform(&cfg.ads, provider.platform());
        let outcome = GateDriver::new(&provider, &clock)
            .run(&gate, &request, |_| {})
            .await
            .context("practice gate ended without an outcome")?;
        slot.release_closed();

        let snapshot = snapshot.apply_gate_outcome(&practice.id, outcome);
        ensure!(
            snapshot.is_unlocked(&practice.id),
            "gate outcome {outcome:?} did not unlock"
        );
        ensure!(!slot.is_busy(), "slot still busy after the gate closed");
        let shown = snapshot.selected_map(&maps).map(|m| m.code.as_str());
        ensure!(
            shown == Some(practice.code.as_str()),
            "detail view would show {shown:?}"
        );
        Ok(format!("{} unlocked at {:?}", practice.id, clock.now()))
    }
}

pub struct FullCountdown;

#[async_trait::async_trait(?Send)]
impl LogicScenario for FullCountdown {
    fn name(&self) -> &'static str {
        "Simulated countdown unlocks exactly once"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let timing = sampled_timing(ctx);
        let jitter = ctx.jitter();
        let clock = VirtualClock::new();
        clock.set_jitter(jitter);
        let provider = ScriptedProvider::new([ProviderOutcome::Simulated]);
        let gate = shared_gate("m-countdown", timing);

        let mut trace = Trace::default();
        let outcome = GateDriver::new(&provider, &clock)
            .run(&gate, &web_request(), |g| trace.observe(g))
            .await;
        ensure!(
            outcome == Some(GateOutcome::Unlocked(UnlockSource::Countdown)),
            "expected a countdown unlock, got {outcome:?}"
        );
        ensure!(
            gate.borrow().history() == FULL_RUN,
            "unexpected mode sequence {:?}",
            gate.borrow().history()
        );
        trace.check_countdown()?;

        let mut closed = gate.borrow_mut();
        ensure!(
            closed.abandon().is_none(),
            "closed gate emitted a second outcome"
        );
        ensure!(
            closed.request_close() == Err(GateError::Closed),
            "closed gate accepted a close"
        );
        ensure!(
            closed.tick(clock.now() + timing.duration).is_none(),
            "closed gate reacted to a tick"
        );
        Ok(format!(
            "{:?} countdown unlocked at {:?} (jitter {jitter:?}, {} samples)",
            timing.duration,
            clock.now(),
            trace.fractions.len()
        ))
    }
}

pub struct ProviderFailure;

#[async_trait::async_trait(?Send)]
impl LogicScenario for ProviderFailure {
    fn name(&self) -> &'static str {
        "Provider failure needs an explicit close"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let timing = sampled_timing(ctx);
        let map_id = format!("m-{}", ctx.seed % 1_000);
        let mut slot = GateSlot::new();
        let gate = slot.open(UnlockRequest::new(&map_id), timing)?;
        let clock = VirtualClock::new();
        clock.set_jitter(ctx.jitter());
        let provider = ScriptedProvider::new([ProviderOutcome::Error("no fill".into())]);

        let outcome = GateDriver::new(&provider, &clock)
            .run(&gate, &web_request(), |_| {})
            .await;
        ensure!(outcome.is_none(), "failed ad produced {outcome:?}");
        ensure!(
            gate.borrow().mode() == GateMode::Error,
            "gate left in {}",
            gate.borrow().mode()
        );
        ensure!(
            gate.borrow_mut()
                .tick(clock.now() + Duration::from_secs(60))
                .is_none(),
            "error screen timed out by itself"
        );

        match slot.open(UnlockRequest::new(&map_id), timing) {
            Err(GateError::SlotBusy { .. }) => {}
            other => bail!("second gate opened behind the error screen: {other:?}"),
        }

        let closed = gate.borrow_mut().request_close()?;
        ensure!(
            closed == GateOutcome::Cancelled,
            "error close reported {closed:?}"
        );
        let snapshot = AppSnapshot::new().apply_gate_outcome(&map_id, closed);
        ensure!(
            !snapshot.is_unlocked(&map_id),
            "cancelled gate unlocked the map"
        );

        slot.release_closed();
        let retry = slot.open(UnlockRequest::new(&map_id), timing)?;
        ensure!(
            retry.borrow().mode() == GateMode::Loading,
            "retry did not start a fresh gate"
        );
        Ok(format!("{map_id} errored and reopened"))
    }
}

pub struct NativeReward;

#[async_trait::async_trait(?Send)]
impl LogicScenario for NativeReward {
    fn name(&self) -> &'static str {
        "Native ad unlocks only when rewarded"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let platform = if ctx.rng.gen_bool(0.5) {
            Platform::Android
        } else {
            Platform::Ios
        };
        let rewarded = ctx.rng.gen_bool(0.75);
        let cfg = AdConfig::default();
        let provider = ScriptedProvider::new([if rewarded {
            ProviderOutcome::Success
        } else {
            ProviderOutcome::Dismissed
        }])
        .on_platform(platform);
        let request = RewardRequest::for_platform(&cfg, provider.platform());
        let expected_unit = match platform {
            Platform::Ios => &cfg.ios_rewarded_id,
            Platform::Android | Platform::Web => &cfg.android_rewarded_id,
        };
        ensure!(
            &request.ad_unit_id == expected_unit,
            "{platform:?} asked for unit {}",
            request.ad_unit_id
        );

        let clock = VirtualClock::new();
        clock.set_jitter(ctx.jitter());
        let gate = shared_gate("m-native", sampled_timing(ctx));
        let outcome = GateDriver::new(&provider, &clock)
            .run(&gate, &request, |_| {})
            .await;
        let expected = if rewarded {
            GateOutcome::Unlocked(UnlockSource::NativeReward)
        } else {
            GateOutcome::Cancelled
        };
        ensure!(
            outcome == Some(expected),
            "expected {expected:?}, got {outcome:?}"
        );
        ensure!(
            gate.borrow().history() == [GateMode::Loading, GateMode::Closed],
            "native ad passed through {:?}",
            gate.borrow().history()
        );
        ensure!(
            provider.calls() == vec![request],
            "provider called {} times",
            provider.calls().len()
        );
        ensure!(
            gate.borrow_mut().abandon().is_none(),
            "native gate emitted a second outcome"
        );
        let verdict = if rewarded { "granted" } else { "withheld" };
        Ok(format!("{platform:?} reward {verdict} at {:?}", clock.now()))
    }
}

pub struct EarlyClose;

#[async_trait::async_trait(?Send)]
impl LogicScenario for EarlyClose {
    fn name(&self) -> &'static str {
        "Closing before the countdown ends is refused"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let timing = sampled_timing(ctx);
        let mut gate = AdGate::open(UnlockRequest::new("m-early"), timing);
        ensure!(
            matches!(
                gate.request_close(),
                Err(GateError::CloseRefused {
                    mode: GateMode::Loading,
                    ..
                })
            ),
            "close honoured while loading"
        );

        let mut now = timing.loading;
        gate.resolve(ProviderOutcome::Simulated, now)?;
        let mut refused = 0_usize;
        loop {
            now += timing.tick + ctx.jitter();
            gate.tick(now);
            if gate.sample().is_complete() {
                break;
            }
            match gate.request_close() {
                Err(GateError::CloseRefused { .. }) => refused += 1,
                other => bail!(
                    "close honoured with {:.2}s left: {other:?}",
                    gate.sample().seconds_remaining
                ),
            }
        }
        ensure!(gate.can_close(), "zero countdown does not offer a close");

        now += timing.tick;
        gate.tick(now);
        ensure!(
            gate.mode() == GateMode::Finishing,
            "gate in {} after the close window",
            gate.mode()
        );
        ensure!(
            gate.request_close().is_err(),
            "close honoured while finishing"
        );

        now += timing.finishing;
        let outcome = gate.tick(now);
        ensure!(
            outcome == Some(GateOutcome::Unlocked(UnlockSource::Countdown)),
            "finishing ended with {outcome:?}"
        );
        Ok(format!("{refused} early closes refused"))
    }
}

pub struct Abandon;

#[async_trait::async_trait(?Send)]
impl LogicScenario for Abandon {
    fn name(&self) -> &'static str {
        "Abandoned gates cancel once and free the slot"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let timing = sampled_timing(ctx);
        let mut slot = GateSlot::new();
        let gate = slot.open(UnlockRequest::new("m-abandon"), timing)?;
        let ticks = ctx.rng.gen_range(0..10_u32);
        if ctx.rng.gen_bool(0.5) {
            gate.borrow_mut()
                .resolve(ProviderOutcome::Simulated, timing.loading)?;
            for i in 1..=ticks {
                gate.borrow_mut().tick(timing.loading + timing.tick * i);
            }
        }
        ensure!(slot.is_busy(), "slot free while the gate is open");

        let first = gate.borrow_mut().abandon();
        let second = gate.borrow_mut().abandon();
        ensure!(
            first == Some(GateOutcome::Cancelled) && second.is_none(),
            "abandon emitted {first:?} then {second:?}"
        );
        slot.release_closed();
        ensure!(
            !slot.is_busy() && slot.current().is_none(),
            "slot kept the abandoned gate"
        );
        Ok(format!(
            "abandoned from {:?} after {ticks} ticks",
            gate.borrow().history()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Builder;

    fn run(scenario: &dyn LogicScenario, seed: u64) -> Result<String> {
        let runtime = Builder::new_current_thread().build().unwrap();
        let mut ctx = IterationCtx::new(seed, false);
        runtime.block_on(scenario.run_iteration(&mut ctx))
    }

    #[test]
    fn gate_scenarios_pass_across_seeds() {
        let scenarios: [&dyn LogicScenario; 6] = [
            &PracticeUnlock,
            &FullCountdown,
            &ProviderFailure,
            &NativeReward,
            &EarlyClose,
            &Abandon,
        ];
        for scenario in scenarios {
            for seed in 0..8 {
                if let Err(err) = run(scenario, seed) {
                    panic!("{} failed for seed {seed}: {err:#}", scenario.name());
                }
            }
        }
    }

    #[test]
    fn trace_rejects_a_backwards_countdown() {
        let trace = Trace {
            fractions: vec![0.2, 0.1, 1.0],
            at_finishing: Some(CountdownSample::complete()),
        };
        assert!(trace.check_countdown().is_err());
    }
}
