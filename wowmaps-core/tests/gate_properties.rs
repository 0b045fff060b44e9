use std::time::Duration;

use futures::executor::block_on;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wowmaps_core::{
    AdConfig, AdGate, AppSnapshot, GateClock, GateDriver, GateError, GateMode, GateOutcome,
    GateSlot, GateTiming, Platform, ProviderOutcome, RewardRequest, ScriptedProvider,
    UnlockRequest, UnlockSource, VirtualClock,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn request(platform: Platform) -> RewardRequest {
    RewardRequest::for_platform(&AdConfig::default(), platform)
}

type Trace = Vec<(GateMode, f64, f64)>;

/// Drive a simulated gate by hand, recording every tick's sample and mode.
fn run_by_hand(
    timing: GateTiming,
    tick_every: impl Fn(usize) -> Duration,
) -> (AdGate, Trace, usize) {
    let mut gate = AdGate::open(UnlockRequest::new("hand"), timing);
    gate.resolve(ProviderOutcome::Simulated, Duration::ZERO)
        .unwrap();
    let mut now = Duration::ZERO;
    let mut trace = Vec::new();
    let mut unlocks = 0;
    for step in 0..10_000 {
        now += tick_every(step);
        if let Some(outcome) = gate.tick(now) {
            assert!(outcome.is_unlock());
            unlocks += 1;
        }
        let sample = gate.sample();
        trace.push((gate.mode(), sample.elapsed_fraction, sample.seconds_remaining));
        if gate.is_closed() {
            break;
        }
    }
    (gate, trace, unlocks)
}

#[test]
fn outcome_fires_at_most_once_even_with_extra_ticks() {
    let (mut gate, _, unlocks) = run_by_hand(GateTiming::default(), |_| ms(100));
    assert_eq!(unlocks, 1);
    for extra in 0..50 {
        assert_eq!(gate.tick(ms(20_000 + extra * 100)), None);
    }
    assert_eq!(gate.request_close(), Err(GateError::Closed));
    assert_eq!(
        gate.outcome(),
        Some(GateOutcome::Unlocked(UnlockSource::Countdown))
    );
}

#[test]
fn countdown_is_monotonic_and_reaches_one_before_finishing() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xD15C_0);
    let jitters: Vec<u64> = (0..400).map(|_| rng.gen_range(60..180)).collect();
    let (_, trace, unlocks) =
        run_by_hand(GateTiming::default(), |step| ms(jitters[step % jitters.len()]));
    assert_eq!(unlocks, 1);

    let active: Vec<_> = trace
        .iter()
        .filter(|(mode, ..)| *mode == GateMode::Active)
        .collect();
    assert!(active.windows(2).all(|w| w[0].1 <= w[1].1));
    assert!(active.windows(2).all(|w| w[0].2 >= w[1].2));

    let first_finishing = trace
        .iter()
        .position(|(mode, ..)| *mode == GateMode::Finishing)
        .unwrap();
    let (_, fraction, remaining) = trace[first_finishing - 1];
    assert_eq!(trace[first_finishing - 1].0, GateMode::Active);
    assert!((fraction - 1.0).abs() < f64::EPSILON);
    assert!(remaining.abs() < f64::EPSILON);
}

#[test]
fn early_close_is_refused_and_does_not_unlock() {
    let mut gate = AdGate::open(UnlockRequest::new("m"), GateTiming::default());
    assert!(matches!(
        gate.request_close(),
        Err(GateError::CloseRefused {
            mode: GateMode::Loading,
            ..
        })
    ));
    gate.resolve(ProviderOutcome::Simulated, Duration::ZERO)
        .unwrap();
    for step in 1..=49 {
        gate.tick(ms(step * 100));
        let err = gate.request_close().unwrap_err();
        assert!(matches!(
            err,
            GateError::CloseRefused {
                mode: GateMode::Active,
                ..
            }
        ));
    }
    assert_eq!(gate.mode(), GateMode::Active);
    assert_eq!(gate.outcome(), None);
}

#[test]
fn close_window_allows_cancel_for_exactly_one_tick() {
    let mut gate = AdGate::open(UnlockRequest::new("m"), GateTiming::default());
    gate.resolve(ProviderOutcome::Simulated, Duration::ZERO)
        .unwrap();
    gate.tick(ms(5_000));
    assert_eq!(gate.mode(), GateMode::Active);
    assert!(gate.can_close());

    let mut late = gate.clone();
    late.tick(ms(5_100));
    assert_eq!(late.mode(), GateMode::Finishing);
    assert!(late.request_close().is_err());

    assert_eq!(gate.request_close(), Ok(GateOutcome::Cancelled));
    assert_eq!(gate.tick(ms(10_000)), None);
    assert_eq!(gate.outcome(), Some(GateOutcome::Cancelled));
}

#[test]
fn unlocked_set_never_shrinks() {
    let outcomes = [
        ("a", GateOutcome::Unlocked(UnlockSource::Countdown)),
        ("b", GateOutcome::Cancelled),
        ("a", GateOutcome::Cancelled),
        ("c", GateOutcome::Unlocked(UnlockSource::NativeReward)),
        ("a", GateOutcome::Unlocked(UnlockSource::Countdown)),
    ];
    let mut snap = AppSnapshot::new();
    let mut previous = snap.unlocked().clone();
    for (id, outcome) in outcomes {
        snap = snap.apply_gate_outcome(id, outcome).toggle_favorite(id);
        assert!(previous.is_subset(snap.unlocked()));
        previous = snap.unlocked().clone();
    }
    assert_eq!(previous.into_iter().collect::<Vec<_>>(), ["a", "c"]);
}

#[test]
fn favorite_toggle_is_an_involution() {
    let base = AppSnapshot::new().toggle_favorite("x").unlock("y");
    for id in ["x", "y", "z"] {
        let twice = base.toggle_favorite(id).toggle_favorite(id);
        assert_eq!(twice, base);
    }
}

#[test]
fn default_simulated_scenario_walks_every_mode_once() {
    let clock = VirtualClock::new();
    let provider = ScriptedProvider::new([ProviderOutcome::Simulated]);
    let mut slot = GateSlot::new();
    let gate = slot
        .open(UnlockRequest::new("test_map_001"), GateTiming::default())
        .unwrap();

    let mut remaining_at_finishing = None;
    let mut previous_mode = GateMode::Loading;
    let outcome = block_on(GateDriver::new(&provider, &clock).run(
        &gate,
        &request(Platform::Web),
        |g| {
            if g.mode() == GateMode::Finishing && previous_mode == GateMode::Active {
                remaining_at_finishing = Some(g.sample().seconds_remaining);
            }
            previous_mode = g.mode();
        },
    ));

    assert_eq!(
        outcome,
        Some(GateOutcome::Unlocked(UnlockSource::Countdown))
    );
    assert_eq!(
        gate.borrow().history(),
        [
            GateMode::Loading,
            GateMode::Active,
            GateMode::Finishing,
            GateMode::Closed,
        ]
    );
    assert_eq!(remaining_at_finishing, Some(0.0));
    assert!(!slot.is_busy());

    let snap = AppSnapshot::new().apply_gate_outcome("test_map_001", outcome.unwrap());
    assert!(snap.is_unlocked("test_map_001"));
}

#[test]
fn provider_error_blocks_the_slot_until_closed() {
    let clock = VirtualClock::new();
    let provider = ScriptedProvider::new([ProviderOutcome::Error("timeout".into())])
        .on_platform(Platform::Android);
    let mut slot = GateSlot::new();
    let gate = slot
        .open(UnlockRequest::new("m9"), GateTiming::default())
        .unwrap();

    let outcome = block_on(GateDriver::new(&provider, &clock).run(
        &gate,
        &request(Platform::Android),
        |_| {},
    ));
    assert_eq!(outcome, None);
    assert_eq!(gate.borrow().mode(), GateMode::Error);
    assert_eq!(
        slot.open(UnlockRequest::new("m9"), GateTiming::default())
            .unwrap_err(),
        GateError::SlotBusy {
            map_id: "m9".into()
        }
    );

    let closed = gate.borrow_mut().request_close().unwrap();
    assert_eq!(closed, GateOutcome::Cancelled);
    let snap = AppSnapshot::new().apply_gate_outcome("m9", closed);
    assert!(snap.unlocked().is_empty());

    slot.release_closed();
    assert!(slot.current().is_none());
    assert!(
        slot.open(UnlockRequest::new("m9"), GateTiming::default())
            .is_ok()
    );
}

#[test]
fn native_success_unlocks_without_countdown() {
    let clock = VirtualClock::new();
    let provider = ScriptedProvider::new([ProviderOutcome::Success]).on_platform(Platform::Ios);
    let mut slot = GateSlot::new();
    let gate = slot
        .open(UnlockRequest::new("m2"), GateTiming::default())
        .unwrap();

    let mut observed = Vec::new();
    let outcome = block_on(GateDriver::new(&provider, &clock).run(
        &gate,
        &request(Platform::Ios),
        |g| observed.push(g.mode()),
    ));
    assert_eq!(
        outcome,
        Some(GateOutcome::Unlocked(UnlockSource::NativeReward))
    );
    assert_eq!(
        gate.borrow().history(),
        [GateMode::Loading, GateMode::Closed]
    );
    assert!(!observed.contains(&GateMode::Active));
    assert_eq!(clock.now(), ms(1_500));
    assert_eq!(
        provider.calls()[0].ad_unit_id,
        AdConfig::default().ios_rewarded_id
    );
}

#[test]
fn native_dismissal_frees_the_slot_without_unlocking() {
    let clock = VirtualClock::new();
    let provider =
        ScriptedProvider::new([ProviderOutcome::Dismissed]).on_platform(Platform::Android);
    let mut slot = GateSlot::new();
    let gate = slot
        .open(UnlockRequest::new("m3"), GateTiming::default())
        .unwrap();

    let outcome = block_on(GateDriver::new(&provider, &clock).run(
        &gate,
        &request(Platform::Android),
        |_| {},
    ));
    assert_eq!(outcome, Some(GateOutcome::Cancelled));
    assert!(!slot.is_busy());
    let snap = AppSnapshot::new().apply_gate_outcome("m3", GateOutcome::Cancelled);
    assert!(!snap.is_unlocked("m3"));
}

#[test]
fn late_timers_still_unlock_exactly_once() {
    for seed in 0..16_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let clock = VirtualClock::new();
        clock.set_jitter(ms(rng.gen_range(0..250)));
        let provider = ScriptedProvider::new([ProviderOutcome::Simulated]);
        let gate = GateSlot::new()
            .open(
                UnlockRequest::new("j"),
                GateTiming::default().with_duration(ms(2_000)),
            )
            .unwrap();
        let mut unlocks = 0;
        let outcome = block_on(GateDriver::new(&provider, &clock).run(
            &gate,
            &request(Platform::Web),
            |_| {},
        ));
        if outcome.is_some_and(GateOutcome::is_unlock) {
            unlocks += 1;
        }
        assert_eq!(unlocks, 1, "seed {seed}");
        assert!(gate.borrow().is_closed());
    }
}
