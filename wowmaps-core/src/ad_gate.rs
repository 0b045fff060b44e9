//! Ad-gated unlock state machine.
//!
//! A gate walks `Loading -> Active -> Finishing -> Closed` (or
//! `Loading -> Error -> Closed`, or `Loading -> Closed` once a native ad
//! returns, unlocking only if the reward was earned).
//! Time is never read here: every call receives `now`, the time elapsed since
//! the gate was opened, and countdown values are a pure function of it.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ad_provider::ProviderOutcome;
use crate::config::AdConfig;

/// Identifies the map whose code is behind the gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequest {
    pub map_id: String,
}

impl UnlockRequest {
    #[must_use]
    pub fn new(map_id: impl Into<String>) -> Self {
        Self {
            map_id: map_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    Loading,
    Active,
    Error,
    Finishing,
    Closed,
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Active => write!(f, "active"),
            Self::Error => write!(f, "error"),
            Self::Finishing => write!(f, "finishing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Who granted the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockSource {
    Countdown,
    NativeReward,
}

/// The single signal a gate emits over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    Unlocked(UnlockSource),
    Cancelled,
}

impl GateOutcome {
    #[must_use]
    pub const fn is_unlock(self) -> bool {
        matches!(self, Self::Unlocked(_))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GateError {
    #[error("close refused while {mode} ({seconds_remaining:.1}s remaining)")]
    CloseRefused {
        mode: GateMode,
        seconds_remaining: f64,
    },
    #[error("provider outcome received while {0}")]
    NotLoading(GateMode),
    #[error("gate already closed")]
    Closed,
    #[error("a gate is already open for map {map_id}")]
    SlotBusy { map_id: String },
}

/// Countdown and transition delays for one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateTiming {
    pub duration: Duration,
    pub tick: Duration,
    pub finishing: Duration,
    pub loading: Duration,
}

impl Default for GateTiming {
    fn default() -> Self {
        Self::from_config(&AdConfig::default())
    }
}

impl GateTiming {
    #[must_use]
    pub const fn from_config(cfg: &AdConfig) -> Self {
        Self {
            duration: cfg.reward_duration(),
            tick: cfg.tick(),
            finishing: cfg.finishing_delay(),
            loading: cfg.loading_delay(),
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Observable countdown values at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountdownSample {
    pub elapsed_fraction: f64,
    pub seconds_remaining: f64,
}

impl CountdownSample {
    /// Sample a countdown of `duration` after `elapsed` has passed.
    #[must_use]
    pub fn at(elapsed: Duration, duration: Duration) -> Self {
        if elapsed >= duration {
            return Self::complete();
        }
        let total = duration.as_secs_f64();
        let spent = elapsed.as_secs_f64();
        Self {
            elapsed_fraction: (spent / total).clamp(0.0, 1.0),
            seconds_remaining: (total - spent).max(0.0),
        }
    }

    #[must_use]
    pub const fn start(duration: Duration) -> Self {
        Self {
            elapsed_fraction: 0.0,
            seconds_remaining: duration.as_secs_f64(),
        }
    }

    #[must_use]
    pub const fn complete() -> Self {
        Self {
            elapsed_fraction: 1.0,
            seconds_remaining: 0.0,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed_fraction >= 1.0
    }

    /// Whole percent for progress bars, floored.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        (self.elapsed_fraction * 100.0).floor().clamp(0.0, 100.0) as u8
    }

    /// Seconds shown to the user, rounded up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_seconds(&self) -> u64 {
        self.seconds_remaining.ceil().max(0.0) as u64
    }
}

/// One ad session. Emits at most one [`GateOutcome`].
#[derive(Debug, Clone)]
pub struct AdGate {
    request: UnlockRequest,
    timing: GateTiming,
    mode: GateMode,
    sample: CountdownSample,
    active_since: Duration,
    finishing_since: Duration,
    last_seen: Duration,
    outcome: Option<GateOutcome>,
    history: SmallVec<[GateMode; 5]>,
}

impl AdGate {
    #[must_use]
    pub fn open(request: UnlockRequest, timing: GateTiming) -> Self {
        log::info!("Opening ad gate for map {}", request.map_id);
        let mut history = SmallVec::new();
        history.push(GateMode::Loading);
        Self {
            request,
            timing,
            mode: GateMode::Loading,
            sample: CountdownSample::start(timing.duration),
            active_since: Duration::ZERO,
            finishing_since: Duration::ZERO,
            last_seen: Duration::ZERO,
            outcome: None,
            history,
        }
    }

    #[must_use]
    pub const fn request(&self) -> &UnlockRequest {
        &self.request
    }

    #[must_use]
    pub const fn timing(&self) -> GateTiming {
        self.timing
    }

    #[must_use]
    pub const fn mode(&self) -> GateMode {
        self.mode
    }

    #[must_use]
    pub const fn sample(&self) -> CountdownSample {
        self.sample
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<GateOutcome> {
        self.outcome
    }

    /// Every mode entered so far, in order.
    #[must_use]
    pub fn history(&self) -> &[GateMode] {
        &self.history
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.mode, GateMode::Closed)
    }

    /// Whether the countdown still needs ticks.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.mode, GateMode::Active | GateMode::Finishing)
    }

    /// A close is honoured from `Error`, or from `Active` once the countdown
    /// reads zero and `Finishing` has not been entered yet.
    #[must_use]
    pub fn can_close(&self) -> bool {
        match self.mode {
            GateMode::Error => true,
            GateMode::Active => self.sample.seconds_remaining <= 0.0,
            GateMode::Loading | GateMode::Finishing | GateMode::Closed => false,
        }
    }

    /// Apply the provider's answer. Only valid while loading.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NotLoading`] if the provider already answered or the
    /// gate was closed.
    pub fn resolve(
        &mut self,
        outcome: ProviderOutcome,
        now: Duration,
    ) -> Result<Option<GateOutcome>, GateError> {
        if self.mode != GateMode::Loading {
            return Err(GateError::NotLoading(self.mode));
        }
        let now = self.observe(now);
        match outcome {
            ProviderOutcome::Simulated => {
                self.active_since = now;
                self.sample = CountdownSample::start(self.timing.duration);
                self.enter(GateMode::Active);
                Ok(None)
            }
            ProviderOutcome::Success => {
                Ok(self.finish(GateOutcome::Unlocked(UnlockSource::NativeReward)))
            }
            ProviderOutcome::Dismissed => {
                log::info!(
                    "Native ad dismissed without reward for map {}",
                    self.request.map_id
                );
                Ok(self.finish(GateOutcome::Cancelled))
            }
            ProviderOutcome::Error(reason) => {
                log::warn!(
                    "Ad provider failed for map {}: {reason}",
                    self.request.map_id
                );
                self.enter(GateMode::Error);
                Ok(None)
            }
        }
    }

    /// Advance the countdown to `now`. Ticks after close have no effect.
    ///
    /// The tick that first reads a complete countdown keeps the gate `Active`;
    /// the following tick moves it to `Finishing`.
    pub fn tick(&mut self, now: Duration) -> Option<GateOutcome> {
        let now = self.observe(now);
        match self.mode {
            GateMode::Active => {
                if self.sample.is_complete() {
                    self.finishing_since = now;
                    self.enter(GateMode::Finishing);
                } else {
                    let elapsed = now.saturating_sub(self.active_since);
                    let next = CountdownSample::at(elapsed, self.timing.duration);
                    log::debug!(
                        "Gate {} at {:.3} ({:.1}s left)",
                        self.request.map_id,
                        next.elapsed_fraction,
                        next.seconds_remaining
                    );
                    self.sample = next;
                }
                None
            }
            GateMode::Finishing => {
                if now.saturating_sub(self.finishing_since) >= self.timing.finishing {
                    self.finish(GateOutcome::Unlocked(UnlockSource::Countdown))
                } else {
                    None
                }
            }
            GateMode::Loading | GateMode::Error | GateMode::Closed => None,
        }
    }

    /// User-initiated close.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::CloseRefused`] while the ad still has to run and
    /// [`GateError::Closed`] if the gate is already closed.
    pub fn request_close(&mut self) -> Result<GateOutcome, GateError> {
        if self.is_closed() {
            return Err(GateError::Closed);
        }
        if !self.can_close() {
            return Err(GateError::CloseRefused {
                mode: self.mode,
                seconds_remaining: self.sample.seconds_remaining,
            });
        }
        self.finish(GateOutcome::Cancelled).ok_or(GateError::Closed)
    }

    /// Close without honouring the countdown, e.g. when the screen showing
    /// the gate goes away. Returns `Cancelled` unless the gate had already
    /// emitted its outcome.
    pub fn abandon(&mut self) -> Option<GateOutcome> {
        if !self.is_closed() {
            log::info!("Abandoning gate for map {}", self.request.map_id);
        }
        self.finish(GateOutcome::Cancelled)
    }

    fn observe(&mut self, now: Duration) -> Duration {
        self.last_seen = self.last_seen.max(now);
        self.last_seen
    }

    fn enter(&mut self, mode: GateMode) {
        log::info!(
            "Ad gate {} -> {mode} for map {}",
            self.mode,
            self.request.map_id
        );
        self.mode = mode;
        self.history.push(mode);
    }

    fn finish(&mut self, outcome: GateOutcome) -> Option<GateOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Some(outcome);
        self.enter(GateMode::Closed);
        Some(outcome)
    }
}

/// Gate shared between the UI and the driver on one thread.
pub type SharedGate = Rc<RefCell<AdGate>>;

/// Holds the one gate allowed at a time.
#[derive(Debug, Default)]
pub struct GateSlot {
    current: Option<SharedGate>,
}

impl GateSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Open a gate for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SlotBusy`] while a previous gate is still open.
    pub fn open(
        &mut self,
        request: UnlockRequest,
        timing: GateTiming,
    ) -> Result<SharedGate, GateError> {
        if let Some(existing) = &self.current {
            let existing = existing.borrow();
            if !existing.is_closed() {
                return Err(GateError::SlotBusy {
                    map_id: existing.request().map_id.clone(),
                });
            }
        }
        let gate = Rc::new(RefCell::new(AdGate::open(request, timing)));
        self.current = Some(Rc::clone(&gate));
        Ok(gate)
    }

    #[must_use]
    pub fn current(&self) -> Option<SharedGate> {
        self.current.clone()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|gate| !gate.borrow().is_closed())
    }

    /// Drop the stored gate once it has closed.
    pub fn release_closed(&mut self) {
        if !self.is_busy() {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn active_gate() -> AdGate {
        let mut gate = AdGate::open(UnlockRequest::new("m1"), GateTiming::default());
        assert_eq!(gate.resolve(ProviderOutcome::Simulated, ms(0)), Ok(None));
        gate
    }

    #[test]
    fn sample_is_linear_and_clamped() {
        let five = Duration::from_secs(5);
        let half = CountdownSample::at(ms(2_500), five);
        assert!((half.elapsed_fraction - 0.5).abs() < 1e-9);
        assert!((half.seconds_remaining - 2.5).abs() < 1e-9);
        assert_eq!(half.percent(), 50);
        assert_eq!(half.display_seconds(), 3);

        let over = CountdownSample::at(ms(9_000), five);
        assert_eq!(over, CountdownSample::complete());
        assert_eq!(over.display_seconds(), 0);
        assert_eq!(
            CountdownSample::at(ms(0), Duration::ZERO),
            CountdownSample::complete()
        );
    }

    #[test]
    fn close_is_refused_while_countdown_runs() {
        let mut gate = active_gate();
        gate.tick(ms(4_900));
        let Err(GateError::CloseRefused { mode, .. }) = gate.request_close() else {
            panic!("close was not refused");
        };
        assert_eq!(mode, GateMode::Active);
        assert_eq!(gate.outcome(), None);
        assert_eq!(gate.mode(), GateMode::Active);
    }

    #[test]
    fn close_window_opens_when_countdown_reads_zero() {
        let mut gate = active_gate();
        gate.tick(ms(5_000));
        assert_eq!(gate.mode(), GateMode::Active);
        assert!(gate.can_close());
        assert_eq!(gate.request_close(), Ok(GateOutcome::Cancelled));
        assert!(gate.is_closed());
        assert_eq!(gate.tick(ms(10_000)), None);
        assert_eq!(gate.request_close(), Err(GateError::Closed));
    }

    #[test]
    fn finishing_cannot_be_closed_and_completes_once() {
        let mut gate = active_gate();
        gate.tick(ms(5_000));
        gate.tick(ms(5_100));
        assert_eq!(gate.mode(), GateMode::Finishing);
        assert!(!gate.can_close());
        assert_eq!(gate.tick(ms(5_800)), None);
        assert_eq!(
            gate.tick(ms(5_900)),
            Some(GateOutcome::Unlocked(UnlockSource::Countdown))
        );
        assert_eq!(gate.tick(ms(7_000)), None);
        assert_eq!(
            gate.history(),
            &[
                GateMode::Loading,
                GateMode::Active,
                GateMode::Finishing,
                GateMode::Closed,
            ]
        );
    }

    #[test]
    fn backwards_time_does_not_rewind_the_countdown() {
        let mut gate = active_gate();
        gate.tick(ms(3_000));
        let before = gate.sample();
        gate.tick(ms(1_000));
        assert!(gate.sample().elapsed_fraction >= before.elapsed_fraction);
    }

    #[test]
    fn resolve_twice_is_rejected() {
        let mut gate = active_gate();
        assert_eq!(
            gate.resolve(ProviderOutcome::Success, ms(10)),
            Err(GateError::NotLoading(GateMode::Active))
        );
        assert_eq!(gate.outcome(), None);
    }

    #[test]
    fn dismissed_native_ad_cancels_without_unlock() {
        let mut gate = AdGate::open(UnlockRequest::new("m1"), GateTiming::default());
        assert_eq!(
            gate.resolve(ProviderOutcome::Dismissed, ms(900)),
            Ok(Some(GateOutcome::Cancelled))
        );
        assert_eq!(gate.outcome(), Some(GateOutcome::Cancelled));
        assert_eq!(gate.history(), &[GateMode::Loading, GateMode::Closed]);
        assert_eq!(gate.tick(ms(60_000)), None);
    }

    #[test]
    fn loading_gate_cannot_be_closed() {
        let mut gate = AdGate::open(UnlockRequest::new("m1"), GateTiming::default());
        assert!(gate.request_close().is_err());
        assert_eq!(gate.tick(ms(60_000)), None);
        assert_eq!(gate.mode(), GateMode::Loading);
    }

    #[test]
    fn slot_allows_one_open_gate() {
        let mut slot = GateSlot::new();
        let gate = slot
            .open(UnlockRequest::new("m1"), GateTiming::default())
            .unwrap();
        let err = slot
            .open(UnlockRequest::new("m2"), GateTiming::default())
            .unwrap_err();
        assert_eq!(
            err,
            GateError::SlotBusy {
                map_id: "m1".into()
            }
        );
        gate.borrow_mut()
            .resolve(ProviderOutcome::Error("offline".into()), ms(0))
            .unwrap();
        assert!(slot.is_busy());
        gate.borrow_mut().request_close().unwrap();
        assert!(!slot.is_busy());
        slot.release_closed();
        assert!(slot.current().is_none());
        assert!(
            slot.open(UnlockRequest::new("m2"), GateTiming::default())
                .is_ok()
        );
    }

    #[test]
    fn abandoning_frees_the_slot_once() {
        let mut slot = GateSlot::new();
        let gate = slot
            .open(UnlockRequest::new("m1"), GateTiming::default())
            .unwrap();
        assert_eq!(gate.borrow_mut().abandon(), Some(GateOutcome::Cancelled));
        assert_eq!(gate.borrow_mut().abandon(), None);
        assert!(!slot.is_busy());
        assert_eq!(
            gate.borrow().history(),
            &[GateMode::Loading, GateMode::Closed]
        );
    }
}
