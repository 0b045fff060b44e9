//! Sequential driver for an [`AdGate`].
//!
//! `wait(loading) -> provider.show().await -> resolve -> { wait(tick); tick }`
//! until the gate closes. The loop checks the gate after every suspension, so
//! a close from the UI stops it before the next tick is applied.
use std::cell::Cell;
use std::time::Duration;

use crate::ad_gate::{AdGate, GateOutcome, SharedGate};
use crate::ad_provider::{AdRewardProvider, RewardRequest};

/// Time source and timer for the driver.
#[async_trait::async_trait(?Send)]
pub trait GateClock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock whose `sleep` completes immediately and advances virtual time.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Cell<Duration>,
    jitter: Cell<Duration>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra delay added to every subsequent sleep, modelling late timers.
    pub fn set_jitter(&self, jitter: Duration) {
        self.jitter.set(jitter);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[async_trait::async_trait(?Send)]
impl GateClock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration + self.jitter.get());
    }
}

/// Runs one gate against a provider and a clock.
pub struct GateDriver<'a, P: ?Sized, C: ?Sized> {
    provider: &'a P,
    clock: &'a C,
}

impl<'a, P, C> GateDriver<'a, P, C>
where
    P: AdRewardProvider + ?Sized,
    C: GateClock + ?Sized,
{
    pub const fn new(provider: &'a P, clock: &'a C) -> Self {
        Self { provider, clock }
    }

    /// Drive `gate` until it emits an outcome or stops needing the driver.
    ///
    /// Returns the outcome produced by the provider or the countdown. `None`
    /// means the gate is waiting on the user (error screen) or was closed from
    /// elsewhere, in which case that caller already received the outcome.
    /// `observe` runs after every state change.
    pub async fn run(
        &self,
        gate: &SharedGate,
        request: &RewardRequest,
        mut observe: impl FnMut(&AdGate),
    ) -> Option<GateOutcome> {
        let origin = self.clock.now();
        let elapsed = || self.clock.now().saturating_sub(origin);
        let timing = gate.borrow().timing();

        self.clock.sleep(timing.loading).await;
        if gate.borrow().is_closed() {
            return None;
        }

        let provider_outcome = self.provider.show_rewarded(request).await;
        {
            let mut current = gate.borrow_mut();
            match current.resolve(provider_outcome, elapsed()) {
                Ok(Some(outcome)) => {
                    observe(&current);
                    return Some(outcome);
                }
                Ok(None) => observe(&current),
                Err(err) => {
                    log::warn!("Dropping provider outcome: {err}");
                    return None;
                }
            }
        }

        loop {
            if !gate.borrow().is_running() {
                return None;
            }
            self.clock.sleep(timing.tick).await;
            let mut current = gate.borrow_mut();
            if current.is_closed() {
                return None;
            }
            let outcome = current.tick(elapsed());
            observe(&current);
            if outcome.is_some() {
                return outcome;
            }
        }
    }
}
