use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub mod catalog;
pub mod gate;
pub mod navigation;

/// Largest extra delay added to a virtual timer.
pub const MAX_TIMER_JITTER_MS: u64 = 40;

/// Per-iteration inputs: the derived seed and a generator built from it.
#[derive(Debug, Clone)]
pub struct IterationCtx {
    pub seed: u64,
    pub rng: ChaCha8Rng,
    pub verbose: bool,
}

impl IterationCtx {
    #[must_use]
    pub fn new(seed: u64, verbose: bool) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            verbose,
        }
    }

    /// Random timer lateness in `0..=MAX_TIMER_JITTER_MS`.
    pub fn jitter(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(0..=MAX_TIMER_JITTER_MS))
    }
}

/// One property checked against the core over many seeded iterations.
///
/// `run_iteration` returns a one-line note for verbose output, or the first
/// broken expectation.
#[async_trait::async_trait(?Send)]
pub trait LogicScenario {
    fn name(&self) -> &'static str;

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String>;
}

const SCENARIOS: &[(&str, &str)] = &[
    ("smoke", "Practice map unlocks end to end"),
    ("gate-countdown", "Simulated countdown unlocks exactly once"),
    ("gate-provider-error", "Provider failure needs an explicit close"),
    ("gate-native-reward", "Native ad unlocks only when rewarded"),
    ("gate-early-close", "Closing before the countdown ends is refused"),
    ("gate-abandon", "Abandoned gates cancel once and free the slot"),
    ("admin-crud", "Admin console create, edit, brief and delete"),
    ("catalog-merge", "Seed catalog stays first and survives outages"),
    ("navigation", "Favorite toggles and unlocks keep their invariants"),
];

pub fn get_scenario(name: &str) -> Option<Box<dyn LogicScenario>> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(Box::new(gate::PracticeUnlock)),
        "gate-countdown" | "countdown" => Some(Box::new(gate::FullCountdown)),
        "gate-provider-error" | "provider-error" => Some(Box::new(gate::ProviderFailure)),
        "gate-native-reward" | "native" => Some(Box::new(gate::NativeReward)),
        "gate-early-close" | "early-close" => Some(Box::new(gate::EarlyClose)),
        "gate-abandon" | "abandon" => Some(Box::new(gate::Abandon)),
        "admin-crud" | "admin" => Some(Box::new(catalog::AdminCrud)),
        "catalog-merge" | "catalog" => Some(Box::new(catalog::SeedMerge)),
        "navigation" | "nav" => Some(Box::new(navigation::SnapshotInvariants)),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

/// Every scenario key, in listing order.
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS
        .iter()
        .map(|(key, _)| (*key).to_string())
        .collect()
}
