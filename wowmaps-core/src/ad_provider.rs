//! Rewarded-ad provider seam.
//!
//! The gate awaits a single [`ProviderOutcome`] from the provider instead of
//! registering reward/dismiss listeners.
use std::cell::RefCell;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::AdConfig;

/// Execution environment of the app shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Android,
    Ios,
}

impl Platform {
    #[must_use]
    pub const fn is_native(self) -> bool {
        !matches!(self, Self::Web)
    }

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Web,
        }
    }
}

/// What the provider needs to show one rewarded ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRequest {
    pub ad_unit_id: String,
    pub test_mode: bool,
    pub platform: Platform,
}

impl RewardRequest {
    /// iOS uses its own ad unit; every other platform uses the Android unit.
    #[must_use]
    pub fn for_platform(cfg: &AdConfig, platform: Platform) -> Self {
        let ad_unit_id = match platform {
            Platform::Ios => cfg.ios_rewarded_id.clone(),
            Platform::Android | Platform::Web => cfg.android_rewarded_id.clone(),
        };
        Self {
            ad_unit_id,
            test_mode: cfg.test_mode,
            platform,
        }
    }
}

/// Resolution of one provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "lowercase")]
pub enum ProviderOutcome {
    /// No native ad mechanism; the gate runs its own countdown.
    Simulated,
    /// The native ad was watched and the reward granted.
    Success,
    /// The native ad closed before the reward was earned.
    Dismissed,
    /// Preparing or showing the ad failed.
    Error(String),
}

#[async_trait::async_trait(?Send)]
pub trait AdRewardProvider {
    /// Platform this provider serves.
    fn platform(&self) -> Platform;

    /// Prepare and show a rewarded ad, resolving once the ad flow is over.
    async fn show_rewarded(&self, request: &RewardRequest) -> ProviderOutcome;
}

/// Provider for environments without a native ad SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

#[async_trait::async_trait(?Send)]
impl AdRewardProvider for SimulatedProvider {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn show_rewarded(&self, _request: &RewardRequest) -> ProviderOutcome {
        log::info!("Ad provider running in simulation mode");
        ProviderOutcome::Simulated
    }
}

/// Replays a fixed list of outcomes, then falls back to [`ProviderOutcome::Simulated`].
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    platform: Option<Platform>,
    outcomes: RefCell<VecDeque<ProviderOutcome>>,
    calls: RefCell<Vec<RewardRequest>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = ProviderOutcome>) -> Self {
        Self {
            platform: None,
            outcomes: RefCell::new(outcomes.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn on_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Requests received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RewardRequest> {
        self.calls.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl AdRewardProvider for ScriptedProvider {
    fn platform(&self) -> Platform {
        self.platform.unwrap_or(Platform::Web)
    }

    async fn show_rewarded(&self, request: &RewardRequest) -> ProviderOutcome {
        self.calls.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(ProviderOutcome::Simulated)
    }
}
