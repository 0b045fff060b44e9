use std::time::Duration;

use wasm_bindgen_test::*;
use wowmaps_core::{
    AdConfig, AdGate, AdRewardProvider, GateClock, GateOutcome, GateTiming, Platform,
    ProviderOutcome, RewardRequest, UnlockRequest, UnlockSource,
};
use wowmaps_web::platform::BrowserClock;
use wowmaps_web::platform::admob::{CapacitorAdMob, REWARDED_EVENT};
use wowmaps_web::platform::clock;

#[wasm_bindgen_test]
fn browser_clock_advances() {
    let first = clock::now();
    assert!(first > Duration::ZERO);
    assert!(BrowserClock.now() >= first);
}

#[wasm_bindgen_test]
async fn browser_clock_sleeps_at_least_the_requested_time() {
    let start = clock::now();
    BrowserClock.sleep(Duration::from_millis(50)).await;
    assert!(clock::now() - start >= Duration::from_millis(45));
}

const ADMOB_STUB: &str = r#"
window.Capacitor = {
  isNativePlatform: () => true,
  getPlatform: () => "android",
  Plugins: {
    AdMob: {
      grantReward: __GRANT__,
      listeners: {},
      removed: 0,
      addListener(event, callback) {
        const plugin = this;
        plugin.listeners[event] = callback;
        return Promise.resolve({
          remove() {
            delete plugin.listeners[event];
            plugin.removed += 1;
            return Promise.resolve();
          },
        });
      },
      prepareRewardAd(options) {
        this.prepared = options;
        return Promise.resolve();
      },
      showRewardAd() {
        const onReward = this.listeners["__EVENT__"];
        if (this.grantReward && onReward) {
          onReward({ type: "coins", amount: 1 });
        }
        return Promise.resolve();
      },
    },
  },
};
"#;

fn install_admob(grant_reward: bool) -> CapacitorAdMob {
    let script = ADMOB_STUB
        .replace("__GRANT__", if grant_reward { "true" } else { "false" })
        .replace("__EVENT__", REWARDED_EVENT);
    js_sys::eval(&script).expect("install stub plugin");
    CapacitorAdMob::detect().expect("native shell detected")
}

fn uninstall_admob() {
    js_sys::eval("delete window.Capacitor").expect("remove stub plugin");
}

fn eval_number(script: &str) -> f64 {
    js_sys::eval(script)
        .expect("read stub state")
        .as_f64()
        .expect("numeric stub state")
}

fn removed_listeners() -> f64 {
    eval_number("window.Capacitor.Plugins.AdMob.removed")
}

fn listener_count() -> f64 {
    eval_number("Object.keys(window.Capacitor.Plugins.AdMob.listeners).length")
}

async fn run_native_gate(bridge: &CapacitorAdMob) -> (ProviderOutcome, Option<GateOutcome>) {
    let request = RewardRequest::for_platform(&AdConfig::default(), bridge.platform());
    let provider_outcome = bridge.show_rewarded(&request).await;
    let mut gate = AdGate::open(UnlockRequest::new("m-native"), GateTiming::default());
    let outcome = gate
        .resolve(provider_outcome.clone(), Duration::ZERO)
        .expect("gate was loading");
    (provider_outcome, outcome)
}

#[wasm_bindgen_test]
async fn admob_dismissal_without_reward_does_not_unlock() {
    let bridge = install_admob(false);
    assert_eq!(bridge.platform(), Platform::Android);
    let (provider_outcome, outcome) = run_native_gate(&bridge).await;
    assert_eq!(provider_outcome, ProviderOutcome::Dismissed);
    assert_eq!(outcome, Some(GateOutcome::Cancelled));
    assert_eq!(removed_listeners(), 1.0);
    assert_eq!(listener_count(), 0.0);
    uninstall_admob();
}

#[wasm_bindgen_test]
async fn admob_reward_event_unlocks() {
    let bridge = install_admob(true);
    let (provider_outcome, outcome) = run_native_gate(&bridge).await;
    assert_eq!(provider_outcome, ProviderOutcome::Success);
    assert_eq!(
        outcome,
        Some(GateOutcome::Unlocked(UnlockSource::NativeReward))
    );
    assert_eq!(removed_listeners(), 1.0);
    uninstall_admob();
}
