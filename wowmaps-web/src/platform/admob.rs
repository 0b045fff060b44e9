//! Bridge to the Capacitor AdMob plugin inside the native app shell.
//!
//! The plugin is reached through `window.Capacitor.Plugins.AdMob`; every call
//! returns a promise. Only available when `Capacitor.isNativePlatform()`.
//!
//! `showRewardAd` resolves when the ad screen closes, whether or not the
//! reward was earned. Only the plugin's reward event counts as a reward.
use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wowmaps_core::{AdConfig, AdRewardProvider, Platform, ProviderOutcome, RewardRequest};

use super::PlatformError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeOptions<'a> {
    request_tracking_authorization: bool,
    testing_devices: &'a [String],
    initialize_for_testing: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RewardAdOptions<'a> {
    ad_id: &'a str,
    is_testing: bool,
}

/// Plugin event fired once the user has earned the reward.
pub const REWARDED_EVENT: &str = "onRewardedVideoAdReward";

pub struct CapacitorAdMob {
    plugin: JsValue,
    platform: Platform,
}

fn property(target: &JsValue, name: &str) -> Result<JsValue, PlatformError> {
    let value = Reflect::get(target, &JsValue::from_str(name))?;
    if value.is_undefined() || value.is_null() {
        Err(PlatformError::Missing("Capacitor AdMob plugin"))
    } else {
        Ok(value)
    }
}

fn call(target: &JsValue, method: &str, arg: Option<&JsValue>) -> Result<JsValue, PlatformError> {
    let func: Function = property(target, method)?.dyn_into()?;
    Ok(match arg {
        Some(arg) => func.call1(target, arg)?,
        None => func.call0(target)?,
    })
}

/// Registered plugin listener. Keeps the callback alive until removed.
struct Listener {
    handle: JsValue,
    _callback: Closure<dyn FnMut(JsValue)>,
}

impl Listener {
    async fn remove(self) {
        let removed = match call(&self.handle, "remove", None) {
            Ok(pending) => JsFuture::from(Promise::resolve(&pending))
                .await
                .map(drop)
                .map_err(PlatformError::from),
            Err(err) => Err(err),
        };
        if let Err(err) = removed {
            log::warn!("AdMob listener not removed: {err}");
        }
    }
}

impl CapacitorAdMob {
    /// The bridge, when running inside a native Capacitor shell with the plugin installed.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let capacitor = property(&js_sys::global(), "Capacitor").ok()?;
        let native = call(&capacitor, "isNativePlatform", None)
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !native {
            return None;
        }
        let platform = call(&capacitor, "getPlatform", None)
            .ok()
            .and_then(|v| v.as_string())
            .map_or(Platform::Android, |name| Platform::from_name(&name));
        let plugin = property(&capacitor, "Plugins")
            .and_then(|plugins| property(&plugins, "AdMob"))
            .ok()?;
        Some(Self { plugin, platform })
    }

    async fn invoke(&self, method: &str, arg: &JsValue) -> Result<JsValue, PlatformError> {
        let promise: Promise = call(&self.plugin, method, Some(arg))?.dyn_into()?;
        Ok(JsFuture::from(promise).await?)
    }

    fn options<T: Serialize>(value: &T) -> Result<JsValue, PlatformError> {
        serde_wasm_bindgen::to_value(value).map_err(|err| PlatformError::Js(err.to_string()))
    }

    /// # Errors
    /// Returns the plugin's rejection when the SDK fails to start.
    pub async fn initialize(&self, cfg: &AdConfig) -> Result<(), PlatformError> {
        let options = Self::options(&InitializeOptions {
            request_tracking_authorization: true,
            testing_devices: if cfg.test_mode {
                cfg.testing_devices.as_slice()
            } else {
                &[]
            },
            initialize_for_testing: cfg.test_mode,
        })?;
        self.invoke("initialize", &options).await?;
        log::info!("AdMob initialized on {:?}", self.platform);
        Ok(())
    }

    /// `addListener` answers with a handle or a promise of one, depending on
    /// the plugin version.
    async fn listen(
        &self,
        event: &'static str,
        fired: Rc<Cell<bool>>,
    ) -> Result<Listener, PlatformError> {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_payload: JsValue| {
            log::debug!("AdMob event {event}");
            fired.set(true);
        });
        let add: Function = property(&self.plugin, "addListener")?.dyn_into()?;
        let pending = add.call2(&self.plugin, &JsValue::from_str(event), callback.as_ref())?;
        let handle = JsFuture::from(Promise::resolve(&pending)).await?;
        Ok(Listener {
            handle,
            _callback: callback,
        })
    }

    /// Show one rewarded ad. `Ok(true)` only if the reward event fired
    /// before the ad screen closed.
    async fn prepare_and_show(&self, request: &RewardRequest) -> Result<bool, PlatformError> {
        let options = Self::options(&RewardAdOptions {
            ad_id: &request.ad_unit_id,
            is_testing: request.test_mode,
        })?;
        self.invoke("prepareRewardAd", &options).await?;

        let rewarded = Rc::new(Cell::new(false));
        let listener = self.listen(REWARDED_EVENT, Rc::clone(&rewarded)).await?;
        let shown = self.invoke("showRewardAd", &JsValue::UNDEFINED).await;
        listener.remove().await;
        shown?;
        Ok(rewarded.get())
    }
}

#[async_trait::async_trait(?Send)]
impl AdRewardProvider for CapacitorAdMob {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn show_rewarded(&self, request: &RewardRequest) -> ProviderOutcome {
        match self.prepare_and_show(request).await {
            Ok(true) => {
                log::info!("Rewarded ad completed");
                ProviderOutcome::Success
            }
            Ok(false) => {
                log::info!("Rewarded ad dismissed before the reward");
                ProviderOutcome::Dismissed
            }
            Err(err) => {
                log::error!("AdMob error: {err}");
                ProviderOutcome::Error(err.to_string())
            }
        }
    }
}
