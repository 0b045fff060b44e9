//! Application configuration
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_DATA: &str = include_str!("../../wowmaps-web/static/assets/data/config.json");

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(String),
    #[error("reward duration must be greater than zero")]
    ZeroRewardDuration,
    #[error("countdown tick must be greater than zero")]
    ZeroTick,
    #[error("countdown tick ({tick_ms}ms) exceeds reward duration ({duration_ms}ms)")]
    TickExceedsDuration { tick_ms: u64, duration_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ads: AdConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub app: UiTimings,
}

/// Rewarded-ad settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdConfig {
    #[serde(default = "default_android_unit")]
    pub android_rewarded_id: String,
    #[serde(default = "default_ios_unit")]
    pub ios_rewarded_id: String,
    #[serde(default = "default_sponsor_url")]
    pub web_sponsor_url: String,
    #[serde(default = "default_true")]
    pub test_mode: bool,
    #[serde(default = "default_reward_secs")]
    pub reward_duration_secs: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_finishing_ms")]
    pub finishing_ms: u64,
    #[serde(default = "default_loading_ms")]
    pub loading_ms: u64,
    /// Device ids registered for test ads on native builds.
    #[serde(default)]
    pub testing_devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_word_limit")]
    pub word_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Lower-case hex SHA-256 digest of the shared passphrase.
    #[serde(default)]
    pub passphrase_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiTimings {
    #[serde(default = "default_splash_ms")]
    pub splash_ms: u64,
    #[serde(default = "default_status_ms")]
    pub status_ms: u64,
    #[serde(default = "default_copy_confirm_ms")]
    pub copy_confirm_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_android_unit() -> String {
    "ca-app-pub-3940256099942544/5224354917".to_string()
}

fn default_ios_unit() -> String {
    "ca-app-pub-3940256099942544/1712485313".to_string()
}

fn default_sponsor_url() -> String {
    "https://www.google.com/adsense/start/".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_reward_secs() -> u64 {
    5
}

const fn default_tick_ms() -> u64 {
    100
}

const fn default_finishing_ms() -> u64 {
    800
}

const fn default_loading_ms() -> u64 {
    1_500
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

const fn default_word_limit() -> u32 {
    60
}

const fn default_splash_ms() -> u64 {
    2_500
}

const fn default_status_ms() -> u64 {
    3_000
}

const fn default_copy_confirm_ms() -> u64 {
    2_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            android_rewarded_id: default_android_unit(),
            ios_rewarded_id: default_ios_unit(),
            web_sponsor_url: default_sponsor_url(),
            test_mode: true,
            reward_duration_secs: default_reward_secs(),
            tick_ms: default_tick_ms(),
            finishing_ms: default_finishing_ms(),
            loading_ms: default_loading_ms(),
            testing_devices: Vec::new(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            word_limit: default_word_limit(),
        }
    }
}

impl Default for UiTimings {
    fn default() -> Self {
        Self {
            splash_ms: default_splash_ms(),
            status_ms: default_status_ms(),
            copy_confirm_ms: default_copy_confirm_ms(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Parse the configuration shipped with the web assets, falling back to
    /// compiled-in defaults when it is malformed or invalid.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_CONFIG_DATA) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Falling back to default config: {err}");
                Self::default()
            }
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the timings are invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns an error if the ad countdown timings cannot drive a gate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let duration_ms = self.ads.reward_duration_secs.saturating_mul(1_000);
        if duration_ms == 0 {
            return Err(ConfigError::ZeroRewardDuration);
        }
        if self.ads.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.ads.tick_ms > duration_ms {
            return Err(ConfigError::TickExceedsDuration {
                tick_ms: self.ads.tick_ms,
                duration_ms,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn assistant_enabled(&self) -> bool {
        !self.assistant.api_key.trim().is_empty()
    }

    #[must_use]
    pub fn catalog_enabled(&self) -> bool {
        !self.catalog.project_id.trim().is_empty()
    }
}

impl AdConfig {
    #[must_use]
    pub const fn reward_duration(&self) -> Duration {
        Duration::from_secs(self.reward_duration_secs)
    }

    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub const fn finishing_delay(&self) -> Duration {
        Duration::from_millis(self.finishing_ms)
    }

    #[must_use]
    pub const fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_parses_and_validates() {
        let cfg = AppConfig::from_json(DEFAULT_CONFIG_DATA).unwrap();
        assert_eq!(cfg.ads.reward_duration_secs, 5);
        assert_eq!(cfg.ads.tick_ms, 100);
        assert_eq!(cfg.app.status_ms, 3_000);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_json("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.ads.reward_duration(), Duration::from_secs(5));
        assert_eq!(cfg.ads.finishing_delay(), Duration::from_millis(800));
        assert!(!cfg.assistant_enabled());
        assert!(!cfg.catalog_enabled());
    }

    #[test]
    fn invalid_timings_are_rejected() {
        let err = AppConfig::from_json(r#"{"ads":{"reward_duration_secs":0}}"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroRewardDuration);

        let err = AppConfig::from_json(r#"{"ads":{"tick_ms":0}}"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTick);

        let err = AppConfig::from_json(r#"{"ads":{"reward_duration_secs":1,"tick_ms":1500}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::TickExceedsDuration { .. }));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = AppConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON parsing error"));
    }
}
