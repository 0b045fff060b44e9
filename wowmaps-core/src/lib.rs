//! WOW Maps core
//!
//! Platform-agnostic logic for the WOW Maps catalog: records, the ad-gated
//! unlock state machine and its driver, catalog store clients, navigation
//! snapshots and the admin console rules. Nothing here touches a browser;
//! platform glue plugs in through the traits re-exported below.

pub mod ad_gate;
pub mod ad_provider;
pub mod admin;
pub mod assistant;
pub mod catalog;
pub mod config;
pub mod firestore;
pub mod gate_driver;
pub mod model;
pub mod navigation;
pub mod rest;
pub mod seed;

pub use ad_gate::{
    AdGate, CountdownSample, GateError, GateMode, GateOutcome, GateSlot, GateTiming, SharedGate,
    UnlockRequest, UnlockSource,
};
pub use ad_provider::{
    AdRewardProvider, Platform, ProviderOutcome, RewardRequest, ScriptedProvider, SimulatedProvider,
};
pub use admin::{
    AdminError, AdminPanel, AdminTab, AdminTask, SaveOutcome, StatusKind, StatusMessage,
};
pub use assistant::{
    AssistError, GeminiAssistant, ScriptedAssistant, TextAssistant, enrich_description,
};
pub use catalog::{CatalogError, CatalogReader, CatalogStore, MemoryCatalog};
pub use config::{AdConfig, AppConfig, ConfigError};
pub use firestore::{FirestoreCatalog, FirestoreEndpoint};
pub use gate_driver::{GateClock, GateDriver, VirtualClock};
pub use model::{Category, CategoryDraft, CategoryPatch, MapDraft, MapEntry, MapPatch, filter_maps};
pub use navigation::{AppSnapshot, View};
pub use rest::{Method, RestCall, RestReply, RestTransport, TransportError};
pub use seed::SeedCatalog;
