use std::cell::RefCell;
use std::rc::Rc;

use wowmaps_core::{
    AdRewardProvider, AppConfig, CatalogStore, GateSlot, MemoryCatalog, SeedCatalog,
    SimulatedProvider, TextAssistant,
};

/// The collaborators the UI talks to, chosen once at start-up.
#[derive(Clone)]
pub struct Services {
    pub store: Rc<dyn CatalogStore>,
    pub assistant: Option<Rc<dyn TextAssistant>>,
    pub ads: Rc<dyn AdRewardProvider>,
    /// App-wide slot keeping at most one ad gate open.
    pub gates: Rc<RefCell<GateSlot>>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
            && Rc::ptr_eq(&self.ads, &other.ads)
            && Rc::ptr_eq(&self.gates, &other.gates)
            && match (&self.assistant, &other.assistant) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Services {
    /// Remote collaborators where configured, local stand-ins otherwise.
    #[must_use]
    pub fn from_config(cfg: &AppConfig, seed: &SeedCatalog) -> Self {
        let offline = Self::offline(seed);
        Self {
            store: remote_store(cfg).unwrap_or(offline.store),
            assistant: text_assistant(cfg),
            ads: native_ads(cfg).unwrap_or(offline.ads),
            gates: offline.gates,
        }
    }

    /// Seed-backed in-memory store, simulated ads and no assistant.
    #[must_use]
    pub fn offline(seed: &SeedCatalog) -> Self {
        Self {
            store: Rc::new(MemoryCatalog::from_seed_catalog(seed)),
            assistant: None,
            ads: Rc::new(SimulatedProvider),
            gates: Rc::new(RefCell::new(GateSlot::new())),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn remote_store(cfg: &AppConfig) -> Option<Rc<dyn CatalogStore>> {
    use wowmaps_core::{FirestoreCatalog, FirestoreEndpoint};

    if !cfg.catalog_enabled() {
        log::info!("No catalog project configured; using the bundled catalog");
        return None;
    }
    match FirestoreEndpoint::from_config(&cfg.catalog) {
        Ok(endpoint) => Some(Rc::new(FirestoreCatalog::new(
            endpoint,
            super::http::GlooTransport,
        )) as Rc<dyn CatalogStore>),
        Err(err) => {
            log::warn!("Catalog endpoint rejected: {err}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn remote_store(_cfg: &AppConfig) -> Option<Rc<dyn CatalogStore>> {
    None
}

#[cfg(target_arch = "wasm32")]
fn text_assistant(cfg: &AppConfig) -> Option<Rc<dyn TextAssistant>> {
    cfg.assistant_enabled().then(|| {
        Rc::new(wowmaps_core::GeminiAssistant::new(
            cfg.assistant.clone(),
            super::http::GlooTransport,
        )) as Rc<dyn TextAssistant>
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn text_assistant(_cfg: &AppConfig) -> Option<Rc<dyn TextAssistant>> {
    None
}

#[cfg(target_arch = "wasm32")]
fn native_ads(cfg: &AppConfig) -> Option<Rc<dyn AdRewardProvider>> {
    let Some(admob) = super::admob::CapacitorAdMob::detect() else {
        log::info!("Web ad protocol: simulation mode enabled");
        return None;
    };
    let admob = Rc::new(admob);
    let init = Rc::clone(&admob);
    let ads = cfg.ads.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = init.initialize(&ads).await {
            log::error!("AdMob init failed: {err}");
        }
    });
    Some(admob as Rc<dyn AdRewardProvider>)
}

#[cfg(not(target_arch = "wasm32"))]
fn native_ads(_cfg: &AppConfig) -> Option<Rc<dyn AdRewardProvider>> {
    None
}
