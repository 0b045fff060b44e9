//! Catalog store seam and the in-memory implementation.
use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{Category, CategoryDraft, CategoryPatch, MapDraft, MapEntry, MapPatch};
use crate::seed::SeedCatalog;

/// Collection holding categories.
pub const CATEGORIES_COLLECTION: &str = "categories";
/// Collection holding maps.
pub const MAPS_COLLECTION: &str = "maps";

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Malformed document: {0}")]
    Decode(String),
    #[error("No {collection} record with id {id}")]
    NotFound { collection: String, id: String },
    #[error("Catalog store is not configured")]
    Unconfigured,
}

impl From<crate::rest::TransportError> for CatalogError {
    fn from(err: crate::rest::TransportError) -> Self {
        Self::Network(err.0)
    }
}

/// Remote collection of categories and maps.
///
/// Reads return unordered collections; creates return the generated id;
/// updates merge the present fields only; deletes are by id.
#[async_trait::async_trait(?Send)]
pub trait CatalogStore {
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn list_maps(&self) -> Result<Vec<MapEntry>, CatalogError>;
    /// # Errors
    /// Returns an error if the store cannot be queried.
    async fn list_maps_by_category(&self, category_id: &str)
    -> Result<Vec<MapEntry>, CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn create_category(&self, draft: &CategoryDraft) -> Result<String, CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be updated.
    async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<(), CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be deleted.
    async fn delete_category(&self, id: &str) -> Result<(), CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn create_map(&self, draft: &MapDraft) -> Result<String, CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be updated.
    async fn update_map(&self, id: &str, patch: &MapPatch) -> Result<(), CatalogError>;
    /// # Errors
    /// Returns an error if the record cannot be deleted.
    async fn delete_map(&self, id: &str) -> Result<(), CatalogError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    maps: Vec<MapEntry>,
}

/// Session-local store used when no remote project is configured, and by tests.
#[derive(Debug)]
pub struct MemoryCatalog {
    state: RefCell<MemoryState>,
    rng: RefCell<ChaCha8Rng>,
    fail_with: RefCell<Option<CatalogError>>,
    fail_reads_with: RefCell<Option<CatalogError>>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::with_seed(0x5EED_CA7A)
    }
}

impl MemoryCatalog {
    /// Empty store whose generated ids derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: RefCell::new(MemoryState::default()),
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
            fail_with: RefCell::new(None),
            fail_reads_with: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn from_seed_catalog(seed: &SeedCatalog) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.borrow_mut();
            state.categories.clone_from(&seed.categories);
            state.maps.clone_from(&seed.maps);
        }
        store
    }

    /// Make every following call fail with `err` until cleared with `None`.
    pub fn fail_with(&self, err: Option<CatalogError>) {
        *self.fail_with.borrow_mut() = err;
    }

    /// Like [`Self::fail_with`], but only the list calls fail.
    pub fn fail_reads_with(&self, err: Option<CatalogError>) {
        *self.fail_reads_with.borrow_mut() = err;
    }

    fn check(&self) -> Result<(), CatalogError> {
        self.fail_with.borrow().clone().map_or(Ok(()), Err)
    }

    fn check_read(&self) -> Result<(), CatalogError> {
        self.check()?;
        self.fail_reads_with.borrow().clone().map_or(Ok(()), Err)
    }

    fn next_id(&self) -> String {
        let mut rng = self.rng.borrow_mut();
        (0..ID_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
            .collect()
    }
}

fn not_found(collection: &str, id: &str) -> CatalogError {
    CatalogError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait::async_trait(?Send)]
impl CatalogStore for MemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.check_read()?;
        Ok(self.state.borrow().categories.clone())
    }

    async fn list_maps(&self) -> Result<Vec<MapEntry>, CatalogError> {
        self.check_read()?;
        Ok(self.state.borrow().maps.clone())
    }

    async fn list_maps_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<MapEntry>, CatalogError> {
        self.check_read()?;
        Ok(self
            .state
            .borrow()
            .maps
            .iter()
            .filter(|m| m.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<String, CatalogError> {
        self.check()?;
        let id = self.next_id();
        self.state
            .borrow_mut()
            .categories
            .push(Category::from_draft(id.clone(), draft.clone()));
        Ok(id)
    }

    async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<(), CatalogError> {
        self.check()?;
        let mut state = self.state.borrow_mut();
        let record = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found(CATEGORIES_COLLECTION, id))?;
        record.apply(patch.clone());
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        self.check()?;
        self.state.borrow_mut().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn create_map(&self, draft: &MapDraft) -> Result<String, CatalogError> {
        self.check()?;
        let id = self.next_id();
        self.state
            .borrow_mut()
            .maps
            .push(MapEntry::from_draft(id.clone(), draft.clone()));
        Ok(id)
    }

    async fn update_map(&self, id: &str, patch: &MapPatch) -> Result<(), CatalogError> {
        self.check()?;
        let mut state = self.state.borrow_mut();
        let record = state
            .maps
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(MAPS_COLLECTION, id))?;
        record.apply(patch.clone());
        Ok(())
    }

    async fn delete_map(&self, id: &str) -> Result<(), CatalogError> {
        self.check()?;
        self.state.borrow_mut().maps.retain(|m| m.id != id);
        Ok(())
    }
}

/// Read side used by the screens: failures become empty lists plus a warning.
pub struct CatalogReader<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> CatalogReader<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn categories(&self) -> Vec<Category> {
        degrade("categories", self.store.list_categories().await)
    }

    pub async fn maps(&self) -> Vec<MapEntry> {
        degrade("all maps", self.store.list_maps().await)
    }

    pub async fn maps_by_category(&self, category_id: &str) -> Vec<MapEntry> {
        degrade(
            "maps by category",
            self.store.list_maps_by_category(category_id).await,
        )
    }
}

fn degrade<T>(what: &str, result: Result<Vec<T>, CatalogError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        log::warn!("Error fetching {what}: {err}");
        Vec::new()
    })
}
