//! Admin console: passphrase gate, record forms and transient status lines.
//!
//! [`AdminPanel`] is a plain value. The async operations take `&mut self`
//! plus the collaborators they need, so a UI can run them on an owned copy
//! and publish the result when they finish.
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assistant::{TextAssistant, briefing};
use crate::catalog::{CatalogError, CatalogStore};
use crate::config::{AdConfig, AppConfig};
use crate::model::{CATEGORY_ICONS, Category, CategoryDraft, MapDraft, MapEntry};

pub const INVALID_KEY: &str = "Invalid Key";
pub const DATABASE_UPDATED: &str = "Database Updated";
pub const MAP_DEPLOYED: &str = "Map Deployed";
pub const AI_INTEL_GENERATED: &str = "AI Intel Generated";
pub const AI_DOWNLINK_FAILED: &str = "AI Downlink Failed";
pub const SYNC_FAILED: &str = "Sync Failed";

/// Lower-case hex SHA-256 of `passphrase`.
#[must_use]
pub fn passphrase_digest(passphrase: &str) -> String {
    Sha256::digest(passphrase.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Compare `entered` against the stored digest. An empty digest locks the panel.
#[must_use]
pub fn verify_passphrase(expected_sha256: &str, entered: &str) -> bool {
    let expected = expected_sha256.trim().to_ascii_lowercase();
    !expected.is_empty() && passphrase_digest(entered) == expected
}

/// Why an admin action did not go through. The display text is what the
/// status line shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("Invalid Key")]
    Locked,
    #[error("Title required")]
    TitleRequired,
    #[error("Required fields missing")]
    RequiredFieldsMissing,
    #[error("Enter Title First")]
    EnterTitleFirst,
    #[error("Operation Failed")]
    Store(#[source] CatalogError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    Categories,
    Maps,
    Monetization,
}

impl AdminTab {
    pub const ALL: [Self; 3] = [Self::Categories, Self::Maps, Self::Monetization];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Maps => "maps",
            Self::Monetization => "monetization",
        }
    }
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Duration,
}

impl StatusMessage {
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }
}

/// Which record a save touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
}

/// # Errors
/// Returns [`AdminError::TitleRequired`] when the title is blank.
pub fn validate_category(form: &CategoryDraft) -> Result<(), AdminError> {
    if form.title.trim().is_empty() {
        Err(AdminError::TitleRequired)
    } else {
        Ok(())
    }
}

/// # Errors
/// Returns [`AdminError::RequiredFieldsMissing`] when title, category or code is blank.
pub fn validate_map(form: &MapDraft) -> Result<(), AdminError> {
    let missing = [&form.title, &form.category_id, &form.code]
        .iter()
        .any(|field| field.trim().is_empty());
    if missing {
        Err(AdminError::RequiredFieldsMissing)
    } else {
        Ok(())
    }
}

/// Read-only rows shown on the monetization tab.
#[must_use]
pub fn monetization_rows(cfg: &AdConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Android reward unit", cfg.android_rewarded_id.clone()),
        ("iOS reward unit", cfg.ios_rewarded_id.clone()),
        ("Test mode", if cfg.test_mode { "on" } else { "off" }.to_string()),
        ("Reward countdown", format!("{}s", cfg.reward_duration_secs)),
        ("Web sponsor", cfg.web_sponsor_url.clone()),
    ]
}

/// Console operation that outlives one event handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdminTask {
    /// Login, save or delete against the store.
    Write,
    /// Assistant briefing for the map form.
    Briefing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminPanel {
    passphrase_sha256: String,
    status_ttl: Duration,
    authenticated: bool,
    tab: AdminTab,
    editing_id: Option<String>,
    pub category_form: CategoryDraft,
    pub map_form: MapDraft,
    categories: Vec<Category>,
    maps: Vec<MapEntry>,
    status: Option<StatusMessage>,
    task: Option<AdminTask>,
}

impl AdminPanel {
    #[must_use]
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            passphrase_sha256: cfg.admin.passphrase_sha256.clone(),
            status_ttl: Duration::from_millis(cfg.app.status_ms),
            authenticated: false,
            tab: AdminTab::Categories,
            editing_id: None,
            category_form: CategoryDraft::default(),
            map_form: MapDraft::default(),
            categories: Vec::new(),
            maps: Vec::new(),
            status: None,
            task: None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub const fn tab(&self) -> AdminTab {
        self.tab
    }

    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn maps(&self) -> &[MapEntry] {
        &self.maps
    }

    /// The current status line, unless it has expired by `now`.
    #[must_use]
    pub fn status(&self, now: Duration) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| !s.is_expired(now))
    }

    pub fn clear_expired_status(&mut self, now: Duration) {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
        }
    }

    fn show(&mut self, text: impl Into<String>, kind: StatusKind, now: Duration) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: now + self.status_ttl,
        });
    }

    fn fail(&mut self, err: AdminError, now: Duration) -> AdminError {
        if let AdminError::Store(source) = &err {
            log::warn!("Admin write failed: {source}");
        }
        self.show(err.to_string(), StatusKind::Error, now);
        err
    }

    /// # Errors
    /// Returns [`AdminError::Locked`] and shows "Invalid Key" on a wrong passphrase.
    pub fn login(&mut self, entered: &str, now: Duration) -> Result<(), AdminError> {
        if verify_passphrase(&self.passphrase_sha256, entered) {
            log::info!("Admin console unlocked");
            self.authenticated = true;
            Ok(())
        } else {
            log::warn!("Rejected admin passphrase");
            Err(self.fail(AdminError::Locked, now))
        }
    }

    fn ensure_authenticated(&self) -> Result<(), AdminError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AdminError::Locked)
        }
    }

    /// The operation in flight, if any.
    #[must_use]
    pub const fn task(&self) -> Option<AdminTask> {
        self.task
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Mark `task` as running. Returns `false` while another task runs.
    pub fn begin_task(&mut self, task: AdminTask) -> bool {
        if let Some(running) = self.task {
            log::debug!("Admin {task:?} refused while {running:?} runs");
            return false;
        }
        self.task = Some(task);
        true
    }

    pub fn end_task(&mut self) {
        self.task = None;
    }

    /// Ignored while a task runs.
    pub fn select_tab(&mut self, tab: AdminTab) {
        if self.is_busy() {
            return;
        }
        self.tab = tab;
        self.reset_forms();
    }

    pub fn reset_forms(&mut self) {
        self.editing_id = None;
        self.category_form = CategoryDraft::default();
        self.map_form = MapDraft::default();
    }

    pub fn edit_category(&mut self, category: &Category) {
        if self.is_busy() {
            return;
        }
        self.editing_id = Some(category.id.clone());
        self.category_form = category.to_draft();
    }

    pub fn edit_map(&mut self, map: &MapEntry) {
        if self.is_busy() {
            return;
        }
        self.editing_id = Some(map.id.clone());
        self.map_form = map.to_draft();
    }

    /// Unknown icon names are ignored, as is any change while a task runs.
    pub fn set_category_icon(&mut self, icon: &str) {
        if !self.is_busy() && CATEGORY_ICONS.contains(&icon) {
            self.category_form.icon = icon.to_string();
        }
    }

    /// Refresh both lists. A failure keeps the previous lists and shows "Sync Failed".
    ///
    /// # Errors
    /// Returns the store error from the first failing read.
    pub async fn reload<S>(&mut self, store: &S, now: Duration) -> Result<(), CatalogError>
    where
        S: CatalogStore + ?Sized,
    {
        self.fetch_lists(store).await.inspect_err(|err| {
            log::warn!("Admin reload failed: {err}");
            self.show(SYNC_FAILED, StatusKind::Error, now);
        })
    }

    async fn fetch_lists<S>(&mut self, store: &S) -> Result<(), CatalogError>
    where
        S: CatalogStore + ?Sized,
    {
        let categories = store.list_categories().await?;
        let maps = store.list_maps().await?;
        self.categories = categories;
        self.maps = maps;
        Ok(())
    }

    /// Refresh after a write that already succeeded. A failed read keeps the
    /// write's status line.
    async fn refresh_after_write<S>(&mut self, store: &S)
    where
        S: CatalogStore + ?Sized,
    {
        if let Err(err) = self.fetch_lists(store).await {
            log::warn!("Write stored but lists not refreshed: {err}");
        }
    }

    /// Create or update the category in the form.
    ///
    /// # Errors
    /// Returns the validation or store failure, also shown as the status line.
    pub async fn save_category<S>(
        &mut self,
        store: &S,
        now: Duration,
    ) -> Result<SaveOutcome, AdminError>
    where
        S: CatalogStore + ?Sized,
    {
        self.ensure_authenticated()?;
        if let Err(err) = validate_category(&self.category_form) {
            return Err(self.fail(err, now));
        }
        let result = match self.editing_id.clone() {
            Some(id) => store
                .update_category(&id, &self.category_form.clone().into())
                .await
                .map(|()| SaveOutcome::Updated(id)),
            None => store
                .create_category(&self.category_form)
                .await
                .map(SaveOutcome::Created),
        };
        self.after_save(store, result, DATABASE_UPDATED, now).await
    }

    /// Create or update the map in the form.
    ///
    /// # Errors
    /// Returns the validation or store failure, also shown as the status line.
    pub async fn save_map<S>(&mut self, store: &S, now: Duration) -> Result<SaveOutcome, AdminError>
    where
        S: CatalogStore + ?Sized,
    {
        self.ensure_authenticated()?;
        if let Err(err) = validate_map(&self.map_form) {
            return Err(self.fail(err, now));
        }
        let result = match self.editing_id.clone() {
            Some(id) => store
                .update_map(&id, &self.map_form.clone().into())
                .await
                .map(|()| SaveOutcome::Updated(id)),
            None => store
                .create_map(&self.map_form)
                .await
                .map(SaveOutcome::Created),
        };
        self.after_save(store, result, MAP_DEPLOYED, now).await
    }

    async fn after_save<S>(
        &mut self,
        store: &S,
        result: Result<SaveOutcome, CatalogError>,
        success: &str,
        now: Duration,
    ) -> Result<SaveOutcome, AdminError>
    where
        S: CatalogStore + ?Sized,
    {
        match result {
            Ok(outcome) => {
                log::info!("Admin save succeeded: {outcome:?}");
                self.show(success, StatusKind::Success, now);
                self.reset_forms();
                self.refresh_after_write(store).await;
                Ok(outcome)
            }
            Err(err) => Err(self.fail(AdminError::Store(err), now)),
        }
    }

    /// # Errors
    /// Returns the store failure, also shown as the status line.
    pub async fn delete_category<S>(
        &mut self,
        store: &S,
        id: &str,
        now: Duration,
    ) -> Result<(), AdminError>
    where
        S: CatalogStore + ?Sized,
    {
        self.ensure_authenticated()?;
        match store.delete_category(id).await {
            Ok(()) => {
                self.refresh_after_write(store).await;
                Ok(())
            }
            Err(err) => Err(self.fail(AdminError::Store(err), now)),
        }
    }

    /// # Errors
    /// Returns the store failure, also shown as the status line.
    pub async fn delete_map<S>(
        &mut self,
        store: &S,
        id: &str,
        now: Duration,
    ) -> Result<(), AdminError>
    where
        S: CatalogStore + ?Sized,
    {
        self.ensure_authenticated()?;
        match store.delete_map(id).await {
            Ok(()) => {
                self.refresh_after_write(store).await;
                Ok(())
            }
            Err(err) => Err(self.fail(AdminError::Store(err), now)),
        }
    }

    /// Replace the map description with an assistant briefing. On failure the
    /// description is kept and "AI Downlink Failed" is shown.
    ///
    /// # Errors
    /// Returns [`AdminError::EnterTitleFirst`] when the map form has no title.
    pub async fn run_briefing<A>(
        &mut self,
        assistant: Option<&A>,
        now: Duration,
    ) -> Result<(), AdminError>
    where
        A: TextAssistant + ?Sized,
    {
        self.ensure_authenticated()?;
        if self.map_form.title.trim().is_empty() {
            return Err(self.fail(AdminError::EnterTitleFirst, now));
        }
        match briefing(assistant, &self.map_form.title, &self.map_form.description).await {
            Ok(text) => {
                self.map_form.description = text;
                self.show(AI_INTEL_GENERATED, StatusKind::Success, now);
            }
            Err(err) => {
                log::warn!("Briefing for {:?} failed: {err}", self.map_form.title);
                self.show(AI_DOWNLINK_FAILED, StatusKind::Error, now);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistError, ScriptedAssistant};
    use crate::catalog::MemoryCatalog;
    use futures::executor::block_on;

    const T0: Duration = Duration::ZERO;

    fn config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.admin.passphrase_sha256 = passphrase_digest("open sesame");
        cfg
    }

    fn unlocked_panel() -> AdminPanel {
        let mut panel = AdminPanel::new(&config());
        panel.login("open sesame", T0).unwrap();
        panel
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            passphrase_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(verify_passphrase(&passphrase_digest("abc").to_uppercase(), "abc"));
        assert!(!verify_passphrase("", ""));
    }

    #[test]
    fn wrong_key_shows_invalid_key_until_expiry() {
        let mut panel = AdminPanel::new(&config());
        assert_eq!(panel.login("guess", T0), Err(AdminError::Locked));
        assert!(!panel.is_authenticated());
        let status = panel.status(Duration::from_millis(2_999)).unwrap();
        assert_eq!(status.text, INVALID_KEY);
        assert_eq!(status.kind, StatusKind::Error);
        assert!(panel.status(Duration::from_millis(3_000)).is_none());
        panel.clear_expired_status(Duration::from_millis(3_000));
        assert!(panel.status(T0).is_none());
    }

    #[test]
    fn locked_panel_refuses_writes() {
        let store = MemoryCatalog::default();
        let mut panel = AdminPanel::new(&config());
        panel.category_form.title = "X".into();
        assert_eq!(
            block_on(panel.save_category(&store, T0)),
            Err(AdminError::Locked)
        );
        assert!(block_on(store.list_categories()).unwrap().is_empty());
    }

    #[test]
    fn form_validation_messages() {
        let mut panel = unlocked_panel();
        let store = MemoryCatalog::default();
        assert_eq!(
            block_on(panel.save_category(&store, T0)),
            Err(AdminError::TitleRequired)
        );
        assert_eq!(panel.status(T0).unwrap().text, "Title required");

        panel.map_form.title = "Map".into();
        panel.map_form.code = "1234".into();
        assert_eq!(
            block_on(panel.save_map(&store, T0)),
            Err(AdminError::RequiredFieldsMissing)
        );
        assert_eq!(panel.status(T0).unwrap().text, "Required fields missing");
    }

    #[test]
    fn save_creates_then_updates_the_edited_record() {
        let store = MemoryCatalog::default();
        let mut panel = unlocked_panel();
        panel.category_form.title = "Arena".into();
        let Ok(SaveOutcome::Created(id)) = block_on(panel.save_category(&store, T0)) else {
            panic!("expected create");
        };
        assert_eq!(panel.status(T0).unwrap().text, DATABASE_UPDATED);
        assert_eq!(panel.category_form, CategoryDraft::default());
        assert_eq!(panel.categories().len(), 1);

        let arena = panel.categories()[0].clone();
        panel.edit_category(&arena);
        panel.category_form.title = "Arena II".into();
        assert_eq!(
            block_on(panel.save_category(&store, T0)),
            Ok(SaveOutcome::Updated(id))
        );
        assert_eq!(panel.categories()[0].title, "Arena II");
        assert_eq!(panel.editing_id(), None);
    }

    #[test]
    fn store_failure_reports_operation_failed_and_keeps_form() {
        let store = MemoryCatalog::default();
        let mut panel = unlocked_panel();
        panel.map_form = MapDraft {
            category_id: "c".into(),
            title: "Map".into(),
            code: "1".into(),
            ..MapDraft::default()
        };
        store.fail_with(Some(CatalogError::Network("offline".into())));
        let err = block_on(panel.save_map(&store, T0)).unwrap_err();
        assert!(matches!(err, AdminError::Store(_)));
        assert_eq!(panel.status(T0).unwrap().text, "Operation Failed");
        assert_eq!(panel.map_form.title, "Map");
    }

    #[test]
    fn tab_switch_resets_forms() {
        let mut panel = unlocked_panel();
        panel.map_form.title = "Draft".into();
        panel.set_category_icon("Ghost");
        panel.set_category_icon("Dragon");
        assert_eq!(panel.category_form.icon, "Ghost");
        panel.select_tab(AdminTab::Maps);
        assert_eq!(panel.tab(), AdminTab::Maps);
        assert_eq!(panel.map_form, MapDraft::default());
        assert_eq!(panel.category_form.icon, "Sword");
    }

    #[test]
    fn delete_then_reload() {
        let store = MemoryCatalog::default();
        let id = block_on(store.create_map(&MapDraft {
            category_id: "c".into(),
            title: "Gone".into(),
            code: "1".into(),
            ..MapDraft::default()
        }))
        .unwrap();
        let mut panel = unlocked_panel();
        block_on(panel.reload(&store, T0)).unwrap();
        assert_eq!(panel.maps().len(), 1);
        block_on(panel.delete_map(&store, &id, T0)).unwrap();
        assert!(panel.maps().is_empty());
    }

    #[test]
    fn running_task_freezes_the_forms() {
        let mut panel = unlocked_panel();
        panel.map_form.title = "Ridge".into();
        let ridge = MapEntry {
            id: "m1".into(),
            category_id: "c".into(),
            title: "Other".into(),
            description: String::new(),
            thumbnail: String::new(),
            code: "7".into(),
        };

        assert!(panel.begin_task(AdminTask::Briefing));
        assert!(!panel.begin_task(AdminTask::Write));
        assert_eq!(panel.task(), Some(AdminTask::Briefing));
        panel.select_tab(AdminTab::Categories);
        panel.edit_map(&ridge);
        panel.set_category_icon("Ghost");
        assert_eq!(panel.map_form.title, "Ridge");
        assert_eq!(panel.editing_id(), None);
        assert_eq!(panel.category_form.icon, "Sword");

        panel.end_task();
        assert!(!panel.is_busy());
        panel.edit_map(&ridge);
        assert_eq!(panel.map_form.title, "Other");
        assert!(panel.begin_task(AdminTask::Write));
    }

    #[test]
    fn stored_write_keeps_its_status_when_refresh_fails() {
        let store = MemoryCatalog::default();
        let mut panel = unlocked_panel();
        store.fail_reads_with(Some(CatalogError::Network("flaky".into())));

        panel.map_form = MapDraft {
            category_id: "c".into(),
            title: "Dam".into(),
            code: "42".into(),
            ..MapDraft::default()
        };
        let Ok(SaveOutcome::Created(id)) = block_on(panel.save_map(&store, T0)) else {
            panic!("expected create");
        };
        assert_eq!(panel.status(T0).unwrap().text, MAP_DEPLOYED);
        assert_eq!(panel.status(T0).unwrap().kind, StatusKind::Success);
        assert!(panel.maps().is_empty());

        store.fail_reads_with(None);
        block_on(panel.reload(&store, T0)).unwrap();
        assert_eq!(panel.maps().len(), 1);

        store.fail_reads_with(Some(CatalogError::Network("flaky".into())));
        block_on(panel.delete_map(&store, &id, T0)).unwrap();
        assert_eq!(panel.status(T0).unwrap().text, MAP_DEPLOYED);

        let err = block_on(panel.reload(&store, T0)).unwrap_err();
        assert_eq!(err, CatalogError::Network("flaky".into()));
        assert_eq!(panel.status(T0).unwrap().text, SYNC_FAILED);
    }

    #[test]
    fn briefing_needs_title_and_falls_back_on_failure() {
        let mut panel = unlocked_panel();
        let assistant = ScriptedAssistant::new([
            Err(AssistError::Network("down".into())),
            Ok("Secure the ridge.".into()),
        ]);
        assert_eq!(
            block_on(panel.run_briefing(Some(&assistant), T0)),
            Err(AdminError::EnterTitleFirst)
        );

        panel.map_form.title = "Ridge".into();
        panel.map_form.description = "hill".into();
        block_on(panel.run_briefing(Some(&assistant), T0)).unwrap();
        assert_eq!(panel.map_form.description, "hill");
        assert_eq!(panel.status(T0).unwrap().text, AI_DOWNLINK_FAILED);

        block_on(panel.run_briefing(Some(&assistant), T0)).unwrap();
        assert_eq!(panel.map_form.description, "Secure the ridge.");
        assert_eq!(panel.status(T0).unwrap().text, AI_INTEL_GENERATED);
    }

    #[test]
    fn monetization_summary_lists_units() {
        let rows = monetization_rows(&AdConfig::default());
        assert_eq!(rows[0].0, "Android reward unit");
        assert!(
            rows.iter()
                .any(|(label, value)| *label == "Test mode" && value == "on")
        );
    }
}
