use anyhow::{Context, Result, bail, ensure};
use rand::Rng;
use std::time::Duration;

use wowmaps_core::admin::{
    AI_INTEL_GENERATED, DATABASE_UPDATED, INVALID_KEY, MAP_DEPLOYED, passphrase_digest,
};
use wowmaps_core::model::CATEGORY_ICONS;
use wowmaps_core::{
    AdminError, AdminPanel, AppConfig, CatalogError, CatalogReader, CatalogStore, CategoryDraft,
    MemoryCatalog, SaveOutcome, ScriptedAssistant, SeedCatalog, StatusKind, filter_maps,
};

use super::{IterationCtx, LogicScenario};

fn status_text(panel: &AdminPanel, now: Duration) -> Option<&str> {
    panel.status(now).map(|s| s.text.as_str())
}

fn access_code(ctx: &mut IterationCtx) -> String {
    let mut group = || ctx.rng.gen_range(0..10_000_u32);
    format!("{:04}-{:04}-{:04}", group(), group(), group())
}

pub struct AdminCrud;

#[async_trait::async_trait(?Send)]
impl LogicScenario for AdminCrud {
    fn name(&self) -> &'static str {
        "Admin console create, edit, brief and delete"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let passphrase = format!("key-{}", ctx.rng.r#gen::<u32>());
        let mut cfg = AppConfig::default();
        cfg.admin.passphrase_sha256 = passphrase_digest(&passphrase);
        let store = MemoryCatalog::with_seed(ctx.seed);
        let mut panel = AdminPanel::new(&cfg);
        let mut now = Duration::ZERO;

        ensure!(
            panel.login("guess", now) == Err(AdminError::Locked),
            "wrong passphrase accepted"
        );
        ensure!(
            status_text(&panel, now) == Some(INVALID_KEY),
            "rejected login showed {:?}",
            status_text(&panel, now)
        );
        panel.login(&passphrase, now)?;
        panel.reload(&store, now).await?;

        let title = format!("SECTOR {}", ctx.rng.gen_range(100..1_000));
        panel.category_form.title.clone_from(&title);
        panel.set_category_icon(CATEGORY_ICONS[ctx.rng.gen_range(0..CATEGORY_ICONS.len())]);
        let SaveOutcome::Created(category_id) = panel.save_category(&store, now).await? else {
            bail!("new category was reported as an update");
        };
        ensure!(
            status_text(&panel, now) == Some(DATABASE_UPDATED),
            "category save showed {:?}",
            status_text(&panel, now)
        );
        let category = panel
            .categories()
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .context("created category missing after reload")?;

        panel.edit_category(&category);
        panel.category_form.title = format!("{title} PRIME");
        ensure!(
            panel.save_category(&store, now).await? == SaveOutcome::Updated(category_id.clone()),
            "editing the category created a new record"
        );
        ensure!(
            panel.categories().len() == 1 && panel.categories()[0].title.ends_with("PRIME"),
            "category edit not persisted"
        );

        panel.map_form.title = "Kill House".into();
        ensure!(
            panel.save_map(&store, now).await == Err(AdminError::RequiredFieldsMissing),
            "map without category or code was saved"
        );
        panel.map_form.category_id.clone_from(&category_id);
        panel.map_form.code = access_code(ctx);

        let briefing = "Hold the east stairwell.";
        let assistant = ScriptedAssistant::new([Ok(briefing.to_string())]);
        panel.run_briefing(Some(&assistant), now).await?;
        ensure!(
            panel.map_form.description == briefing
                && status_text(&panel, now) == Some(AI_INTEL_GENERATED),
            "briefing not applied to the map form"
        );

        let SaveOutcome::Created(map_id) = panel.save_map(&store, now).await? else {
            bail!("new map was reported as an update");
        };
        ensure!(
            status_text(&panel, now) == Some(MAP_DEPLOYED),
            "map save showed {:?}",
            status_text(&panel, now)
        );
        let in_category = store.list_maps_by_category(&category_id).await?;
        ensure!(
            in_category
                .iter()
                .map(|m| m.id.as_str())
                .eq([map_id.as_str()]),
            "category lists {} maps",
            in_category.len()
        );
        ensure!(
            filter_maps(panel.maps(), "kill").len() == 1,
            "search misses the new map"
        );

        store.fail_with(Some(CatalogError::Network("uplink down".into())));
        let failed = panel.delete_map(&store, &map_id, now).await;
        ensure!(
            matches!(failed, Err(AdminError::Store(_))),
            "delete during an outage returned {failed:?}"
        );
        ensure!(
            panel
                .status(now)
                .is_some_and(|s| s.kind == StatusKind::Error),
            "outage produced no error status"
        );
        ensure!(panel.maps().len() == 1, "failed delete dropped the map");
        store.fail_with(None);

        now += Duration::from_millis(cfg.app.status_ms);
        ensure!(panel.status(now).is_none(), "status outlived its ttl");

        panel.delete_map(&store, &map_id, now).await?;
        panel.delete_category(&store, &category_id, now).await?;
        ensure!(
            panel.categories().is_empty() && panel.maps().is_empty(),
            "records survived deletion"
        );
        Ok(format!("{category_id}/{map_id} created and removed"))
    }
}

pub struct SeedMerge;

#[async_trait::async_trait(?Send)]
impl LogicScenario for SeedMerge {
    fn name(&self) -> &'static str {
        "Seed catalog stays first and survives outages"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let seed = SeedCatalog::load_from_static();
        ensure!(!seed.categories.is_empty(), "bundled catalog is empty");

        let remote = MemoryCatalog::with_seed(ctx.seed);
        let extra = ctx.rng.gen_range(1..=4_usize);
        for i in 0..extra {
            remote
                .create_category(&CategoryDraft {
                    title: format!("REMOTE {i}"),
                    ..CategoryDraft::default()
                })
                .await?;
        }
        let reader = CatalogReader::new(&remote);
        let merged = seed.merge_categories(reader.categories().await);
        ensure!(
            merged.len() == seed.categories.len() + extra,
            "merged {} categories from {} seeded and {extra} remote",
            merged.len(),
            seed.categories.len()
        );
        ensure!(
            merged[..seed.categories.len()] == seed.categories[..],
            "seeded categories lost their lead"
        );

        let mirror = MemoryCatalog::from_seed_catalog(&seed);
        let mirrored = CatalogReader::new(&mirror).maps().await;
        ensure!(
            seed.merge_maps(mirrored.clone()) == seed.maps,
            "remote copies of seeded maps were duplicated"
        );
        for category in &seed.categories {
            let scoped = seed.merge_category_maps(&category.id, mirrored.clone());
            ensure!(
                scoped.iter().all(|m| m.category_id == category.id),
                "{} lists maps from another category",
                category.id
            );
        }

        remote.fail_with(Some(CatalogError::Network("offline".into())));
        ensure!(
            seed.merge_categories(reader.categories().await) == seed.categories,
            "outage changed the seeded categories"
        );
        ensure!(
            seed.merge_maps(reader.maps().await) == seed.maps,
            "outage changed the seeded maps"
        );
        Ok(format!("{extra} remote categories merged behind the seed"))
    }
}
