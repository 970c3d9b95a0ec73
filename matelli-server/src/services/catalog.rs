//! Catalog Service - meal CRUD, live catalog subscription and the initial seed

use std::time::Duration;

use indexmap::IndexMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Meal, MealDraft};

use super::default_menu::default_menu;
use crate::core::Config;
use crate::store::{Store, Subscription};

/// Outcome of a seed run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub written: usize,
    pub skipped: Vec<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    item_timeout: Duration,
    seed_timeout: Duration,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("item_timeout", &self.item_timeout)
            .field("seed_timeout", &self.seed_timeout)
            .finish()
    }
}

impl CatalogService {
    pub fn new(store: Store, item_timeout: Duration, seed_timeout: Duration) -> Self {
        Self {
            store,
            item_timeout,
            seed_timeout,
        }
    }

    pub fn from_config(store: Store, config: &Config) -> Self {
        Self::new(store, config.seed_item_timeout(), config.seed_timeout())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All meals, ordered by name
    pub fn list(&self) -> AppResult<Vec<Meal>> {
        Ok(self.store.list::<Meal>()?)
    }

    pub fn get(&self, id: &str) -> AppResult<Meal> {
        self.store
            .get::<Meal>(id)?
            .ok_or_else(|| AppError::meal_not_found(id))
    }

    /// Current catalog keyed by meal id, for resolving checkout references
    pub fn snapshot(&self) -> AppResult<IndexMap<String, Meal>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|meal| (meal.id.clone(), meal))
            .collect())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.store.count::<Meal>()? == 0)
    }

    /// Deliver the ordered catalog now and after every change
    pub fn subscribe<F>(&self, on_snapshot: F) -> Subscription
    where
        F: Fn(Vec<Meal>) + Send + Sync + 'static,
    {
        self.store.subscribe::<Meal, _>(on_snapshot)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validate and overwrite
    pub fn save(&self, draft: MealDraft) -> AppResult<Meal> {
        let meal = draft.validate()?;
        self.store.put(&meal)?;
        tracing::info!(meal_id = %meal.id, name = %meal.name, "Meal saved");
        Ok(meal)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.delete::<Meal>(id)? {
            return Err(AppError::meal_not_found(id));
        }
        tracing::info!(meal_id = %id, "Meal deleted");
        Ok(())
    }

    // =========================================================================
    // Seed
    // =========================================================================

    /// Write `drafts` in order, each write bounded by the item timeout and the
    /// whole run by the seed timeout.
    ///
    /// A failing first item aborts the seed: the store is rejecting writes.
    /// Later failures are logged and reported as skipped.
    pub async fn seed(&self, drafts: Vec<MealDraft>) -> AppResult<SeedReport> {
        if drafts.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::CatalogSeedFailed,
                "Nothing to seed",
            ));
        }

        let total = drafts.len();
        match tokio::time::timeout(self.seed_timeout, self.seed_items(drafts)).await {
            Ok(result) => {
                let report = result?;
                tracing::info!(
                    written = report.written,
                    skipped = report.skipped.len(),
                    total,
                    "Catalog seeded"
                );
                Ok(report)
            }
            Err(_) => {
                tracing::error!(timeout_ms = self.seed_timeout.as_millis() as u64, "Catalog seed timed out");
                Err(AppError::with_message(
                    ErrorCode::CatalogSeedFailed,
                    "Catalog seed timed out",
                ))
            }
        }
    }

    async fn seed_items(&self, drafts: Vec<MealDraft>) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        for (index, draft) in drafts.into_iter().enumerate() {
            let meal_id = draft.id.clone();
            match self.seed_one(draft).await {
                Ok(()) => report.written += 1,
                Err(e) if index == 0 => {
                    tracing::error!(meal_id = %meal_id, error = %e, "First seed write failed, aborting");
                    return Err(AppError::with_message(
                        ErrorCode::CatalogSeedFailed,
                        format!("Store rejected writes: {}", e.message),
                    )
                    .with_detail("meal_id", meal_id));
                }
                Err(e) => {
                    tracing::warn!(meal_id = %meal_id, error = %e, "Seed item skipped");
                    report.skipped.push(meal_id);
                }
            }
        }
        Ok(report)
    }

    async fn seed_one(&self, draft: MealDraft) -> AppResult<()> {
        let meal = draft.validate()?;
        let store = self.store.clone();
        let write = tokio::task::spawn_blocking(move || store.put(&meal));

        match tokio::time::timeout(self.item_timeout, write).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(join_error)) => Err(AppError::internal(format!(
                "Seed write task failed: {join_error}"
            ))),
            Err(_) => Err(AppError::timeout("Seed write timed out")),
        }
    }

    /// Seed the built-in menu when the catalog has no meals yet
    pub async fn seed_default_if_empty(&self) -> AppResult<Option<SeedReport>> {
        if !self.is_empty()? {
            tracing::debug!("Catalog already populated, skipping default menu");
            return Ok(None);
        }
        self.seed(default_menu()).await.map(Some)
    }
}
