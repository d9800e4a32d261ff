//! Persistence of per-user progression state.
//!
//! Handlers only see `dyn ProgressStore`; which implementation backs it is
//! decided once at startup from `Config::storage`.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, StorageBackend};
use crate::error::{AppError, AppResult};
use crate::models::achievement::AchievementUnlock;
use crate::models::challenge::Challenge;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Everything stored for one user. Unknown users load as an empty profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressProfile {
    pub total_xp: u64,
    pub unlocks: Vec<AchievementUnlock>,
    pub challenges: Vec<Challenge>,
}

/// New challenge state computed from the stored batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdate {
    pub challenges: Vec<Challenge>,
    pub newly_completed: Vec<Challenge>,
    /// XP credited to the user together with the new batch.
    pub xp: u64,
    pub refreshed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchCommit {
    pub update: BatchUpdate,
    pub total_xp_before: u64,
    pub total_xp_after: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockOutcome {
    /// Unlocks this call actually stored.
    pub inserted: Vec<AchievementUnlock>,
    pub total: usize,
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load_profile(&self, user_id: Uuid) -> AppResult<ProgressProfile>;

    /// Atomically adds XP, returning `(before, after)` totals.
    async fn add_xp(&self, user_id: Uuid, amount: u64) -> AppResult<(u64, u64)>;

    /// Stores unlocks that are not already present. An existing unlock keeps
    /// its original timestamp and is left out of `inserted`.
    async fn record_unlocks(
        &self,
        user_id: Uuid,
        unlocks: &[AchievementUnlock],
    ) -> AppResult<UnlockOutcome>;

    /// Runs `update` against the stored batch and persists its result along
    /// with its XP credit. Calls for the same user are serialized, so `update`
    /// always sees the batch written by the previous call.
    async fn update_challenges(
        &self,
        user_id: Uuid,
        update: &(dyn for<'a> Fn(&'a [Challenge]) -> BatchUpdate + Send + Sync),
    ) -> AppResult<BatchCommit>;

    async fn ping(&self) -> AppResult<()>;
}

pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn ProgressStore>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory progress store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for postgres storage"))?;
            let pool = crate::db::create_pool(url, config.db_max_connections).await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

pub(crate) fn xp_to_db(xp: u64) -> AppResult<i64> {
    i64::try_from(xp).map_err(|_| AppError::Validation("XP amount out of range".into()))
}

pub(crate) fn xp_from_db(xp: i64) -> u64 {
    u64::try_from(xp).unwrap_or(0)
}
