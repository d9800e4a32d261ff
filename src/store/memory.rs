use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::achievement::AchievementUnlock;
use crate::models::challenge::Challenge;
use crate::store::{BatchCommit, BatchUpdate, ProgressProfile, ProgressStore, UnlockOutcome};

/// Process-local store (single-instance deployments and tests).
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<HashMap<Uuid, ProgressProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load_profile(&self, user_id: Uuid) -> AppResult<ProgressProfile> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id).cloned().unwrap_or_default())
    }

    async fn add_xp(&self, user_id: Uuid, amount: u64) -> AppResult<(u64, u64)> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_default();
        let before = profile.total_xp;
        profile.total_xp = before.saturating_add(amount);
        Ok((before, profile.total_xp))
    }

    async fn record_unlocks(
        &self,
        user_id: Uuid,
        unlocks: &[AchievementUnlock],
    ) -> AppResult<UnlockOutcome> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_default();

        let mut inserted = Vec::new();
        for unlock in unlocks {
            let known = profile
                .unlocks
                .iter()
                .any(|u| u.achievement_id == unlock.achievement_id);
            if !known {
                profile.unlocks.push(unlock.clone());
                inserted.push(unlock.clone());
            }
        }

        Ok(UnlockOutcome {
            inserted,
            total: profile.unlocks.len(),
        })
    }

    async fn update_challenges(
        &self,
        user_id: Uuid,
        update: &(dyn for<'a> Fn(&'a [Challenge]) -> BatchUpdate + Send + Sync),
    ) -> AppResult<BatchCommit> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_default();

        let batch = update(profile.challenges.as_slice());
        let total_xp_before = profile.total_xp;
        profile.total_xp = total_xp_before.saturating_add(batch.xp);
        profile.challenges = batch.challenges.clone();

        Ok(BatchCommit {
            total_xp_before,
            total_xp_after: profile.total_xp,
            update: batch,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
