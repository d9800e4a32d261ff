use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::achievement::AchievementUnlock;
use crate::models::challenge::Challenge;
use crate::store::{
    xp_from_db, xp_to_db, BatchCommit, BatchUpdate, ProgressProfile, ProgressStore, UnlockOutcome,
};

/// PostgreSQL-backed store; schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn valid_challenges(user_id: Uuid, challenges: Vec<Challenge>) -> Vec<Challenge> {
    challenges
        .into_iter()
        .filter(|c| match c.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    challenge_id = %c.id,
                    error = %e,
                    "Dropping invalid stored challenge"
                );
                false
            }
        })
        .collect()
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn load_profile(&self, user_id: Uuid) -> AppResult<ProgressProfile> {
        let row = sqlx::query_as::<_, (i64, Json<Vec<Challenge>>)>(
            "SELECT total_xp, challenges FROM user_progress WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let unlocks = sqlx::query_as::<_, AchievementUnlock>(
            r#"
            SELECT achievement_id, unlocked_at FROM achievement_unlocks
            WHERE user_id = $1
            ORDER BY unlocked_at ASC, achievement_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let (total_xp, challenges) = match row {
            Some((xp, Json(challenges))) => (xp_from_db(xp), challenges),
            None => (0, Vec::new()),
        };

        Ok(ProgressProfile {
            total_xp,
            unlocks,
            challenges: valid_challenges(user_id, challenges),
        })
    }

    async fn add_xp(&self, user_id: Uuid, amount: u64) -> AppResult<(u64, u64)> {
        let after = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO user_progress (user_id, total_xp)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET
                total_xp = user_progress.total_xp + EXCLUDED.total_xp,
                updated_at = NOW()
            RETURNING total_xp
            "#,
        )
        .bind(user_id)
        .bind(xp_to_db(amount)?)
        .fetch_one(&self.pool)
        .await?;

        let after = xp_from_db(after);
        Ok((after.saturating_sub(amount), after))
    }

    async fn record_unlocks(
        &self,
        user_id: Uuid,
        unlocks: &[AchievementUnlock],
    ) -> AppResult<UnlockOutcome> {
        let mut tx = self.pool.begin().await?;

        let mut inserted = Vec::new();
        for unlock in unlocks {
            let row = sqlx::query_as::<_, AchievementUnlock>(
                r#"
                INSERT INTO achievement_unlocks (user_id, achievement_id, unlocked_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, achievement_id) DO NOTHING
                RETURNING achievement_id, unlocked_at
                "#,
            )
            .bind(user_id)
            .bind(&unlock.achievement_id)
            .bind(unlock.unlocked_at)
            .fetch_optional(&mut *tx)
            .await?;
            inserted.extend(row);
        }

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM achievement_unlocks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(UnlockOutcome {
            inserted,
            total: usize::try_from(total).unwrap_or(0),
        })
    }

    async fn update_challenges(
        &self,
        user_id: Uuid,
        update: &(dyn for<'a> Fn(&'a [Challenge]) -> BatchUpdate + Send + Sync),
    ) -> AppResult<BatchCommit> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        // Row lock held until commit; concurrent updates for this user queue here.
        let (total_xp, Json(stored)) = sqlx::query_as::<_, (i64, Json<Vec<Challenge>>)>(
            "SELECT total_xp, challenges FROM user_progress WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let stored = valid_challenges(user_id, stored);
        let batch = update(stored.as_slice());

        let after = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE user_progress SET
                challenges = $2,
                total_xp = total_xp + $3,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING total_xp
            "#,
        )
        .bind(user_id)
        .bind(Json(&batch.challenges))
        .bind(xp_to_db(batch.xp)?)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BatchCommit {
            total_xp_before: xp_from_db(total_xp),
            total_xp_after: xp_from_db(after),
            update: batch,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
