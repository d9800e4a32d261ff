use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::dto::{CheckAchievementsRequest, CheckAchievementsResponse};
use crate::error::AppResult;
use crate::models::achievement::{AchievementUnlock, AchievementView};
use crate::progression::achievements::{achievement_views, check_achievements, resolve_unlock};
use crate::AppState;

pub async fn list_achievements(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<AchievementView>>> {
    let profile = state.store.load_profile(user_id).await?;
    Ok(Json(achievement_views(&profile.unlocks)))
}

pub async fn check(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CheckAchievementsRequest>,
) -> AppResult<Json<CheckAchievementsResponse>> {
    body.stats.validate()?;

    let profile = state.store.load_profile(user_id).await?;
    let candidates: Vec<AchievementUnlock> = check_achievements(
        &body.stats,
        profile.unlocks.iter().map(|u| u.achievement_id.as_str()),
        Utc::now(),
    )
    .iter()
    .map(AchievementUnlock::from)
    .collect();

    if candidates.is_empty() {
        return Ok(Json(CheckAchievementsResponse {
            newly_unlocked: Vec::new(),
            total_unlocked: profile.unlocks.len(),
        }));
    }

    // Only rows this call inserted are reported as new.
    let outcome = state.store.record_unlocks(user_id, &candidates).await?;

    if !outcome.inserted.is_empty() {
        let ids: Vec<&str> = outcome
            .inserted
            .iter()
            .map(|r| r.achievement_id.as_str())
            .collect();
        tracing::info!(
            user_id = %user_id,
            count = ids.len(),
            ids = ?ids,
            "Achievements unlocked"
        );
    }

    Ok(Json(CheckAchievementsResponse {
        newly_unlocked: outcome.inserted.iter().filter_map(resolve_unlock).collect(),
        total_unlocked: outcome.total,
    }))
}
