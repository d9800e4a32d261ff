use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::dto::{ChallengeProgressRequest, ChallengeProgressResponse, ChallengesResponse};
use crate::error::AppResult;
use crate::models::challenge::Challenge;
use crate::progression::challenges::{
    batch_needs_refresh_at, calculate_challenge_points, calculate_challenge_xp,
    get_completed_count, newly_completed, refresh_batch, update_challenge_progress_at,
};
use crate::progression::xp::add_xp;
use crate::store::BatchUpdate;
use crate::AppState;

pub async fn list_challenges(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ChallengesResponse>> {
    let profile = state.store.load_profile(user_id).await?;

    let (challenges, refreshed) = if batch_needs_refresh_at(&profile.challenges, Utc::now()) {
        let refresh = |stored: &[Challenge]| {
            let (challenges, refreshed) = refresh_batch(stored);
            BatchUpdate {
                challenges,
                refreshed,
                ..BatchUpdate::default()
            }
        };
        let commit = state.store.update_challenges(user_id, &refresh).await?;
        if commit.update.refreshed {
            tracing::info!(
                user_id = %user_id,
                count = commit.update.challenges.len(),
                "Challenge batch refreshed"
            );
        }
        (commit.update.challenges, commit.update.refreshed)
    } else {
        (profile.challenges, false)
    };

    Ok(Json(ChallengesResponse {
        completed_count: get_completed_count(&challenges),
        points: calculate_challenge_points(&challenges),
        challenges,
        refreshed,
    }))
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ChallengeProgressRequest>,
) -> AppResult<Json<ChallengeProgressResponse>> {
    let now = Utc::now();
    let apply = |stored: &[Challenge]| {
        let (current, refreshed) = refresh_batch(stored);
        let challenges = update_challenge_progress_at(&current, &body.counters, now);
        let newly_completed = newly_completed(&current, &challenges);
        BatchUpdate {
            xp: calculate_challenge_xp(&newly_completed),
            challenges,
            newly_completed,
            refreshed,
        }
    };

    let commit = state.store.update_challenges(user_id, &apply).await?;
    let batch = commit.update;

    let level_up = if batch.xp > 0 {
        let ids: Vec<&str> = batch.newly_completed.iter().map(|c| c.id.as_str()).collect();
        tracing::info!(
            user_id = %user_id,
            challenges = ?ids,
            xp = batch.xp,
            "Challenges completed"
        );
        Some(add_xp(commit.total_xp_before, batch.xp))
    } else {
        None
    };

    Ok(Json(ChallengeProgressResponse {
        completed_count: get_completed_count(&batch.challenges),
        points: calculate_challenge_points(&batch.challenges),
        newly_completed: batch.newly_completed.into_iter().map(|c| c.id).collect(),
        xp_awarded: batch.xp,
        challenges: batch.challenges,
        level_up,
    }))
}
