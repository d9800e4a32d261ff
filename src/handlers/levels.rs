use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    AddXpRequest, AddXpResponse, LevelInfoResponse, ProgressResponse, WorkoutXpRequest,
    WorkoutXpResponse,
};
use crate::error::AppResult;
use crate::models::challenge::ChallengeStatus;
use crate::models::workout::WorkoutXpInput;
use crate::progression::xp::{
    add_xp, calculate_level_from_xp, calculate_workout_xp, get_level_reward, get_level_title,
    get_next_reward, get_xp_multiplier,
};
use crate::AppState;

pub async fn get_level(Path(total_xp): Path<u64>) -> Json<LevelInfoResponse> {
    let level = calculate_level_from_xp(total_xp);
    Json(LevelInfoResponse {
        title: get_level_title(level.level),
        current_reward: get_level_reward(level.level),
        next_reward: get_next_reward(level.level),
        level,
    })
}

pub async fn workout_xp(Json(body): Json<WorkoutXpRequest>) -> AppResult<Json<WorkoutXpResponse>> {
    body.validate()?;

    let award = calculate_workout_xp(&WorkoutXpInput::from(&body));
    Ok(Json(WorkoutXpResponse {
        award,
        multiplier: get_xp_multiplier(),
    }))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ProgressResponse>> {
    let profile = state.store.load_profile(user_id).await?;
    let level = calculate_level_from_xp(profile.total_xp);

    Ok(Json(ProgressResponse {
        user_id,
        title: get_level_title(level.level),
        level,
        unlocked_achievements: profile.unlocks.len(),
        active_challenges: profile
            .challenges
            .iter()
            .filter(|c| c.status == ChallengeStatus::Active)
            .count(),
    }))
}

pub async fn award_xp(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AddXpRequest>,
) -> AppResult<Json<AddXpResponse>> {
    body.validate()?;

    let (before, _after) = state.store.add_xp(user_id, body.amount).await?;
    let result = add_xp(before, body.amount);

    if result.leveled_up {
        tracing::info!(
            user_id = %user_id,
            level = result.new_level.level,
            levels_gained = result.levels_gained,
            source = body.source.as_deref().unwrap_or("manual"),
            "User leveled up"
        );
    }

    Ok(Json(AddXpResponse {
        title: get_level_title(result.new_level.level),
        result,
    }))
}
