use axum::Json;
use chrono::Local;
use validator::Validate;

use crate::dto::{HistoryRequest, OverloadRequest, StatsRequest, StatsResponse, StreakResponse};
use crate::error::AppResult;
use crate::progression::overload::{suggest_progression, OverloadSuggestion, DEFAULT_INCREMENT};
use crate::progression::records::replay_history;
use crate::progression::stats::{aggregate_stats_on, live_counters_on, StatsContext};
use crate::progression::streak::{calculate_streak_on, get_this_week_workouts_on};

pub async fn get_streak(Json(body): Json<HistoryRequest>) -> AppResult<Json<StreakResponse>> {
    body.validate()?;

    let today = Local::now().date_naive();
    Ok(Json(StreakResponse {
        streak: calculate_streak_on(&body.history, today),
        this_week_workouts: get_this_week_workouts_on(&body.history, today),
    }))
}

pub async fn get_stats(Json(body): Json<StatsRequest>) -> AppResult<Json<StatsResponse>> {
    body.validate()?;

    let today = Local::now().date_naive();
    let context = StatsContext {
        weight_logged: body.weight_logged,
        perfect_weeks: body.perfect_weeks,
    };

    Ok(Json(StatsResponse {
        stats: aggregate_stats_on(&body.history, &context, today),
        personal_records: replay_history(&body.history).records,
        counters: live_counters_on(&body.history, today),
    }))
}

pub async fn suggest_overload(
    Json(body): Json<OverloadRequest>,
) -> AppResult<Json<OverloadSuggestion>> {
    body.validate()?;

    let increment = body.increment.unwrap_or(DEFAULT_INCREMENT);
    Ok(Json(suggest_progression(&body.sessions, increment)))
}
