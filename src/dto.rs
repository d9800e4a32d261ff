//! # FitTrack — Request/Response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Field-level limits are expressed via `validator` derive macros;
//!   cross-field checks live on the domain types (`UserStats::validate`)

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::achievement::UnlockedAchievement;
use crate::models::challenge::{Challenge, LiveCounters};
use crate::models::level::{LevelReward, LevelUp, UserLevel, XpAward};
use crate::models::stats::{Streak, UserStats};
use crate::models::workout::{ExerciseSession, PersonalRecords, WorkoutRecord, WorkoutXpInput};

// ============================================================================
// Levels & XP
// ============================================================================

/// GET /api/levels/{total_xp}
#[derive(Debug, Serialize)]
pub struct LevelInfoResponse {
    #[serde(flatten)]
    pub level: UserLevel,
    pub title: &'static str,
    pub current_reward: Option<&'static LevelReward>,
    pub next_reward: Option<&'static LevelReward>,
}

/// POST /api/xp/workout
#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutXpRequest {
    #[serde(default = "default_true")]
    pub completed: bool,

    #[serde(default)]
    pub first_workout_today: bool,

    #[serde(default)]
    #[validate(range(max = 3650, message = "streak_days must be at most 3650"))]
    pub streak_days: u32,

    #[serde(default)]
    #[validate(range(max = 200, message = "sets must be at most 200"))]
    pub sets: u32,

    #[serde(default)]
    #[validate(range(max = 10000, message = "reps must be at most 10000"))]
    pub reps: u32,

    #[serde(default)]
    #[validate(range(max = 50, message = "personal_records must be at most 50"))]
    pub personal_records: u32,
}

fn default_true() -> bool {
    true
}

impl From<&WorkoutXpRequest> for WorkoutXpInput {
    fn from(req: &WorkoutXpRequest) -> Self {
        Self {
            completed: req.completed,
            first_workout_today: req.first_workout_today,
            streak_days: req.streak_days,
            sets: req.sets,
            reps: req.reps,
            personal_records: req.personal_records,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutXpResponse {
    #[serde(flatten)]
    pub award: XpAward,
    /// Current time-of-day multiplier; not applied to `total`.
    pub multiplier: f64,
}

// ============================================================================
// History-derived metrics
// ============================================================================

/// POST /api/streaks
#[derive(Debug, Deserialize, Validate)]
pub struct HistoryRequest {
    #[validate(length(max = 20000, message = "history is limited to 20000 records"))]
    pub history: Vec<WorkoutRecord>,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    #[serde(flatten)]
    pub streak: Streak,
    pub this_week_workouts: u32,
}

/// POST /api/stats
#[derive(Debug, Deserialize, Validate)]
pub struct StatsRequest {
    #[validate(length(max = 20000, message = "history is limited to 20000 records"))]
    pub history: Vec<WorkoutRecord>,

    #[serde(default)]
    pub weight_logged: bool,

    pub perfect_weeks: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: UserStats,
    pub personal_records: PersonalRecords,
    pub counters: LiveCounters,
}

/// POST /api/overload
#[derive(Debug, Deserialize, Validate)]
pub struct OverloadRequest {
    #[validate(length(max = 500, message = "at most 500 sessions"))]
    pub sessions: Vec<ExerciseSession>,

    #[validate(range(min = 0.25, max = 50.0, message = "increment must be 0.25-50"))]
    pub increment: Option<f64>,
}

// ============================================================================
// Per-user progress
// ============================================================================

/// GET /api/users/{user_id}/progress
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub user_id: Uuid,
    pub level: UserLevel,
    pub title: &'static str,
    pub unlocked_achievements: usize,
    pub active_challenges: usize,
}

/// POST /api/users/{user_id}/xp
#[derive(Debug, Deserialize, Validate)]
pub struct AddXpRequest {
    #[validate(range(min = 1, max = 100000, message = "amount must be 1-100000"))]
    pub amount: u64,

    #[validate(length(max = 100, message = "source must be under 100 characters"))]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddXpResponse {
    #[serde(flatten)]
    pub result: LevelUp,
    pub title: &'static str,
}

/// POST /api/users/{user_id}/achievements/check
#[derive(Debug, Deserialize)]
pub struct CheckAchievementsRequest {
    pub stats: UserStats,
}

#[derive(Debug, Serialize)]
pub struct CheckAchievementsResponse {
    pub newly_unlocked: Vec<UnlockedAchievement>,
    pub total_unlocked: usize,
}

/// GET /api/users/{user_id}/challenges
#[derive(Debug, Serialize)]
pub struct ChallengesResponse {
    pub challenges: Vec<Challenge>,
    pub completed_count: usize,
    pub points: u32,
    /// True when an expired half of the batch was regenerated.
    pub refreshed: bool,
}

/// POST /api/users/{user_id}/challenges/progress
#[derive(Debug, Deserialize)]
pub struct ChallengeProgressRequest {
    pub counters: LiveCounters,
}

#[derive(Debug, Serialize)]
pub struct ChallengeProgressResponse {
    pub challenges: Vec<Challenge>,
    pub completed_count: usize,
    pub points: u32,
    pub newly_completed: Vec<String>,
    pub xp_awarded: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_xp_request_defaults() {
        let req: WorkoutXpRequest = serde_json::from_str("{}").unwrap();
        assert!(req.completed);
        assert!(req.validate().is_ok());
        let input = WorkoutXpInput::from(&req);
        assert!(input.completed);
        assert_eq!(input.sets, 0);
    }

    #[test]
    fn test_workout_xp_request_limits() {
        let req: WorkoutXpRequest = serde_json::from_str(r#"{"sets":500}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_xp_request_requires_positive_amount() {
        let req: AddXpRequest = serde_json::from_str(r#"{"amount":0}"#).unwrap();
        assert!(req.validate().is_err());

        let req: AddXpRequest = serde_json::from_str(r#"{"amount":250}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_overload_increment_range() {
        let req: OverloadRequest =
            serde_json::from_str(r#"{"sessions":[],"increment":0.0}"#).unwrap();
        assert!(req.validate().is_err());

        let req: OverloadRequest = serde_json::from_str(r#"{"sessions":[]}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
