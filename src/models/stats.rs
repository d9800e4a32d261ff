use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Snapshot of a user's training statistics, rebuilt on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_workouts: u32,
    pub this_week_workouts: u32,
    pub total_prs: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    #[serde(default)]
    pub weight_logged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_workout_date: Option<NaiveDate>,
    #[serde(default)]
    pub unique_exercises: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_morning_workouts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_night_workouts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend_workouts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfect_weeks: Option<u32>,
}

/// Consecutive-day workout streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current_streak: u32,
    pub max_streak: u32,
}

impl UserStats {
    /// Cross-field sanity checks for snapshots received from collaborators.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.current_streak > self.max_streak {
            return Err(InputError::InvalidStatSnapshot(format!(
                "current_streak {} exceeds max_streak {}",
                self.current_streak, self.max_streak
            )));
        }
        if self.max_streak > self.total_workouts {
            return Err(InputError::InvalidStatSnapshot(format!(
                "max_streak {} exceeds total_workouts {}",
                self.max_streak, self.total_workouts
            )));
        }
        if self.this_week_workouts > self.total_workouts {
            return Err(InputError::InvalidStatSnapshot(format!(
                "this_week_workouts {} exceeds total_workouts {}",
                self.this_week_workouts, self.total_workouts
            )));
        }
        Ok(())
    }
}
