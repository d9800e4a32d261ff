use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::stats::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Workouts,
    Streaks,
    Strength,
    Consistency,
    Exploration,
    Tracking,
    Special,
}

/// Catalog entry. The catalog itself is a static table, see
/// `progression::achievements::ACHIEVEMENTS`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    /// Display hint only: hide title and description until unlocked.
    pub secret: bool,
    #[serde(skip)]
    pub condition: fn(&UserStats) -> bool,
}

/// Catalog entry stamped with the moment it was first satisfied.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub unlocked_at: DateTime<Utc>,
}

/// Persisted unlock record, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AchievementUnlock {
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

impl From<&UnlockedAchievement> for AchievementUnlock {
    fn from(unlocked: &UnlockedAchievement) -> Self {
        Self {
            achievement_id: unlocked.achievement.id.to_string(),
            unlocked_at: unlocked.unlocked_at,
        }
    }
}

/// Catalog entry projected for display, with secrets masked while locked.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub secret: bool,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}
