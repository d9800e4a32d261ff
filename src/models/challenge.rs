use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeCategory {
    Workout,
    Volume,
    Strength,
    Consistency,
    Variety,
}

/// `Completed` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Expired,
}

impl ChallengeStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ChallengeStatus::Active)
    }
}

/// Static blueprint a challenge is stamped from.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub category: ChallengeCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub target: u32,
    pub points: u32,
    pub xp: u32,
}

impl ChallengeTemplate {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.target == 0 {
            return Err(InputError::InvalidChallengeTemplate {
                id: self.id.to_string(),
                reason: "target must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn instantiate(
        &self,
        kind: ChallengeType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Challenge {
        Challenge {
            id: self.id.to_string(),
            kind,
            category: self.category,
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            target: self.target,
            current: 0,
            progress: 0.0,
            points: self.points,
            xp: self.xp,
            start_date,
            end_date,
            status: ChallengeStatus::Active,
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Challenge {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChallengeType,
    pub category: ChallengeCategory,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub target: u32,
    pub current: u32,
    /// Percentage in 0..=100.
    pub progress: f64,
    pub points: u32,
    pub xp: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ChallengeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Challenge {
    /// Boundary check for challenges coming back from storage or clients.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.target == 0 {
            return Err(InputError::InvalidChallengeTemplate {
                id: self.id.clone(),
                reason: "target must be greater than zero".into(),
            });
        }
        if self.end_date <= self.start_date {
            return Err(InputError::ClockSkew {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Activity counters recomputed by the caller before each progress update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveCounters {
    pub workouts_today: u32,
    pub sets_today: u32,
    pub reps_today: u32,
    pub exercises_today: u32,
    pub workouts_this_week: u32,
    pub sets_this_week: u32,
    pub reps_this_week: u32,
    pub prs_this_week: u32,
    pub active_days_this_week: u32,
}
