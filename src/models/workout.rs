use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exercise performed in a workout, discriminated by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseRef {
    /// Entry from the built-in exercise library.
    Preset { exercise_id: String, name: String },
    /// Exercise created by the user.
    Custom { custom_id: String, name: String },
}

impl ExerciseRef {
    pub fn name(&self) -> &str {
        match self {
            ExerciseRef::Preset { name, .. } | ExerciseRef::Custom { name, .. } => name,
        }
    }

    /// Key used to group sessions and personal records of the same exercise.
    ///
    /// Preset and custom exercises never share a key, even with equal names.
    pub fn key(&self) -> String {
        match self {
            ExerciseRef::Preset { exercise_id, .. } => format!("preset:{}", exercise_id),
            ExerciseRef::Custom { custom_id, .. } => format!("custom:{}", custom_id),
        }
    }
}

/// One logged workout entry as handed over by the history collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    /// Local calendar day the workout belongs to.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<NaiveTime>,
    pub exercise: ExerciseRef,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_weight: Option<f64>,
}

/// Best weight per exercise key.
pub type PersonalRecords = HashMap<String, f64>;

/// A personal record beaten by a workout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewRecord {
    pub exercise_key: String,
    pub exercise_name: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
}

/// Inputs for awarding XP to a finished workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutXpInput {
    #[serde(default = "default_completed")]
    pub completed: bool,
    #[serde(default)]
    pub first_workout_today: bool,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub personal_records: u32,
}

fn default_completed() -> bool {
    true
}

/// One past session of a single exercise, used for overload suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub date: NaiveDate,
    pub weight: f64,
    pub target_reps: u32,
    /// Reps achieved per working set.
    pub reps: Vec<u32>,
}

impl ExerciseSession {
    pub fn hit_target(&self) -> bool {
        !self.reps.is_empty() && self.reps.iter().all(|&r| r >= self.target_reps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_ref_uses_kind_tag() {
        let json = r#"{"kind":"custom","custom_id":"c-1","name":"Sled Push"}"#;
        let exercise: ExerciseRef = serde_json::from_str(json).unwrap();
        assert_eq!(
            exercise,
            ExerciseRef::Custom {
                custom_id: "c-1".into(),
                name: "Sled Push".into()
            }
        );
        assert_eq!(exercise.key(), "custom:c-1");
        assert_eq!(exercise.name(), "Sled Push");
    }

    #[test]
    fn test_exercise_ref_without_kind_is_rejected() {
        let json = r#"{"exercise_id":"bench","name":"Bench Press"}"#;
        assert!(serde_json::from_str::<ExerciseRef>(json).is_err());
    }

    #[test]
    fn test_preset_and_custom_keys_differ() {
        let preset = ExerciseRef::Preset {
            exercise_id: "squat".into(),
            name: "Squat".into(),
        };
        let custom = ExerciseRef::Custom {
            custom_id: "squat".into(),
            name: "Squat".into(),
        };
        assert_ne!(preset.key(), custom.key());
    }

    #[test]
    fn test_workout_xp_input_defaults_to_completed() {
        let input: WorkoutXpInput = serde_json::from_str("{}").unwrap();
        assert!(input.completed);
        assert_eq!(input.sets, 0);
    }

    #[test]
    fn test_session_hit_target() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let hit = ExerciseSession {
            date,
            weight: 60.0,
            target_reps: 8,
            reps: vec![8, 9, 8],
        };
        let miss = ExerciseSession {
            reps: vec![8, 7, 6],
            ..hit.clone()
        };
        let empty = ExerciseSession {
            reps: vec![],
            ..hit.clone()
        };
        assert!(hit.hit_target());
        assert!(!miss.hit_target());
        assert!(!empty.hit_target());
    }
}
