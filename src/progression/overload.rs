//! Progressive-overload heuristic for a single exercise.

use serde::Serialize;

use crate::models::workout::ExerciseSession;

pub const DEFAULT_INCREMENT: f64 = 2.5;
const DELOAD_FACTOR: f64 = 0.9;
/// Consecutive missed sessions before a deload is suggested.
const STALL_SESSIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverloadSuggestion {
    /// No history for this exercise yet.
    Start,
    Increase { from: f64, to: f64 },
    Hold { weight: f64 },
    Deload { from: f64, to: f64 },
}

fn round_down_to(weight: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return weight;
    }
    (weight / increment).floor() * increment
}

/// Suggests the next working weight from past sessions, in any order.
pub fn suggest_progression(sessions: &[ExerciseSession], increment: f64) -> OverloadSuggestion {
    let mut recent: Vec<&ExerciseSession> = sessions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    let Some(latest) = recent.first() else {
        return OverloadSuggestion::Start;
    };

    if latest.hit_target() {
        return OverloadSuggestion::Increase {
            from: latest.weight,
            to: latest.weight + increment,
        };
    }

    let stalled = recent.len() >= STALL_SESSIONS
        && recent.iter().take(STALL_SESSIONS).all(|s| !s.hit_target());
    if stalled {
        let to = round_down_to(latest.weight * DELOAD_FACTOR, increment);
        tracing::debug!(from = latest.weight, to, "Stalled lift, suggesting deload");
        return OverloadSuggestion::Deload {
            from: latest.weight,
            to,
        };
    }

    OverloadSuggestion::Hold {
        weight: latest.weight,
    }
}
