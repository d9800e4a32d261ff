//! Caller-side aggregation of a workout history into the snapshots the
//! engines consume.

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use std::collections::HashSet;

use crate::models::challenge::LiveCounters;
use crate::models::stats::UserStats;
use crate::models::workout::WorkoutRecord;
use crate::progression::records::replay_history;
use crate::progression::streak::{calculate_streak_on, get_this_week_workouts_on, start_of_week};
use crate::progression::xp::{EARLY_BIRD_HOURS, NIGHT_OWL_FROM_HOUR};

/// Facts about the user that the workout history does not carry.
#[derive(Debug, Clone, Default)]
pub struct StatsContext {
    pub weight_logged: bool,
    pub perfect_weeks: Option<u32>,
}

pub fn aggregate_stats_on(
    history: &[WorkoutRecord],
    context: &StatsContext,
    today: NaiveDate,
) -> UserStats {
    let streak = calculate_streak_on(history, today);
    let replay = replay_history(history);

    let unique_exercises = history
        .iter()
        .map(|w| w.exercise.key())
        .collect::<HashSet<_>>()
        .len() as u32;

    let timed: Vec<u32> = history
        .iter()
        .filter_map(|w| w.started_at.map(|t| t.hour()))
        .collect();
    let (early_morning_workouts, late_night_workouts) = if timed.is_empty() {
        (None, None)
    } else {
        (
            Some(timed.iter().filter(|h| EARLY_BIRD_HOURS.contains(*h)).count() as u32),
            Some(timed.iter().filter(|h| **h >= NIGHT_OWL_FROM_HOUR).count() as u32),
        )
    };

    let weekend_workouts = history
        .iter()
        .filter(|w| matches!(w.date.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32;

    UserStats {
        total_workouts: history.len() as u32,
        this_week_workouts: get_this_week_workouts_on(history, today),
        total_prs: replay.improvements.len() as u32,
        current_streak: streak.current_streak,
        max_streak: streak.max_streak,
        weight_logged: context.weight_logged,
        first_workout_date: history.iter().map(|w| w.date).min(),
        unique_exercises,
        early_morning_workouts,
        late_night_workouts,
        weekend_workouts: Some(weekend_workouts),
        perfect_weeks: context.perfect_weeks,
    }
}

/// Counters for challenge progress as of `today`.
pub fn live_counters_on(history: &[WorkoutRecord], today: NaiveDate) -> LiveCounters {
    let week_start = start_of_week(today);
    let todays: Vec<&WorkoutRecord> = history.iter().filter(|w| w.date == today).collect();
    let weeks: Vec<&WorkoutRecord> = history
        .iter()
        .filter(|w| w.date >= week_start && w.date <= today)
        .collect();

    LiveCounters {
        workouts_today: todays.len() as u32,
        sets_today: todays.iter().map(|w| w.sets).sum(),
        reps_today: todays.iter().map(|w| w.reps).sum(),
        exercises_today: todays
            .iter()
            .map(|w| w.exercise.key())
            .collect::<HashSet<_>>()
            .len() as u32,
        workouts_this_week: weeks.len() as u32,
        sets_this_week: weeks.iter().map(|w| w.sets).sum(),
        reps_this_week: weeks.iter().map(|w| w.reps).sum(),
        prs_this_week: replay_history(history).count_between(week_start, today),
        active_days_this_week: weeks.iter().map(|w| w.date).collect::<HashSet<_>>().len() as u32,
    }
}
