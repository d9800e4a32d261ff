use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeSet;

use crate::models::stats::Streak;
use crate::models::workout::WorkoutRecord;

/// Distinct workout days, ascending.
pub fn workout_days(history: &[WorkoutRecord]) -> Vec<NaiveDate> {
    history
        .iter()
        .map(|w| w.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Streaks as seen on `today`.
///
/// The current streak only counts when the latest workout day is today or
/// yesterday. The longest streak ignores `today` entirely.
pub fn calculate_streak_on(history: &[WorkoutRecord], today: NaiveDate) -> Streak {
    let days = workout_days(history);
    let Some(&latest) = days.last() else {
        return Streak::default();
    };

    let mut current_streak = 0u32;
    if (today - latest).num_days() <= 1 {
        current_streak = 1;
        for pair in days.windows(2).rev() {
            if pair[1] - pair[0] == Duration::days(1) {
                current_streak += 1;
            } else {
                break;
            }
        }
    }

    let mut max_streak = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            run += 1;
            max_streak = max_streak.max(run);
        } else {
            run = 1;
        }
    }

    Streak {
        current_streak,
        max_streak,
    }
}

pub fn calculate_streak(history: &[WorkoutRecord]) -> Streak {
    calculate_streak_on(history, Local::now().date_naive())
}

/// Most recent Sunday, `today` included.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

pub fn get_this_week_workouts_on(history: &[WorkoutRecord], today: NaiveDate) -> u32 {
    let week_start = start_of_week(today);
    history.iter().filter(|w| w.date >= week_start).count() as u32
}

pub fn get_this_week_workouts(history: &[WorkoutRecord]) -> u32 {
    get_this_week_workouts_on(history, Local::now().date_naive())
}
