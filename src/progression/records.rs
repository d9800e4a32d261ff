use chrono::NaiveDate;

use crate::models::workout::{NewRecord, PersonalRecords, WorkoutRecord};

/// Returns the record this workout sets, if its best weight beats the stored one.
///
/// A first-ever weight for an exercise is reported with `previous: None`.
pub fn detect_personal_record(
    existing: &PersonalRecords,
    workout: &WorkoutRecord,
) -> Option<NewRecord> {
    let weight = workout.best_weight.filter(|w| w.is_finite() && *w > 0.0)?;
    let key = workout.exercise.key();
    let previous = existing.get(&key).copied();

    if previous.is_some_and(|best| weight <= best) {
        return None;
    }

    Some(NewRecord {
        exercise_key: key,
        exercise_name: workout.exercise.name().to_string(),
        weight,
        previous,
    })
}

/// Folds new records into `records`, keeping the heavier weight per exercise.
pub fn merge_personal_records(records: &mut PersonalRecords, new: &[NewRecord]) {
    for record in new {
        let best = records
            .entry(record.exercise_key.clone())
            .or_insert(record.weight);
        if record.weight > *best {
            *best = record.weight;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordReplay {
    pub records: PersonalRecords,
    /// Records that beat an earlier best, with the day they were set.
    pub improvements: Vec<(NaiveDate, NewRecord)>,
}

impl RecordReplay {
    /// Improvements set between `from` and `to`, both inclusive.
    pub fn count_between(&self, from: NaiveDate, to: NaiveDate) -> u32 {
        self.improvements
            .iter()
            .filter(|(d, _)| *d >= from && *d <= to)
            .count() as u32
    }
}

/// Rebuilds the personal-record table by walking the history oldest first.
///
/// The first weight logged for an exercise is a baseline, not a record.
pub fn replay_history(history: &[WorkoutRecord]) -> RecordReplay {
    let mut ordered: Vec<&WorkoutRecord> = history.iter().collect();
    ordered.sort_by_key(|w| (w.date, w.started_at));

    let mut replay = RecordReplay::default();
    for workout in ordered {
        if let Some(record) = detect_personal_record(&replay.records, workout) {
            merge_personal_records(&mut replay.records, std::slice::from_ref(&record));
            if record.previous.is_some() {
                replay.improvements.push((workout.date, record));
            }
        }
    }
    replay
}
