//! Time-boxed daily and weekly challenges.
//!
//! A challenge is stamped from a static template, then re-evaluated against
//! fresh `LiveCounters` on every update. Status moves one way only:
//! `active -> completed` or `active -> expired`.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::challenge::{
    Challenge, ChallengeCategory, ChallengeStatus, ChallengeTemplate, ChallengeType, LiveCounters,
};

pub const DAILY_CHALLENGE_COUNT: usize = 3;
pub const WEEKLY_CHALLENGE_COUNT: usize = 2;

pub static DAILY_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "daily-workout",
        category: ChallengeCategory::Workout,
        title: "Daily Grind",
        description: "Complete a workout today",
        icon: "dumbbell",
        target: 1,
        points: 10,
        xp: 50,
    },
    ChallengeTemplate {
        id: "daily-double",
        category: ChallengeCategory::Workout,
        title: "Double Session",
        description: "Complete 2 workouts today",
        icon: "repeat",
        target: 2,
        points: 20,
        xp: 100,
    },
    ChallengeTemplate {
        id: "daily-sets",
        category: ChallengeCategory::Volume,
        title: "Set Crusher",
        description: "Complete 15 sets today",
        icon: "layers",
        target: 15,
        points: 15,
        xp: 75,
    },
    ChallengeTemplate {
        id: "daily-reps",
        category: ChallengeCategory::Volume,
        title: "Rep Machine",
        description: "Complete 100 reps today",
        icon: "activity",
        target: 100,
        points: 15,
        xp: 75,
    },
    ChallengeTemplate {
        id: "daily-variety",
        category: ChallengeCategory::Variety,
        title: "Mix It Up",
        description: "Train 3 different exercises today",
        icon: "shuffle",
        target: 3,
        points: 10,
        xp: 50,
    },
];

pub static WEEKLY_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "weekly-workouts",
        category: ChallengeCategory::Workout,
        title: "Weekly Warrior",
        description: "Complete 4 workouts this week",
        icon: "calendar",
        target: 4,
        points: 50,
        xp: 250,
    },
    ChallengeTemplate {
        id: "weekly-sets",
        category: ChallengeCategory::Volume,
        title: "Volume Week",
        description: "Complete 60 sets this week",
        icon: "layers",
        target: 60,
        points: 40,
        xp: 200,
    },
    ChallengeTemplate {
        id: "weekly-reps",
        category: ChallengeCategory::Volume,
        title: "Rep Marathon",
        description: "Complete 500 reps this week",
        icon: "activity",
        target: 500,
        points: 40,
        xp: 200,
    },
    ChallengeTemplate {
        id: "weekly-pr",
        category: ChallengeCategory::Strength,
        title: "Break a Record",
        description: "Set a new personal record this week",
        icon: "trending-up",
        target: 1,
        points: 40,
        xp: 200,
    },
    ChallengeTemplate {
        id: "weekly-active-days",
        category: ChallengeCategory::Consistency,
        title: "Show Up",
        description: "Work out on 5 different days this week",
        icon: "check-circle",
        target: 5,
        points: 60,
        xp: 300,
    },
];

/// Live counter a challenge id tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    WorkoutsToday,
    SetsToday,
    RepsToday,
    ExercisesToday,
    WorkoutsThisWeek,
    SetsThisWeek,
    RepsThisWeek,
    PrsThisWeek,
    ActiveDaysThisWeek,
}

impl CounterField {
    pub fn read(self, counters: &LiveCounters) -> u32 {
        match self {
            CounterField::WorkoutsToday => counters.workouts_today,
            CounterField::SetsToday => counters.sets_today,
            CounterField::RepsToday => counters.reps_today,
            CounterField::ExercisesToday => counters.exercises_today,
            CounterField::WorkoutsThisWeek => counters.workouts_this_week,
            CounterField::SetsThisWeek => counters.sets_this_week,
            CounterField::RepsThisWeek => counters.reps_this_week,
            CounterField::PrsThisWeek => counters.prs_this_week,
            CounterField::ActiveDaysThisWeek => counters.active_days_this_week,
        }
    }
}

pub fn counter_for(challenge_id: &str) -> Option<CounterField> {
    let field = match challenge_id {
        "daily-workout" | "daily-double" => CounterField::WorkoutsToday,
        "daily-sets" => CounterField::SetsToday,
        "daily-reps" => CounterField::RepsToday,
        "daily-variety" => CounterField::ExercisesToday,
        "weekly-workouts" => CounterField::WorkoutsThisWeek,
        "weekly-sets" => CounterField::SetsThisWeek,
        "weekly-reps" => CounterField::RepsThisWeek,
        "weekly-pr" => CounterField::PrsThisWeek,
        "weekly-active-days" => CounterField::ActiveDaysThisWeek,
        _ => return None,
    };
    Some(field)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Start of the next local day.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Duration::days(1);
    local_midnight(&now.timezone(), tomorrow)
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::days(1))
}

/// Start of the next local Monday; on a Monday this is a week ahead.
pub fn next_monday_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let days_ahead = 7 - now.weekday().num_days_from_monday() as i64;
    let monday = now.date_naive() + Duration::days(days_ahead);
    local_midnight(&now.timezone(), monday)
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::days(days_ahead))
}

fn sample<R: Rng + ?Sized>(
    templates: &[ChallengeTemplate],
    count: usize,
    kind: ChallengeType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Challenge> {
    templates
        .choose_multiple(rng, count)
        .map(|t| t.instantiate(kind, start, end))
        .collect()
}

pub fn generate_daily_challenges_at<Tz: TimeZone, R: Rng + ?Sized>(
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Vec<Challenge> {
    sample(
        DAILY_TEMPLATES,
        DAILY_CHALLENGE_COUNT,
        ChallengeType::Daily,
        now.with_timezone(&Utc),
        next_midnight(now),
        rng,
    )
}

pub fn generate_weekly_challenges_at<Tz: TimeZone, R: Rng + ?Sized>(
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Vec<Challenge> {
    sample(
        WEEKLY_TEMPLATES,
        WEEKLY_CHALLENGE_COUNT,
        ChallengeType::Weekly,
        now.with_timezone(&Utc),
        next_monday_midnight(now),
        rng,
    )
}

pub fn generate_daily_challenges() -> Vec<Challenge> {
    generate_daily_challenges_at(&Local::now(), &mut rand::thread_rng())
}

pub fn generate_weekly_challenges() -> Vec<Challenge> {
    generate_weekly_challenges_at(&Local::now(), &mut rand::thread_rng())
}

fn progress_percent(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (current as f64 / target as f64 * 100.0).min(100.0)
}

/// Re-evaluates every challenge against `counters` and returns the new batch.
///
/// Ids without a counter mapping keep their previous `current`. Expired
/// challenges are returned untouched; completed ones keep their status and
/// `completed_at` but still track `current`.
pub fn update_challenge_progress_at(
    challenges: &[Challenge],
    counters: &LiveCounters,
    now: DateTime<Utc>,
) -> Vec<Challenge> {
    challenges
        .iter()
        .map(|challenge| {
            let mut next = challenge.clone();
            if next.status == ChallengeStatus::Expired {
                return next;
            }

            if let Some(field) = counter_for(&next.id) {
                next.current = field.read(counters);
            }
            next.progress = progress_percent(next.current, next.target);

            if !next.status.is_terminal() {
                if next.progress >= 100.0 {
                    next.status = ChallengeStatus::Completed;
                    next.completed_at = next.completed_at.or(Some(now));
                } else if now > next.end_date {
                    next.status = ChallengeStatus::Expired;
                }
            }
            next
        })
        .collect()
}

pub fn update_challenge_progress(
    challenges: &[Challenge],
    counters: &LiveCounters,
) -> Vec<Challenge> {
    update_challenge_progress_at(challenges, counters, Utc::now())
}

pub fn should_refresh_challenges_at(challenges: &[Challenge], now: DateTime<Utc>) -> bool {
    challenges.iter().any(|c| now > c.end_date)
}

pub fn should_refresh_challenges(challenges: &[Challenge]) -> bool {
    should_refresh_challenges_at(challenges, Utc::now())
}

pub fn get_completed_count(challenges: &[Challenge]) -> usize {
    challenges
        .iter()
        .filter(|c| c.status == ChallengeStatus::Completed)
        .count()
}

pub fn calculate_challenge_points(challenges: &[Challenge]) -> u32 {
    challenges
        .iter()
        .filter(|c| c.status == ChallengeStatus::Completed)
        .map(|c| c.points)
        .sum()
}

pub fn calculate_challenge_xp(challenges: &[Challenge]) -> u64 {
    challenges
        .iter()
        .filter(|c| c.status == ChallengeStatus::Completed)
        .map(|c| c.xp as u64)
        .sum()
}

/// Challenges completed in `after` that were not completed in `before`.
pub fn newly_completed(before: &[Challenge], after: &[Challenge]) -> Vec<Challenge> {
    after
        .iter()
        .filter(|c| c.status == ChallengeStatus::Completed)
        .filter(|c| {
            !before.iter().any(|b| {
                b.id == c.id && b.kind == c.kind && b.status == ChallengeStatus::Completed
            })
        })
        .cloned()
        .collect()
}

fn half_needs_refresh(half: &[Challenge], now: DateTime<Utc>) -> bool {
    half.is_empty() || should_refresh_challenges_at(half, now)
}

fn split_batch(batch: &[Challenge]) -> (Vec<Challenge>, Vec<Challenge>) {
    batch
        .iter()
        .cloned()
        .partition(|c| c.kind == ChallengeType::Daily)
}

/// True when the daily or the weekly half of `batch` is missing or has run
/// past its end date.
pub fn batch_needs_refresh_at(batch: &[Challenge], now: DateTime<Utc>) -> bool {
    let (daily, weekly) = split_batch(batch);
    half_needs_refresh(&daily, now) || half_needs_refresh(&weekly, now)
}

fn refresh_with<F>(
    batch: &[Challenge],
    now: DateTime<Utc>,
    mut generate: F,
) -> (Vec<Challenge>, bool)
where
    F: FnMut(ChallengeType) -> Vec<Challenge>,
{
    let (mut daily, mut weekly) = split_batch(batch);
    let mut refreshed = false;

    if half_needs_refresh(&daily, now) {
        daily = generate(ChallengeType::Daily);
        refreshed = true;
    }
    if half_needs_refresh(&weekly, now) {
        weekly = generate(ChallengeType::Weekly);
        refreshed = true;
    }

    daily.extend(weekly);
    (daily, refreshed)
}

/// Regenerates whichever half of `batch` is missing or expired, leaving the
/// other half as stored. The flag tells whether anything was replaced.
pub fn refresh_batch_at<Tz: TimeZone, R: Rng + ?Sized>(
    batch: &[Challenge],
    now: &DateTime<Tz>,
    rng: &mut R,
) -> (Vec<Challenge>, bool) {
    refresh_with(batch, now.with_timezone(&Utc), |kind| match kind {
        ChallengeType::Daily => generate_daily_challenges_at(now, &mut *rng),
        ChallengeType::Weekly => generate_weekly_challenges_at(now, &mut *rng),
    })
}

pub fn refresh_batch(batch: &[Challenge]) -> (Vec<Challenge>, bool) {
    refresh_with(batch, Utc::now(), |kind| match kind {
        ChallengeType::Daily => generate_daily_challenges(),
        ChallengeType::Weekly => generate_weekly_challenges(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn wednesday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap()
    }

    fn sets_challenge(now: DateTime<Utc>) -> Challenge {
        DAILY_TEMPLATES
            .iter()
            .find(|t| t.id == "daily-sets")
            .unwrap()
            .instantiate(ChallengeType::Daily, now, next_midnight(&now))
    }

    #[test]
    fn test_templates_are_valid_and_mapped() {
        for template in DAILY_TEMPLATES.iter().chain(WEEKLY_TEMPLATES) {
            assert!(template.validate().is_ok(), "{}", template.id);
            assert!(counter_for(template.id).is_some(), "{}", template.id);
        }
        assert!(DAILY_TEMPLATES.len() >= DAILY_CHALLENGE_COUNT);
        assert!(WEEKLY_TEMPLATES.len() >= WEEKLY_CHALLENGE_COUNT);
    }

    #[test]
    fn test_generate_daily_challenges() {
        let now = wednesday_morning();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = generate_daily_challenges_at(&now, &mut rng);
            assert_eq!(batch.len(), 3);
            let ids: HashSet<_> = batch.iter().map(|c| c.id.clone()).collect();
            assert_eq!(ids.len(), 3);
            for c in &batch {
                assert_eq!(c.kind, ChallengeType::Daily);
                assert_eq!(c.status, ChallengeStatus::Active);
                assert_eq!(c.current, 0);
                assert_eq!(c.start_date, now);
                assert_eq!(c.end_date, Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap());
            }
        }
    }

    #[test]
    fn test_generate_with_same_seed_is_deterministic() {
        let now = wednesday_morning();
        let a = generate_daily_challenges_at(&now, &mut StdRng::seed_from_u64(7));
        let b = generate_daily_challenges_at(&now, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_weekly_challenges() {
        let now = wednesday_morning();
        let batch = generate_weekly_challenges_at(&now, &mut StdRng::seed_from_u64(3));
        assert_eq!(batch.len(), 2);
        assert_ne!(batch[0].id, batch[1].id);
        for c in &batch {
            assert_eq!(c.kind, ChallengeType::Weekly);
            assert_eq!(c.end_date, Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap());
        }
    }

    #[test]
    fn test_next_monday_from_monday_and_sunday() {
        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        assert_eq!(
            next_monday_midnight(&monday),
            Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap()
        );
        let sunday = Utc.with_ymd_and_hms(2026, 3, 8, 23, 59, 0).unwrap();
        assert_eq!(
            next_monday_midnight(&sunday),
            Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_progress_completes_and_freezes_timestamp() {
        let now = wednesday_morning();
        let challenges = vec![sets_challenge(now)];

        let partial = update_challenge_progress_at(
            &challenges,
            &LiveCounters {
                sets_today: 6,
                ..LiveCounters::default()
            },
            now,
        );
        assert_eq!(partial[0].current, 6);
        assert!((partial[0].progress - 40.0).abs() < 1e-9);
        assert_eq!(partial[0].status, ChallengeStatus::Active);

        let done_at = now + Duration::hours(2);
        let done = update_challenge_progress_at(
            &partial,
            &LiveCounters {
                sets_today: 15,
                ..LiveCounters::default()
            },
            done_at,
        );
        assert_eq!(done[0].progress, 100.0);
        assert_eq!(done[0].status, ChallengeStatus::Completed);
        assert_eq!(done[0].completed_at, Some(done_at));

        let later = update_challenge_progress_at(
            &done,
            &LiveCounters {
                sets_today: 20,
                ..LiveCounters::default()
            },
            done_at + Duration::hours(1),
        );
        assert_eq!(later[0].current, 20);
        assert_eq!(later[0].progress, 100.0);
        assert_eq!(later[0].status, ChallengeStatus::Completed);
        assert_eq!(later[0].completed_at, Some(done_at));
    }

    #[test]
    fn test_completed_at_survives_target_change() {
        let now = wednesday_morning();
        let counters = LiveCounters {
            sets_today: 15,
            ..LiveCounters::default()
        };
        let mut done = update_challenge_progress_at(&[sets_challenge(now)], &counters, now);
        done[0].target = 40;

        let again = update_challenge_progress_at(&done, &counters, now + Duration::hours(1));
        assert_eq!(again[0].status, ChallengeStatus::Completed);
        assert_eq!(again[0].completed_at, Some(now));
        assert!(again[0].progress < 100.0);
    }

    #[test]
    fn test_expires_after_end_date() {
        let now = wednesday_morning();
        let challenges = vec![sets_challenge(now)];
        let after_end = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 1).unwrap();

        let expired = update_challenge_progress_at(
            &challenges,
            &LiveCounters {
                sets_today: 3,
                ..LiveCounters::default()
            },
            after_end,
        );
        assert_eq!(expired[0].status, ChallengeStatus::Expired);

        // terminal: later counters do not revive it
        let still = update_challenge_progress_at(
            &expired,
            &LiveCounters {
                sets_today: 30,
                ..LiveCounters::default()
            },
            after_end,
        );
        assert_eq!(still[0].status, ChallengeStatus::Expired);
        assert!(still[0].completed_at.is_none());
    }

    #[test]
    fn test_unmapped_challenge_keeps_current() {
        let now = wednesday_morning();
        let mut custom = sets_challenge(now);
        custom.id = "legacy-custom".into();
        custom.current = 7;

        let updated = update_challenge_progress_at(
            &[custom],
            &LiveCounters {
                sets_today: 15,
                ..LiveCounters::default()
            },
            now,
        );
        assert_eq!(updated[0].current, 7);
        assert_eq!(updated[0].status, ChallengeStatus::Active);
    }

    #[test]
    fn test_update_does_not_mutate_input() {
        let now = wednesday_morning();
        let challenges = vec![sets_challenge(now)];
        let snapshot = challenges.clone();
        let _ = update_challenge_progress_at(
            &challenges,
            &LiveCounters {
                sets_today: 15,
                ..LiveCounters::default()
            },
            now,
        );
        assert_eq!(challenges, snapshot);
    }

    #[test]
    fn test_should_refresh() {
        let now = wednesday_morning();
        let challenges = vec![sets_challenge(now)];
        assert!(!should_refresh_challenges_at(&challenges, now));
        assert!(should_refresh_challenges_at(
            &challenges,
            Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 1).unwrap()
        ));
        assert!(!should_refresh_challenges_at(&[], now));
    }

    #[test]
    fn test_aggregations_and_newly_completed() {
        let now = wednesday_morning();
        let mut rng = StdRng::seed_from_u64(11);
        let before = generate_weekly_challenges_at(&now, &mut rng);
        let counters = LiveCounters {
            workouts_this_week: 4,
            sets_this_week: 60,
            reps_this_week: 500,
            prs_this_week: 1,
            active_days_this_week: 5,
            ..LiveCounters::default()
        };
        let after = update_challenge_progress_at(&before, &counters, now);

        assert_eq!(get_completed_count(&after), 2);
        let points: u32 = after.iter().map(|c| c.points).sum();
        assert_eq!(calculate_challenge_points(&after), points);
        let xp: u64 = after.iter().map(|c| c.xp as u64).sum();
        assert_eq!(calculate_challenge_xp(&after), xp);

        assert_eq!(newly_completed(&before, &after).len(), 2);
        assert!(newly_completed(&after, &after).is_empty());
        assert_eq!(get_completed_count(&before), 0);
        assert_eq!(calculate_challenge_points(&before), 0);
    }

    #[test]
    fn test_refresh_batch_replaces_only_expired_half() {
        let now = wednesday_morning();
        let mut rng = StdRng::seed_from_u64(5);

        let (batch, refreshed) = refresh_batch_at(&[], &now, &mut rng);
        assert!(refreshed);
        assert_eq!(batch.len(), DAILY_CHALLENGE_COUNT + WEEKLY_CHALLENGE_COUNT);
        assert!(!batch_needs_refresh_at(&batch, now));

        let (same, refreshed) = refresh_batch_at(&batch, &now, &mut rng);
        assert!(!refreshed);
        assert_eq!(same, batch);

        // Thursday: the daily half has ended, the weekly half runs to Monday.
        let thursday = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        assert!(batch_needs_refresh_at(&batch, thursday));
        let (next, refreshed) = refresh_batch_at(&batch, &thursday, &mut rng);
        assert!(refreshed);
        let weekly = |b: &[Challenge]| -> Vec<Challenge> {
            b.iter()
                .filter(|c| c.kind == ChallengeType::Weekly)
                .cloned()
                .collect()
        };
        assert_eq!(weekly(&next), weekly(&batch));
        assert!(next
            .iter()
            .filter(|c| c.kind == ChallengeType::Daily)
            .all(|c| c.start_date == thursday && c.end_date > thursday));
    }
}
