//! Experience points and level curve.
//!
//! The curve is `floor(100 * level^1.5)` XP to clear a level. A lifetime XP
//! total is turned back into a level by walking the curve from level 1.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};

use crate::models::level::{LevelReward, LevelUp, UserLevel, XpAward, XpBonus};
use crate::models::workout::WorkoutXpInput;

const BASE_WORKOUT_XP: u64 = 50;
const FIRST_WORKOUT_OF_DAY_XP: u64 = 25;
const STREAK_XP_PER_DAY: u64 = 10;
const MAX_STREAK_XP: u64 = 100;
const XP_PER_SET: u64 = 5;
const XP_PER_REP: u64 = 1;
const XP_PER_PERSONAL_RECORD: u64 = 100;

const WEEKEND_MULTIPLIER: f64 = 1.5;
const TIME_OF_DAY_MULTIPLIER: f64 = 1.2;

/// Early-bird window, local hours `[start, end)`.
pub const EARLY_BIRD_HOURS: std::ops::Range<u32> = 5..8;
/// Night-owl window starts at this local hour and runs to midnight.
pub const NIGHT_OWL_FROM_HOUR: u32 = 21;

const LEVEL_TITLES: &[(u32, &str)] = &[
    (1, "Beginner"),
    (5, "Novice"),
    (10, "Apprentice"),
    (15, "Regular"),
    (20, "Athlete"),
    (30, "Veteran"),
    (40, "Expert"),
    (50, "Master"),
    (75, "Champion"),
    (100, "Legend"),
];

pub const LEVEL_REWARDS: &[LevelReward] = &[
    LevelReward {
        level: 5,
        unlocks: &["Custom workout templates"],
        bonus_points: 100,
    },
    LevelReward {
        level: 10,
        unlocks: &["Advanced progress charts", "Bronze profile badge"],
        bonus_points: 250,
    },
    LevelReward {
        level: 20,
        unlocks: &["Workout color themes", "Silver profile badge"],
        bonus_points: 500,
    },
    LevelReward {
        level: 30,
        unlocks: &["Personal record history export"],
        bonus_points: 750,
    },
    LevelReward {
        level: 50,
        unlocks: &["Gold profile badge", "Custom challenge slots"],
        bonus_points: 1500,
    },
    LevelReward {
        level: 75,
        unlocks: &["Platinum profile badge"],
        bonus_points: 3000,
    },
    LevelReward {
        level: 100,
        unlocks: &["Legend title frame", "Diamond profile badge"],
        bonus_points: 5000,
    },
];

/// XP needed to clear `level`.
pub fn calculate_xp_for_level(level: u32) -> u64 {
    let l = level as f64;
    // l * sqrt(l) keeps perfect squares exact, unlike powf(1.5).
    (100.0 * l * l.sqrt()).floor() as u64
}

pub fn calculate_level_from_xp(total_xp: u64) -> UserLevel {
    let mut level = 1u32;
    let mut remaining = total_xp;

    loop {
        let needed = calculate_xp_for_level(level);
        if remaining < needed {
            break;
        }
        remaining -= needed;
        level += 1;
    }

    let xp_for_next_level = calculate_xp_for_level(level);
    let progress = remaining as f64 / xp_for_next_level as f64 * 100.0;

    UserLevel {
        level,
        current_xp: remaining,
        xp_for_next_level,
        total_xp,
        progress,
    }
}

pub fn add_xp(current_total_xp: u64, xp_to_add: u64) -> LevelUp {
    let before = calculate_level_from_xp(current_total_xp);
    let after = calculate_level_from_xp(current_total_xp.saturating_add(xp_to_add));
    let levels_gained = after.level.saturating_sub(before.level);

    LevelUp {
        leveled_up: levels_gained > 0,
        levels_gained,
        new_level: after,
    }
}

pub fn calculate_workout_xp(input: &WorkoutXpInput) -> XpAward {
    let mut breakdown = Vec::new();

    if input.completed {
        breakdown.push(XpBonus {
            reason: "Workout completed",
            xp: BASE_WORKOUT_XP,
        });
    }
    if input.first_workout_today {
        breakdown.push(XpBonus {
            reason: "First workout of the day",
            xp: FIRST_WORKOUT_OF_DAY_XP,
        });
    }
    if input.streak_days > 0 {
        breakdown.push(XpBonus {
            reason: "Streak bonus",
            xp: (input.streak_days as u64 * STREAK_XP_PER_DAY).min(MAX_STREAK_XP),
        });
    }
    if input.sets > 0 {
        breakdown.push(XpBonus {
            reason: "Sets completed",
            xp: input.sets as u64 * XP_PER_SET,
        });
    }
    if input.reps > 0 {
        breakdown.push(XpBonus {
            reason: "Reps completed",
            xp: input.reps as u64 * XP_PER_REP,
        });
    }
    if input.personal_records > 0 {
        breakdown.push(XpBonus {
            reason: "Personal records",
            xp: input.personal_records as u64 * XP_PER_PERSONAL_RECORD,
        });
    }

    XpAward {
        total: breakdown.iter().map(|b| b.xp).sum(),
        breakdown,
    }
}

pub fn get_level_title(level: u32) -> &'static str {
    LEVEL_TITLES
        .iter()
        .rev()
        .find(|(threshold, _)| level >= *threshold)
        .map(|(_, title)| *title)
        .unwrap_or(LEVEL_TITLES[0].1)
}

/// Highest reward whose threshold is at or below `level`.
pub fn get_level_reward(level: u32) -> Option<&'static LevelReward> {
    LEVEL_REWARDS.iter().rev().find(|r| level >= r.level)
}

/// First reward still ahead of `level`.
pub fn get_next_reward(level: u32) -> Option<&'static LevelReward> {
    LEVEL_REWARDS.iter().find(|r| r.level > level)
}

pub fn get_xp_multiplier_at<Tz: TimeZone>(now: &DateTime<Tz>) -> f64 {
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return WEEKEND_MULTIPLIER;
    }
    let hour = now.hour();
    if EARLY_BIRD_HOURS.contains(&hour) || hour >= NIGHT_OWL_FROM_HOUR {
        return TIME_OF_DAY_MULTIPLIER;
    }
    1.0
}

/// Multiplier for the local wall clock. Not applied by any other function.
pub fn get_xp_multiplier() -> f64 {
    get_xp_multiplier_at(&Local::now())
}
