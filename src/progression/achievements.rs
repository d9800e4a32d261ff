//! Achievement catalog and unlock evaluation.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::models::achievement::{
    Achievement, AchievementCategory, AchievementUnlock, AchievementView, UnlockedAchievement,
};
use crate::models::stats::UserStats;

const SECRET_TITLE: &str = "???";
const SECRET_DESCRIPTION: &str = "Keep training to reveal this achievement";

macro_rules! achievement {
    ($id:literal, $title:literal, $desc:literal, $icon:literal, $cat:ident, $cond:expr) => {
        achievement!($id, $title, $desc, $icon, $cat, $cond, false)
    };
    (
        $id:literal, $title:literal, $desc:literal, $icon:literal,
        $cat:ident, $cond:expr, $secret:expr
    ) => {
        Achievement {
            id: $id,
            title: $title,
            description: $desc,
            icon: $icon,
            category: AchievementCategory::$cat,
            secret: $secret,
            condition: $cond,
        }
    };
}

/// Evaluated in declaration order.
pub static ACHIEVEMENTS: &[Achievement] = &[
    // Workouts
    achievement!(
        "first-workout",
        "First Steps",
        "Complete your first workout",
        "footprints",
        Workouts,
        |s| s.total_workouts >= 1
    ),
    achievement!(
        "workouts-10",
        "Getting Serious",
        "Complete 10 workouts",
        "dumbbell",
        Workouts,
        |s| s.total_workouts >= 10
    ),
    achievement!(
        "workouts-50",
        "Half Century",
        "Complete 50 workouts",
        "medal",
        Workouts,
        |s| s.total_workouts >= 50
    ),
    achievement!(
        "workouts-100",
        "Centurion",
        "Complete 100 workouts",
        "trophy",
        Workouts,
        |s| s.total_workouts >= 100
    ),
    achievement!(
        "workouts-500",
        "Iron Veteran",
        "Complete 500 workouts",
        "crown",
        Workouts,
        |s| s.total_workouts >= 500
    ),
    // Streaks
    achievement!(
        "streak-3",
        "On a Roll",
        "Work out 3 days in a row",
        "flame",
        Streaks,
        |s| s.max_streak >= 3
    ),
    achievement!(
        "streak-7",
        "Week Streak",
        "Work out 7 days in a row",
        "flame",
        Streaks,
        |s| s.max_streak >= 7
    ),
    achievement!(
        "streak-30",
        "Unstoppable",
        "Work out 30 days in a row",
        "zap",
        Streaks,
        |s| s.max_streak >= 30
    ),
    achievement!(
        "streak-100",
        "Habit Forged",
        "Work out 100 days in a row",
        "gem",
        Streaks,
        |s| s.max_streak >= 100
    ),
    // Strength
    achievement!(
        "first-pr",
        "Personal Best",
        "Set your first personal record",
        "trending-up",
        Strength,
        |s| s.total_prs >= 1
    ),
    achievement!(
        "prs-10",
        "Record Breaker",
        "Set 10 personal records",
        "bar-chart",
        Strength,
        |s| s.total_prs >= 10
    ),
    achievement!(
        "prs-50",
        "Limit Pusher",
        "Set 50 personal records",
        "rocket",
        Strength,
        |s| s.total_prs >= 50
    ),
    // Consistency
    achievement!(
        "week-warrior",
        "Week Warrior",
        "Work out 5 times in one week",
        "calendar",
        Consistency,
        |s| s.this_week_workouts >= 5
    ),
    achievement!(
        "perfect-week",
        "Perfect Week",
        "Hit every planned workout for a week",
        "check-circle",
        Consistency,
        |s| s.perfect_weeks.unwrap_or(0) >= 1
    ),
    achievement!(
        "perfect-month",
        "Perfect Month",
        "Complete 4 perfect weeks",
        "calendar-check",
        Consistency,
        |s| s.perfect_weeks.unwrap_or(0) >= 4
    ),
    // Exploration
    achievement!(
        "explorer-5",
        "Explorer",
        "Try 5 different exercises",
        "compass",
        Exploration,
        |s| s.unique_exercises >= 5
    ),
    achievement!(
        "explorer-20",
        "Well Rounded",
        "Try 20 different exercises",
        "map",
        Exploration,
        |s| s.unique_exercises >= 20
    ),
    // Tracking
    achievement!(
        "weight-logger",
        "Scale Watcher",
        "Log your body weight",
        "scale",
        Tracking,
        |s| s.weight_logged
    ),
    // Special
    achievement!(
        "early-bird",
        "Early Bird",
        "Finish 10 workouts before 8 AM",
        "sunrise",
        Special,
        |s| s.early_morning_workouts.unwrap_or(0) >= 10,
        true
    ),
    achievement!(
        "night-owl",
        "Night Owl",
        "Finish 10 workouts after 9 PM",
        "moon",
        Special,
        |s| s.late_night_workouts.unwrap_or(0) >= 10,
        true
    ),
    achievement!(
        "weekend-warrior",
        "Weekend Warrior",
        "Finish 20 workouts on weekends",
        "sun",
        Special,
        |s| s.weekend_workouts.unwrap_or(0) >= 20,
        true
    ),
];

pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Pairs a stored unlock with its catalog entry. Ids no longer in the catalog
/// resolve to `None`.
pub fn resolve_unlock(unlock: &AchievementUnlock) -> Option<UnlockedAchievement> {
    find_achievement(&unlock.achievement_id).map(|a| UnlockedAchievement {
        achievement: *a,
        unlocked_at: unlock.unlocked_at,
    })
}

/// Returns the catalog entries that are satisfied by `stats` and not yet in
/// `unlocked_ids`, stamped with `now`. Inputs are left untouched.
pub fn check_achievements<'a, I>(
    stats: &UserStats,
    unlocked_ids: I,
    now: DateTime<Utc>,
) -> Vec<UnlockedAchievement>
where
    I: IntoIterator<Item = &'a str>,
{
    let unlocked: HashSet<&str> = unlocked_ids.into_iter().collect();

    ACHIEVEMENTS
        .iter()
        .filter(|a| !unlocked.contains(a.id))
        .filter(|a| (a.condition)(stats))
        .map(|a| UnlockedAchievement {
            achievement: *a,
            unlocked_at: now,
        })
        .collect()
}

/// Projects the whole catalog for display against the caller's unlock records.
pub fn achievement_views(unlocks: &[AchievementUnlock]) -> Vec<AchievementView> {
    let by_id: HashMap<&str, DateTime<Utc>> = unlocks
        .iter()
        .map(|u| (u.achievement_id.as_str(), u.unlocked_at))
        .collect();

    ACHIEVEMENTS
        .iter()
        .map(|a| {
            let unlocked_at = by_id.get(a.id).copied();
            let hidden = a.secret && unlocked_at.is_none();
            AchievementView {
                id: a.id,
                title: if hidden { SECRET_TITLE } else { a.title },
                description: if hidden { SECRET_DESCRIPTION } else { a.description },
                icon: a.icon,
                category: a.category,
                secret: a.secret,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const NO_UNLOCKS: [&str; 0] = [];

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 18, 0, 0).unwrap()
    }

    fn ids(unlocked: &[UnlockedAchievement]) -> Vec<&'static str> {
        unlocked.iter().map(|u| u.achievement.id).collect()
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let unique: HashSet<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(unique.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn test_empty_stats_unlock_nothing() {
        assert!(check_achievements(&UserStats::default(), NO_UNLOCKS, now()).is_empty());
    }

    #[test]
    fn test_unlocks_in_catalog_order() {
        let stats = UserStats {
            total_workouts: 12,
            this_week_workouts: 3,
            total_prs: 1,
            current_streak: 4,
            max_streak: 4,
            ..UserStats::default()
        };
        let unlocked = check_achievements(&stats, NO_UNLOCKS, now());
        assert_eq!(
            ids(&unlocked),
            vec!["first-workout", "workouts-10", "streak-3", "first-pr"]
        );
        assert!(unlocked.iter().all(|u| u.unlocked_at == now()));
    }

    #[test]
    fn test_already_unlocked_are_skipped() {
        let stats = UserStats {
            total_workouts: 12,
            ..UserStats::default()
        };
        let unlocked = check_achievements(&stats, ["first-workout"], now());
        assert_eq!(ids(&unlocked), vec!["workouts-10"]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let stats = UserStats {
            total_workouts: 60,
            max_streak: 8,
            current_streak: 2,
            unique_exercises: 6,
            weight_logged: true,
            ..UserStats::default()
        };
        let first = check_achievements(&stats, NO_UNLOCKS, now());
        assert!(!first.is_empty());

        let unlocked: Vec<&str> = first.iter().map(|u| u.achievement.id).collect();
        let second = check_achievements(&stats, unlocked.iter().copied(), now());
        assert!(second.is_empty());
    }

    #[test]
    fn test_secret_achievements_unlock_like_any_other() {
        let stats = UserStats {
            total_workouts: 10,
            max_streak: 1,
            current_streak: 1,
            early_morning_workouts: Some(10),
            ..UserStats::default()
        };
        let unlocked = check_achievements(&stats, NO_UNLOCKS, now());
        assert!(ids(&unlocked).contains(&"early-bird"));
    }

    #[test]
    fn test_views_mask_locked_secrets() {
        let unlocks = vec![AchievementUnlock {
            achievement_id: "night-owl".into(),
            unlocked_at: now(),
        }];
        let views = achievement_views(&unlocks);
        assert_eq!(views.len(), ACHIEVEMENTS.len());

        let early = views.iter().find(|v| v.id == "early-bird").unwrap();
        assert!(!early.unlocked);
        assert_eq!(early.title, SECRET_TITLE);

        let night = views.iter().find(|v| v.id == "night-owl").unwrap();
        assert!(night.unlocked);
        assert_eq!(night.title, "Night Owl");
        assert_eq!(night.unlocked_at, Some(now()));

        let first = views.iter().find(|v| v.id == "first-workout").unwrap();
        assert!(!first.unlocked);
        assert_eq!(first.title, "First Steps");
    }

    #[test]
    fn test_find_achievement() {
        assert_eq!(find_achievement("streak-7").map(|a| a.title), Some("Week Streak"));
        assert!(find_achievement("nope").is_none());
    }

    #[test]
    fn test_resolve_unlock() {
        let unlock = AchievementUnlock {
            achievement_id: "first-pr".into(),
            unlocked_at: now(),
        };
        let resolved = resolve_unlock(&unlock).unwrap();
        assert_eq!(resolved.achievement.title, "Personal Best");
        assert_eq!(resolved.unlocked_at, now());

        let retired = AchievementUnlock {
            achievement_id: "retired-badge".into(),
            unlocked_at: now(),
        };
        assert!(resolve_unlock(&retired).is_none());
    }
}
