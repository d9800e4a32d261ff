use serde::Serialize;

/// Level view-model derived from a lifetime XP total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLevel {
    pub level: u32,
    /// XP earned inside the current level.
    pub current_xp: u64,
    /// XP needed to complete the current level.
    pub xp_for_next_level: u64,
    pub total_xp: u64,
    /// Percentage in 0..=100.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelUp {
    pub new_level: UserLevel,
    pub leveled_up: bool,
    pub levels_gained: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpBonus {
    pub reason: &'static str,
    pub xp: u64,
}

/// Itemized XP awarded for a workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpAward {
    pub total: u64,
    pub breakdown: Vec<XpBonus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReward {
    pub level: u32,
    pub unlocks: &'static [&'static str],
    pub bonus_points: u32,
}
