pub mod achievements;
pub mod challenges;
pub mod health;
pub mod levels;
pub mod metrics;
