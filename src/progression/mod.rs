//! Pure progression engines. Nothing in here touches storage or the network;
//! time-relative functions come in a wall-clock form and an explicit
//! `_at`/`_on` form.

pub mod achievements;
pub mod challenges;
pub mod overload;
pub mod records;
pub mod stats;
pub mod streak;
pub mod xp;
