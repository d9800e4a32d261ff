pub mod achievement;
pub mod challenge;
pub mod level;
pub mod stats;
pub mod workout;
