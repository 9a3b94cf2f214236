//! Current and best streak tracking.

pub mod tracker;

pub use tracker::{BEST_STREAK_KEY, ScoreTracker, StreakUpdate};
