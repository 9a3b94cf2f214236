//! Difficulty mode, reveal interval and streak goal.
//!
//! Settings are never rejected: [`SettingsStore::apply`] clamps the reveal
//! interval to 200..=3000 ms and the goal to 3..=99, and treats any mode
//! other than `"speed"` as normal.

pub mod models;
pub mod store;

pub use models::{
    DEFAULT_GOAL, DEFAULT_REVEAL_INTERVAL_MS, MAX_GOAL, MAX_REVEAL_INTERVAL_MS, MIN_GOAL,
    MIN_REVEAL_INTERVAL_MS, Mode, Settings, SettingsCandidate,
};
pub use store::SettingsStore;
