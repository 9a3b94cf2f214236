//! Streak counter with a persisted best.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const BEST_STREAK_KEY: &str = "recall.best_streak";

/// Result of a correctly answered round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    /// Streak after the increment
    pub current: u32,
    /// Best streak after the increment
    pub best: u32,
    /// Best streak before the increment
    pub previous_best: u32,
}

impl StreakUpdate {
    #[must_use]
    pub const fn is_new_record(&self) -> bool {
        self.best > self.previous_best
    }
}

/// Score tracker
///
/// The best streak is read once from the store and cached; it only ever
/// grows, and each increase is written through immediately.
pub struct ScoreTracker {
    store: Arc<dyn KeyValueStore>,
    current: u32,
    best: u32,
}

impl ScoreTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let best = store
            .get(BEST_STREAK_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        Self {
            store,
            current: 0,
            best,
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Current streak
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Best streak ever recorded (0 if none)
    #[must_use]
    pub const fn current_best(&self) -> u32 {
        self.best
    }

    /// Count one correct round, persisting a new best if it was beaten
    pub fn increment(&mut self) -> StreakUpdate {
        let previous_best = self.best;
        self.current = self.current.saturating_add(1);

        if self.current > previous_best {
            self.best = self.current;
            if let Err(e) = self.store.set(BEST_STREAK_KEY, &self.best.to_string()) {
                log::warn!("Failed to persist best streak {}: {e}", self.best);
            }
        }

        StreakUpdate {
            current: self.current,
            best: self.best,
            previous_best,
        }
    }
}
