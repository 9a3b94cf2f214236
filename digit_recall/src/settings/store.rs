//! Persisted settings.

use super::models::{
    DEFAULT_GOAL, DEFAULT_REVEAL_INTERVAL_MS, Mode, Settings, SettingsCandidate,
};
use crate::storage::KeyValueStore;
use std::sync::Arc;

pub const MODE_KEY: &str = "recall.mode";
pub const REVEAL_INTERVAL_KEY: &str = "recall.reveal_interval_ms";
pub const GOAL_KEY: &str = "recall.goal";

/// Settings store
///
/// Holds the current settings in memory and writes every applied change
/// through to the key-value store.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    current: Settings,
}

impl SettingsStore {
    /// Load settings from `store`
    ///
    /// Absent keys take their defaults. Stored values go through the same
    /// normalization as user input, so a hand-edited store cannot produce
    /// out-of-range settings.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let candidate = SettingsCandidate {
            mode: store
                .get(MODE_KEY)
                .unwrap_or_else(|| Mode::Normal.as_str().to_string()),
            reveal_interval_ms: read_number(store.as_ref(), REVEAL_INTERVAL_KEY)
                .unwrap_or_else(|| i64::from(DEFAULT_REVEAL_INTERVAL_MS)),
            goal: read_number(store.as_ref(), GOAL_KEY).unwrap_or_else(|| i64::from(DEFAULT_GOAL)),
        };

        let current = Settings::normalize(&candidate);
        log::debug!(
            "Loaded settings: mode={}, reveal={}ms, goal={}",
            current.mode,
            current.reveal_interval_ms,
            current.goal
        );

        Self { store, current }
    }

    /// Current settings
    #[must_use]
    pub fn get(&self) -> Settings {
        self.current
    }

    /// Normalize, persist and return `candidate`
    ///
    /// A failed write is logged; the normalized settings still take effect
    /// for the rest of the session.
    pub fn apply(&mut self, candidate: &SettingsCandidate) -> Settings {
        let settings = Settings::normalize(candidate);

        let entries = [
            (MODE_KEY, settings.mode.as_str().to_string()),
            (REVEAL_INTERVAL_KEY, settings.reveal_interval_ms.to_string()),
            (GOAL_KEY, settings.goal.to_string()),
        ];
        for (key, value) in entries {
            if let Err(e) = self.store.set(key, &value) {
                log::warn!("Failed to persist setting {key}: {e}");
            }
        }

        self.current = settings;
        settings
    }
}

fn read_number(store: &dyn KeyValueStore, key: &str) -> Option<i64> {
    store.get(key).and_then(|v| v.trim().parse().ok())
}
