//! Settings models and normalization rules.

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

pub const MIN_REVEAL_INTERVAL_MS: u32 = 200;
pub const MAX_REVEAL_INTERVAL_MS: u32 = 3000;
pub const DEFAULT_REVEAL_INTERVAL_MS: u32 = 700;

pub const MIN_GOAL: u32 = 3;
pub const MAX_GOAL: u32 = 99;
pub const DEFAULT_GOAL: u32 = 11;

/// Difficulty mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Playback waits for the player to signal readiness after the last digit
    #[default]
    Normal,
    /// Playback ends on its own shortly after the last digit
    Speed,
}

impl Mode {
    /// Interpret raw user input. Only the exact string `"speed"` selects
    /// [`Mode::Speed`]; everything else is [`Mode::Normal`].
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        if raw == "speed" {
            Mode::Speed
        } else {
            Mode::Normal
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Speed => "speed",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated game settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub mode: Mode,

    /// Wait between digits during playback, in `[200, 3000]`
    pub reveal_interval_ms: u32,

    /// Target streak shown as progress, in `[3, 99]`
    pub goal: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            reveal_interval_ms: DEFAULT_REVEAL_INTERVAL_MS,
            goal: DEFAULT_GOAL,
        }
    }
}

impl Settings {
    /// Normalize raw input into valid settings. Out-of-range numbers are
    /// clamped, unknown modes become [`Mode::Normal`]; nothing is rejected.
    #[must_use]
    pub fn normalize(candidate: &SettingsCandidate) -> Self {
        Self {
            mode: Mode::coerce(&candidate.mode),
            reveal_interval_ms: clamp_to(
                candidate.reveal_interval_ms,
                MIN_REVEAL_INTERVAL_MS,
                MAX_REVEAL_INTERVAL_MS,
            ),
            goal: clamp_to(candidate.goal, MIN_GOAL, MAX_GOAL),
        }
    }

    #[must_use]
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.reveal_interval_ms))
    }
}

/// Unvalidated settings as submitted by a presentation adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsCandidate {
    pub mode: String,
    pub reveal_interval_ms: i64,
    pub goal: i64,
}

impl From<Settings> for SettingsCandidate {
    fn from(value: Settings) -> Self {
        Self {
            mode: value.mode.as_str().to_string(),
            reveal_interval_ms: i64::from(value.reveal_interval_ms),
            goal: i64::from(value.goal),
        }
    }
}

fn clamp_to(value: i64, min: u32, max: u32) -> u32 {
    // Result lies within [min, max], so it always fits in u32
    value.clamp(i64::from(min), i64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mode: &str, reveal_interval_ms: i64, goal: i64) -> SettingsCandidate {
        SettingsCandidate {
            mode: mode.to_string(),
            reveal_interval_ms,
            goal,
        }
    }

    #[test]
    fn test_mode_coerce_exact_match_only() {
        assert_eq!(Mode::coerce("speed"), Mode::Speed);
        assert_eq!(Mode::coerce("normal"), Mode::Normal);
        assert_eq!(Mode::coerce("Speed"), Mode::Normal);
        assert_eq!(Mode::coerce(" speed"), Mode::Normal);
        assert_eq!(Mode::coerce(""), Mode::Normal);
    }

    #[test]
    fn test_normalize_clamps_high() {
        let settings = Settings::normalize(&candidate("speed", 5000, 200));
        assert_eq!(
            settings,
            Settings {
                mode: Mode::Speed,
                reveal_interval_ms: 3000,
                goal: 99,
            }
        );
    }

    #[test]
    fn test_normalize_clamps_low() {
        let settings = Settings::normalize(&candidate("normal", -40, 0));
        assert_eq!(settings.reveal_interval_ms, MIN_REVEAL_INTERVAL_MS);
        assert_eq!(settings.goal, MIN_GOAL);
    }

    #[test]
    fn test_normalize_keeps_in_range_values() {
        let settings = Settings::normalize(&candidate("normal", 950, 25));
        assert_eq!(settings.reveal_interval_ms, 950);
        assert_eq!(settings.goal, 25);
    }

    #[test]
    fn test_normalize_extreme_values() {
        let settings = Settings::normalize(&candidate("speed", i64::MAX, i64::MIN));
        assert_eq!(settings.reveal_interval_ms, MAX_REVEAL_INTERVAL_MS);
        assert_eq!(settings.goal, MIN_GOAL);
    }

    #[test]
    fn test_candidate_from_settings_normalizes_to_itself() {
        let settings = Settings {
            mode: Mode::Speed,
            reveal_interval_ms: 1200,
            goal: 42,
        };
        assert_eq!(Settings::normalize(&settings.into()), settings);
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Speed).unwrap(), "\"speed\"");
        let mode: Mode = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(mode, Mode::Normal);
    }
}
