//! Engine configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use crate::settings::MAX_REVEAL_INTERVAL_MS;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore, StoreResult};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Default length of the visual pulse held after each digit appears
pub const DEFAULT_PULSE_MS: u64 = 110;

/// Default "Correct" acknowledgment beat before the next round is shown
pub const DEFAULT_SETTLE_MS: u64 = 320;

/// Default lower bound of the speed-mode tail wait
pub const DEFAULT_SPEED_FLOOR_MS: u64 = 180;

/// Default fraction of the reveal interval used for the speed-mode tail wait
pub const DEFAULT_SPEED_FACTOR: f64 = 0.6;

/// Fixed timing constants used while playing a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTiming {
    /// Uninterruptible pulse held after each digit is appended
    pub pulse: Duration,
    /// Pause between a correct answer and the next round's first digit
    pub settle: Duration,
    /// Minimum tail wait in speed mode
    pub speed_floor: Duration,
    /// Fraction of the reveal interval used as the speed-mode tail wait
    pub speed_factor: f64,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(DEFAULT_PULSE_MS),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            speed_floor: Duration::from_millis(DEFAULT_SPEED_FLOOR_MS),
            speed_factor: DEFAULT_SPEED_FACTOR,
        }
    }
}

impl PlaybackTiming {
    /// Tail wait after the last digit in speed mode:
    /// `max(speed_floor, round(reveal * speed_factor))`.
    #[must_use]
    pub fn speed_tail(&self, reveal: Duration) -> Duration {
        let scaled = (reveal.as_millis() as f64 * self.speed_factor).round() as u64;
        Duration::from_millis(scaled).max(self.speed_floor)
    }
}

/// Complete engine configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Playback timing constants
    pub timing: PlaybackTiming,
    /// Location of the JSON file backing settings and best score.
    /// `None` keeps everything in memory for the lifetime of the process.
    pub store_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `RECALL_PULSE_MS`, `RECALL_SETTLE_MS`,
    /// `RECALL_SPEED_FLOOR_MS`, `RECALL_SPEED_FACTOR`, `RECALL_STORE_PATH`.
    /// Unparsable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let timing = PlaybackTiming {
            pulse: Duration::from_millis(parse_env_or("RECALL_PULSE_MS", DEFAULT_PULSE_MS)),
            settle: Duration::from_millis(parse_env_or("RECALL_SETTLE_MS", DEFAULT_SETTLE_MS)),
            speed_floor: Duration::from_millis(parse_env_or(
                "RECALL_SPEED_FLOOR_MS",
                DEFAULT_SPEED_FLOOR_MS,
            )),
            speed_factor: parse_env_or("RECALL_SPEED_FACTOR", DEFAULT_SPEED_FACTOR),
        };

        let store_path = std::env::var("RECALL_STORE_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let config = Self { timing, store_path };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.pulse.is_zero() {
            return Err(ConfigError::Invalid {
                var: "RECALL_PULSE_MS".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let factor = self.timing.speed_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::Invalid {
                var: "RECALL_SPEED_FACTOR".to_string(),
                reason: format!("Must be in (0, 1], got {factor}"),
            });
        }

        if self.timing.speed_floor > Duration::from_millis(u64::from(MAX_REVEAL_INTERVAL_MS)) {
            return Err(ConfigError::Invalid {
                var: "RECALL_SPEED_FLOOR_MS".to_string(),
                reason: format!("Cannot exceed the maximum reveal interval ({MAX_REVEAL_INTERVAL_MS}ms)"),
            });
        }

        Ok(())
    }

    /// Open the key-value store this configuration points at
    ///
    /// # Errors
    ///
    /// Returns error if the store file exists but cannot be read or parsed
    pub fn open_store(&self) -> StoreResult<Arc<dyn KeyValueStore>> {
        match &self.store_path {
            Some(path) => {
                log::info!("Using persistent store at {}", path.display());
                Ok(Arc::new(JsonFileStore::open(path)?))
            }
            None => {
                log::info!("No store path configured, keeping settings in memory");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "RECALL_PULSE_MS",
        "RECALL_SETTLE_MS",
        "RECALL_SPEED_FLOOR_MS",
        "RECALL_SPEED_FACTOR",
        "RECALL_STORE_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: tests touching the environment are serialized
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_speed_tail_scales_reveal_interval() {
        let timing = PlaybackTiming::default();
        assert_eq!(
            timing.speed_tail(Duration::from_millis(1000)),
            Duration::from_millis(600)
        );
        assert_eq!(
            timing.speed_tail(Duration::from_millis(700)),
            Duration::from_millis(420)
        );
    }

    #[test]
    fn test_speed_tail_respects_floor() {
        let timing = PlaybackTiming::default();
        assert_eq!(
            timing.speed_tail(Duration::from_millis(200)),
            Duration::from_millis(180)
        );
    }

    #[test]
    fn test_speed_tail_rounds_to_nearest_millisecond() {
        let timing = PlaybackTiming::default();
        // 333 * 0.6 = 199.8
        assert_eq!(
            timing.speed_tail(Duration::from_millis(333)),
            Duration::from_millis(200)
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("RECALL_PULSE_MS", "50");
            std::env::set_var("RECALL_SETTLE_MS", "0");
            std::env::set_var("RECALL_SPEED_FACTOR", "0.5");
            std::env::set_var("RECALL_STORE_PATH", "/tmp/recall.json");
        }

        let config = EngineConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.timing.pulse, Duration::from_millis(50));
        assert_eq!(config.timing.settle, Duration::ZERO);
        assert_eq!(config.timing.speed_factor, 0.5);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/recall.json")));
    }

    #[test]
    #[serial]
    fn test_from_env_garbage_falls_back_to_default() {
        clear_env();
        unsafe { std::env::set_var("RECALL_PULSE_MS", "fast") };

        let config = EngineConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.timing.pulse, Duration::from_millis(DEFAULT_PULSE_MS));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_factor() {
        clear_env();
        unsafe { std::env::set_var("RECALL_SPEED_FACTOR", "1.5") };

        let err = EngineConfig::from_env().unwrap_err();
        clear_env();

        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "RECALL_SPEED_FACTOR"));
    }

    #[test]
    fn test_validation_zero_pulse() {
        let config = EngineConfig {
            timing: PlaybackTiming {
                pulse: Duration::ZERO,
                ..PlaybackTiming::default()
            },
            store_path: None,
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("RECALL_PULSE_MS"));
    }

    #[test]
    fn test_validation_floor_above_max_reveal() {
        let config = EngineConfig {
            timing: PlaybackTiming {
                speed_floor: Duration::from_millis(5000),
                ..PlaybackTiming::default()
            },
            store_path: None,
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_nan_factor() {
        let config = EngineConfig {
            timing: PlaybackTiming {
                speed_factor: f64::NAN,
                ..PlaybackTiming::default()
            },
            store_path: None,
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_open_store_without_path_is_in_memory() {
        let store = EngineConfig::default().open_store().unwrap();
        assert_eq!(store.get("anything"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
