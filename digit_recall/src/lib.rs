//! # Digit Recall
//!
//! A timed sequence-recall game engine. The player watches a growing string
//! of digits appear one at a time, may cut the playback short when ready,
//! then types the whole sequence back. Each correct answer extends the
//! sequence by one digit and the streak by one; a wrong answer ends the game.
//!
//! ## Architecture
//!
//! - **Idle**: no game running
//! - **Showing**: digits are played back, racing the "I'm ready" signal
//! - **Answering**: waiting for the typed sequence
//! - **Lost**: last answer was wrong; behaves like Idle
//!
//! ## Core Modules
//!
//! - [`game`]: Game state machine, sequence and view types
//! - [`player`]: Timed playback and the interrupt signal
//! - [`settings`] / [`score`]: Persisted settings and best streak
//! - [`storage`]: Key-value persistence backends
//! - [`session`]: Async actor hosting a game for presentation adapters
//! - [`config`]: Timing and store configuration from the environment
//!
//! ## Example
//!
//! ```
//! use digit_recall::{GameStateMachine, Phase, storage::MemoryStore};
//! use std::sync::Arc;
//!
//! let game = GameStateMachine::new(Arc::new(MemoryStore::new()), Default::default());
//! assert_eq!(game.phase(), Phase::Idle);
//! ```

pub mod config;
pub mod game;
pub mod player;
pub mod score;
pub mod session;
pub mod settings;
pub mod storage;

pub use config::{ConfigError, EngineConfig, PlaybackTiming};
pub use game::{Digit, GameStateMachine, GameView, Mismatch, Phase, Sequence, SubmitOutcome};
pub use player::{InterruptSignal, PlaybackOutcome, SequencePlayer};
pub use session::{SessionActor, SessionHandle};
pub use settings::{Mode, Settings, SettingsCandidate};
