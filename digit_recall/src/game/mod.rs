//! Recall game engine - state machine and game entities.
//!
//! This module provides:
//! - Digits, sequences, phases and the presentation snapshot
//! - Digit sources (random or scripted)
//! - The game state machine driving playback and grading

pub mod digits;
pub mod entities;
pub mod state_machine;

pub use digits::{DigitSource, RandomDigits, ScriptedDigits};
pub use entities::{
    Digit, GameView, InvalidDigit, Mismatch, Phase, PlaybackReport, RoundId, Sequence,
};
pub use state_machine::{GameStateMachine, SubmitOutcome};
