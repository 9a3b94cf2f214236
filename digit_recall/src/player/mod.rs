//! Sequence playback racing a timer against the player's "I'm ready" signal.
//!
//! This module implements:
//! - [`InterruptSignal`]: one-shot notification, first fire wins
//! - [`VisibleBuffer`]: observable list of digits shown so far
//! - [`SequencePlayer`]: per-digit pulse, reveal wait and tail wait
//!
//! ## Example
//!
//! ```
//! use digit_recall::game::entities::Digit;
//! use digit_recall::player::{InterruptSignal, PlaybackOutcome, SequencePlayer, VisibleBuffer};
//! use digit_recall::settings::Mode;
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let player = SequencePlayer::default();
//!     let signal = InterruptSignal::new();
//!     let display = VisibleBuffer::new();
//!
//!     // Player is ready before playback even starts
//!     signal.fire();
//!
//!     let digits = [Digit::wrapping(4), Digit::wrapping(2)];
//!     let outcome = player
//!         .play(&digits, Duration::from_millis(200), Mode::Normal, &signal, &display)
//!         .await;
//!
//!     assert_eq!(outcome, PlaybackOutcome::InterruptedAt(0));
//!     assert_eq!(display.len(), 1);
//! }
//! ```

pub mod display;
pub mod sequence_player;
pub mod signal;

pub use display::VisibleBuffer;
pub use sequence_player::{PlaybackOutcome, SequencePlayer};
pub use signal::InterruptSignal;
