//! Timed digit-by-digit playback.

use super::{display::VisibleBuffer, signal::InterruptSignal};
use crate::config::PlaybackTiming;
use crate::game::entities::Digit;
use crate::settings::Mode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

/// How a playback ended
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlaybackOutcome {
    /// Every digit was shown and the tail wait completed
    FullyShown,
    /// The player signalled readiness while waiting after digit `index`;
    /// no later digits were shown
    InterruptedAt(usize),
}

/// Plays a sequence into a [`VisibleBuffer`]
#[derive(Clone, Copy, Debug, Default)]
pub struct SequencePlayer {
    timing: PlaybackTiming,
}

impl SequencePlayer {
    #[must_use]
    pub const fn new(timing: PlaybackTiming) -> Self {
        Self { timing }
    }

    #[must_use]
    pub const fn timing(&self) -> &PlaybackTiming {
        &self.timing
    }

    /// Show `sequence` one digit at a time.
    ///
    /// Each digit is appended to `display` and held for the fixed pulse,
    /// which cannot be interrupted. Between digits the reveal interval races
    /// against `signal`; if the signal wins, playback stops there. After the
    /// last digit, speed mode waits at most [`PlaybackTiming::speed_tail`]
    /// while normal mode waits for the signal.
    pub async fn play(
        &self,
        sequence: &[Digit],
        reveal_interval: Duration,
        mode: Mode,
        signal: &InterruptSignal,
        display: &VisibleBuffer,
    ) -> PlaybackOutcome {
        let last = sequence.len().saturating_sub(1);

        for (index, &digit) in sequence.iter().enumerate() {
            display.push(digit);
            sleep(self.timing.pulse).await;

            if index == last {
                break;
            }

            tokio::select! {
                biased;
                () = signal.wait() => return PlaybackOutcome::InterruptedAt(index),
                () = sleep(reveal_interval) => {}
            }
        }

        match mode {
            Mode::Speed => {
                let tail = self.timing.speed_tail(reveal_interval);
                tokio::select! {
                    biased;
                    () = signal.wait() => {}
                    () = sleep(tail) => {}
                }
            }
            Mode::Normal => signal.wait().await,
        }

        PlaybackOutcome::FullyShown
    }
}
