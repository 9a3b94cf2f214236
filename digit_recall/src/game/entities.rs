use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::player::PlaybackOutcome;
use crate::settings::Settings;

/// Generation number of a playback. Bumped on every transition that makes
/// an in-flight playback obsolete.
pub type RoundId = u64;

#[derive(Debug, Eq, Error, PartialEq)]
#[error("{0} is not a decimal digit")]
pub struct InvalidDigit(pub u8);

/// A single decimal digit, 0 through 9.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    /// Reduce any byte to a digit by taking it modulo 10.
    #[must_use]
    pub const fn wrapping(value: u8) -> Self {
        Self(value % 10)
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidDigit(value))
    }
}

impl From<Digit> for u8 {
    fn from(value: Digit) -> Self {
        value.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The digits the player must recall. Grows by one digit per correct round.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sequence(Vec<Digit>);

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_with(first: Digit) -> Self {
        Self(vec![first])
    }

    pub fn push(&mut self, digit: Digit) {
        self.0.push(digit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn digits(&self) -> &[Digit] {
        &self.0
    }

    /// All digits concatenated, e.g. `[3, 0, 7]` -> `"307"`. This is the
    /// exact string an answer is compared against.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<Digit>> for Sequence {
    fn from(value: Vec<Digit>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// Game phase
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No game in progress
    #[default]
    Idle,
    /// Digits are being played back
    Showing,
    /// Waiting for the player to type the sequence
    Answering,
    /// The last game ended with a wrong answer. Behaves like `Idle`.
    Lost,
}

impl Phase {
    /// Whether a new game may be started from this phase
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Phase::Idle | Phase::Lost)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Showing => "showing",
            Phase::Answering => "answering",
            Phase::Lost => "lost",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A wrong answer, kept for display until the next game starts
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Mismatch {
    pub expected: String,
    pub entered: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, you entered {}", self.expected, self.entered)
    }
}

/// Completion of one playback, tagged with the round it belongs to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackReport {
    pub round: RoundId,
    pub outcome: PlaybackOutcome,
}

/// Snapshot of everything a presentation adapter renders
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameView {
    pub phase: Phase,
    /// Digits currently on screen (only non-empty while showing)
    pub visible: Vec<Digit>,
    pub sequence_len: usize,
    pub current_streak: u32,
    pub best_streak: u32,
    pub settings: Settings,
    pub mismatch: Option<Mismatch>,
}

impl GameView {
    #[must_use]
    pub const fn goal(&self) -> u32 {
        self.settings.goal
    }

    #[must_use]
    pub const fn goal_reached(&self) -> bool {
        self.current_streak >= self.settings.goal
    }
}
