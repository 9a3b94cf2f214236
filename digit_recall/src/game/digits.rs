//! Where new sequence digits come from.

use super::entities::Digit;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of the digits appended to a sequence
pub trait DigitSource: Send {
    fn next_digit(&mut self) -> Digit;
}

/// Uniformly random digits
pub struct RandomDigits {
    rng: StdRng,
}

impl Default for RandomDigits {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomDigits {
    /// Seeded from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible digits for replays and tests
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DigitSource for RandomDigits {
    fn next_digit(&mut self) -> Digit {
        Digit::wrapping(self.rng.random_range(0..10))
    }
}

/// Replays a fixed script of digits, cycling when it runs out.
/// An empty script yields zeros.
#[derive(Clone, Debug)]
pub struct ScriptedDigits {
    script: Vec<Digit>,
    cursor: usize,
}

impl ScriptedDigits {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Digit>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Convenience constructor from raw values; each is reduced modulo 10
    #[must_use]
    pub fn from_values(values: &[u8]) -> Self {
        Self::new(values.iter().copied().map(Digit::wrapping))
    }
}

impl DigitSource for ScriptedDigits {
    fn next_digit(&mut self) -> Digit {
        if self.script.is_empty() {
            return Digit::default();
        }
        let digit = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        digit
    }
}
