//! Source of nondeterministic choices.
//!
//! Every random draw the strategies make goes through [`ChoiceSource`], so a
//! test can replace the generator with a fixed script and assert which
//! branch was taken.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies uniformly distributed choices.
pub trait ChoiceSource {
    /// Return a value in `0..n`. `n` is always at least 1.
    fn choose(&mut self, n: u32) -> u32;
}

/// Production source backed by `rand`.
#[derive(Debug, Clone)]
pub struct RandomChoices {
    rng: StdRng,
}

impl RandomChoices {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChoices {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ChoiceSource for RandomChoices {
    fn choose(&mut self, n: u32) -> u32 {
        self.rng.gen_range(0..n.max(1))
    }
}

/// Replays a fixed script of choices, cycling when it runs out.
///
/// Each scripted value is reduced modulo the requested range. An empty
/// script always answers 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChoices {
    script: Vec<u32>,
    next: usize,
    drawn: usize,
}

impl ScriptedChoices {
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        Self {
            script: script.into(),
            next: 0,
            drawn: 0,
        }
    }

    /// Number of choices drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl ChoiceSource for ScriptedChoices {
    fn choose(&mut self, n: u32) -> u32 {
        self.drawn += 1;
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.next];
        self.next = (self.next + 1) % self.script.len();
        value % n.max(1)
    }
}
