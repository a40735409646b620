//! The simulation's single source of randomness.
//!
//! Every probabilistic decision -- trait assignment, awakening rolls, god
//! dice, the magic tingle -- goes through the [`Dice`] trait, so
//! deterministic tests can script every branch without fighting a PRNG's
//! bit-level sampling. Production uses [`RandomDice`], backed by `rand`;
//! tests use [`ScriptedDice`], which replays queued outcomes.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};

/// A source of random outcomes for the simulation.
pub trait Dice {
    /// Roll against a probability in `[0, 1)`; true if the roll lands
    /// strictly below `probability`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Draw a uniform index in `0..len`. Returns 0 for an empty range.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Draw a uniform integer in `lo..=hi`. Returns `lo` if the range is
    /// inverted or degenerate.
    fn roll_range(&mut self, lo: i64, hi: i64) -> i64;
}

/// Production dice backed by a seedable PRNG.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Dice seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Dice with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for RandomDice {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn roll_range(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Deterministic dice that replay queued outcomes, for tests.
///
/// Each query kind has its own queue. An exhausted queue falls back to
/// the quietest outcome: `chance` fails, `pick_index` picks 0,
/// `roll_range` returns the low bound. Out-of-range scripted values are
/// clamped rather than rejected.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    indices: VecDeque<usize>,
    ranges: VecDeque<i64>,
}

impl ScriptedDice {
    /// Queue raw `[0, 1)` rolls consumed by [`Dice::chance`].
    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue indices consumed by [`Dice::pick_index`].
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// Queue values consumed by [`Dice::roll_range`].
    #[must_use]
    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = i64>) -> Self {
        self.ranges.extend(ranges);
        self
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, probability: f64) -> bool {
        self.rolls
            .pop_front()
            .is_some_and(|roll| roll < probability)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let idx = self.indices.pop_front().unwrap_or(0);
        idx.min(len.saturating_sub(1))
    }

    fn roll_range(&mut self, lo: i64, hi: i64) -> i64 {
        self.ranges.pop_front().unwrap_or(lo).clamp(lo, hi.max(lo))
    }
}
