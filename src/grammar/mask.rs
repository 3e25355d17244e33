//! Weighted-random outcome selection
//!
//! A [`ProbabilityMask`] holds (outcome, probability) entries and draws one
//! by a weighted roll. A mask like
//!
//! ```text
//! "Hello" (0.50)
//! "World" (0.25)
//! "Asdfg" (0.25)
//! ```
//!
//! rolls "Hello" about half the time and the others about a quarter each.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Tolerance for the probability-sum check in [`ProbabilityMask::validate`].
///
/// Entry probabilities accumulate floating-point drift, so exact equality
/// with 1.0 would reject masks like three entries of 1/3.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// A set of weighted outcomes. Entries keep insertion order; the roll walks
/// them front to back accumulating probability mass.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityMask {
    entries: Vec<(String, f64)>,
}

impl ProbabilityMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome with its probability. Duplicate outcome strings
    /// are allowed; their probability mass simply stacks.
    pub fn add(&mut self, outcome: impl Into<String>, probability: f64) {
        self.entries.push((outcome.into(), probability));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All (outcome, probability) entries in insertion order.
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Number of entries that can actually be rolled (probability > 0).
    pub fn live_outcomes(&self) -> usize {
        self.entries.iter().filter(|(_, p)| *p > 0.0).count()
    }

    /// True iff the mask is non-empty and its probabilities sum to 1
    /// within [`PROBABILITY_EPSILON`]. Unvalidated masks still roll, but
    /// their distribution is whatever the entries say it is.
    pub fn validate(&self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let sum: f64 = self.entries.iter().map(|(_, p)| p).sum();
        (sum - 1.0).abs() < PROBABILITY_EPSILON
    }

    /// Draw an outcome: roll uniform r in [0, 1) and return the first entry
    /// whose cumulative probability reaches it.
    ///
    /// Returns `None` when the entries are exhausted without reaching the
    /// roll, which happens when the probabilities sum to less than 1
    /// (including float drift just under it). Callers decide the policy for
    /// that case; the derivation engine treats it as the empty outcome.
    pub fn roll(&self, rng: &mut ChaCha8Rng) -> Option<&str> {
        let roll: f64 = rng.gen();
        let mut sum = 0.0;
        for (outcome, probability) in &self.entries {
            sum += probability;
            if sum >= roll {
                return Some(outcome);
            }
        }
        None
    }
}

impl std::fmt::Display for ProbabilityMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (outcome, probability) in &self.entries {
            writeln!(f, "{}: {}%", outcome, probability * 100.0)?;
        }
        Ok(())
    }
}
