//! Per-symbol production tables
//!
//! A [`Rule`] maps one symbol to its (context, outcome-set) entries. There
//! are three shapes of rule, all represented the same way:
//!
//! - deterministic: one universal context, one outcome at probability 1.0
//! - stochastic: one context, several weighted outcomes
//! - context-sensitive: several contexts; the left/right neighbors decide
//!   which outcome set gets rolled
//!
//! Context-sensitivity supersedes stochastics: the context is matched
//! first, and only the matched context's mask is rolled.

use rand_chacha::ChaCha8Rng;

use crate::grammar::context::Context;
use crate::grammar::mask::ProbabilityMask;

/// Production table for a single symbol.
#[derive(Debug, Clone)]
pub struct Rule {
    symbol: char,
    productions: Vec<(Context, ProbabilityMask)>,
}

impl Rule {
    pub fn new(symbol: char) -> Self {
        Self {
            symbol,
            productions: Vec::new(),
        }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn productions(&self) -> &[(Context, ProbabilityMask)] {
        &self.productions
    }

    /// Add an outcome under the given context. Cases sharing an equal
    /// context accumulate into one mask, so several weighted results can be
    /// declared case by case.
    pub fn add_case(&mut self, context: Context, outcome: impl Into<String>, probability: f64) {
        if let Some((_, mask)) = self.productions.iter_mut().find(|(c, _)| *c == context) {
            mask.add(outcome, probability);
        } else {
            let mut mask = ProbabilityMask::new();
            mask.add(outcome, probability);
            self.productions.push((context, mask));
        }
    }

    /// Pick the replacement string for one derivation step.
    ///
    /// Contexts are tried most-specific first (both sides concrete, then
    /// one-sided, then universal); declaration order only breaks ties
    /// within a rank. The first matching context's mask is rolled and the
    /// search stops there, even if the roll comes up empty.
    ///
    /// `None` means the symbol is elided this iteration: either no context
    /// matched, or the matched mask was exhausted without an outcome.
    pub fn resolve(
        &self,
        left_neighbor: &str,
        right_neighbor: &str,
        rng: &mut ChaCha8Rng,
    ) -> Option<String> {
        let mut ranked: Vec<&(Context, ProbabilityMask)> = self.productions.iter().collect();
        ranked.sort_by_key(|(context, _)| std::cmp::Reverse(context.specificity()));

        for (context, mask) in ranked {
            if context.matches(left_neighbor, right_neighbor) {
                return mask.roll(rng).map(str::to_owned);
            }
        }
        None
    }

    /// True iff more than one outcome across all contexts can actually be
    /// rolled (probability > 0).
    pub fn is_stochastic(&self) -> bool {
        let live: usize = self
            .productions
            .iter()
            .map(|(_, mask)| mask.live_outcomes())
            .sum();
        live > 1
    }

    /// True iff any context constrains at least one side.
    pub fn is_context_sensitive(&self) -> bool {
        self.productions
            .iter()
            .any(|(context, _)| !context.is_universal())
    }
}
