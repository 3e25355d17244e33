//! Derivation engine
//!
//! Expands a grammar's axiom through `depth` rewriting iterations into the
//! flat token string the turtle consumes. The expansion is depth-first:
//! each symbol either passes through verbatim (constant, or depth
//! exhausted) or is resolved against its production table and the
//! replacement is expanded with one less iteration remaining.
//!
//! Neighbor tokens handed to [`Rule::resolve`] always come from the string
//! being rewritten at the current level, never from freshly substituted
//! text, giving the 1-symbol lookahead/lookbehind its defined meaning.
//!
//! The derivation is a pure function of (grammar, depth, generator state):
//! rerunning with an equally seeded [`ChaCha8Rng`] reproduces the output
//! exactly. Concurrent derivations must each own an independently seeded
//! generator.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::MAX_DERIVATION_DEPTH;
use crate::core::error::{LsysError, Result};
use crate::grammar::{Grammar, Rule};

/// Build the derivation generator for a seed. Use
/// [`crate::core::config::DEFAULT_SEED`] for reproducible fixtures.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive the grammar's axiom through `depth` iterations.
///
/// A grammar with an empty ruleset derives to its axiom at any depth: every
/// symbol is a constant. Completeness ([`Grammar::is_complete`]) is a
/// front-end concern, not checked here.
///
/// Fails with [`LsysError::DepthExceeded`] when `depth` is beyond
/// [`MAX_DERIVATION_DEPTH`]; recoverable, the caller can retry smaller.
pub fn derive(grammar: &Grammar, depth: u32, rng: &mut ChaCha8Rng) -> Result<String> {
    if depth > MAX_DERIVATION_DEPTH {
        return Err(LsysError::DepthExceeded {
            requested: depth,
            max: MAX_DERIVATION_DEPTH,
        });
    }

    let mut output = String::new();
    expand(grammar, grammar.axiom(), depth, rng, &mut output);
    tracing::debug!(
        system = grammar.name(),
        depth,
        symbols = output.chars().count(),
        "derivation finished"
    );
    Ok(output)
}

/// Expand one string level. Recursion terminates because `depth` strictly
/// decreases and every replacement string is finite.
fn expand(grammar: &Grammar, current: &str, depth: u32, rng: &mut ChaCha8Rng, output: &mut String) {
    let symbols: Vec<char> = current.chars().collect();

    for (i, &symbol) in symbols.iter().enumerate() {
        let rule = if depth == 0 { None } else { grammar.rule(symbol) };
        let Some(rule) = rule else {
            output.push(symbol);
            continue;
        };

        // Neighbors from the pre-expansion string; missing neighbors at the
        // boundary are the empty token.
        let left = i
            .checked_sub(1)
            .map(|j| symbols[j].to_string())
            .unwrap_or_default();
        let right = symbols
            .get(i + 1)
            .map(char::to_string)
            .unwrap_or_default();

        match rule.resolve(&left, &right, rng) {
            Some(replacement) => expand(grammar, &replacement, depth - 1, rng, output),
            None => elide(rule, &left, &right),
        }
    }
}

/// A symbol with no firing production drops out of this iteration. Not an
/// error; logged so grammar authors can see why output shrank.
fn elide(rule: &Rule, left: &str, right: &str) {
    tracing::debug!(
        symbol = %rule.symbol(),
        %left,
        %right,
        "no production fired; symbol elided"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_SEED;
    use crate::grammar::{Context, Pattern};
    use std::collections::BTreeMap;

    fn rng() -> ChaCha8Rng {
        seeded_rng(DEFAULT_SEED)
    }

    fn deterministic(symbol: char, outcome: &str) -> Rule {
        let mut rule = Rule::new(symbol);
        rule.add_case(Context::universal(), outcome, 1.0);
        rule
    }

    fn koch() -> Grammar {
        let mut ruleset = BTreeMap::new();
        ruleset.insert('F', deterministic('F', "F+F"));
        Grammar::new("koch", 90.0, "F", ruleset)
    }

    #[test]
    fn depth_zero_returns_the_axiom() {
        assert_eq!(derive(&koch(), 0, &mut rng()).unwrap(), "F");
    }

    #[test]
    fn worked_example_two_iterations() {
        // depth 1: F -> F+F; depth 2: each F expands again.
        assert_eq!(derive(&koch(), 2, &mut rng()).unwrap(), "F+F+F+F");
    }

    #[test]
    fn constants_pass_through() {
        let mut ruleset = BTreeMap::new();
        ruleset.insert('A', deterministic('A', "A+B"));
        let grammar = Grammar::new("mixed", 45.0, "A", ruleset);
        // '+' and 'B' are constants: emitted verbatim at every depth.
        assert_eq!(derive(&grammar, 2, &mut rng()).unwrap(), "A+B+B");
    }

    #[test]
    fn empty_ruleset_returns_the_axiom_at_any_depth() {
        let empty = Grammar::new("empty", 90.0, "F+F-G", BTreeMap::new());
        for depth in [0, 1, 5, MAX_DERIVATION_DEPTH] {
            assert_eq!(derive(&empty, depth, &mut rng()).unwrap(), "F+F-G");
        }
    }

    #[test]
    fn excessive_depth_is_a_recoverable_error() {
        let err = derive(&koch(), MAX_DERIVATION_DEPTH + 1, &mut rng()).unwrap_err();
        match err {
            LsysError::DepthExceeded { requested, max } => {
                assert_eq!(requested, MAX_DERIVATION_DEPTH + 1);
                assert_eq!(max, MAX_DERIVATION_DEPTH);
            }
            other => panic!("expected DepthExceeded, got {other}"),
        }
        // Engine state is not corrupted: a sane retry succeeds.
        assert_eq!(derive(&koch(), 1, &mut rng()).unwrap(), "F+F");
    }

    #[test]
    fn context_rule_sees_original_neighbors() {
        // B rewrites only between A and C. In "ABC" the middle B fires; in
        // "BBB" nothing matches and every B is elided.
        let mut b = Rule::new('B');
        b.add_case(
            Context::new(
                Pattern::compile("A").unwrap(),
                Pattern::compile("C").unwrap(),
            ),
            "X",
            1.0,
        );

        let mut ruleset = BTreeMap::new();
        ruleset.insert('B', b);
        let in_context = Grammar::new("ctx", 90.0, "ABC", ruleset.clone());
        assert_eq!(derive(&in_context, 1, &mut rng()).unwrap(), "AXC");

        let out_of_context = Grammar::new("ctx", 90.0, "BBB", ruleset);
        assert_eq!(derive(&out_of_context, 1, &mut rng()).unwrap(), "");
    }

    #[test]
    fn context_falls_through_to_universal_case() {
        let mut b = Rule::new('B');
        b.add_case(
            Context::new(
                Pattern::compile("A").unwrap(),
                Pattern::compile("C").unwrap(),
            ),
            "X",
            1.0,
        );
        b.add_case(Context::universal(), "B", 1.0);

        let mut ruleset = BTreeMap::new();
        ruleset.insert('B', b);
        let grammar = Grammar::new("ctx", 90.0, "BBB", ruleset);
        assert_eq!(derive(&grammar, 1, &mut rng()).unwrap(), "BBB");
    }

    #[test]
    fn neighbors_come_from_the_rewritten_string_not_the_output() {
        // A -> CA. When the middle B is resolved, its left neighbor must
        // still be the original 'A', even though A's expansion has already
        // appended "CA" to the output.
        let mut a = Rule::new('A');
        a.add_case(Context::universal(), "CA", 1.0);
        let mut b = Rule::new('B');
        b.add_case(
            Context::new(Pattern::compile("A").unwrap(), Pattern::Wildcard),
            "X",
            1.0,
        );
        b.add_case(Context::universal(), "B", 1.0);

        let mut ruleset = BTreeMap::new();
        ruleset.insert('A', a);
        ruleset.insert('B', b);
        let grammar = Grammar::new("pre", 90.0, "AB", ruleset);
        // A expands to CA; B's left neighbor is the pre-expansion 'A', so
        // the left-sensitive case fires even though the produced text ends
        // with 'A' only by coincidence of this rule.
        assert_eq!(derive(&grammar, 1, &mut rng()).unwrap(), "CAX");
    }

    #[test]
    fn stochastic_derivation_is_reproducible() {
        let mut rule = Rule::new('A');
        rule.add_case(Context::universal(), "AB", 0.5);
        rule.add_case(Context::universal(), "BA", 0.5);
        let mut ruleset = BTreeMap::new();
        ruleset.insert('A', rule);
        let grammar = Grammar::new("coin", 60.0, "A", ruleset);

        let first = derive(&grammar, 6, &mut rng()).unwrap();
        let second = derive(&grammar, 6, &mut rng()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_mask_elides_the_symbol() {
        let mut rule = Rule::new('A');
        rule.add_case(Context::universal(), "AA", 0.0);
        let mut ruleset = BTreeMap::new();
        ruleset.insert('A', rule);
        let grammar = Grammar::new("gone", 90.0, "XAX", ruleset);
        // The universal context matches but its mask never rolls an
        // outcome; policy maps that to the empty outcome.
        assert_eq!(derive(&grammar, 1, &mut rng()).unwrap(), "XX");
    }
}
