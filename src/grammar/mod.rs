//! Grammar data model
//!
//! An L-system bundles a name, a turn angle, an axiom, and a ruleset
//! mapping symbols to their production tables. A symbol is a single
//! `char` token; it is a variable iff the ruleset has an entry for it,
//! otherwise it is a constant emitted verbatim during derivation.

pub mod context;
pub mod mask;
pub mod rule;

pub use context::{Context, Pattern};
pub use mask::ProbabilityMask;
pub use rule::Rule;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// A complete L-system: name, turn angle (degrees), axiom, and per-symbol
/// production tables. Immutable during a derivation run; the engine only
/// reads it.
#[derive(Debug)]
pub struct Grammar {
    name: String,
    angle: f64,
    axiom: String,
    ruleset: BTreeMap<char, Rule>,
    alphabet: OnceLock<BTreeSet<char>>,
}

impl Grammar {
    pub fn new(
        name: impl Into<String>,
        angle: f64,
        axiom: impl Into<String>,
        ruleset: BTreeMap<char, Rule>,
    ) -> Self {
        Self {
            name: name.into(),
            angle,
            axiom: axiom.into(),
            ruleset,
            alphabet: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Turn angle in degrees, applied by the turtle for `+` and `-`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn ruleset(&self) -> &BTreeMap<char, Rule> {
        &self.ruleset
    }

    /// The production table for `symbol`, or `None` if it is a constant.
    pub fn rule(&self, symbol: char) -> Option<&Rule> {
        self.ruleset.get(&symbol)
    }

    /// Every symbol this system can generate: each rule key plus every
    /// symbol appearing in any outcome string, de-duplicated. Computed on
    /// first use and cached for the life of the grammar.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        self.alphabet.get_or_init(|| {
            let mut symbols = BTreeSet::new();
            for (symbol, rule) in &self.ruleset {
                symbols.insert(*symbol);
                for (_, mask) in rule.productions() {
                    for (outcome, _) in mask.entries() {
                        symbols.extend(outcome.chars());
                    }
                }
            }
            symbols
        })
    }

    /// True iff every field needed for derivation is populated: non-empty
    /// name, axiom, and ruleset, and a non-zero angle.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.axiom.is_empty()
            && !self.ruleset.is_empty()
            && self.angle != 0.0
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Angle: {} degrees", self.angle)?;
        let alphabet: String = self
            .alphabet()
            .iter()
            .map(|s| format!("{s} "))
            .collect();
        writeln!(f, "Alphabet: {}", alphabet.trim_end())?;
        writeln!(f, "Axiom: {}", self.axiom)?;

        for (symbol, rule) in &self.ruleset {
            for (context, mask) in rule.productions() {
                let left = match &context.left {
                    Pattern::Wildcard => String::new(),
                    pattern => format!("{pattern} < "),
                };
                let right = match &context.right {
                    Pattern::Wildcard => String::new(),
                    pattern => format!(" > {pattern}"),
                };
                let cases: String = mask
                    .entries()
                    .iter()
                    .map(|(outcome, probability)| {
                        if *probability == 1.0 {
                            format!("{outcome}; ")
                        } else {
                            format!("({}%) {}; ", probability * 100.0, outcome)
                        }
                    })
                    .collect();
                writeln!(f, "{left}{symbol}{right} -> {}", cases.trim_end())?;
            }
        }
        Ok(())
    }
}
