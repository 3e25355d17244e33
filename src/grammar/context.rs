//! Neighbor patterns qualifying a production
//!
//! A [`Context`] is an ordered (left, right) pair of [`Pattern`]s tested
//! against the symbols adjacent to the one being rewritten. Missing
//! neighbors at the ends of a string are the empty token, which satisfies a
//! wildcard and fails every concrete pattern.

use regex::Regex;

use crate::core::error::{LsysError, Result};

/// One side of a context: a wildcard, or a regex tried against the
/// neighbor token.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any neighbor, including the empty boundary token.
    Wildcard,
    /// Regex anchored at the start of the neighbor token (prefix-match).
    Regex { source: String, regex: Regex },
}

impl Pattern {
    /// Compile a pattern, anchoring it at the start of the neighbor token.
    /// Invalid regex syntax fails here, at load time, not mid-derivation.
    pub fn compile(source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{source})")).map_err(|e| {
            LsysError::InvalidDefinition(format!("invalid context pattern '{source}': {e}"))
        })?;
        Ok(Self::Regex {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// True iff `token` satisfies this side. The empty boundary token only
    /// satisfies a wildcard, even against regexes that would accept "".
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Regex { regex, .. } => !token.is_empty() && regex.is_match(token),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Wildcard, Self::Wildcard) => true,
            (Self::Regex { source: a, .. }, Self::Regex { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::Regex { source, .. } => write!(f, "{source}"),
        }
    }
}

/// Left/right neighbor constraint on a production.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub left: Pattern,
    pub right: Pattern,
}

impl Context {
    pub fn new(left: Pattern, right: Pattern) -> Self {
        Self { left, right }
    }

    /// The default context: both sides wildcarded, matches everything.
    pub fn universal() -> Self {
        Self::new(Pattern::Wildcard, Pattern::Wildcard)
    }

    pub fn is_universal(&self) -> bool {
        self.left.is_wildcard() && self.right.is_wildcard()
    }

    /// Priority rank for resolution: 2 = both sides concrete, 1 = one side,
    /// 0 = universal. Higher ranks are tried first.
    pub fn specificity(&self) -> u8 {
        u8::from(!self.left.is_wildcard()) + u8::from(!self.right.is_wildcard())
    }

    /// True iff both sides are satisfied by the given neighbor tokens.
    pub fn matches(&self, left_neighbor: &str, right_neighbor: &str) -> bool {
        self.left.matches(left_neighbor) && self.right.matches(right_neighbor)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} < _ > {}", self.left, self.right)
    }
}
