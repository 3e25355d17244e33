//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

/// Seed used for the derivation generator when none is given explicitly
///
/// A fresh REPL session and the test fixtures both start from this value,
/// so stochastic derivations reproduce exactly across runs. Override it
/// with the `seed` REPL command or the `--seed` flag.
pub const DEFAULT_SEED: u64 = 123_456_789;

/// Hard cap on the requested derivation depth
///
/// Output length grows exponentially with depth (a rule like F -> F+F
/// doubles the string every iteration), so even modest depths produce
/// strings in the tens of millions of symbols. Requests above this cap
/// fail with a recoverable `DepthExceeded` error instead of exhausting
/// memory or the call stack.
pub const MAX_DERIVATION_DEPTH: u32 = 24;

/// Default forward step length for the turtle, in world units
///
/// Matches the default picture size of the REPL; change it per session
/// with the `size` command.
pub const DEFAULT_STEP_SIZE: f64 = 3.0;
