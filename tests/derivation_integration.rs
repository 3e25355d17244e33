//! End-to-end derivation tests: definition text in, derived string and
//! rendered segments out.

use proptest::prelude::*;
use std::collections::BTreeMap;

use lsys::core::config::{DEFAULT_SEED, MAX_DERIVATION_DEPTH};
use lsys::core::error::LsysError;
use lsys::engine::{derive, seeded_rng};
use lsys::grammar::{Context, Grammar, Rule};
use lsys::loader::{parse_colors, parse_systems};
use lsys::turtle::Turtle;

const KOCH: &str = r#"
[[lsystem]]
name  = "koch"
angle = 90
axiom = "F"

[[lsystem.rule]]
symbol = "F"
[[lsystem.rule.case]]
result = "F+F"
"#;

const SIERPINSKI_ARROWHEAD: &str = r#"
[[lsystem]]
name  = "arrowhead"
angle = 60
axiom = "A"

[[lsystem.rule]]
symbol = "A"
[[lsystem.rule.case]]
result = "B-A-B"

[[lsystem.rule]]
symbol = "B"
[[lsystem.rule.case]]
result = "A+B+A"
"#;

#[test]
fn loaded_koch_derives_the_worked_example() {
    let systems = parse_systems(KOCH).unwrap();
    let out = derive(&systems[0], 2, &mut seeded_rng(DEFAULT_SEED)).unwrap();
    assert_eq!(out, "F+F+F+F");
}

#[test]
fn two_rule_system_interleaves() {
    let systems = parse_systems(SIERPINSKI_ARROWHEAD).unwrap();
    let out = derive(&systems[0], 2, &mut seeded_rng(DEFAULT_SEED)).unwrap();
    assert_eq!(out, "A+B+A-B-A-B-A+B+A");
}

#[test]
fn derived_string_renders_through_the_turtle() {
    let systems = parse_systems(KOCH).unwrap();
    let grammar = &systems[0];
    let tokens = derive(grammar, 3, &mut seeded_rng(DEFAULT_SEED)).unwrap();
    let segments = Turtle::interpret(&tokens, grammar.angle(), 3.0, &Default::default());
    // Every F draws exactly one segment.
    assert_eq!(segments.len(), tokens.matches('F').count());
}

#[test]
fn color_tokens_flow_from_the_definition_to_the_pen() {
    let definition = r##"
[[lsystem]]
name  = "tree"
angle = 45
axiom = "F1F"

[colors]
1 = "#228b22"
"##;
    let systems = parse_systems(definition).unwrap();
    let colors = parse_colors(definition).unwrap();
    let tokens = derive(&systems[0], 0, &mut seeded_rng(DEFAULT_SEED)).unwrap();
    let segments = Turtle::interpret(&tokens, systems[0].angle(), 2.0, &colors);
    assert_eq!(segments[0].color, "black");
    assert_eq!(segments[1].color, "#228b22");
}

#[test]
fn context_sensitive_definition_end_to_end() {
    let definition = r#"
[[lsystem]]
name  = "signal"
angle = 90
axiom = "ABC"

[[lsystem.rule]]
symbol = "B"
[[lsystem.rule.case]]
result = "X"
left   = "A"
right  = "C"
[[lsystem.rule.case]]
result = "B"
"#;
    let systems = parse_systems(definition).unwrap();
    let out = derive(&systems[0], 1, &mut seeded_rng(DEFAULT_SEED)).unwrap();
    assert_eq!(out, "AXC");
}

#[test]
fn depth_cap_reports_a_recoverable_error() {
    let systems = parse_systems(KOCH).unwrap();
    let mut rng = seeded_rng(DEFAULT_SEED);
    let err = derive(&systems[0], MAX_DERIVATION_DEPTH + 10, &mut rng).unwrap_err();
    assert!(matches!(err, LsysError::DepthExceeded { .. }));
    // The same session can retry with a smaller depth.
    assert!(derive(&systems[0], 2, &mut rng).is_ok());
}

fn deterministic_grammar(axiom: &str) -> Grammar {
    let mut rule = Rule::new('F');
    rule.add_case(Context::universal(), "F+F", 1.0);
    let mut ruleset = BTreeMap::new();
    ruleset.insert('F', rule);
    Grammar::new("prop", 90.0, axiom, ruleset)
}

proptest! {
    #[test]
    fn depth_zero_is_identity(axiom in "[F+\\-\\[\\]AB]{1,12}") {
        let grammar = deterministic_grammar(&axiom);
        let out = derive(&grammar, 0, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        prop_assert_eq!(out, axiom);
    }

    #[test]
    fn empty_ruleset_is_identity_at_any_depth(
        axiom in "[F+\\-G]{1,12}",
        depth in 0u32..=MAX_DERIVATION_DEPTH,
    ) {
        let grammar = Grammar::new("inert", 90.0, axiom.clone(), BTreeMap::new());
        let out = derive(&grammar, depth, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        prop_assert_eq!(out, axiom);
    }

    #[test]
    fn deterministic_rules_repeat_exactly(
        axiom in "[F+\\-AB]{1,8}",
        depth in 0u32..8,
        seed in any::<u64>(),
    ) {
        let grammar = deterministic_grammar(&axiom);
        let first = derive(&grammar, depth, &mut seeded_rng(seed)).unwrap();
        let second = derive(&grammar, depth, &mut seeded_rng(seed)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn stochastic_derivations_repeat_under_a_seed(
        depth in 0u32..10,
        seed in any::<u64>(),
    ) {
        let mut rule = Rule::new('A');
        rule.add_case(Context::universal(), "AB", 0.5);
        rule.add_case(Context::universal(), "BA", 0.5);
        let mut ruleset = BTreeMap::new();
        ruleset.insert('A', rule);
        let grammar = Grammar::new("coin", 60.0, "A", ruleset);

        let first = derive(&grammar, depth, &mut seeded_rng(seed)).unwrap();
        let second = derive(&grammar, depth, &mut seeded_rng(seed)).unwrap();
        prop_assert_eq!(first, second);
    }
}
