//! Load L-system definitions from TOML files
//!
//! A definition file holds any number of systems plus an optional color
//! table:
//!
//! ```toml
//! [[lsystem]]
//! name  = "koch"
//! angle = 90          # number, or fraction string like "360/4"
//! axiom = "F"
//!
//! [[lsystem.rule]]
//! symbol = "F"
//!
//! [[lsystem.rule.case]]
//! result      = "F+F"
//! probability = 1.0   # optional, default 1.0
//! left        = "A"   # optional context regex, default wildcard
//! right       = "C"   # optional context regex, default wildcard
//!
//! [colors]
//! 0 = "black"
//! 1 = "#228b22"
//! ```
//!
//! Everything is validated here, at load time: missing fields, malformed
//! probabilities and fractions, bad context regexes, and duplicate rule
//! symbols all surface as [`LsysError::InvalidDefinition`] naming the
//! offending system and field.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::core::error::{LsysError, Result};
use crate::grammar::{Context, Grammar, Pattern, Rule};

/// Optional id -> color lookup consumed by the turtle's pen.
pub type ColorTable = HashMap<u32, String>;

/// Read and parse every `[[lsystem]]` in the file.
pub fn load_systems(path: &Path) -> Result<Vec<Grammar>> {
    let content = fs::read_to_string(path)?;
    let systems = parse_systems(&content)?;
    tracing::info!(
        file = %path.display(),
        count = systems.len(),
        "loaded L-system definitions"
    );
    Ok(systems)
}

/// Read the optional `[colors]` table from the file. Missing table means
/// an empty lookup, not an error.
pub fn load_colors(path: &Path) -> Result<ColorTable> {
    let content = fs::read_to_string(path)?;
    parse_colors(&content)
}

/// Parse every `[[lsystem]]` entry out of a TOML document.
pub fn parse_systems(content: &str) -> Result<Vec<Grammar>> {
    let document = parse_document(content)?;
    let systems = document
        .get("lsystem")
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            LsysError::InvalidDefinition("no [[lsystem]] entries in definition".to_string())
        })?;

    systems.iter().map(parse_system).collect()
}

/// Parse the optional `[colors]` table out of a TOML document.
pub fn parse_colors(content: &str) -> Result<ColorTable> {
    let document = parse_document(content)?;
    let mut colors = ColorTable::new();

    let Some(table) = document.get("colors").and_then(|value| value.as_table()) else {
        return Ok(colors);
    };
    for (key, value) in table {
        let id: u32 = key.parse().map_err(|_| {
            LsysError::InvalidDefinition(format!("color id '{key}' is not an integer"))
        })?;
        let color = value.as_str().ok_or_else(|| {
            LsysError::InvalidDefinition(format!("color {id} must be a string"))
        })?;
        colors.insert(id, color.to_string());
    }
    Ok(colors)
}

fn parse_document(content: &str) -> Result<toml::Value> {
    content
        .parse::<toml::Value>()
        .map_err(|e| LsysError::InvalidDefinition(format!("invalid TOML: {e}")))
}

fn parse_system(value: &toml::Value) -> Result<Grammar> {
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| LsysError::InvalidDefinition("lsystem missing name".to_string()))?
        .to_string();

    let angle_value = value
        .get("angle")
        .ok_or_else(|| LsysError::InvalidDefinition(format!("{name}: missing angle")))?;
    let angle = parse_angle(angle_value, &name)?;

    let axiom = value
        .get("axiom")
        .and_then(|v| v.as_str())
        .ok_or_else(|| LsysError::InvalidDefinition(format!("{name}: missing axiom")))?
        .to_string();

    let mut ruleset = BTreeMap::new();
    if let Some(rules) = value.get("rule").and_then(|v| v.as_array()) {
        for rule_value in rules {
            let rule = parse_rule(rule_value, &name)?;
            let symbol = rule.symbol();
            if ruleset.insert(symbol, rule).is_some() {
                return Err(LsysError::InvalidDefinition(format!(
                    "{name}: duplicate rule for symbol '{symbol}'"
                )));
            }
        }
    }

    Ok(Grammar::new(name, angle, axiom, ruleset))
}

fn parse_rule(value: &toml::Value, system: &str) -> Result<Rule> {
    let symbol_str = value
        .get("symbol")
        .and_then(|v| v.as_str())
        .ok_or_else(|| LsysError::InvalidDefinition(format!("{system}: rule missing symbol")))?;

    let mut chars = symbol_str.chars();
    let symbol = chars.next().ok_or_else(|| {
        LsysError::InvalidDefinition(format!("{system}: rule symbol is empty"))
    })?;
    if chars.next().is_some() {
        return Err(LsysError::InvalidDefinition(format!(
            "{system}: rule symbol '{symbol_str}' must be a single token"
        )));
    }

    let cases = value
        .get("case")
        .and_then(|v| v.as_array())
        .filter(|cases| !cases.is_empty())
        .ok_or_else(|| {
            LsysError::InvalidDefinition(format!(
                "{system}: rule '{symbol}' has no cases"
            ))
        })?;

    let mut rule = Rule::new(symbol);
    for case in cases {
        let result = case
            .get("result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                LsysError::InvalidDefinition(format!(
                    "{system}: case for '{symbol}' missing result"
                ))
            })?;

        let probability = match case.get("probability") {
            None => 1.0,
            Some(p) => parse_number(p, system, "probability")?,
        };

        let left = parse_side(case.get("left"), system)?;
        let right = parse_side(case.get("right"), system)?;

        rule.add_case(Context::new(left, right), result, probability);
    }
    Ok(rule)
}

fn parse_side(value: Option<&toml::Value>, system: &str) -> Result<Pattern> {
    match value {
        None => Ok(Pattern::Wildcard),
        Some(v) => {
            let source = v.as_str().ok_or_else(|| {
                LsysError::InvalidDefinition(format!("{system}: context pattern must be a string"))
            })?;
            Pattern::compile(source).map_err(|e| match e {
                LsysError::InvalidDefinition(msg) => {
                    LsysError::InvalidDefinition(format!("{system}: {msg}"))
                }
                other => other,
            })
        }
    }
}

/// Angles accept a plain number or a fraction string like `"360/4"`.
fn parse_angle(value: &toml::Value, system: &str) -> Result<f64> {
    parse_number(value, system, "angle")
}

fn parse_number(value: &toml::Value, system: &str, field: &str) -> Result<f64> {
    match value {
        toml::Value::Integer(i) => Ok(*i as f64),
        toml::Value::Float(f) => Ok(*f),
        toml::Value::String(s) => parse_fraction(s, system, field),
        other => Err(LsysError::InvalidDefinition(format!(
            "{system}: {field} must be a number or fraction string, got {other}"
        ))),
    }
}

fn parse_fraction(s: &str, system: &str, field: &str) -> Result<f64> {
    let invalid = || {
        LsysError::InvalidDefinition(format!("{system}: {field} '{s}' is not numeric"))
    };

    if let Some((numerator, denominator)) = s.split_once('/') {
        let n: f64 = numerator.trim().parse().map_err(|_| invalid())?;
        let d: f64 = denominator.trim().parse().map_err(|_| invalid())?;
        if d == 0.0 {
            return Err(LsysError::InvalidDefinition(format!(
                "{system}: {field} '{s}' divides by zero"
            )));
        }
        Ok(n / d)
    } else {
        s.trim().parse().map_err(|_| invalid())
    }
}
