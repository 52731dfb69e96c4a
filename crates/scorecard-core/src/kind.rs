//! Field kind inference and raw input parsing.
//!
//! Scorecards carry no declared schema. Whether a field holds a number, a
//! boolean or free text is read off the rules attached to it, and raw form
//! input is interpreted accordingly at evaluation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scorecard::Rule;

/// Logical type of a scorecard field, inferred from its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Boolean,
    String,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::String => "string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Infer how raw input for a field should be read.
///
/// First match wins:
/// 1. any numeric comparison operator (`>`, `<`, `>=`, `<=`, `between`) => `Number`
/// 2. any literal equal to `true`/`false` (trimmed, case-insensitive) => `Boolean`
/// 3. otherwise => `String`
///
/// A field with no rules is a `String` field.
pub fn infer_field_kind(rules: &[Rule]) -> FieldKind {
    infer_kind_from(rules.iter())
}

/// Same inference over borrowed rules gathered from several groups.
pub(crate) fn infer_kind_from<'a, I>(rules: I) -> FieldKind
where
    I: Iterator<Item = &'a Rule> + Clone,
{
    if rules.clone().any(|r| r.operator.is_numeric_comparison()) {
        return FieldKind::Number;
    }

    if rules.clone().any(|r| parse_bool(&r.value).is_some()) {
        return FieldKind::Boolean;
    }

    FieldKind::String
}

/// A typed value parsed from raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Canonical string form, used by the list and substring operators.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // -0 and 0 render the same
            Scalar::Number(n) if *n == 0.0 => f.write_str("0"),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Parse raw input for a field of the given kind.
///
/// Returns `None` (missing) for blank input, or when the text cannot be read
/// as the requested kind. A failed number parse is never treated as zero.
pub fn parse_value(raw: &str, kind: FieldKind) -> Option<Scalar> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match kind {
        FieldKind::Number => parse_number(trimmed).map(Scalar::Number),
        FieldKind::Boolean => parse_bool(trimmed).map(Scalar::Boolean),
        FieldKind::String => Some(Scalar::Text(trimmed.to_string())),
    }
}

/// Parse a finite number. `NaN` and infinities are rejected.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Case-insensitive `true`/`false`.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    let lowered = text.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
