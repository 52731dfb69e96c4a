//! Scorecard data model.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::{infer_field_kind, FieldKind, Scalar};
use crate::operator::Operator;

use super::parser::ScorecardError;

lazy_static! {
    static ref CASE_BOUNDARY: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[_\s]+").unwrap();
}

/// A single atomic test: field, operator, comparison literal and points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Applicant attribute under test. Filled from the owning group when omitted.
    #[serde(default)]
    pub field: String,

    pub operator: Operator,

    /// Comparison literal, kept as raw text and interpreted at evaluation time
    #[serde(deserialize_with = "literal_text")]
    pub value: String,

    /// Points awarded on match
    pub score: i64,
}

impl Rule {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        score: i64,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            score,
        }
    }

    /// Build a rule from an operator given as text, as editing forms submit it.
    pub fn from_parts(
        field: impl Into<String>,
        operator: &str,
        value: impl Into<String>,
        score: i64,
    ) -> Result<Self, ScorecardError> {
        let operator = operator.parse::<Operator>()?;
        Ok(Self::new(field, operator, value, score))
    }
}

/// Accept numbers and booleans for `value` but keep them as text.
fn literal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Integer(i64),
        Float(f64),
        Boolean(bool),
    }

    Ok(match Literal::deserialize(deserializer)? {
        Literal::Text(s) => s,
        Literal::Integer(n) => n.to_string(),
        Literal::Float(n) => Scalar::Number(n).to_string(),
        Literal::Boolean(b) => b.to_string(),
    })
}

/// The rules attached to one applicant field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    /// Unique key within the scorecard
    pub field: String,

    /// Human label; falls back to the humanized field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FieldGroup {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: None,
            rules: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a rule owned by this group's field.
    pub fn with_rule(mut self, operator: Operator, value: impl Into<String>, score: i64) -> Self {
        self.push_rule(operator, value, score);
        self
    }

    pub fn push_rule(&mut self, operator: Operator, value: impl Into<String>, score: i64) {
        let rule = Rule::new(self.field.clone(), operator, value, score);
        self.rules.push(rule);
    }

    /// The explicit description, or the humanized field name when none is set.
    pub fn label(&self) -> Cow<'_, str> {
        match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Cow::Borrowed(d),
            _ => Cow::Owned(humanize_field_name(&self.field)),
        }
    }

    pub fn kind(&self) -> FieldKind {
        infer_field_kind(&self.rules)
    }
}

/// A named, versioned set of scoring rules grouped by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    /// Persistence key, generated by the owning store
    pub score_card_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ceiling on the total achievable score
    pub max_score: i64,

    #[serde(default)]
    pub fields: Vec<FieldGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Scorecard {
    pub fn new(score_card_id: impl Into<String>, name: impl Into<String>, max_score: i64) -> Self {
        Self {
            score_card_id: score_card_id.into(),
            name: name.into(),
            description: None,
            max_score,
            fields: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, group: FieldGroup) -> Self {
        self.fields.push(group);
        self
    }

    /// Replace the whole field list, as the editor does on every save.
    ///
    /// The new list is validated; on error the previous fields are kept.
    pub fn replace_fields(&mut self, fields: Vec<FieldGroup>) -> Result<(), ScorecardError> {
        let previous = std::mem::replace(&mut self.fields, fields);
        if let Err(e) = self.normalize() {
            self.fields = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldGroup> {
        self.fields.iter().find(|g| g.field == name)
    }

    /// Inferred kind of every field, in field order.
    pub fn field_kinds(&self) -> Vec<(&str, FieldKind)> {
        self.fields
            .iter()
            .map(|g| (g.field.as_str(), g.kind()))
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.fields.iter().map(|g| g.rules.len()).sum()
    }
}

/// Turn a field key into a display label.
///
/// Spaces are inserted at lower-to-upper case boundaries and in place of
/// underscores, then the first letter is capitalized:
/// `monthlyIncome` becomes `Monthly Income`, `employment_type` becomes
/// `Employment type`.
pub fn humanize_field_name(field: &str) -> String {
    let spaced = CASE_BOUNDARY.replace_all(field, "$1 $2");
    let spaced = SEPARATORS.replace_all(&spaced, " ");
    let spaced = spaced.trim();

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
