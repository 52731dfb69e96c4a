//! Evaluation result types.

use serde::{Deserialize, Serialize};

use crate::grading::{DocumentCode, RiskGrade};
use crate::kind::Scalar;
use crate::operator::Operator;

/// Trace of one rule's evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub field: String,
    pub operator: Operator,
    pub value: String,
    pub score: i64,

    /// Label of the owning field group
    pub description: String,

    pub matched: bool,

    /// Parsed input, `None` when missing or unparseable
    pub actual: Option<Scalar>,

    pub skipped_because_missing_input: bool,
}

/// Immutable snapshot of one scorecard evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub max_score: i64,

    /// Sum of matched rule scores, capped at `max_score`. Not floored.
    pub total_score: i64,

    pub matched_rules: usize,
    pub risk_grade: RiskGrade,
    pub min_docs: Vec<DocumentCode>,

    /// One entry per rule, in scorecard order
    pub breakdown: Vec<RuleOutcome>,
}

impl EvaluationResult {
    /// Rules that matched, in scorecard order.
    pub fn matched(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.breakdown.iter().filter(|o| o.matched)
    }

    /// Fields that had at least one rule skipped for missing input.
    pub fn skipped_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for outcome in self.breakdown.iter().filter(|o| o.skipped_because_missing_input) {
            if !fields.contains(&outcome.field.as_str()) {
                fields.push(&outcome.field);
            }
        }
        fields
    }

    /// Total score as a fraction of the ceiling.
    pub fn score_ratio(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.max_score as f64
    }
}
