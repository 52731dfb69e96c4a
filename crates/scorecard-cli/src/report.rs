//! Human-readable and JSON rendering of evaluations.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use scorecard_core::{EvaluationResult, RuleOutcome, Scorecard};
use serde::Serialize;

/// JSON envelope written by `scorecard evaluate --format json`.
///
/// The evaluation itself is timeless; the timestamp records when this
/// snapshot was taken, for storage alongside the application.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport<'a> {
    pub score_card_id: &'a str,
    pub name: &'a str,
    pub evaluated_at: DateTime<Utc>,
    pub result: &'a EvaluationResult,
}

impl<'a> EvaluationReport<'a> {
    pub fn new(scorecard: &'a Scorecard, result: &'a EvaluationResult) -> Self {
        Self {
            score_card_id: &scorecard.score_card_id,
            name: &scorecard.name,
            evaluated_at: Utc::now(),
            result,
        }
    }
}

pub fn render_evaluation(scorecard: &Scorecard, result: &EvaluationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", scorecard.name, scorecard.score_card_id);
    let _ = writeln!(
        out,
        "Score: {} / {}   Risk grade: {}   Matched rules: {}",
        result.total_score, result.max_score, result.risk_grade, result.matched_rules
    );

    let docs: Vec<&str> = result.min_docs.iter().map(|d| d.as_str()).collect();
    let _ = writeln!(out, "Required documents: {}", docs.join(", "));
    out.push('\n');

    let width = result
        .breakdown
        .iter()
        .map(|o| o.description.chars().count())
        .max()
        .unwrap_or(0);

    for outcome in &result.breakdown {
        let _ = writeln!(out, "{}", render_outcome(outcome, width));
    }

    let skipped = result.skipped_fields();
    if !skipped.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Missing input: {}", skipped.join(", "));
    }

    out
}

fn render_outcome(outcome: &RuleOutcome, width: usize) -> String {
    let mark = if outcome.matched { "x" } else { " " };
    let rule = format!("{} {}", outcome.operator, outcome.value);
    let detail = match &outcome.actual {
        Some(actual) => format!("actual {}", actual),
        None => "skipped (missing input)".to_string(),
    };

    format!(
        "  [{}] {:<width$}  {:<24} {:>+5}  {}",
        mark,
        outcome.description,
        rule,
        outcome.score,
        detail,
        width = width
    )
}

/// One line per field: key, label, inferred kind and rule count.
pub fn render_fields(scorecard: &Scorecard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}), max score {}",
        scorecard.name, scorecard.score_card_id, scorecard.max_score
    );

    for group in &scorecard.fields {
        let _ = writeln!(
            out,
            "  {:<20} {:<28} {:<8} {} rule(s)",
            group.field,
            group.label(),
            group.kind(),
            group.rules.len()
        );
    }

    out
}
