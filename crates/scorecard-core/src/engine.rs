//! Evaluation engine: applies a scorecard to raw applicant input.
//!
//! Every rule is evaluated independently and the score is additive, so rule
//! order only affects the order of the breakdown. Nothing here fails: bad
//! input or bad configuration degrades to "rule does not match".

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::grading::RiskGrade;
use crate::kind::{infer_kind_from, parse_value, FieldKind};
use crate::operator;
use crate::scorecard::{Rule, Scorecard};
use crate::types::{EvaluationResult, RuleOutcome};

/// Stateless scorecard evaluator.
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `inputs` (field name to raw text) against a scorecard.
    pub fn evaluate(
        &self,
        scorecard: &Scorecard,
        inputs: &HashMap<String, String>,
    ) -> EvaluationResult {
        let flattened = flatten(scorecard);
        let kinds = infer_kinds(&flattened);

        let mut breakdown = Vec::with_capacity(flattened.len());
        let mut unparsed: HashSet<&str> = HashSet::new();

        for (rule, description) in &flattened {
            let kind = kinds
                .get(rule.field.as_str())
                .copied()
                .unwrap_or(FieldKind::String);
            let raw = inputs.get(&rule.field).map(String::as_str).unwrap_or("");
            let actual = parse_value(raw, kind);

            if actual.is_none() && !raw.trim().is_empty() && unparsed.insert(&rule.field) {
                warn!(field = %rule.field, kind = %kind, "Input could not be parsed for field kind");
            }

            let skipped = actual.is_none();
            let matched = actual
                .as_ref()
                .is_some_and(|value| operator::matches(rule.operator, &rule.value, value));

            trace!(
                field = %rule.field,
                operator = %rule.operator,
                value = %rule.value,
                matched,
                skipped,
                "Rule evaluated"
            );

            breakdown.push(RuleOutcome {
                field: rule.field.clone(),
                operator: rule.operator,
                value: rule.value.clone(),
                score: rule.score,
                description: description.clone(),
                matched,
                actual,
                skipped_because_missing_input: skipped,
            });
        }

        let raw_total = breakdown
            .iter()
            .filter(|o| o.matched)
            .fold(0i64, |acc, o| acc.saturating_add(o.score));
        let total_score = raw_total.min(scorecard.max_score);
        let matched_rules = breakdown.iter().filter(|o| o.matched).count();
        let risk_grade = RiskGrade::from_score(total_score, scorecard.max_score);

        debug!(
            scorecard = %scorecard.score_card_id,
            rules = breakdown.len(),
            matched_rules,
            raw_total,
            total_score,
            risk_grade = %risk_grade,
            "Scorecard evaluated"
        );

        EvaluationResult {
            max_score: scorecard.max_score,
            total_score,
            matched_rules,
            risk_grade,
            min_docs: risk_grade.required_documents(),
            breakdown,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// All rules in scorecard order, each paired with its group's label.
fn flatten(scorecard: &Scorecard) -> Vec<(&Rule, String)> {
    scorecard
        .fields
        .iter()
        .flat_map(|group| {
            let label = group.label().into_owned();
            group.rules.iter().map(move |rule| (rule, label.clone()))
        })
        .collect()
}

/// Infer each field's kind once, from every rule that names it.
fn infer_kinds<'a>(flattened: &[(&'a Rule, String)]) -> HashMap<&'a str, FieldKind> {
    let mut by_field: HashMap<&'a str, Vec<&'a Rule>> = HashMap::new();
    for &(rule, _) in flattened {
        by_field.entry(rule.field.as_str()).or_default().push(rule);
    }

    by_field
        .into_iter()
        .map(|(field, rules)| (field, infer_kind_from(rules.iter().copied())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::DocumentCode;
    use crate::kind::Scalar;
    use crate::operator::Operator;
    use crate::scorecard::FieldGroup;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn retail_scorecard() -> Scorecard {
        Scorecard::new("sc-retail", "Retail", 100)
            .with_field(
                FieldGroup::new("age")
                    .with_rule(Operator::Between, "20,39", 10)
                    .with_rule(Operator::Ge, "40", 5),
            )
            .with_field(FieldGroup::new("monthlyIncome").with_rule(Operator::Gt, "50000", 50))
            .with_field(
                FieldGroup::new("hasCollateral")
                    .with_description("Collateral pledged")
                    .with_rule(Operator::Eq, "true", 20),
            )
    }

    #[test]
    fn test_breakdown_follows_scorecard_order() {
        let result = Evaluator::new().evaluate(&retail_scorecard(), &HashMap::new());

        let fields: Vec<&str> = result.breakdown.iter().map(|o| o.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "age", "monthlyIncome", "hasCollateral"]);
        assert_eq!(result.breakdown[2].description, "Monthly Income");
        assert_eq!(result.breakdown[3].description, "Collateral pledged");
    }

    #[test]
    fn test_all_missing_inputs_are_skipped() {
        let result = Evaluator::new().evaluate(&retail_scorecard(), &HashMap::new());

        assert_eq!(result.total_score, 0);
        assert_eq!(result.matched_rules, 0);
        assert!(result
            .breakdown
            .iter()
            .all(|o| o.skipped_because_missing_input && !o.matched && o.actual.is_none()));
        assert_eq!(
            result.skipped_fields(),
            vec!["age", "monthlyIncome", "hasCollateral"]
        );
    }

    #[test]
    fn test_scores_are_additive() {
        let result = Evaluator::new().evaluate(
            &retail_scorecard(),
            &inputs(&[("age", "30"), ("monthlyIncome", "60000"), ("hasCollateral", "TRUE")]),
        );

        assert_eq!(result.total_score, 80);
        assert_eq!(result.matched_rules, 3);
        assert_eq!(result.risk_grade, RiskGrade::Low);
        assert_eq!(result.min_docs, vec![DocumentCode::Nrc, DocumentCode::Payslip]);
        assert_eq!(result.breakdown[0].actual, Some(Scalar::Number(30.0)));
        assert_eq!(result.breakdown[3].actual, Some(Scalar::Boolean(true)));
    }

    #[test]
    fn test_unparseable_input_treated_as_missing() {
        let result = Evaluator::new().evaluate(
            &retail_scorecard(),
            &inputs(&[("age", "thirty"), ("hasCollateral", "yes")]),
        );

        let age = &result.breakdown[0];
        assert!(age.skipped_because_missing_input);
        assert!(!age.matched);
        assert_eq!(result.total_score, 0);
    }

    #[test]
    fn test_total_capped_at_max_score() {
        let scorecard = Scorecard::new("sc", "Cap", 20)
            .with_field(FieldGroup::new("a").with_rule(Operator::Eq, "x", 15))
            .with_field(FieldGroup::new("b").with_rule(Operator::Eq, "y", 15));

        let result = Evaluator::new().evaluate(&scorecard, &inputs(&[("a", "x"), ("b", "y")]));
        assert_eq!(result.total_score, 20);
        assert_eq!(result.matched_rules, 2);
        assert_eq!(result.score_ratio(), 1.0);
    }

    #[test]
    fn test_negative_totals_are_preserved() {
        let scorecard = Scorecard::new("sc", "Penalty", 100).with_field(
            FieldGroup::new("missedPayments").with_rule(Operator::Gt, "2", -30),
        );

        let result = Evaluator::new().evaluate(&scorecard, &inputs(&[("missedPayments", "5")]));
        assert_eq!(result.total_score, -30);
        assert_eq!(result.risk_grade, RiskGrade::High);
    }

    #[test]
    fn test_huge_rule_scores_saturate_before_capping() {
        let scorecard = Scorecard::from_yaml(
            r#"
scoreCardId: "sc-huge"
name: "Huge scores"
maxScore: 100
fields:
  - field: a
    rules:
      - operator: "=="
        value: "x"
        score: 9000000000000000000
  - field: b
    rules:
      - operator: "=="
        value: "y"
        score: 9000000000000000000
"#,
        )
        .unwrap();

        let result = Evaluator::new().evaluate(&scorecard, &inputs(&[("a", "x"), ("b", "y")]));
        assert_eq!(result.matched_rules, 2);
        assert_eq!(result.total_score, 100);
        assert_eq!(result.risk_grade, RiskGrade::Low);
    }

    #[test]
    fn test_huge_penalties_saturate_low() {
        let scorecard = Scorecard::new("sc", "Penalties", 100)
            .with_field(FieldGroup::new("a").with_rule(Operator::Eq, "x", i64::MIN))
            .with_field(FieldGroup::new("b").with_rule(Operator::Eq, "y", -1));

        let result = Evaluator::new().evaluate(&scorecard, &inputs(&[("a", "x"), ("b", "y")]));
        assert_eq!(result.total_score, i64::MIN);
        assert_eq!(result.risk_grade, RiskGrade::High);
    }

    #[test]
    fn test_kind_inferred_across_all_rules_of_field() {
        // `>` on the field makes it numeric, so `==` compares numerically too.
        let scorecard = Scorecard::new("sc", "Kinds", 100).with_field(
            FieldGroup::new("dependents")
                .with_rule(Operator::Eq, "2", 5)
                .with_rule(Operator::Gt, "4", -5),
        );

        let result = Evaluator::new().evaluate(&scorecard, &inputs(&[("dependents", "2.0")]));
        assert!(result.breakdown[0].matched);
        assert!(!result.breakdown[1].matched);
    }

    #[test]
    fn test_matched_iterator() {
        let result = Evaluator::new().evaluate(&retail_scorecard(), &inputs(&[("age", "45")]));
        let matched: Vec<&RuleOutcome> = result.matched().collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].operator, Operator::Ge);
    }
}
