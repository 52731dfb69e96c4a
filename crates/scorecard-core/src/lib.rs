//! # scorecard-core
//!
//! Deterministic rule-based credit scorecard evaluation.
//!
//! Given a scorecard and an applicant's raw form input, this crate answers:
//! - How many points did the applicant earn?
//! - What is the resulting risk grade?
//! - Which supporting documents are required?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same scorecard and input always produce the same result
//! 2. **Pure**: No I/O, no shared state, inputs are never mutated
//! 3. **Fail-closed**: Missing input and malformed rules never award points
//! 4. **Traceable**: Every rule appears in the breakdown with its parsed input
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use scorecard_core::{evaluate, Scorecard};
//!
//! let scorecard = Scorecard::from_yaml_file("retail.yaml")?;
//! let inputs = HashMap::from([("age".to_string(), "25".to_string())]);
//! let result = evaluate(&scorecard, &inputs);
//!
//! println!("{} / {} => {}", result.total_score, result.max_score, result.risk_grade);
//! ```

pub mod engine;
pub mod grading;
pub mod kind;
pub mod operator;
pub mod scorecard;
pub mod types;

// Re-export main types at crate root
pub use engine::Evaluator;
pub use grading::{DocumentCode, RiskGrade, LOW_RISK_CUTOFF, MEDIUM_RISK_CUTOFF};
pub use kind::{infer_field_kind, parse_value, FieldKind, Scalar};
pub use operator::{Operator, UnknownOperator};
pub use scorecard::{
    humanize_field_name, is_valid_scorecard, validate_scorecard_schema, FieldGroup, Rule,
    SchemaError, Scorecard, ScorecardError,
};
pub use types::{EvaluationResult, RuleOutcome};

use std::collections::HashMap;

/// Evaluate raw applicant input against a scorecard.
///
/// This is the main entry point. `inputs` maps field names to raw text as
/// captured by a form; fields absent from the map are treated as missing.
///
/// The scorecard is only read. Evaluation never fails: unparseable input,
/// malformed rule literals and missing fields all degrade to non-matching
/// rules and show up in the breakdown.
pub fn evaluate(scorecard: &Scorecard, inputs: &HashMap<String, String>) -> EvaluationResult {
    Evaluator::new().evaluate(scorecard, inputs)
}
