//! Scorecard definitions, loading and validation.
//!
//! A scorecard is structured data validated against an embedded JSON Schema
//! and then checked for the invariants the schema cannot express.

mod model;
mod parser;
mod schema;

pub use model::{humanize_field_name, FieldGroup, Rule, Scorecard};
pub use parser::ScorecardError;
pub use schema::{is_valid_scorecard, validate_scorecard_schema, SchemaError};
