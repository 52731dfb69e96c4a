//! Scorecard parsing from YAML/JSON.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::operator::UnknownOperator;

use super::model::Scorecard;
use super::schema::validate_scorecard_schema;

/// Errors that can occur when loading or validating scorecards.
#[derive(Error, Debug)]
pub enum ScorecardError {
    #[error("Failed to read scorecard file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Scorecard does not match schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Scorecard validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error(transparent)]
    UnknownOperator(#[from] UnknownOperator),
}

impl Scorecard {
    /// Parse a scorecard from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScorecardError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a scorecard from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScorecardError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a scorecard from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ScorecardError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a scorecard from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScorecardError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a scorecard file, choosing the format from its extension.
    ///
    /// `.json` is read as JSON; anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScorecardError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ScorecardError> {
        validate_scorecard_schema(&value).map_err(ScorecardError::SchemaViolation)?;

        // Both formats arrive here as a JSON value, so a type error is about the
        // scorecard's shape rather than the source syntax.
        let mut scorecard: Scorecard = serde_json::from_value(value)
            .map_err(|e| ScorecardError::ValidationError(format!("Invalid scorecard: {}", e)))?;
        scorecard.normalize()?;
        Ok(scorecard)
    }

    /// Fill omitted rule fields from their group, then validate.
    pub(super) fn normalize(&mut self) -> Result<(), ScorecardError> {
        for group in &mut self.fields {
            for rule in &mut group.rules {
                if rule.field.is_empty() {
                    rule.field = group.field.clone();
                }
            }
        }

        self.validate()
    }

    /// Validate the scorecard structure.
    pub fn validate(&self) -> Result<(), ScorecardError> {
        if self.score_card_id.trim().is_empty() {
            return Err(ScorecardError::MissingField("scoreCardId".to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(ScorecardError::MissingField("name".to_string()));
        }

        if self.max_score <= 0 {
            return Err(ScorecardError::ValidationError(format!(
                "maxScore must be positive, got {}",
                self.max_score
            )));
        }

        self.validate_fields()
    }

    /// Field names are unique and every rule belongs to its group's field.
    fn validate_fields(&self) -> Result<(), ScorecardError> {
        let mut seen = HashSet::new();

        for (index, group) in self.fields.iter().enumerate() {
            if group.field.trim().is_empty() {
                return Err(ScorecardError::MissingField(format!(
                    "fields[{}].field",
                    index
                )));
            }

            if !seen.insert(group.field.as_str()) {
                return Err(ScorecardError::ValidationError(format!(
                    "Duplicate field: {}",
                    group.field
                )));
            }

            if let Some(rule) = group.rules.iter().find(|r| r.field != group.field) {
                return Err(ScorecardError::ValidationError(format!(
                    "Rule on '{}' is nested under field '{}'",
                    rule.field, group.field
                )));
            }
        }

        Ok(())
    }
}
