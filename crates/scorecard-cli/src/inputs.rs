//! Applicant input loading for the CLI.
//!
//! Inputs reach the engine as raw text, the way a form captures them. Files
//! may use JSON or YAML scalars; numbers and booleans are converted to their
//! text form before evaluation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Load a field-to-value map from a JSON or YAML file.
pub fn load_inputs_file(path: &Path) -> Result<HashMap<String, String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inputs file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value: Value = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    };

    inputs_from_value(value)
}

/// Convert a JSON object of scalars into raw text inputs.
pub fn inputs_from_value(value: Value) -> Result<HashMap<String, String>> {
    let Value::Object(map) = value else {
        bail!("Inputs must be a mapping of field name to value");
    };

    map.into_iter()
        .map(|(field, value)| -> Result<(String, String)> {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    bail!("Input '{}' must be a scalar value", field)
                }
            };
            Ok((field, text))
        })
        .collect()
}

/// Parse a `field=value` override.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let Some((field, value)) = raw.split_once('=') else {
        bail!("Expected field=value, got '{}'", raw);
    };

    let field = field.trim();
    if field.is_empty() {
        bail!("Missing field name in '{}'", raw);
    }

    Ok((field.to_string(), value.to_string()))
}

/// Merge `--set` overrides over file inputs; later assignments win.
pub fn merge_inputs(
    mut base: HashMap<String, String>,
    assignments: &[String],
) -> Result<HashMap<String, String>> {
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        base.insert(field, value);
    }
    Ok(base)
}
