//! JSON Schema validation of building block specs
//!
//! Schemas come straight from a Promise's `openAPIV3Schema`. Keywords the
//! validator does not know (`x-kubernetes-*`, `nullable`) are ignored.

use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Slash-separated path from the schema root, `/` for the root itself
    pub field: String,

    /// Human-readable message
    pub message: String,

    /// Offending value (not populated)
    pub value: Option<JsonValue>,
}

/// Errors and warnings from one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationDetails {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validation result for a building block spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub building_block: String,
    pub validation_result: ValidationDetails,
}

impl ValidationOutcome {
    pub fn new(building_block: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            valid: details.is_valid(),
            building_block: building_block.into(),
            validation_result: details,
        }
    }
}

/// Stateless schema validator
///
/// Each call compiles the schema it is given; nothing is cached between
/// calls since schemas are re-read from the cluster every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `instance` against `schema`
    ///
    /// Returns an error only when the schema itself does not compile.
    /// Values are never coerced: `"3"` does not satisfy `type: integer`.
    /// Failed `anyOf`/`oneOf` rules are reported once per failing cause of
    /// each branch rather than as a single entry.
    pub fn validate(&self, schema: &JsonValue, instance: &JsonValue) -> Result<ValidationDetails> {
        let compiled = jsonschema::validator_for(schema).map_err(|e| CoreError::InvalidSchema {
            message: e.to_string(),
        })?;

        let mut errors = Vec::new();
        for error in compiled.iter_errors(instance) {
            flatten(schema, instance, &error, "", &mut errors);
        }

        Ok(ValidationDetails {
            errors,
            warnings: Vec::new(),
        })
    }
}

/// Push one entry per cause of `error`, with paths relative to the root
///
/// `prefix` is the instance path of the node `schema` and `instance`
/// describe, empty at the root.
fn flatten(
    schema: &JsonValue,
    instance: &JsonValue,
    error: &jsonschema::ValidationError<'_>,
    prefix: &str,
    out: &mut Vec<ValidationError>,
) {
    let before = out.len();

    if matches!(
        error.kind,
        ValidationErrorKind::AnyOf | ValidationErrorKind::OneOfNotValid
    ) {
        let location = error.instance_path.to_string();
        let branches = schema
            .pointer(&error.schema_path.to_string())
            .and_then(JsonValue::as_array);

        if let (Some(branches), Some(node)) = (branches, instance.pointer(&location)) {
            let nested_prefix = format!("{prefix}{location}");
            for branch in branches {
                let Ok(validator) = jsonschema::validator_for(branch) else {
                    continue;
                };
                for cause in validator.iter_errors(node) {
                    flatten(branch, node, &cause, &nested_prefix, out);
                }
            }
        }
    }

    if out.len() == before {
        out.push(ValidationError {
            field: field_path(prefix, error),
            message: format_validation_error(error),
            value: None,
        });
    }
}

/// Path of the failing node, pointing at the missing property for `required`
fn field_path(prefix: &str, error: &jsonschema::ValidationError<'_>) -> String {
    let mut path = format!("{prefix}{}", error.instance_path);

    if let ValidationErrorKind::Required { property } = &error.kind {
        let name = match property {
            JsonValue::String(name) => name.clone(),
            other => other.to_string(),
        };
        path.push('/');
        path.push_str(&name);
    }

    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

fn format_validation_error(error: &jsonschema::ValidationError<'_>) -> String {
    error.to_string().replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app_schema() -> JsonValue {
        json!({
            "type": "object",
            "description": "An application deployment",
            "properties": {
                "spec": {
                    "type": "object",
                    "required": ["name", "replicas"],
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "replicas": { "type": "integer", "minimum": 1 },
                        "ingress": {
                            "type": "object",
                            "x-kubernetes-preserve-unknown-fields": true
                        }
                    }
                }
            }
        })
    }

    fn fields(details: &ValidationDetails) -> Vec<&str> {
        details.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_spec() {
        let instance = json!({ "spec": { "name": "web", "replicas": 2 } });
        let details = SchemaValidator::new()
            .validate(&app_schema(), &instance)
            .unwrap();

        assert!(details.is_valid());
        assert!(details.warnings.is_empty());
    }

    #[test]
    fn test_missing_required_field_names_the_field() {
        let instance = json!({ "spec": { "name": "web" } });
        let details = SchemaValidator::new()
            .validate(&app_schema(), &instance)
            .unwrap();

        assert!(!details.is_valid());
        assert_eq!(fields(&details), vec!["/spec/replicas"]);
        assert!(details.errors[0].message.contains("replicas"));
        assert_eq!(details.errors[0].value, None);
    }

    #[test]
    fn test_no_type_coercion() {
        let instance = json!({ "spec": { "name": "web", "replicas": "3" } });
        let details = SchemaValidator::new()
            .validate(&app_schema(), &instance)
            .unwrap();

        assert_eq!(fields(&details), vec!["/spec/replicas"]);
    }

    #[test]
    fn test_multiple_errors_each_reported() {
        let instance = json!({ "spec": { "name": "", "replicas": 0 } });
        let details = SchemaValidator::new()
            .validate(&app_schema(), &instance)
            .unwrap();

        let mut paths = fields(&details);
        paths.sort();
        assert_eq!(paths, vec!["/spec/name", "/spec/replicas"]);
    }

    #[test]
    fn test_all_of_branches_flattened() {
        let schema = json!({
            "allOf": [
                { "required": ["owner"] },
                { "properties": { "visibility": { "enum": ["public", "private"] } } }
            ]
        });
        let instance = json!({ "visibility": "internal" });
        let details = SchemaValidator::new().validate(&schema, &instance).unwrap();

        let mut paths = fields(&details);
        paths.sort();
        assert_eq!(paths, vec!["/owner", "/visibility"]);
    }

    #[test]
    fn test_any_of_causes_flattened() {
        let schema = json!({
            "type": "object",
            "properties": {
                "spec": {
                    "type": "object",
                    "properties": {
                        "source": {
                            "anyOf": [
                                { "type": "object", "required": ["repository"] },
                                { "type": "object", "required": ["image"] }
                            ]
                        }
                    }
                }
            }
        });
        let instance = json!({ "spec": { "source": { "branch": "main" } } });
        let details = SchemaValidator::new().validate(&schema, &instance).unwrap();

        assert_eq!(
            fields(&details),
            vec!["/spec/source/repository", "/spec/source/image"]
        );
    }

    #[test]
    fn test_one_of_causes_flattened() {
        let schema = json!({
            "oneOf": [
                { "type": "string" },
                { "type": "integer", "minimum": 1 }
            ]
        });
        let details = SchemaValidator::new().validate(&schema, &json!(0)).unwrap();

        assert_eq!(fields(&details), vec!["/", "/"]);
        assert!(details.errors[1].message.contains("minimum"));
    }

    #[test]
    fn test_root_error_path() {
        let details = SchemaValidator::new()
            .validate(&app_schema(), &json!("not an object"))
            .unwrap();

        assert_eq!(fields(&details), vec!["/"]);
    }

    #[test]
    fn test_invalid_schema() {
        let schema = json!({ "type": "no-such-type" });
        let err = SchemaValidator::new()
            .validate(&schema, &json!({}))
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidSchema { .. }));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ValidationOutcome::new("app-deployment", ValidationDetails::default());
        insta::assert_json_snapshot!(outcome, @r#"
        {
          "valid": true,
          "building_block": "app-deployment",
          "validation_result": {
            "errors": [],
            "warnings": []
          }
        }
        "#);
    }
}
