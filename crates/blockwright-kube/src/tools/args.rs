//! Tool argument access

use serde_json::{Map, Value as JsonValue};

use super::error::ToolError;

/// Named arguments of a tool call
pub type Arguments = Map<String, JsonValue>;

pub const BUILDING_BLOCK_NAME: &str = "building_block_name";
pub const RESOURCE_NAME: &str = "resource_name";
pub const SPEC: &str = "spec";
pub const NAMESPACE: &str = "namespace";

/// Expected type reported for blank names
pub(crate) const NON_EMPTY: &str = "a non-empty string";

fn string_arg<'a>(args: &'a Arguments, name: &str, expected: &'static str) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None => Err(ToolError::MissingArgument(name.to_string())),
        Some(JsonValue::String(value)) => Ok(value),
        Some(_) => Err(ToolError::InvalidArgumentType {
            name: name.to_string(),
            expected,
        }),
    }
}

/// A required, non-blank string argument
pub fn required_str<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, ToolError> {
    let value = string_arg(args, name, "a string")?;
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArgumentType {
            name: name.to_string(),
            expected: NON_EMPTY,
        });
    }
    Ok(value)
}

/// The `spec` argument: a string holding a JSON document
///
/// Blank strings are left to [`parse_spec`] to reject.
pub fn required_json_str<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, ToolError> {
    string_arg(args, name, "a JSON string")
}

/// Parse a spec; it must be a JSON object
pub fn parse_spec(raw: &str) -> Result<JsonValue, ToolError> {
    let value: JsonValue = serde_json::from_str(raw).map_err(|e| ToolError::MalformedJson {
        name: SPEC.to_string(),
        message: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(ToolError::MalformedJson {
            name: SPEC.to_string(),
            message: "expected a JSON object".to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: JsonValue) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_str() {
        let args = args(json!({ "building_block_name": "github-repo", "namespace": 3 }));

        assert_eq!(required_str(&args, BUILDING_BLOCK_NAME).unwrap(), "github-repo");
        assert_eq!(
            required_str(&args, NAMESPACE).unwrap_err().to_string(),
            "Parameter 'namespace' must be a string"
        );
        assert_eq!(
            required_str(&args, RESOURCE_NAME).unwrap_err().to_string(),
            "Missing required parameter 'resource_name'"
        );
    }

    #[test]
    fn test_blank_names_rejected() {
        let args = args(json!({ "resource_name": "", "namespace": "  " }));

        assert_eq!(
            required_str(&args, RESOURCE_NAME).unwrap_err().to_string(),
            "Parameter 'resource_name' must be a non-empty string"
        );
        assert_eq!(
            required_str(&args, NAMESPACE).unwrap_err().reason(),
            "InvalidArgumentType"
        );
    }

    #[test]
    fn test_spec_must_be_json_string() {
        let args = args(json!({ "spec": { "already": "parsed" } }));
        assert_eq!(
            required_json_str(&args, SPEC).unwrap_err().to_string(),
            "Parameter 'spec' must be a JSON string"
        );
    }

    #[test]
    fn test_parse_spec() {
        assert_eq!(parse_spec(r#"{"replicas": 2}"#).unwrap(), json!({ "replicas": 2 }));
        assert_eq!(parse_spec("{not json").unwrap_err().reason(), "MalformedJSON");
        assert_eq!(parse_spec("[1, 2]").unwrap_err().reason(), "MalformedJSON");
    }
}
