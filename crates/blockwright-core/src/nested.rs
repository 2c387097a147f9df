//! Typed access into nested JSON documents
//!
//! Cluster resources arrive as untyped JSON. Every lookup in this module
//! reports one of three outcomes, so callers can tell a field that was simply
//! omitted from one that is present with the wrong shape:
//!
//! - [`Field::Present`]: the value exists and has the requested type
//! - [`Field::Absent`]: some segment of the path does not exist
//! - [`Field::Mismatch`]: a value exists on the path but has another type
//!
//! An explicit JSON `null` is treated as absent.

use serde_json::{Map, Value};
use thiserror::Error;

/// Outcome of a single path lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Value exists with the requested type
    Present(T),

    /// Path (or one of its parents) does not exist
    Absent { path: String },

    /// Value at `path` exists but is not what the caller asked for
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Error produced when a [`Field`] cannot satisfy the caller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("missing field '{path}'")]
    Missing { path: String },

    #[error("field '{path}' must be {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Path reported for the document itself
const ROOT: &str = "(root)";

impl AccessError {
    /// Re-root the error's path under `parent`
    ///
    /// Used when a lookup ran on a sub-document, such as one entry of an
    /// array, so the path still locates the field in the whole document.
    pub fn within(self, parent: &str) -> Self {
        let nest = |path: String| {
            if path == ROOT {
                parent.to_string()
            } else {
                format!("{parent}.{path}")
            }
        };
        match self {
            AccessError::Missing { path } => AccessError::Missing { path: nest(path) },
            AccessError::WrongType {
                path,
                expected,
                found,
            } => AccessError::WrongType {
                path: nest(path),
                expected,
                found,
            },
        }
    }
}

impl<T> Field<T> {
    /// Whether the value was found with the requested type
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Require the value to be present
    pub fn required(self) -> Result<T, AccessError> {
        match self {
            Field::Present(value) => Ok(value),
            Field::Absent { path } => Err(AccessError::Missing { path }),
            Field::Mismatch {
                path,
                expected,
                found,
            } => Err(AccessError::WrongType {
                path,
                expected,
                found,
            }),
        }
    }

    /// Accept absence, but still reject a value of the wrong type
    pub fn optional(self) -> Result<Option<T>, AccessError> {
        match self {
            Field::Absent { .. } => Ok(None),
            other => other.required().map(Some),
        }
    }

    /// Fall back to `default` when absent; wrong types are still errors
    pub fn or(self, default: T) -> Result<T, AccessError> {
        self.optional().map(|value| value.unwrap_or(default))
    }

    /// Transform a present value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Absent { path } => Field::Absent { path },
            Field::Mismatch {
                path,
                expected,
                found,
            } => Field::Mismatch {
                path,
                expected,
                found,
            },
        }
    }
}

/// Look up a raw value by path
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Field<&'a Value> {
    let mut current = root;

    for (depth, segment) in path.iter().enumerate() {
        let object = match current {
            Value::Object(map) => map,
            Value::Null => return Field::Absent { path: join(&path[..depth]) },
            other => {
                return Field::Mismatch {
                    path: join(&path[..depth]),
                    expected: "an object",
                    found: type_name(other),
                };
            }
        };

        match object.get(*segment) {
            Some(next) => current = next,
            None => return Field::Absent { path: join(&path[..=depth]) },
        }
    }

    if current.is_null() {
        return Field::Absent { path: join(path) };
    }

    Field::Present(current)
}

/// Look up an object
pub fn object<'a>(root: &'a Value, path: &[&str]) -> Field<&'a Map<String, Value>> {
    typed(root, path, "an object", Value::as_object)
}

/// Look up an array
pub fn array<'a>(root: &'a Value, path: &[&str]) -> Field<&'a Vec<Value>> {
    typed(root, path, "an array", Value::as_array)
}

/// Look up a string
pub fn string<'a>(root: &'a Value, path: &[&str]) -> Field<&'a str> {
    typed(root, path, "a string", Value::as_str)
}

/// Look up a boolean
pub fn boolean(root: &Value, path: &[&str]) -> Field<bool> {
    typed(root, path, "a boolean", Value::as_bool)
}

/// Remove the value at `path`, returning it when it existed
///
/// Missing parents are not an error; the document is left untouched.
pub fn remove(root: &mut Value, path: &[&str]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for segment in parents {
        current = current.as_object_mut()?.get_mut(*segment)?;
    }
    current.as_object_mut()?.remove(*last)
}

fn typed<'a, T>(
    root: &'a Value,
    path: &[&str],
    expected: &'static str,
    convert: impl FnOnce(&'a Value) -> Option<T>,
) -> Field<T> {
    match lookup(root, path) {
        Field::Present(value) => match convert(value) {
            Some(converted) => Field::Present(converted),
            None => Field::Mismatch {
                path: join(path),
                expected,
                found: type_name(value),
            },
        },
        Field::Absent { path } => Field::Absent { path },
        Field::Mismatch {
            path,
            expected,
            found,
        } => Field::Mismatch {
            path,
            expected,
            found,
        },
    }
}

fn join(path: &[&str]) -> String {
    if path.is_empty() {
        ROOT.to_string()
    } else {
        path.join(".")
    }
}

/// Human-readable JSON type name
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn promise() -> Value {
        json!({
            "metadata": { "name": "postgres", "labels": { "kratix.io/promise-version": "v1.2.0" } },
            "spec": {
                "api": {
                    "spec": {
                        "group": "platform.example.io",
                        "versions": [{ "name": "v1", "served": true }],
                        "names": "not-an-object",
                        "description": null
                    }
                }
            }
        })
    }

    #[test]
    fn test_lookup_present() {
        let doc = promise();
        assert_eq!(
            string(&doc, &["spec", "api", "spec", "group"]),
            Field::Present("platform.example.io")
        );
        assert_eq!(
            string(&doc, &["metadata", "labels", "kratix.io/promise-version"]),
            Field::Present("v1.2.0")
        );
    }

    #[test]
    fn test_lookup_absent_reports_first_missing_segment() {
        let doc = promise();
        assert_eq!(
            string(&doc, &["spec", "destination", "name"]),
            Field::Absent {
                path: "spec.destination".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_wrong_leaf_type() {
        let doc = promise();
        let field = array(&doc, &["spec", "api", "spec", "group"]);
        assert_eq!(
            field,
            Field::Mismatch {
                path: "spec.api.spec.group".to_string(),
                expected: "an array",
                found: "a string",
            }
        );
    }

    #[test]
    fn test_lookup_through_non_object_parent() {
        let doc = promise();
        let field = string(&doc, &["spec", "api", "spec", "names", "kind"]);
        assert_eq!(
            field,
            Field::Mismatch {
                path: "spec.api.spec.names".to_string(),
                expected: "an object",
                found: "a string",
            }
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let doc = promise();
        let field = string(&doc, &["spec", "api", "spec", "description"]);
        assert!(matches!(field, Field::Absent { .. }));
        assert_eq!(field.or("fallback"), Ok("fallback"));
    }

    #[test]
    fn test_optional_rejects_wrong_type() {
        let doc = promise();
        let err = boolean(&doc, &["spec", "api", "spec", "group"])
            .optional()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'spec.api.spec.group' must be a boolean, found a string"
        );
    }

    #[test]
    fn test_required_reports_missing_path() {
        let doc = promise();
        let err = boolean(&doc, &["spec", "api", "spec", "storage"])
            .required()
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::Missing {
                path: "spec.api.spec.storage".to_string()
            }
        );
    }

    #[test]
    fn test_error_within_parent() {
        let entry = json!({ "name": "v1", "served": "yes" });
        let err = boolean(&entry, &["served"]).required().unwrap_err();
        assert_eq!(
            err.within("spec.versions[2]").to_string(),
            "field 'spec.versions[2].served' must be a boolean, found a string"
        );

        let err = boolean(&json!("v1"), &["served"]).required().unwrap_err();
        assert_eq!(
            err.within("spec.versions[0]").to_string(),
            "field 'spec.versions[0]' must be an object, found a string"
        );
    }

    #[test]
    fn test_remove_nested_field() {
        let mut doc = promise();
        let removed = remove(&mut doc, &["spec", "api", "spec", "group"]);
        assert_eq!(removed, Some(json!("platform.example.io")));
        assert!(!string(&doc, &["spec", "api", "spec", "group"]).is_present());

        // Missing parents are a no-op
        assert_eq!(remove(&mut doc, &["status", "conditions"]), None);
        assert_eq!(remove(&mut doc, &[]), None);
    }
}
