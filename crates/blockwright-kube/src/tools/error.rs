//! Errors reported by building block tools

use blockwright_core::{CoreError, ValidationOutcome};
use std::fmt;
use thiserror::Error;

use crate::error::KubeError;

/// Failure of a single tool invocation
///
/// Argument and JSON errors are always reported before the cluster is
/// contacted.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing required parameter '{0}'")]
    MissingArgument(String),

    #[error("Parameter '{name}' must be {expected}")]
    InvalidArgumentType { name: String, expected: &'static str },

    #[error("Invalid JSON in '{name}' parameter: {message}")]
    MalformedJson { name: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    SchemaExtraction(String),

    /// A building block spec did not satisfy its schema
    #[error(
        "Validation failed for building block '{}' with {} error(s)",
        .0.building_block,
        .0.validation_result.errors.len()
    )]
    ValidationFailed(ValidationOutcome),

    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            ToolError::MissingArgument(_) => "MissingArgument",
            ToolError::InvalidArgumentType { .. } => "InvalidArgumentType",
            ToolError::MalformedJson { .. } => "MalformedJSON",
            ToolError::NotFound(_) => "NotFound",
            ToolError::Forbidden(_) => "Forbidden",
            ToolError::Unauthorized(_) => "Unauthorized",
            ToolError::AlreadyExists(_) => "AlreadyExists",
            ToolError::SchemaExtraction(_) => "SchemaExtractionError",
            ToolError::ValidationFailed(_) => "ValidationFailed",
            ToolError::Internal(_) => "InternalError",
        }
    }

    /// Prefix the message of cluster-side errors
    ///
    /// Argument and validation errors are returned unchanged.
    pub fn with_context(self, context: impl fmt::Display) -> Self {
        let wrap = |message: String| format!("{context}: {message}");
        match self {
            ToolError::NotFound(m) => ToolError::NotFound(wrap(m)),
            ToolError::Forbidden(m) => ToolError::Forbidden(wrap(m)),
            ToolError::Unauthorized(m) => ToolError::Unauthorized(wrap(m)),
            ToolError::AlreadyExists(m) => ToolError::AlreadyExists(wrap(m)),
            ToolError::SchemaExtraction(m) => ToolError::SchemaExtraction(wrap(m)),
            ToolError::Internal(m) => ToolError::Internal(wrap(m)),
            other => other,
        }
    }

    /// Whether the cluster could not be reached or refused the request
    pub fn is_cluster_error(&self) -> bool {
        matches!(
            self,
            ToolError::NotFound(_)
                | ToolError::Forbidden(_)
                | ToolError::Unauthorized(_)
                | ToolError::AlreadyExists(_)
                | ToolError::Internal(_)
        )
    }
}

impl From<KubeError> for ToolError {
    fn from(err: KubeError) -> Self {
        let message = err.to_string();
        if err.is_not_found() {
            ToolError::NotFound(message)
        } else if err.is_forbidden() {
            ToolError::Forbidden(message)
        } else if err.is_unauthorized() {
            ToolError::Unauthorized(message)
        } else if err.is_already_exists() {
            ToolError::AlreadyExists(message)
        } else if matches!(err, KubeError::SchemaExtraction { .. }) {
            ToolError::SchemaExtraction(message)
        } else {
            ToolError::Internal(message)
        }
    }
}

impl From<CoreError> for ToolError {
    fn from(err: CoreError) -> Self {
        ToolError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractionError;

    #[test]
    fn test_kube_error_classification() {
        let err = ToolError::from(KubeError::NotFound {
            resource: "promises".to_string(),
            name: "postgres".to_string(),
        });
        assert_eq!(err.reason(), "NotFound");

        let err = ToolError::from(KubeError::SchemaExtraction {
            name: "postgres".to_string(),
            source: ExtractionError::NoCanonicalVersion,
        });
        assert_eq!(err.reason(), "SchemaExtractionError");
        assert_eq!(
            err.to_string(),
            "failed to extract schema from promise 'postgres': no version is both served and storage"
        );

        let err = ToolError::from(KubeError::Timeout("30s".to_string()));
        assert_eq!(err.reason(), "InternalError");
    }

    #[test]
    fn test_with_context() {
        let err = ToolError::Forbidden("access to promises forbidden".to_string())
            .with_context("Failed to list platform building blocks");
        assert_eq!(
            err.to_string(),
            "Failed to list platform building blocks: access to promises forbidden"
        );

        let err = ToolError::MissingArgument("spec".to_string()).with_context("ignored");
        assert_eq!(err.to_string(), "Missing required parameter 'spec'");
    }
}
