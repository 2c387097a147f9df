//! Error types for blockwright-kube

use thiserror::Error;

use crate::extractor::ExtractionError;

/// Result type for blockwright-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur during cluster operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error that has no more specific classification
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Resource not found
    #[error("{resource} '{name}' not found")]
    NotFound { resource: String, name: String },

    /// Caller lacks permission
    #[error("access to {resource} forbidden: {message}")]
    Forbidden { resource: String, message: String },

    /// Credentials missing or rejected
    #[error("not authorized to access {resource}: {message}")]
    Unauthorized { resource: String, message: String },

    /// Resource already exists
    #[error("{resource} '{name}' already exists{}", in_namespace(.namespace))]
    AlreadyExists {
        resource: String,
        name: String,
        namespace: Option<String>,
    },

    /// Timeout
    #[error("operation timed out after {0}")]
    Timeout(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Request failed for a reason the cluster did not classify
    #[error("request failed: {0}")]
    Request(String),

    /// Promise could not be projected into a building block
    #[error("failed to extract schema from promise '{name}': {source}")]
    SchemaExtraction {
        name: String,
        #[source]
        source: ExtractionError,
    },
}

fn in_namespace(namespace: &Option<String>) -> String {
    namespace
        .as_deref()
        .map(|ns| format!(" in namespace '{ns}'"))
        .unwrap_or_default()
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl KubeError {
    /// Classify an API error by its HTTP status
    ///
    /// `name` is empty for collection-level calls such as list.
    pub fn from_api(
        err: kube::Error,
        resource: impl Into<String>,
        name: &str,
        namespace: Option<&str>,
    ) -> Self {
        let kube::Error::Api(resp) = &err else {
            return KubeError::Api(err);
        };

        let resource = resource.into();
        match resp.code {
            404 => KubeError::NotFound {
                resource,
                name: name.to_string(),
            },
            403 => KubeError::Forbidden {
                resource,
                message: resp.message.clone(),
            },
            401 => KubeError::Unauthorized {
                resource,
                message: resp.message.clone(),
            },
            409 => KubeError::AlreadyExists {
                resource,
                name: name.to_string(),
                namespace: namespace.map(str::to_string),
            },
            _ => KubeError::Api(err),
        }
    }

    /// Check if this is a not-found error (404)
    pub fn is_not_found(&self) -> bool {
        match self {
            KubeError::NotFound { .. } => true,
            KubeError::Api(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }

    /// Check if this is a forbidden error (403)
    pub fn is_forbidden(&self) -> bool {
        match self {
            KubeError::Forbidden { .. } => true,
            KubeError::Api(kube::Error::Api(resp)) => resp.code == 403,
            _ => false,
        }
    }

    /// Check if this is an unauthorized error (401)
    pub fn is_unauthorized(&self) -> bool {
        match self {
            KubeError::Unauthorized { .. } => true,
            KubeError::Api(kube::Error::Api(resp)) => resp.code == 401,
            _ => false,
        }
    }

    /// Check if this is an already-exists conflict (409)
    pub fn is_already_exists(&self) -> bool {
        match self {
            KubeError::AlreadyExists { .. } => true,
            KubeError::Api(kube::Error::Api(resp)) => resp.code == 409,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{reason} by test"),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_classify_status_codes() {
        let err = KubeError::from_api(api_error(404, "NotFound"), "promises", "postgres", None);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "promises 'postgres' not found");

        let err = KubeError::from_api(api_error(403, "Forbidden"), "githubapps", "", None);
        assert!(err.is_forbidden());
        assert!(!err.is_not_found());

        let err = KubeError::from_api(api_error(401, "Unauthorized"), "githubapps", "", None);
        assert!(err.is_unauthorized());

        let err = KubeError::from_api(
            api_error(409, "AlreadyExists"),
            "githubrepos",
            "payments",
            Some("team-a"),
        );
        assert!(err.is_already_exists());
        assert_eq!(
            err.to_string(),
            "githubrepos 'payments' already exists in namespace 'team-a'"
        );
    }

    #[test]
    fn test_unclassified_stays_api() {
        let err = KubeError::from_api(api_error(500, "InternalError"), "promises", "", None);
        assert!(matches!(err, KubeError::Api(_)));
        assert!(!err.is_not_found());
        assert!(!err.is_forbidden());
    }
}
