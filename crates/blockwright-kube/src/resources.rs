//! Read-only views of building block instances
//!
//! Each known target kind is exposed under a fixed URI. Reading a URI lists
//! every instance cluster-wide, sanitizes it and wraps the result in a
//! [`ResourceResponse`]. Listing failures are reported as a structured
//! payload rather than an error.

use blockwright_core::{GroupVersionResource, ResourceResponse, Sanitizer};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::ClusterClient;
use crate::error::KubeError;
use crate::tools::ToolError;

/// API group of the platform's building block kinds
pub const PLATFORM_GROUP: &str = "promise.platform.giantswarm.io";

/// Version served for every known kind
pub const PLATFORM_VERSION: &str = "v1beta1";

/// MIME type of every resource payload
pub const MIME_TYPE: &str = "application/json";

/// A target kind exposed as a readable resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownResource {
    pub kind: &'static str,
    pub gvr: GroupVersionResource,
    pub uri: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl KnownResource {
    fn new(
        kind: &'static str,
        plural: &'static str,
        uri: &'static str,
        title: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            kind,
            gvr: GroupVersionResource::new(PLATFORM_GROUP, PLATFORM_VERSION, plural),
            uri,
            title,
            description,
        }
    }

    pub fn api_version(&self) -> String {
        self.gvr.api_version()
    }
}

/// Every kind readable through [`CrdResourceHandler`]
pub fn known_resources() -> Vec<KnownResource> {
    vec![
        KnownResource::new(
            "AppDeployment",
            "appdeployments",
            "k8s://appdeployments",
            "App Deployments",
            "Application deployments managed by the platform",
        ),
        KnownResource::new(
            "GitHubApp",
            "githubapps",
            "k8s://githubapps",
            "GitHub Apps",
            "GitHub applications provisioned by the platform",
        ),
        KnownResource::new(
            "GitHubRepo",
            "githubrepos",
            "k8s://githubrepos",
            "GitHub Repositories",
            "GitHub repositories provisioned by the platform",
        ),
    ]
}

/// Error payload returned in place of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceErrorPayload {
    pub error: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result of reading a resource URI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceContent {
    Envelope(ResourceResponse),
    Error(ResourceErrorPayload),
}

impl ResourceContent {
    pub fn is_error(&self) -> bool {
        matches!(self, ResourceContent::Error(_))
    }
}

/// Lists instances of known target kinds
pub struct CrdResourceHandler<C: ClusterClient> {
    client: Arc<C>,
    sanitizer: Sanitizer,
}

impl<C: ClusterClient> CrdResourceHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_sanitizer(client, Sanitizer::default())
    }

    pub fn with_sanitizer(client: Arc<C>, sanitizer: Sanitizer) -> Self {
        Self { client, sanitizer }
    }

    /// Read every instance of one known kind
    pub async fn read(&self, resource: &KnownResource) -> ResourceContent {
        tracing::info!(kind = resource.kind, uri = resource.uri, "Reading resource");

        let mut items = match self.client.list(&resource.gvr, None).await {
            Ok(items) => items,
            Err(e) => return ResourceContent::Error(self.error_payload(&e, resource.kind)),
        };

        self.sanitizer.sanitize_all(&mut items);

        ResourceContent::Envelope(ResourceResponse::new(
            resource.api_version(),
            resource.kind,
            items,
            "",
            self.client.cluster_info(),
        ))
    }

    /// Read a resource by URI
    pub async fn read_uri(&self, uri: &str) -> Result<ResourceContent, ToolError> {
        let resource = known_resources()
            .into_iter()
            .find(|r| r.uri == uri)
            .ok_or_else(|| ToolError::NotFound(format!("Unknown resource URI '{uri}'")))?;

        Ok(self.read(&resource).await)
    }

    /// Read every known kind concurrently, in declaration order
    pub async fn read_all(&self) -> Vec<(KnownResource, ResourceContent)> {
        let resources = known_resources();
        let contents = join_all(resources.iter().map(|r| self.read(r))).await;
        resources.into_iter().zip(contents).collect()
    }

    fn error_payload(&self, err: &KubeError, kind: &str) -> ResourceErrorPayload {
        let (error, reason) = if err.is_not_found() {
            tracing::info!(kind = %kind, "No resources found");
            (format!("No {kind} resources found"), "NotFound")
        } else if err.is_forbidden() {
            tracing::error!(kind = %kind, error = %err, "Access denied to Kubernetes cluster");
            ("Access denied to Kubernetes cluster".to_string(), "Forbidden")
        } else if err.is_unauthorized() {
            tracing::error!(kind = %kind, error = %err, "Authentication required");
            (
                "Authentication required for Kubernetes cluster".to_string(),
                "Unauthorized",
            )
        } else {
            tracing::error!(kind = %kind, error = %err, "Failed to retrieve resources");
            (
                format!("Failed to retrieve {kind} resources: {err}"),
                "InternalError",
            )
        };

        ResourceErrorPayload {
            error,
            reason: reason.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_resources() {
        let resources = known_resources();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri).collect();
        assert_eq!(
            uris,
            vec!["k8s://appdeployments", "k8s://githubapps", "k8s://githubrepos"]
        );
        assert!(
            resources
                .iter()
                .all(|r| r.api_version() == "promise.platform.giantswarm.io/v1beta1")
        );
    }
}
