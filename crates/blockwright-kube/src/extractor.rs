//! Promise extraction
//!
//! Projects Kratix `Promise` resources into building block summaries and
//! schemas. The relevant layout of a Promise is:
//!
//! ```yaml
//! metadata:
//!   name: github-repo
//!   labels:
//!     kratix.io/promise-version: v0.3.1
//! spec:
//!   api:
//!     spec:
//!       group: promise.platform.giantswarm.io
//!       scope: Namespaced
//!       names: { plural: githubrepos, kind: GitHubRepo }
//!       versions:
//!         - name: v1beta1
//!           served: true
//!           storage: true
//!           schema:
//!             openAPIV3Schema: { ... }
//! ```

use blockwright_core::nested::{self, AccessError};
use blockwright_core::{BuildingBlockSchema, BuildingBlockSummary, GroupVersionResource, TargetResource};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use crate::client::ClusterClient;
use crate::error::{KubeError, Result};

/// Label carrying the Promise's release version
pub const PROMISE_VERSION_LABEL: &str = "kratix.io/promise-version";

/// Version reported when the label is missing
pub const UNKNOWN_VERSION: &str = "unknown";

/// Description reported when the schema has none
pub const NO_DESCRIPTION: &str = "No description available";

/// Scope assumed when the Promise does not declare one
pub const DEFAULT_SCOPE: &str = "Namespaced";

const API_SPEC: [&str; 3] = ["spec", "api", "spec"];

/// Address of Kratix Promises (cluster-scoped)
pub fn promise_gvr() -> GroupVersionResource {
    GroupVersionResource::new("platform.kratix.io", "v1alpha1", "promises")
}

/// Why a Promise could not be projected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    Field(#[from] AccessError),

    #[error("no version is both served and storage")]
    NoCanonicalVersion,

    #[error("multiple versions are both served and storage: {}", .0.join(", "))]
    AmbiguousCanonicalVersion(Vec<String>),

    #[error("version '{0}' has no schema.openAPIV3Schema")]
    MissingSchema(String),
}

/// The version entry that is both served and storage
#[derive(Debug, Clone, Copy)]
pub struct CanonicalVersion<'a> {
    pub name: &'a str,
    pub entry: &'a JsonValue,
}

/// Select the canonical version of a Promise
///
/// Exactly one entry may be both `storage` and `served`; zero or several
/// matches are errors.
pub fn canonical_version(promise: &JsonValue) -> std::result::Result<CanonicalVersion<'_>, ExtractionError> {
    let versions = nested::array(promise, &["spec", "api", "spec", "versions"]).required()?;

    let mut matches = Vec::new();
    for (index, entry) in versions.iter().enumerate() {
        let at = |e: AccessError| e.within(&format!("spec.api.spec.versions[{index}]"));
        let storage = nested::boolean(entry, &["storage"]).or(false).map_err(at)?;
        let served = nested::boolean(entry, &["served"]).or(false).map_err(at)?;
        if storage && served {
            let name = nested::string(entry, &["name"]).required().map_err(at)?;
            matches.push(CanonicalVersion { name, entry });
        }
    }

    match matches.len() {
        0 => Err(ExtractionError::NoCanonicalVersion),
        1 => Ok(matches[0]),
        _ => Err(ExtractionError::AmbiguousCanonicalVersion(
            matches.iter().map(|m| m.name.to_string()).collect(),
        )),
    }
}

/// Release version from the Promise's labels
pub fn version_label(promise: &JsonValue) -> std::result::Result<String, ExtractionError> {
    Ok(nested::string(promise, &["metadata", "labels", PROMISE_VERSION_LABEL])
        .or(UNKNOWN_VERSION)?
        .to_string())
}

/// Target resource declared by the Promise
pub fn target_resource(promise: &JsonValue) -> std::result::Result<TargetResource, ExtractionError> {
    nested::object(promise, &API_SPEC).required()?;

    let group = nested::string(promise, &["spec", "api", "spec", "group"]).required()?;
    let scope = nested::string(promise, &["spec", "api", "spec", "scope"]).or(DEFAULT_SCOPE)?;
    let plural = nested::string(promise, &["spec", "api", "spec", "names", "plural"]).required()?;
    let kind = nested::string(promise, &["spec", "api", "spec", "names", "kind"]).required()?;
    let canonical = canonical_version(promise)?;

    Ok(TargetResource {
        group: group.to_string(),
        version: canonical.name.to_string(),
        resource: plural.to_string(),
        kind: kind.to_string(),
        scope: scope.to_string(),
    })
}

fn promise_name(promise: &JsonValue) -> std::result::Result<String, ExtractionError> {
    Ok(nested::string(promise, &["metadata", "name"]).required()?.to_string())
}

/// Project a Promise into a summary
pub fn summarize(promise: &JsonValue) -> std::result::Result<BuildingBlockSummary, ExtractionError> {
    let name = promise_name(promise)?;
    let version = version_label(promise)?;
    let target_resource = target_resource(promise)?;
    let canonical = canonical_version(promise)?;

    let description = nested::string(canonical.entry, &["schema", "openAPIV3Schema", "description"])
        .optional()?
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    Ok(BuildingBlockSummary {
        name,
        version,
        description,
        target_resource,
    })
}

/// Project a Promise into its full schema
pub fn extract_schema(
    name: &str,
    promise: &JsonValue,
) -> std::result::Result<BuildingBlockSchema, ExtractionError> {
    let version = version_label(promise)?;
    let target_resource = target_resource(promise)?;
    let canonical = canonical_version(promise)?;

    let openapi_schema = match nested::object(canonical.entry, &["schema", "openAPIV3Schema"]).optional()? {
        Some(schema) => JsonValue::Object(schema.clone()),
        None => return Err(ExtractionError::MissingSchema(canonical.name.to_string())),
    };

    Ok(BuildingBlockSchema {
        name: name.to_string(),
        version,
        target_resource,
        openapi_schema,
    })
}

/// Reads Promises from the cluster
pub struct PromiseExtractor<C: ClusterClient> {
    client: Arc<C>,
}

impl<C: ClusterClient> Clone for PromiseExtractor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: ClusterClient> PromiseExtractor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Summaries of every Promise in the cluster
    ///
    /// Promises that cannot be projected are skipped with a warning.
    pub async fn list_summaries(&self) -> Result<Vec<BuildingBlockSummary>> {
        tracing::info!("Listing building block summaries");

        let promises = self.client.list(&promise_gvr(), None).await?;

        let summaries: Vec<BuildingBlockSummary> = promises
            .iter()
            .filter_map(|promise| match summarize(promise) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    let name = nested::string(promise, &["metadata", "name"])
                        .or("<unnamed>")
                        .unwrap_or("<unnamed>");
                    tracing::warn!(promise = %name, error = %e, "Skipping promise");
                    None
                }
            })
            .collect();

        tracing::info!(count = summaries.len(), "Extracted building block summaries");
        Ok(summaries)
    }

    /// Full schema of one Promise
    pub async fn get_schema(&self, name: &str) -> Result<BuildingBlockSchema> {
        tracing::info!(promise = %name, "Getting building block schema");

        let promise = self.client.get(&promise_gvr(), None, name).await?;

        extract_schema(name, &promise).map_err(|source| KubeError::SchemaExtraction {
            name: name.to_string(),
            source,
        })
    }
}
