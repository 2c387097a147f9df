//! Building block (Kratix Promise) projections
//!
//! A Promise declares a target custom resource type together with an
//! OpenAPI v3 schema for it. These types are the read-only views handed to
//! callers; they are rebuilt from the cluster on every request.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Scope value for cluster-scoped target resources
pub const CLUSTER_SCOPE: &str = "Cluster";

/// Group/version/resource triple addressing a collection in the cluster API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    /// The `apiVersion` string for documents in this collection
    ///
    /// - group="apps", version="v1" -> "apps/v1"
    /// - group="", version="v1" -> "v1" (core API)
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Resource={}", self.api_version(), self.resource)
    }
}

/// The custom resource type a building block creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResource {
    /// API group
    pub group: String,

    /// Version name of the canonical (storage + served) version
    pub version: String,

    /// Plural resource name
    pub resource: String,

    /// Kind
    pub kind: String,

    /// `Namespaced` or `Cluster`
    pub scope: String,
}

impl TargetResource {
    /// Collection address for instances of this resource
    pub fn gvr(&self) -> GroupVersionResource {
        GroupVersionResource::new(&self.group, &self.version, &self.resource)
    }

    /// `apiVersion` for new instances
    pub fn api_version(&self) -> String {
        self.gvr().api_version()
    }

    /// Whether instances live in a namespace
    pub fn is_namespaced(&self) -> bool {
        self.scope != CLUSTER_SCOPE
    }
}

/// Summary of a building block, as returned by listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingBlockSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub target_resource: TargetResource,
}

/// Full schema of a building block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingBlockSchema {
    pub name: String,
    pub version: String,
    pub target_resource: TargetResource,

    /// The complete `openAPIV3Schema` of the canonical version, verbatim
    pub openapi_schema: JsonValue,
}
