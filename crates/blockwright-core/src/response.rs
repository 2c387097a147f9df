//! Response envelopes returned to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::promise::BuildingBlockSummary;

/// Connection details of the cluster that served a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub context: String,
    pub server: String,

    /// Request timeout, human readable (e.g. `30s`)
    pub timeout: String,
}

/// Uniform list envelope for instances of a target resource kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub api_version: String,
    pub kind: String,
    pub items: Vec<JsonValue>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Namespace filter; empty means all namespaces
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub count: usize,
    pub last_updated: DateTime<Utc>,
    pub cluster_info: ClusterInfo,
}

impl ResourceResponse {
    /// Wrap already-sanitized items for `kind`
    ///
    /// The envelope kind is `<kind>List`.
    pub fn new(
        api_version: impl Into<String>,
        kind: &str,
        items: Vec<JsonValue>,
        namespace: impl Into<String>,
        cluster_info: ClusterInfo,
    ) -> Self {
        let count = items.len();
        Self {
            api_version: api_version.into(),
            kind: format!("{kind}List"),
            items,
            metadata: ResponseMetadata {
                namespace: namespace.into(),
                count,
                last_updated: Utc::now(),
                cluster_info,
            },
        }
    }
}

/// Result of listing building blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingBlockList {
    pub building_blocks: Vec<BuildingBlockSummary>,
    pub metadata: ListMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMetadata {
    pub total_count: usize,
    pub cluster_context: String,
    pub last_updated: DateTime<Utc>,
    pub cluster_info: ClusterInfo,
}

impl BuildingBlockList {
    pub fn new(
        building_blocks: Vec<BuildingBlockSummary>,
        cluster_context: impl Into<String>,
        cluster_info: ClusterInfo,
    ) -> Self {
        Self {
            metadata: ListMetadata {
                total_count: building_blocks.len(),
                cluster_context: cluster_context.into(),
                last_updated: Utc::now(),
                cluster_info,
            },
            building_blocks,
        }
    }
}

/// Confirmation returned after a building block instance was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResource {
    pub success: bool,
    pub resource_name: String,
    pub resource_type: String,
    pub building_block: String,
    pub status: String,
    pub metadata: CreationMetadata,
    pub details: CreationDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationMetadata {
    pub created_at: DateTime<Utc>,
    pub cluster_context: String,
    pub resource_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationDetails {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub uid: String,
}
