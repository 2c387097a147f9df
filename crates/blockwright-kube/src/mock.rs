//! Mock cluster client for testing
//!
//! Stores documents in memory, useful for unit tests without requiring a
//! Kubernetes cluster. Failures can be injected per operation and resource.

use async_trait::async_trait;
use blockwright_core::{ClusterInfo, GroupVersionResource, nested};
use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::ClusterClient;
use crate::error::{KubeError, Result};

/// In-memory cluster client for testing
#[derive(Clone)]
pub struct MockClusterClient {
    /// Stored documents in insertion order
    store: Arc<RwLock<Vec<(GroupVersionResource, JsonValue)>>>,
    /// Injected failures
    failures: Arc<RwLock<HashMap<(Operation, GroupVersionResource), MockFailure>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
    context: String,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub lists: usize,
    pub gets: usize,
    pub creates: usize,
}

impl OperationCounts {
    /// Total number of cluster calls
    pub fn total(&self) -> usize {
        self.lists + self.gets + self.creates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operation {
    List,
    Get,
    Create,
}

/// Failure to return instead of performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    NotFound,
    Forbidden,
    Unauthorized,
    AlreadyExists,
    Timeout,
    Internal(String),
}

impl MockFailure {
    fn into_error(self, gvr: &GroupVersionResource, name: &str, namespace: Option<&str>) -> KubeError {
        let resource = gvr.resource.clone();
        match self {
            MockFailure::NotFound => KubeError::NotFound {
                resource,
                name: name.to_string(),
            },
            MockFailure::Forbidden => KubeError::Forbidden {
                resource,
                message: "forbidden by mock".to_string(),
            },
            MockFailure::Unauthorized => KubeError::Unauthorized {
                resource,
                message: "unauthorized by mock".to_string(),
            },
            MockFailure::AlreadyExists => KubeError::AlreadyExists {
                resource,
                name: name.to_string(),
                namespace: namespace.map(str::to_string),
            },
            MockFailure::Timeout => KubeError::Timeout("30s".to_string()),
            MockFailure::Internal(message) => KubeError::Request(message),
        }
    }
}

impl MockClusterClient {
    /// Create a new empty mock client
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            operations: Arc::new(RwLock::new(OperationCounts::default())),
            context: "mock-context".to_string(),
        }
    }

    /// Override the reported context name
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Store a document under `gvr`
    pub fn insert(&self, gvr: &GroupVersionResource, document: JsonValue) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((gvr.clone(), document));
    }

    /// Make every `list` of `gvr` fail
    pub fn fail_list(&self, gvr: &GroupVersionResource, failure: MockFailure) {
        self.fail(Operation::List, gvr, failure);
    }

    /// Make every `get` of `gvr` fail
    pub fn fail_get(&self, gvr: &GroupVersionResource, failure: MockFailure) {
        self.fail(Operation::Get, gvr, failure);
    }

    /// Make every `create` of `gvr` fail
    pub fn fail_create(&self, gvr: &GroupVersionResource, failure: MockFailure) {
        self.fail(Operation::Create, gvr, failure);
    }

    fn fail(&self, operation: Operation, gvr: &GroupVersionResource, failure: MockFailure) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((operation, gvr.clone()), failure);
    }

    fn injected(&self, operation: Operation, gvr: &GroupVersionResource) -> Option<MockFailure> {
        self.failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(operation, gvr.clone()))
            .cloned()
    }

    fn record(&self, operation: Operation) {
        let mut ops = self.operations.write().unwrap_or_else(PoisonError::into_inner);
        match operation {
            Operation::List => ops.lists += 1,
            Operation::Get => ops.gets += 1,
            Operation::Create => ops.creates += 1,
        }
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset operation counts
    pub fn reset_counts(&self) {
        *self.operations.write().unwrap_or_else(PoisonError::into_inner) = OperationCounts::default();
    }

    /// All documents stored under `gvr`
    pub fn objects(&self, gvr: &GroupVersionResource) -> Vec<JsonValue> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(stored, _)| stored == gvr)
            .map(|(_, document)| document.clone())
            .collect()
    }
}

impl Default for MockClusterClient {
    fn default() -> Self {
        Self::new()
    }
}

fn namespace_of(document: &JsonValue) -> Option<&str> {
    nested::string(document, &["metadata", "namespace"])
        .optional()
        .ok()
        .flatten()
}

fn name_of(document: &JsonValue) -> &str {
    nested::string(document, &["metadata", "name"])
        .or("")
        .unwrap_or_default()
}

#[async_trait]
impl ClusterClient for MockClusterClient {
    async fn list(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<JsonValue>> {
        self.record(Operation::List);
        if let Some(failure) = self.injected(Operation::List, gvr) {
            return Err(failure.into_error(gvr, "", namespace));
        }

        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        Ok(store
            .iter()
            .filter(|(stored, _)| stored == gvr)
            .filter(|(_, document)| namespace.is_none() || namespace_of(document) == namespace)
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn get(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<JsonValue> {
        self.record(Operation::Get);
        if let Some(failure) = self.injected(Operation::Get, gvr) {
            return Err(failure.into_error(gvr, name, namespace));
        }

        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .iter()
            .find(|(stored, document)| {
                stored == gvr && name_of(document) == name && namespace_of(document) == namespace
            })
            .map(|(_, document)| document.clone())
            .ok_or_else(|| KubeError::NotFound {
                resource: gvr.resource.clone(),
                name: name.to_string(),
            })
    }

    async fn create(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        document: &JsonValue,
    ) -> Result<JsonValue> {
        self.record(Operation::Create);
        let name = name_of(document).to_string();
        if let Some(failure) = self.injected(Operation::Create, gvr) {
            return Err(failure.into_error(gvr, &name, namespace));
        }

        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let exists = store.iter().any(|(stored, existing)| {
            stored == gvr && name_of(existing) == name && namespace_of(existing) == namespace
        });
        if exists {
            return Err(KubeError::AlreadyExists {
                resource: gvr.resource.clone(),
                name,
                namespace: namespace.map(str::to_string),
            });
        }

        let mut created = document.clone();
        if let Some(metadata) = created.get_mut("metadata").and_then(JsonValue::as_object_mut) {
            metadata.insert("uid".to_string(), json!(uuid::Uuid::new_v4().to_string()));
            metadata.insert(
                "resourceVersion".to_string(),
                json!((store.len() + 1).to_string()),
            );
            metadata.insert(
                "creationTimestamp".to_string(),
                json!(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            );
        }

        store.push((gvr.clone(), created.clone()));
        Ok(created)
    }

    fn cluster_info(&self) -> ClusterInfo {
        ClusterInfo {
            context: self.context.clone(),
            server: "https://mock.cluster.local".to_string(),
            timeout: "30s".to_string(),
        }
    }

    fn current_context(&self) -> String {
        self.context.clone()
    }
}
