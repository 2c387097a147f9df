//! Blockwright Kube - Kubernetes integration for Blockwright
//!
//! This crate provides:
//! - **Cluster client**: Dynamic list/get/create over a group/version/resource, with timeouts
//! - **Promise extraction**: Canonical version selection and schema projection of Kratix Promises
//! - **Building block tools**: List, describe, validate and create, with an idempotency guard
//! - **Resource views**: Sanitized envelopes of building block instances
//! - **Tool router**: Named dispatch for transports
//! - **Mock client**: In-memory cluster for tests

pub mod client;
pub mod error;
pub mod extractor;
pub mod mock;
pub mod resources;
pub mod router;
pub mod tools;

pub use client::{ClusterClient, ClusterSettings, DEFAULT_TIMEOUT, KubeClusterClient};
pub use error::{KubeError, Result};
pub use extractor::{ExtractionError, PromiseExtractor, promise_gvr};
pub use mock::{MockClusterClient, MockFailure, OperationCounts};
pub use resources::{CrdResourceHandler, KnownResource, ResourceContent, ResourceErrorPayload, known_resources};
pub use router::{
    ResourceDefinition, ToolDefinition, ToolOutput, ToolRouter, resource_definitions, tool_definitions,
};
pub use tools::{Arguments, BuildingBlockTools, CreateRequest, ToolError};
