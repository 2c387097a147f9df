//! Blockwright Core - Core types for platform building blocks
//!
//! This crate provides the cluster-independent parts of Blockwright:
//! - `nested`: Tri-state access into untyped JSON resource documents
//! - `promise`: Building block summaries, schemas and target resources
//! - `validation`: JSON Schema validation of candidate specs
//! - `sanitize`: Removal of operational fields from returned resources
//! - `response`: Response envelopes handed back to callers

pub mod error;
pub mod nested;
pub mod promise;
pub mod response;
pub mod sanitize;
pub mod validation;

pub use error::{CoreError, Result};
pub use nested::{AccessError, Field};
pub use promise::{BuildingBlockSchema, BuildingBlockSummary, GroupVersionResource, TargetResource};
pub use response::{
    BuildingBlockList, ClusterInfo, CreatedResource, CreationDetails, CreationMetadata,
    ListMetadata, ResourceResponse, ResponseMetadata,
};
pub use sanitize::{OPERATIONAL_METADATA_FIELDS, Sanitizer};
pub use validation::{SchemaValidator, ValidationDetails, ValidationError, ValidationOutcome};
