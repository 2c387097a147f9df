//! Building block tools
//!
//! Four independent operations over the cluster: list, describe, validate
//! and create. Each call re-reads the Promise it needs; nothing is cached
//! between calls.

mod args;
mod error;

pub use args::{Arguments, BUILDING_BLOCK_NAME, NAMESPACE, RESOURCE_NAME, SPEC, parse_spec};
pub use error::ToolError;

use blockwright_core::nested;
use blockwright_core::{
    BuildingBlockList, BuildingBlockSchema, CreatedResource, CreationDetails, CreationMetadata,
    SchemaValidator, ValidationOutcome,
};
use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

use crate::client::ClusterClient;
use crate::extractor::PromiseExtractor;

/// Everything needed to create one building block instance
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub building_block: String,
    pub resource_name: String,
    pub namespace: String,

    /// Parsed spec, a JSON object
    pub spec: JsonValue,
}

impl CreateRequest {
    /// Check and parse tool arguments
    pub fn from_arguments(args: &Arguments) -> Result<Self, ToolError> {
        let building_block = args::required_str(args, BUILDING_BLOCK_NAME)?;
        let resource_name = args::required_str(args, RESOURCE_NAME)?;
        let raw_spec = args::required_json_str(args, SPEC)?;
        let namespace = args::required_str(args, NAMESPACE)?;
        let spec = parse_spec(raw_spec)?;

        Ok(Self {
            building_block: building_block.to_string(),
            resource_name: resource_name.to_string(),
            namespace: namespace.to_string(),
            spec,
        })
    }

    /// Reject empty names, which would address the wrong API path
    pub fn check_names(&self) -> Result<(), ToolError> {
        for (name, value) in [
            (BUILDING_BLOCK_NAME, &self.building_block),
            (RESOURCE_NAME, &self.resource_name),
            (NAMESPACE, &self.namespace),
        ] {
            if value.trim().is_empty() {
                return Err(ToolError::InvalidArgumentType {
                    name: name.to_string(),
                    expected: args::NON_EMPTY,
                });
            }
        }
        Ok(())
    }
}

/// Building block operations
pub struct BuildingBlockTools<C: ClusterClient> {
    client: Arc<C>,
    extractor: PromiseExtractor<C>,
    validator: SchemaValidator,
}

impl<C: ClusterClient> BuildingBlockTools<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            extractor: PromiseExtractor::new(Arc::clone(&client)),
            validator: SchemaValidator::new(),
            client,
        }
    }

    /// Get the cluster client
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    // ========== Typed operations ==========

    /// All building blocks with listing metadata
    pub async fn list(&self) -> Result<BuildingBlockList, ToolError> {
        let summaries = self
            .extractor
            .list_summaries()
            .await
            .map_err(|e| ToolError::from(e).with_context("Failed to list platform building blocks"))?;

        tracing::info!(count = summaries.len(), "Listed platform building blocks");

        Ok(BuildingBlockList::new(
            summaries,
            self.client.current_context(),
            self.client.cluster_info(),
        ))
    }

    /// Full schema of a building block
    pub async fn describe(&self, building_block: &str) -> Result<BuildingBlockSchema, ToolError> {
        self.extractor.get_schema(building_block).await.map_err(|e| {
            ToolError::from(e).with_context(format!(
                "Failed to get building block schema for '{}'",
                building_block
            ))
        })
    }

    /// Validate a parsed spec against a building block's schema
    pub async fn validate(
        &self,
        building_block: &str,
        spec: &JsonValue,
    ) -> Result<ValidationOutcome, ToolError> {
        let schema = self.describe(building_block).await?;
        let outcome = self.check(&schema, spec)?;

        tracing::info!(
            building_block = %building_block,
            valid = outcome.valid,
            errors = outcome.validation_result.errors.len(),
            "Validated building block spec"
        );

        Ok(outcome)
    }

    /// Validate, then create a new instance of the building block's target
    ///
    /// The cluster is not touched when validation fails. An instance with
    /// the same name is never overwritten.
    pub async fn create(&self, request: &CreateRequest) -> Result<CreatedResource, ToolError> {
        request.check_names()?;
        let schema = self.describe(&request.building_block).await?;

        let outcome = self.check(&schema, &request.spec)?;
        if !outcome.valid {
            tracing::info!(
                building_block = %request.building_block,
                errors = outcome.validation_result.errors.len(),
                "Refusing to create invalid building block"
            );
            return Err(ToolError::ValidationFailed(outcome));
        }

        let target = &schema.target_resource;
        let gvr = target.gvr();
        let namespace = target.is_namespaced().then_some(request.namespace.as_str());
        let already_exists = || {
            let location = match namespace {
                Some(ns) => format!(" in namespace '{ns}'"),
                None => String::new(),
            };
            ToolError::AlreadyExists(format!(
                "Resource '{}' of type '{}' already exists{}",
                request.resource_name, target.kind, location
            ))
        };

        match self.client.get(&gvr, namespace, &request.resource_name).await {
            Ok(_) => return Err(already_exists()),
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                return Err(ToolError::from(e).with_context(format!(
                    "Failed to check for existing resource '{}'",
                    request.resource_name
                )));
            }
        }

        let mut metadata = json!({ "name": request.resource_name });
        if let Some(ns) = namespace {
            metadata["namespace"] = json!(ns);
        }
        let document = json!({
            "apiVersion": target.api_version(),
            "kind": target.kind,
            "metadata": metadata,
            "spec": request.spec,
        });

        let created = match self.client.create(&gvr, namespace, &document).await {
            Ok(created) => created,
            Err(e) if e.is_already_exists() => return Err(already_exists()),
            Err(e) => {
                return Err(ToolError::from(e).with_context(format!(
                    "Failed to create resource '{}' of type '{}'",
                    request.resource_name, target.kind
                )));
            }
        };

        let field = |path: &[&str]| nested::string(&created, path).or("").unwrap_or_default().to_string();
        let confirmation = CreatedResource {
            success: true,
            resource_name: request.resource_name.clone(),
            resource_type: target.kind.clone(),
            building_block: request.building_block.clone(),
            status: "created".to_string(),
            metadata: CreationMetadata {
                created_at: Utc::now(),
                cluster_context: self.client.current_context(),
                resource_version: field(&["metadata", "resourceVersion"]),
            },
            details: CreationDetails {
                api_version: field(&["apiVersion"]),
                kind: field(&["kind"]),
                namespace: field(&["metadata", "namespace"]),
                uid: field(&["metadata", "uid"]),
            },
        };

        tracing::info!(
            resource_name = %confirmation.resource_name,
            resource_type = %confirmation.resource_type,
            building_block = %confirmation.building_block,
            namespace = %request.namespace,
            uid = %confirmation.details.uid,
            "Created building block resource"
        );

        Ok(confirmation)
    }

    /// Validate `spec` as the `spec` field of a target resource
    fn check(&self, schema: &BuildingBlockSchema, spec: &JsonValue) -> Result<ValidationOutcome, ToolError> {
        let instance = json!({ "spec": spec });
        let details = self
            .validator
            .validate(&schema.openapi_schema, &instance)
            .map_err(|e| ToolError::from(e).with_context("Failed to validate spec"))?;

        Ok(ValidationOutcome::new(&schema.name, details))
    }

    // ========== Argument handlers ==========

    pub async fn handle_list(&self, _args: &Arguments) -> Result<BuildingBlockList, ToolError> {
        tracing::info!("Handling list_building_blocks tool call");
        self.list().await
    }

    pub async fn handle_describe(&self, args: &Arguments) -> Result<BuildingBlockSchema, ToolError> {
        tracing::info!("Handling get_building_block_schema tool call");
        let building_block = args::required_str(args, BUILDING_BLOCK_NAME)?;
        self.describe(building_block).await
    }

    pub async fn handle_validate(&self, args: &Arguments) -> Result<ValidationOutcome, ToolError> {
        tracing::info!("Handling validate_building_block_spec tool call");
        let building_block = args::required_str(args, BUILDING_BLOCK_NAME)?;
        let spec = parse_spec(args::required_json_str(args, SPEC)?)?;
        self.validate(building_block, &spec).await
    }

    pub async fn handle_create(&self, args: &Arguments) -> Result<CreatedResource, ToolError> {
        tracing::info!("Handling create_building_block tool call");
        let request = CreateRequest::from_arguments(args)?;
        self.create(&request).await
    }
}
