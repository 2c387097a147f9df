//! Named dispatch of tools and resources
//!
//! [`ToolRouter`] is the boundary a transport talks to: tools are invoked by
//! name with JSON arguments and always answer with text, resources are read
//! by URI.

use blockwright_core::Sanitizer;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

use crate::client::ClusterClient;
use crate::resources::{CrdResourceHandler, MIME_TYPE, ResourceContent, known_resources};
use crate::tools::{
    Arguments, BUILDING_BLOCK_NAME, BuildingBlockTools, NAMESPACE, RESOURCE_NAME, SPEC, ToolError,
};

pub const LIST_BUILDING_BLOCKS: &str = "list_building_blocks";
pub const GET_BUILDING_BLOCK_SCHEMA: &str = "get_building_block_schema";
pub const VALIDATE_BUILDING_BLOCK_SPEC: &str = "validate_building_block_spec";
pub const CREATE_BUILDING_BLOCK: &str = "create_building_block";

/// A callable tool and its input schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
}

impl ToolDefinition {
    /// Names of the arguments a call must supply
    pub fn required_arguments(&self) -> Vec<&str> {
        self.input_schema["required"]
            .as_array()
            .map(|required| required.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default()
    }
}

/// A readable resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Text answer of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub is_error: bool,
    pub text: String,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text: text.into(),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, ToolError>) -> Self {
        match result {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolOutput::success(text),
                Err(e) => ToolOutput::error(format!("Failed to format response: {e}")),
            },
            Err(ToolError::ValidationFailed(outcome)) => match serde_json::to_string_pretty(&outcome) {
                Ok(text) => ToolOutput::error(format!("Validation failed for building block spec:\n{text}")),
                Err(e) => ToolOutput::error(format!("Failed to format validation response: {e}")),
            },
            Err(e) => ToolOutput::error(e.to_string()),
        }
    }
}

fn string_property(description: &str) -> JsonValue {
    json!({ "type": "string", "description": description })
}

/// Definitions of every tool the router serves
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: LIST_BUILDING_BLOCKS.to_string(),
            description: "List all available platform building blocks with their versions, descriptions and target resource types".to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: GET_BUILDING_BLOCK_SCHEMA.to_string(),
            description: "Get the complete OpenAPI schema of a building block".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    BUILDING_BLOCK_NAME: string_property("Name of the building block"),
                },
                "required": [BUILDING_BLOCK_NAME],
            }),
        },
        ToolDefinition {
            name: VALIDATE_BUILDING_BLOCK_SPEC.to_string(),
            description: "Validate a spec against a building block's schema without creating anything".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    BUILDING_BLOCK_NAME: string_property("Name of the building block"),
                    SPEC: string_property("Spec to validate, as a JSON object string"),
                },
                "required": [BUILDING_BLOCK_NAME, SPEC],
            }),
        },
        ToolDefinition {
            name: CREATE_BUILDING_BLOCK.to_string(),
            description: "Validate a spec and create a new instance of a building block".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    BUILDING_BLOCK_NAME: string_property("Name of the building block"),
                    RESOURCE_NAME: string_property("Name of the resource to create"),
                    SPEC: string_property("Spec of the new resource, as a JSON object string"),
                    NAMESPACE: string_property("Namespace to create the resource in"),
                },
                "required": [BUILDING_BLOCK_NAME, RESOURCE_NAME, SPEC, NAMESPACE],
            }),
        },
    ]
}

/// Definitions of every resource the router serves
pub fn resource_definitions() -> Vec<ResourceDefinition> {
    known_resources()
        .into_iter()
        .map(|r| ResourceDefinition {
            uri: r.uri.to_string(),
            name: r.title.to_string(),
            description: r.description.to_string(),
            mime_type: MIME_TYPE.to_string(),
        })
        .collect()
}

/// Dispatches tool calls and resource reads
pub struct ToolRouter<C: ClusterClient> {
    tools: BuildingBlockTools<C>,
    resources: CrdResourceHandler<C>,
}

impl<C: ClusterClient> ToolRouter<C> {
    pub fn new(client: Arc<C>, sanitizer: Sanitizer) -> Self {
        Self {
            tools: BuildingBlockTools::new(Arc::clone(&client)),
            resources: CrdResourceHandler::with_sanitizer(client, sanitizer),
        }
    }

    pub fn tools(&self) -> &BuildingBlockTools<C> {
        &self.tools
    }

    pub fn resources(&self) -> &CrdResourceHandler<C> {
        &self.resources
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        resource_definitions()
    }

    /// Invoke a tool by name
    ///
    /// Failures of the tool itself are reported in the output; only an
    /// unknown tool name is an error.
    pub async fn call_tool(&self, name: &str, args: &Arguments) -> Result<ToolOutput, ToolError> {
        tracing::debug!(tool = %name, "Calling tool");

        let output = match name {
            LIST_BUILDING_BLOCKS => ToolOutput::from_result(self.tools.handle_list(args).await),
            GET_BUILDING_BLOCK_SCHEMA => ToolOutput::from_result(self.tools.handle_describe(args).await),
            VALIDATE_BUILDING_BLOCK_SPEC => ToolOutput::from_result(self.tools.handle_validate(args).await),
            CREATE_BUILDING_BLOCK => ToolOutput::from_result(self.tools.handle_create(args).await),
            _ => return Err(ToolError::NotFound(format!("Unknown tool '{name}'"))),
        };

        if output.is_error {
            tracing::warn!(tool = %name, error = %output.text, "Tool call failed");
        }

        Ok(output)
    }

    /// Read a resource by URI
    pub async fn read_resource(&self, uri: &str) -> Result<ResourceContent, ToolError> {
        self.resources.read_uri(uri).await
    }
}
