//! Display formatting for CLI output
//!
//! Human-readable tables and summaries. JSON output goes through
//! [`print_json`] instead.

use blockwright_core::nested;
use blockwright_core::{
    BuildingBlockList, BuildingBlockSchema, CreatedResource, ResourceResponse, ValidationOutcome,
};
use blockwright_kube::{ResourceDefinition, ResourceErrorPayload, ToolDefinition};
use console::style;
use serde::Serialize;

use crate::error::Result;
use crate::util::truncate;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_building_blocks(list: &BuildingBlockList) {
    if list.building_blocks.is_empty() {
        println!(
            "No building blocks found in context {}",
            style(&list.metadata.cluster_context).cyan()
        );
        return;
    }

    println!(
        "{:<24} {:<10} {:<28} {}",
        style("NAME").bold(),
        style("VERSION").bold(),
        style("KIND").bold(),
        style("DESCRIPTION").bold()
    );

    for block in &list.building_blocks {
        let target = &block.target_resource;
        let kind = if target.kind.is_empty() {
            style("-".to_string()).dim()
        } else {
            style(format!("{} ({})", target.kind, target.group))
        };
        println!(
            "{:<24} {:<10} {:<28} {}",
            block.name,
            block.version,
            kind,
            truncate(&block.description, 60)
        );
    }

    println!();
    println!(
        "{} building block(s) in context {}",
        list.metadata.total_count,
        style(&list.metadata.cluster_context).cyan()
    );
}

pub fn print_schema(schema: &BuildingBlockSchema) -> Result<()> {
    let target = &schema.target_resource;

    println!("{} {}", style("Building block:").bold(), schema.name);
    println!("{} {}", style("Version:").bold(), schema.version);
    println!(
        "{} {} {} ({})",
        style("Target:").bold(),
        target.api_version(),
        target.kind,
        target.scope
    );
    println!("{} {}", style("Resource:").bold(), target.resource);
    println!();
    println!("{}", style("Schema:").bold());
    println!("{}", serde_json::to_string_pretty(&schema.openapi_schema)?);

    Ok(())
}

pub fn print_validation(outcome: &ValidationOutcome) {
    if outcome.valid {
        println!(
            "{} Spec is valid for building block {}",
            style("✓").green().bold(),
            style(&outcome.building_block).cyan()
        );
        return;
    }

    let errors = &outcome.validation_result.errors;
    println!(
        "{} Spec is invalid for building block {} ({} error(s))",
        style("✗").red().bold(),
        style(&outcome.building_block).cyan(),
        errors.len()
    );
    for error in errors {
        println!("  {} {}", style(&error.field).yellow(), error.message);
    }
}

pub fn print_created(created: &CreatedResource) {
    let details = &created.details;

    println!(
        "{} Created {} {}",
        style("✓").green().bold(),
        created.resource_type,
        style(&created.resource_name).cyan()
    );
    if !details.namespace.is_empty() {
        println!("  {} {}", style("namespace:").dim(), details.namespace);
    }
    println!("  {} {}", style("apiVersion:").dim(), details.api_version);
    println!("  {} {}", style("uid:").dim(), details.uid);
    println!(
        "  {} {}",
        style("resourceVersion:").dim(),
        created.metadata.resource_version
    );
    println!(
        "  {} {}",
        style("context:").dim(),
        created.metadata.cluster_context
    );
}

pub fn print_tools(tools: &[ToolDefinition]) {
    println!(
        "{:<32} {:<56} {}",
        style("TOOL").bold(),
        style("REQUIRED ARGUMENTS").bold(),
        style("DESCRIPTION").bold()
    );
    for tool in tools {
        let required = tool.required_arguments();
        let required = if required.is_empty() {
            "-".to_string()
        } else {
            required.join(", ")
        };
        println!(
            "{:<32} {:<56} {}",
            tool.name,
            required,
            truncate(&tool.description, 60)
        );
    }
}

pub fn print_resource_definitions(resources: &[ResourceDefinition]) {
    println!(
        "{:<24} {:<24} {}",
        style("URI").bold(),
        style("NAME").bold(),
        style("DESCRIPTION").bold()
    );
    for resource in resources {
        println!(
            "{:<24} {:<24} {}",
            resource.uri, resource.name, resource.description
        );
    }
}

pub fn print_resource_envelope(uri: &str, envelope: &ResourceResponse) {
    println!(
        "{} {} ({} item(s), context {})",
        style(uri).bold(),
        envelope.kind,
        envelope.metadata.count,
        style(&envelope.metadata.cluster_info.context).cyan()
    );

    if envelope.items.is_empty() {
        return;
    }

    println!(
        "  {:<32} {}",
        style("NAME").bold(),
        style("NAMESPACE").bold()
    );
    for item in &envelope.items {
        let name = nested::string(item, &["metadata", "name"])
            .or("-")
            .unwrap_or("-");
        let namespace = nested::string(item, &["metadata", "namespace"])
            .or("-")
            .unwrap_or("-");
        println!("  {:<32} {}", name, namespace);
    }
}

pub fn print_resource_error(uri: &str, payload: &ResourceErrorPayload) {
    println!(
        "{} {} {} ({})",
        style("✗").red().bold(),
        style(uri).bold(),
        payload.error,
        style(&payload.reason).yellow()
    );
}
