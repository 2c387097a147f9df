//! Create command - validate a spec and create a building block instance

use blockwright_kube::tools::parse_spec;
use blockwright_kube::{ClusterClient, CreateRequest, ToolError};

use super::Context;
use crate::display;
use crate::error::Result;
use crate::util;

/// Run the create command
pub async fn run<C: ClusterClient>(
    ctx: &Context<C>,
    building_block: &str,
    resource_name: &str,
    namespace: &str,
    spec: &str,
) -> Result<()> {
    let request = CreateRequest {
        building_block: building_block.to_string(),
        resource_name: resource_name.to_string(),
        namespace: namespace.to_string(),
        spec: parse_spec(&util::read_json_arg(spec)?)?,
    };

    let created = match ctx.router.tools().create(&request).await {
        Ok(created) => created,
        Err(ToolError::ValidationFailed(outcome)) => {
            if ctx.json {
                display::print_json(&outcome)?;
            } else {
                display::print_validation(&outcome);
            }
            return Err(ToolError::ValidationFailed(outcome).into());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.json {
        return display::print_json(&created);
    }

    display::print_created(&created);
    Ok(())
}
