//! Tools command - list callable tools; no cluster access

use blockwright_kube::tool_definitions;

use crate::display;
use crate::error::Result;

/// Run the tools command
pub fn run(json: bool) -> Result<()> {
    let tools = tool_definitions();

    if json {
        return display::print_json(&tools);
    }

    display::print_tools(&tools);
    Ok(())
}
