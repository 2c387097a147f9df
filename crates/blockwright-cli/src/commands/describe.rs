//! Describe command - show a building block's schema

use blockwright_kube::ClusterClient;

use super::Context;
use crate::display;
use crate::error::Result;

/// Run the describe command
pub async fn run<C: ClusterClient>(ctx: &Context<C>, name: &str) -> Result<()> {
    let schema = ctx.router.tools().describe(name).await?;

    if ctx.json {
        return display::print_json(&schema);
    }

    display::print_schema(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    #[tokio::test]
    async fn test_describe_unknown() {
        let (_client, ctx) = testing::context();
        let err = run(&ctx, "postgres").await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(
            err.to_string()
                .starts_with("Failed to get building block schema for 'postgres'")
        );
    }
}
