//! List command - list building blocks available in the cluster

use blockwright_kube::ClusterClient;

use super::Context;
use crate::display;
use crate::error::Result;

/// Run the list command
pub async fn run<C: ClusterClient>(ctx: &Context<C>) -> Result<()> {
    let list = ctx.router.tools().list().await?;

    if ctx.json {
        return display::print_json(&list);
    }

    display::print_building_blocks(&list);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use blockwright_kube::{MockFailure, promise_gvr};

    #[tokio::test]
    async fn test_list() {
        let (client, ctx) = testing::context();
        run(&ctx).await.unwrap();
        assert_eq!(client.operation_counts().lists, 1);
    }

    #[tokio::test]
    async fn test_list_forbidden() {
        let (client, ctx) = testing::context();
        client.fail_list(&promise_gvr(), MockFailure::Forbidden);

        let err = run(&ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("Failed to list platform building blocks"));
    }
}
