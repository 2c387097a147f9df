//! Resources command - read building block instances by URI

use blockwright_kube::{ClusterClient, ResourceContent, resource_definitions};
use serde::Serialize;

use super::Context;
use crate::display;
use crate::error::{CliError, Result};

#[derive(Serialize)]
struct ResourceRead<'a> {
    uri: &'a str,
    content: &'a ResourceContent,
}

/// List the readable resource URIs; no cluster access
pub fn list(json: bool) -> Result<()> {
    let resources = resource_definitions();

    if json {
        return display::print_json(&resources);
    }

    display::print_resource_definitions(&resources);
    Ok(())
}

/// Read one resource URI, or every known URI when `uri` is `None`
///
/// Read failures are printed as payloads; the command then exits with the
/// cluster error code.
pub async fn run<C: ClusterClient>(ctx: &Context<C>, uri: Option<&str>) -> Result<()> {
    let contents = match uri {
        Some(uri) => vec![(uri.to_string(), ctx.router.read_resource(uri).await?)],
        None => ctx
            .router
            .resources()
            .read_all()
            .await
            .into_iter()
            .map(|(resource, content)| (resource.uri.to_string(), content))
            .collect(),
    };

    if ctx.json {
        match contents.as_slice() {
            [(_, content)] => display::print_json(content)?,
            _ => {
                let reads: Vec<ResourceRead<'_>> = contents
                    .iter()
                    .map(|(uri, content)| ResourceRead { uri, content })
                    .collect();
                display::print_json(&reads)?;
            }
        }
    } else {
        for (uri, content) in &contents {
            match content {
                ResourceContent::Envelope(envelope) => display::print_resource_envelope(uri, envelope),
                ResourceContent::Error(payload) => display::print_resource_error(uri, payload),
            }
        }
    }

    let failed: Vec<&str> = contents
        .iter()
        .filter(|(_, content)| content.is_error())
        .map(|(uri, _)| uri.as_str())
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::Cluster {
            message: format!("failed to read {}", failed.join(", ")),
            reason: "ResourceReadError".to_string(),
            help: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use blockwright_kube::MockFailure;

    #[tokio::test]
    async fn test_read_all() {
        let (client, ctx) = testing::context();
        run(&ctx, None).await.unwrap();
        assert_eq!(client.operation_counts().lists, 3);
    }

    #[tokio::test]
    async fn test_unknown_uri() {
        let (client, ctx) = testing::context();
        let err = run(&ctx, Some("k8s://postgres")).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(client.operation_counts().total(), 0);
    }

    #[tokio::test]
    async fn test_read_failure() {
        let (client, ctx) = testing::context();
        let apps = blockwright_kube::known_resources()[0].gvr.clone();
        client.fail_list(&apps, MockFailure::Unauthorized);

        let err = run(&ctx, Some("k8s://appdeployments")).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "failed to read k8s://appdeployments");
    }
}
