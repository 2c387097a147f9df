//! Validate command - check a spec without creating anything

use blockwright_kube::ClusterClient;
use blockwright_kube::tools::parse_spec;

use super::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::util;

/// Run the validate command
///
/// The outcome is printed either way; an invalid spec exits with the
/// validation code.
pub async fn run<C: ClusterClient>(ctx: &Context<C>, name: &str, spec: &str) -> Result<()> {
    let spec = parse_spec(&util::read_json_arg(spec)?)?;
    let outcome = ctx.router.tools().validate(name, &spec).await?;

    if ctx.json {
        display::print_json(&outcome)?;
    } else {
        display::print_validation(&outcome);
    }

    if outcome.valid {
        Ok(())
    } else {
        Err(CliError::validation_with_help(
            format!(
                "spec does not match the schema of '{}' ({} error(s))",
                name,
                outcome.validation_result.errors.len()
            ),
            format!("Run `blockwright describe {name}` to see the schema"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    #[tokio::test]
    async fn test_valid_spec() {
        let (_client, ctx) = testing::context();
        run(&ctx, "github-repo", r#"{"owner": "platform-team"}"#)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_spec() {
        let (_client, ctx) = testing::context();
        let err = run(&ctx, "github-repo", "{}").await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_malformed_spec_skips_cluster() {
        let (client, ctx) = testing::context();
        let err = run(&ctx, "github-repo", "{owner").await.unwrap_err();
        assert_eq!(err.exit_code(), 64);
        assert_eq!(client.operation_counts().total(), 0);
    }
}
