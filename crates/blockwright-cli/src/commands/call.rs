//! Call command - invoke a tool by name with JSON arguments

use blockwright_kube::{Arguments, ClusterClient};
use serde_json::Value as JsonValue;

use super::Context;
use crate::error::{CliError, Result};
use crate::util;

/// Parse `--args` into a tool argument map
pub fn parse_arguments(raw: Option<&str>) -> Result<Arguments> {
    let Some(raw) = raw else {
        return Ok(Arguments::new());
    };

    let text = util::read_json_arg(raw)?;
    match serde_json::from_str::<JsonValue>(&text) {
        Ok(JsonValue::Object(args)) => Ok(args),
        Ok(_) => Err(CliError::usage("--args must be a JSON object")),
        Err(e) => Err(CliError::usage(format!("invalid JSON in --args: {e}"))),
    }
}

/// Run the call command
///
/// The tool's text answer is printed to stdout, failed or not.
pub async fn run<C: ClusterClient>(ctx: &Context<C>, tool: &str, args: Option<&str>) -> Result<()> {
    let args = parse_arguments(args)?;
    let output = ctx.router.call_tool(tool, &args).await?;

    println!("{}", output.text);

    if output.is_error {
        Err(CliError::other(format!("tool '{tool}' reported an error")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments(None).unwrap().is_empty());

        let args = parse_arguments(Some(r#"{"building_block_name": "github-repo"}"#)).unwrap();
        assert_eq!(args["building_block_name"], "github-repo");

        assert_eq!(parse_arguments(Some("[1]")).unwrap_err().exit_code(), 64);
        assert_eq!(parse_arguments(Some("{")).unwrap_err().exit_code(), 64);
    }

    #[tokio::test]
    async fn test_call_describe() {
        let (_client, ctx) = testing::context();
        run(
            &ctx,
            "get_building_block_schema",
            Some(r#"{"building_block_name": "github-repo"}"#),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_call_reports_tool_error() {
        let (client, ctx) = testing::context();
        let err = run(&ctx, "validate_building_block_spec", Some("{}"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(client.operation_counts().total(), 0);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let (_client, ctx) = testing::context();
        let err = run(&ctx, "delete_everything", None).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
