//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout only carries command results.

use clap::ValueEnum;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

/// Filter from `RUST_LOG` when set, else from the configured level
pub fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = match rust_log.map(str::trim) {
        Some(env) if !env.is_empty() => env,
        _ => match level.trim() {
            "warning" => "warn",
            other => other,
        },
    };

    EnvFilter::try_new(directives).map_err(|e| {
        CliError::config_with_help(
            format!("invalid log level '{directives}': {e}"),
            "Use one of trace, debug, info, warn, error",
        )
    })
}

pub fn init(level: &str, format: LogFormat) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(level, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    };

    installed.map_err(|e| CliError::internal(format!("failed to install logger: {e}")))
}
