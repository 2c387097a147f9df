//! Settings resolution
//!
//! Each setting is taken from the first layer that provides it: command
//! line flag, environment variable, YAML config file, built-in default.
//! Flags and environment variables are merged by clap before we get here.

use blockwright_core::Sanitizer;
use blockwright_kube::{ClusterSettings, DEFAULT_TIMEOUT};
use clap::Args;
use humantime_serde::re::humantime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CliError, Result};
use crate::logging::LogFormat;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML config file
    #[arg(long, global = true, env = "BLOCKWRIGHT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Kubeconfig file (default discovery when unset)
    #[arg(long, global = true, env = "KUBE_CONFIG_PATH", value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true, env = "KUBE_CONTEXT")]
    pub context: Option<String>,

    /// Per-request timeout (e.g. 30s, 1m)
    #[arg(long, global = true, env = "K8S_TIMEOUT")]
    pub timeout: Option<String>,

    /// Log level or filter directive
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Contents of the optional config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,

    #[serde(default)]
    pub context: Option<String>,

    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub log_format: Option<LogFormat>,

    /// Extra dotted paths stripped from every resource
    #[serde(default)]
    pub sensitive_fields: Vec<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read config file '{}': {}", path.display(), e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            CliError::config(format!("invalid config file '{}': {}", path.display(), e))
        })
    }
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub log_level: String,
    pub log_format: LogFormat,
    pub sensitive_fields: Vec<String>,
    pub json: bool,
}

impl Settings {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let timeout = match &args.timeout {
            Some(raw) => parse_timeout(raw)?,
            None => file.timeout.unwrap_or(DEFAULT_TIMEOUT),
        };
        if timeout.is_zero() {
            return Err(CliError::config("timeout must be greater than zero"));
        }

        Ok(Self {
            cluster: ClusterSettings {
                kubeconfig: args.kubeconfig.clone().or(file.kubeconfig),
                context: args.context.clone().or(file.context),
                timeout,
            },
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: args.log_format.or(file.log_format).unwrap_or_default(),
            sensitive_fields: file.sensitive_fields,
            json: args.json,
        })
    }

    pub fn sanitizer(&self) -> Sanitizer {
        Sanitizer::new().with_extra_fields(&self.sensitive_fields)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim()).map_err(|e| {
        CliError::config_with_help(
            format!("invalid timeout '{raw}': {e}"),
            "Use a duration such as 30s or 2m",
        )
    })
}
