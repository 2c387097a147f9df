//! CLI error types with exit code handling
//!
//! Every failure of a command ends up as a [`CliError`], which carries the
//! diagnostic shown on stderr and the process exit code.

use blockwright_kube::{KubeError, ToolError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// A spec did not satisfy its building block schema
    #[error("Validation failed: {message}")]
    #[diagnostic(code(blockwright::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The cluster refused or failed a request
    #[error("{message}")]
    #[diagnostic(code(blockwright::cli::cluster))]
    Cluster {
        message: String,
        reason: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid arguments or options
    #[error("{message}")]
    #[diagnostic(code(blockwright::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid kubeconfig, config file or setting
    #[error("Configuration error: {message}")]
    #[diagnostic(code(blockwright::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(blockwright::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(blockwright::cli::error))]
    Other { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(blockwright::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Io { .. } => exit_codes::ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a passthrough error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

fn cluster_help(reason: &str) -> Option<String> {
    match reason {
        "Forbidden" => Some("Check the RBAC permissions of the current context".to_string()),
        "Unauthorized" => Some("Refresh the credentials of the current context".to_string()),
        "NotFound" => Some("Run `blockwright list` to see available building blocks".to_string()),
        "AlreadyExists" => Some("Choose another resource name".to_string()),
        _ => None,
    }
}

impl From<ToolError> for CliError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::MissingArgument(_)
            | ToolError::InvalidArgumentType { .. }
            | ToolError::MalformedJson { .. } => CliError::usage(err.to_string()),
            ToolError::ValidationFailed(ref outcome) => CliError::validation_with_help(
                format!(
                    "building block '{}' reported {} error(s)",
                    outcome.building_block,
                    outcome.validation_result.errors.len()
                ),
                "Run `blockwright describe` to see the schema",
            ),
            ToolError::SchemaExtraction(_) => CliError::other(err.to_string()),
            _ => {
                let reason = err.reason();
                CliError::Cluster {
                    message: err.to_string(),
                    reason: reason.to_string(),
                    help: cluster_help(reason),
                }
            }
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::InvalidConfig(message) => CliError::config_with_help(
                message,
                "Check --kubeconfig, KUBE_CONFIG_PATH or KUBECONFIG",
            ),
            other => CliError::from(ToolError::from(other)),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("failed to format output: {err}"))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
