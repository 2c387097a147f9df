//! Exit codes of the `blockwright` binary
//!
//! Usage and configuration codes follow sysexits.h.

/// Operation completed without errors
pub const SUCCESS: i32 = 0;

/// Unspecified failure
pub const ERROR: i32 = 1;

/// A spec did not satisfy its building block schema
pub const VALIDATION_ERROR: i32 = 2;

/// The cluster refused or failed a request
pub const CLUSTER_ERROR: i32 = 3;

/// Invalid arguments or options
pub const USAGE_ERROR: i32 = 64;

/// Invalid configuration (kubeconfig, config file, timeout)
pub const CONFIG_ERROR: i32 = 78;
