//! Integration tests for the blockwright binary
//!
//! Only commands that never reach a cluster are exercised here.

use std::process::{Command, Output};

/// Run blockwright with a clean configuration environment
fn blockwright(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blockwright"))
        .args(args)
        .env_remove("BLOCKWRIGHT_CONFIG")
        .env_remove("KUBE_CONFIG_PATH")
        .env_remove("KUBE_CONTEXT")
        .env_remove("K8S_TIMEOUT")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FORMAT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute blockwright")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod cli {
    use super::*;

    #[test]
    fn test_help() {
        let output = blockwright(&["--help"]);
        assert!(output.status.success());

        let out = stdout(&output);
        for command in ["list", "describe", "validate", "create", "resources", "tools", "call"] {
            assert!(out.contains(command), "help is missing '{command}'");
        }
    }

    #[test]
    fn test_version() {
        let output = blockwright(&["--version"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let output = blockwright(&["list", "--frobnicate"]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let output = blockwright(&["validate", "github-repo"]);
        assert_eq!(output.status.code(), Some(64));
        assert!(stderr(&output).contains("--spec"));
    }
}

mod offline {
    use super::*;
    use blockwright_kube::ResourceDefinition;
    use serde_json::Value;

    #[test]
    fn test_tools_json() {
        let output = blockwright(&["tools", "--json"]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let tools: Value = serde_json::from_str(&stdout(&output)).unwrap();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "list_building_blocks",
                "get_building_block_schema",
                "validate_building_block_spec",
                "create_building_block"
            ]
        );
    }

    #[test]
    fn test_resources_list_json() {
        let output = blockwright(&["resources", "--list", "--json"]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let resources: Vec<ResourceDefinition> = serde_json::from_str(&stdout(&output)).unwrap();
        insta::assert_json_snapshot!(resources, @r#"
        [
          {
            "uri": "k8s://appdeployments",
            "name": "App Deployments",
            "description": "Application deployments managed by the platform",
            "mime_type": "application/json"
          },
          {
            "uri": "k8s://githubapps",
            "name": "GitHub Apps",
            "description": "GitHub applications provisioned by the platform",
            "mime_type": "application/json"
          },
          {
            "uri": "k8s://githubrepos",
            "name": "GitHub Repositories",
            "description": "GitHub repositories provisioned by the platform",
            "mime_type": "application/json"
          }
        ]
        "#);
    }

    #[test]
    fn test_tools_table() {
        let output = blockwright(&["tools"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("create_building_block"));
    }
}

mod configuration {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_timeout() {
        let output = blockwright(&["tools", "--timeout", "soon"]);
        assert_eq!(output.status.code(), Some(78));
        assert!(stderr(&output).contains("invalid timeout"));
    }

    #[test]
    fn test_invalid_timeout_from_env() {
        let output = Command::new(env!("CARGO_BIN_EXE_blockwright"))
            .args(["tools", "--json"])
            .env("K8S_TIMEOUT", "forever")
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(78));
    }

    #[test]
    fn test_missing_kubeconfig() {
        let output = blockwright(&["list", "--kubeconfig", "/nonexistent/kubeconfig"]);
        assert_eq!(output.status.code(), Some(78));
        assert!(stderr(&output).contains("/nonexistent/kubeconfig"));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blockwright.yaml");
        fs::write(&path, "timeout: [not, a, duration]\n").unwrap();

        let output = blockwright(&["tools", "--config", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(78));
    }

    #[test]
    fn test_config_file_applies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blockwright.yaml");
        fs::write(&path, "timeout: 45s\nlogLevel: warn\n").unwrap();

        let output = blockwright(&["tools", "--json", "--config", path.to_str().unwrap()]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
    }
}
