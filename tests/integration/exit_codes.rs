//! Binary-level tests: exit codes, stdout/stderr split, logged messages.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary run from an empty workspace with no global configuration.
fn xaheen_cmd(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xaheen").unwrap();
    cmd.current_dir(workspace.path())
        .env("XDG_CONFIG_HOME", workspace.path().join("xdg"))
        .env_remove("XAHEEN_LOG")
        .env_remove("XAHEEN_LOG_FORMAT")
        .env_remove("XAHEEN_LOG_OUTPUT")
        .env_remove("XAHEEN_LOG_MODULES")
        .env_remove("XAHEEN_ENV");
    cmd
}

#[test]
fn test_successful_command_exits_zero() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["project", "create", "demo", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[dry-run] Would run: project create demo",
        ));
}

#[test]
fn test_handler_error_exits_one_with_code() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["i"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("MISSING_TARGET"));
}

#[test]
fn test_handler_failure_logs_error_text() {
    let workspace = TempDir::new().unwrap();
    let config = workspace.path().join("xaheen.toml");
    std::fs::write(&config, "[dependencies.mcp_server]\nport = 70000\n").unwrap();

    xaheen_cmd(&workspace)
        .args(["--config", config.to_str().unwrap(), "mcp", "serve"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HANDLER_INITIALIZATION_FAILED"))
        .stderr(predicate::str::contains("invalid mcp_server.port: 70000"))
        .stderr(predicate::str::contains("Command failed"));
}

#[test]
fn test_unknown_command_exits_one() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["teleport"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("teleport"));
}

#[test]
fn test_missing_required_target_is_usage_error() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["registry", "add"])
        .assert()
        .code(1);
}

#[test]
fn test_help_exits_zero() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("aliases"));
}

#[test]
fn test_legacy_command_runs_route() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["create", "legacy-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running: project create legacy-app"));
}

#[test]
fn test_routes_group_output() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["routes", "legacy", "xaheen", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project create [name]"));
}

#[test]
fn test_verbose_logs_dispatch_to_stderr() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["--verbose", "service", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dispatching command"))
        .stdout(predicate::str::contains("Dispatching command").not());
}

#[test]
fn test_missing_config_file_exits_one() {
    let workspace = TempDir::new().unwrap();
    xaheen_cmd(&workspace)
        .args(["--config", "absent.toml", "project", "create"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CONFIG_ERROR"));
}

#[test]
fn test_config_file_alias_is_available() {
    let workspace = TempDir::new().unwrap();
    let config = workspace.path().join("xaheen.toml");
    std::fs::write(
        &config,
        r#"
[[aliases]]
alias = "pc"
original_command = "project create"
"#,
    )
    .unwrap();

    xaheen_cmd(&workspace)
        .args(["--config", config.to_str().unwrap(), "pc", "from-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running: project create from-config"));
}

#[test]
fn test_workspace_config_is_loaded() {
    let workspace = TempDir::new().unwrap();
    let dir = workspace.path().join(".xaheen");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        r#"
[[aliases]]
alias = "ws"
original_command = "service add"
"#,
    )
    .unwrap();

    xaheen_cmd(&workspace)
        .args(["ws", "payments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running: service add payments"));
}
