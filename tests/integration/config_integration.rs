//! Integration tests for the configuration system

use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use xaheen::cli::AppContext;
use xaheen::config::{workspace_config_dir, ConfigLoader};
use xaheen::handler::HandlerFactory;

// Serializes tests that touch process environment
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_workspace_file(workspace: &TempDir, name: &str, contents: &str) {
    let dir = workspace_config_dir(workspace.path());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_workspace_env_file_overrides_base() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let workspace = TempDir::new().unwrap();
    write_workspace_file(
        &workspace,
        "config.toml",
        "[logging]\nlevel = \"info\"\n\n[dependencies]\nregion = \"eu\"\n",
    );
    write_workspace_file(&workspace, "staging.toml", "[logging]\nlevel = \"error\"\n");

    std::env::set_var("XAHEEN_ENV", "staging");
    let config = ConfigLoader::load(workspace.path());
    std::env::remove_var("XAHEEN_ENV");

    let config = config.unwrap();
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.dependencies.get_str("region"), Some("eu"));
}

#[test]
fn test_environment_overrides_files() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let workspace = TempDir::new().unwrap();
    write_workspace_file(&workspace, "config.toml", "[logging]\nformat = \"text\"\n");

    std::env::set_var("XAHEEN__LOGGING__FORMAT", "json");
    let config = ConfigLoader::load(workspace.path());
    std::env::remove_var("XAHEEN__LOGGING__FORMAT");

    assert_eq!(config.unwrap().logging.format, "json");
}

#[test]
fn test_invalid_alias_in_config_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let file = workspace.path().join("bad.toml");
    std::fs::write(
        &file,
        "[[aliases]]\nalias = \"p\"\noriginal_command = \"project\"\n",
    )
    .unwrap();
    let err = ConfigLoader::load_from_file(&file).unwrap_err();
    assert_eq!(err.code(), Some("CONFIG_ERROR"));
}

#[test]
fn test_config_feeds_factory_and_aliases() {
    let workspace = TempDir::new().unwrap();
    let file = workspace.path().join("xaheen.toml");
    std::fs::write(
        &file,
        r#"
[dependencies.mcp_server]
port = 9090

[[aliases]]
alias = "dg"
original_command = "docs generate"
description = "Generate docs"
"#,
    )
    .unwrap();
    let config = ConfigLoader::load_from_file(&file).unwrap();

    let factory = Arc::new(HandlerFactory::new());
    factory.set_global_dependencies(config.dependencies.clone());
    assert_eq!(
        factory.global_dependencies().get("mcp_server"),
        Some(&json!({"port": 9090}))
    );

    let parser = AppContext::new(factory)
        .with_aliases(config.aliases)
        .command_parser();
    assert!(parser
        .registered_aliases()
        .iter()
        .any(|registered| registered.alias.alias == "dg"
            && registered.canonical.domain == "docs"));
}

#[test]
fn test_workspace_camel_case_dependency_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let workspace = TempDir::new().unwrap();
    write_workspace_file(&workspace, "config.toml", "[dependencies]\nmcpServer = 1\n");

    let err = ConfigLoader::load(workspace.path()).unwrap_err();
    assert_eq!(err.code(), Some("CONFIG_ERROR"));
    assert!(err.to_string().contains("dependencies.mcpServer"));
}
