//! Workspace config file source: .xaheen/config.toml and .xaheen/{env}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use crate::config::sources::dependency_keys;
use std::path::{Path, PathBuf};

pub fn workspace_config_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".xaheen")
}

/// Add workspace config files to builder.
/// Precedence: .xaheen/config.toml (base) then .xaheen/{XAHEEN_ENV}.toml (env-specific).
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let config_dir = workspace_config_dir(workspace_root);
    let env_name = std::env::var("XAHEEN_ENV").unwrap_or_else(|_| "development".to_string());

    let mut builder = builder;

    let base_config_path = config_dir.join("config.toml");
    if base_config_path.is_file() {
        dependency_keys::check(&base_config_path)?;
        builder = builder.add_source(File::from(base_config_path.as_path()).required(false));
    }

    let env_config_path = config_dir.join(format!("{}.toml", env_name));
    if env_config_path.is_file() {
        dependency_keys::check(&env_config_path)?;
        builder = builder.add_source(File::from(env_config_path.as_path()).required(false));
    }

    Ok(builder)
}
