//! Configuration Management
//!
//! Layered loading through the `config` crate: defaults, the user's global
//! file, workspace files, then `XAHEEN__*` environment variables. Everything
//! is optional; a missing file is not an error.

use crate::alias::Alias;
use crate::handler::DependencyBag;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_dir;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XaheenConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seeds the handler factory's global dependencies
    #[serde(default)]
    pub dependencies: DependencyBag,

    /// Aliases layered over the built-in set
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl XaheenConfig {
    /// Check the configuration; returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(format!("Invalid log level: {}", self.logging.level));
        }

        let mut seen = HashSet::new();
        for alias in &self.aliases {
            if alias.alias.trim().is_empty() {
                errors.push("Alias token cannot be empty".to_string());
                continue;
            }
            if !seen.insert(alias.alias.as_str()) {
                errors.push(format!("Alias '{}' is defined more than once", alias.alias));
            }
            if alias.original_command.split_whitespace().count() < 2 {
                errors.push(format!(
                    "Alias '{}' must expand to '<domain> <action>', got '{}'",
                    alias.alias, alias.original_command
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
