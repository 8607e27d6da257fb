//! Config loader facade: the only entry point callers use.

use crate::config::merge::merge_policy::builder_with_defaults;
use crate::config::sources::{dependency_keys, global_file, workspace_file};
use crate::config::XaheenConfig;
use crate::error::CliError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

/// Loads [`XaheenConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `.xaheen/config.toml`, workspace `.xaheen/{XAHEEN_ENV}.toml`,
    /// `XAHEEN__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<XaheenConfig, CliError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            Environment::with_prefix("XAHEEN")
                .separator("__")
                .try_parsing(true),
        );
        Self::finish(builder)
    }

    /// Load a single file over the defaults, ignoring every other source.
    pub fn load_from_file(path: &Path) -> Result<XaheenConfig, CliError> {
        if !path.is_file() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        dependency_keys::check(path)?;
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    /// Built-in defaults only.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> XaheenConfig {
        XaheenConfig::default()
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<XaheenConfig, CliError> {
        let config: XaheenConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|errors| CliError::ConfigError(errors.join("; ")))?;
        debug!(
            aliases = config.aliases.len(),
            dependencies = config.dependencies.keys().len(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
