//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace scalar values and merge tables key by key. Arrays
//! (such as `aliases`) are replaced whole by the last source that sets them.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.color", true)
}
