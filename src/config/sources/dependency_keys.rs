//! Key check for the `[dependencies]` table of TOML config files.
//!
//! The `config` crate folds every key to lowercase while loading, so a
//! `cliName` entry would reach the handler factory as `cliname`. Files are
//! checked before they are added to the builder.

use config::ConfigError;
use std::path::Path;

/// Reject `[dependencies]` keys (at any depth) that contain uppercase letters.
///
/// Files that are not TOML, cannot be read or do not parse are left to the
/// `config` loader to report.
pub fn check(path: &Path) -> Result<(), ConfigError> {
    let is_toml = path
        .extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("toml"));
    if !is_toml {
        return Ok(());
    }
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Ok(());
    };
    let Ok(table) = contents.parse::<toml::Table>() else {
        return Ok(());
    };
    let Some(toml::Value::Table(dependencies)) = table.get("dependencies") else {
        return Ok(());
    };

    let mut offending = Vec::new();
    collect_uppercase_keys(dependencies, "dependencies", &mut offending);
    if offending.is_empty() {
        return Ok(());
    }
    Err(ConfigError::Message(format!(
        "{}: dependency keys must be lowercase (use snake_case), found: {}",
        path.display(),
        offending.join(", ")
    )))
}

fn collect_uppercase_keys(table: &toml::Table, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in table {
        let path = format!("{}.{}", prefix, key);
        if key.chars().any(char::is_uppercase) {
            out.push(path.clone());
        }
        if let toml::Value::Table(nested) = value {
            collect_uppercase_keys(nested, &path, out);
        }
    }
}
