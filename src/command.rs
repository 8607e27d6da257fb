//! Canonical request value handed to route handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named values (arguments or options) attached to a command.
pub type ValueMap = BTreeMap<String, Value>;

/// Handler-facing representation of a resolved invocation.
///
/// Built fresh per invocation. Alias and legacy redirection produce a modified
/// clone via [`CliCommand::redirected`]; the value handed to a handler is never
/// touched again by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliCommand {
    pub domain: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub arguments: ValueMap,
    #[serde(default)]
    pub options: ValueMap,
}

impl CliCommand {
    pub fn new(domain: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            action: action.into(),
            target: None,
            arguments: ValueMap::new(),
            options: ValueMap::new(),
        }
    }

    /// Set the target and mirror it into `arguments["target"]`.
    pub fn with_target(mut self, target: Option<String>) -> Self {
        match &target {
            Some(t) => {
                self.arguments
                    .insert("target".to_string(), Value::String(t.clone()));
            }
            None => {
                self.arguments.remove("target");
            }
        }
        self.target = target;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Copy of this command with `overrides` layered over its options.
    pub fn redirected(&self, overrides: &ValueMap) -> Self {
        let mut copy = self.clone();
        for (key, value) in overrides {
            copy.options.insert(key.clone(), value.clone());
        }
        copy
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Boolean option; absent or non-boolean reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.options
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_dry_run(&self) -> bool {
        self.flag("dryRun")
    }

    /// `"<domain> <action>"` or `"<domain> <action> <target>"`.
    pub fn display_line(&self) -> String {
        match &self.target {
            Some(target) => format!("{} {} {}", self.domain, self.action, target),
            None => format!("{} {}", self.domain, self.action),
        }
    }
}
