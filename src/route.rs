//! Routes: the binding from an invocable pattern to a `{domain, action, handler}`.
//!
//! A pattern is a whitespace separated token list. Tokens wrapped in `<...>`
//! are required placeholders, `[...]` optional placeholders, everything else
//! is a verb. `project create [name]` is addressed as `xaheen project create`
//! with an optional positional target.

use crate::command::CliCommand;
use crate::error::CliError;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

pub mod legacy;
pub mod registry;
pub mod table;

pub use legacy::{LegacyCli, LegacyNames};
pub use registry::{RouteRegistry, RouteStatistics, RouteValidation};

/// Callable bound to a route.
pub type RouteHandler =
    Arc<dyn Fn(CliCommand) -> BoxFuture<'static, Result<(), CliError>> + Send + Sync>;

/// Wrap an async closure as a [`RouteHandler`].
pub fn route_handler<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(CliCommand) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), CliError>> + Send + 'static,
{
    Arc::new(move |command| Box::pin(f(command)))
}

/// Immutable description of one invocable pattern.
#[derive(Clone)]
pub struct Route {
    pub pattern: String,
    pub domain: String,
    pub action: String,
    pub handler: RouteHandler,
    pub legacy: Option<LegacyNames>,
    /// One-line description shown in help output.
    pub summary: Option<String>,
}

impl Route {
    pub fn new(
        pattern: impl Into<String>,
        domain: impl Into<String>,
        action: impl Into<String>,
        handler: RouteHandler,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            domain: domain.into(),
            action: action.into(),
            handler,
            legacy: None,
            summary: None,
        }
    }

    pub fn with_legacy(mut self, legacy: LegacyNames) -> Self {
        self.legacy = Some(legacy);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn shape(&self) -> PatternShape {
        PatternShape::parse(&self.pattern)
    }

    /// True when this route answers to `verb` under `cli`.
    pub fn matches_legacy(&self, cli: LegacyCli, verb: &str) -> bool {
        self.legacy
            .as_ref()
            .map(|legacy| legacy.verbs(cli).iter().any(|v| v == verb))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("domain", &self.domain)
            .field("action", &self.action)
            .field("legacy", &self.legacy)
            .finish_non_exhaustive()
    }
}

/// Placeholder token in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub required: bool,
}

/// Verbs and placeholders of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternShape {
    pub verbs: Vec<String>,
    pub placeholders: Vec<Placeholder>,
}

impl PatternShape {
    pub fn parse(pattern: &str) -> Self {
        let mut shape = PatternShape::default();
        for token in pattern.split_whitespace() {
            if let Some(name) = strip_wrapped(token, '<', '>') {
                shape.placeholders.push(Placeholder {
                    name: name.to_string(),
                    required: true,
                });
            } else if let Some(name) = strip_wrapped(token, '[', ']') {
                shape.placeholders.push(Placeholder {
                    name: name.trim_end_matches("...").to_string(),
                    required: false,
                });
            } else {
                shape.verbs.push(token.to_string());
            }
        }
        shape
    }

    /// Top-level command name.
    pub fn top_level(&self) -> Option<&str> {
        self.verbs.first().map(String::as_str)
    }

    /// Second verb, addressed as a sub-command of the top-level one.
    pub fn sub_verb(&self) -> Option<&str> {
        self.verbs.get(1).map(String::as_str)
    }

    /// Placeholder used as the positional target.
    pub fn target(&self) -> Option<&Placeholder> {
        self.placeholders.first()
    }
}

/// True when the pattern carries at least one placeholder marker.
pub fn has_placeholder_markers(pattern: &str) -> bool {
    pattern.contains('<') || pattern.contains('[')
}

fn strip_wrapped(token: &str, open: char, close: char) -> Option<&str> {
    token
        .strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .filter(|name| !name.is_empty())
}
