//! Domain handler contract, dependency bag, and the handler factory.
//!
//! Every domain (project, service, mcp, ...) is served by one [`DomainHandler`].
//! Handlers that need asynchronous setup additionally implement
//! [`Initializable`] and expose it through [`DomainHandler::as_initializable`].

use crate::command::CliCommand;
use crate::error::CliError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod builtin;
pub mod factory;

pub use factory::{HandlerFactory, HandlerStatistics, HandlerValidation};

/// Capability every domain handler provides.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// Domain this handler serves.
    fn domain(&self) -> &str;

    /// Actions this handler accepts.
    fn supported_actions(&self) -> Vec<String>;

    fn can_handle(&self, command: &CliCommand) -> bool {
        command.domain == self.domain()
            && self
                .supported_actions()
                .iter()
                .any(|action| action == &command.action)
    }

    async fn execute(&self, command: CliCommand) -> Result<(), CliError>;

    /// Opt-in asynchronous setup, run by [`HandlerFactory::initialize_handlers`].
    fn as_initializable(&self) -> Option<&dyn Initializable> {
        None
    }
}

/// Handlers that need setup before their first `execute`.
#[async_trait]
pub trait Initializable: Send + Sync {
    async fn initialize(&self, dependencies: &DependencyBag) -> Result<(), CliError>;
}

/// Builds a handler from the merged dependency bag.
pub type HandlerConstructor =
    Arc<dyn Fn(DependencyBag) -> Result<Arc<dyn DomainHandler>, CliError> + Send + Sync>;

/// Wrap a closure as a [`HandlerConstructor`].
pub fn handler_constructor<F>(f: F) -> HandlerConstructor
where
    F: Fn(DependencyBag) -> Result<Arc<dyn DomainHandler>, CliError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Named dependencies handed to handler constructors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyBag {
    entries: BTreeMap<String, Value>,
}

impl DependencyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Shallow merge; keys in `other` win.
    pub fn merge(&mut self, other: &DependencyBag) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// New bag holding `self` overlaid with `other`.
    pub fn merged(&self, other: Option<&DependencyBag>) -> DependencyBag {
        let mut bag = self.clone();
        if let Some(other) = other {
            bag.merge(other);
        }
        bag
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for DependencyBag {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}
