//! Handler factory: per-domain constructor registrations and a lazy instance cache.
//!
//! Registering a domain is cheap and happens eagerly at startup; constructing
//! its handler is deferred until the first dispatch to that domain.

use crate::command::CliCommand;
use crate::error::CliError;
use crate::handler::{DependencyBag, DomainHandler, HandlerConstructor};
use futures::future::try_join_all;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Handler factory
///
/// Shared as `Arc<HandlerFactory>` by route handlers; all state sits behind
/// `parking_lot` locks that are never held across an await point.
#[derive(Default)]
pub struct HandlerFactory {
    constructors: RwLock<HashMap<String, HandlerConstructor>>,
    cache: Mutex<HashMap<String, Arc<dyn DomainHandler>>>,
    initialized: Mutex<HashSet<String>>,
    global_dependencies: RwLock<DependencyBag>,
}

/// Outcome of [`HandlerFactory::validate_handlers`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct HandlerValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandlerStatistics {
    pub registered_domains: usize,
    pub cached_instances: usize,
    pub domains: Vec<String>,
    pub global_dependency_keys: Vec<String>,
}

impl HandlerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `dependencies` into the process-wide bag (additive).
    pub fn set_global_dependencies(&self, dependencies: DependencyBag) {
        self.global_dependencies.write().merge(&dependencies);
    }

    pub fn global_dependencies(&self) -> DependencyBag {
        self.global_dependencies.read().clone()
    }

    /// Record the constructor for `domain`, evicting any cached instance.
    pub fn register_handler(&self, domain: impl Into<String>, constructor: HandlerConstructor) {
        let domain = domain.into();
        self.initialized.lock().remove(&domain);
        if self.cache.lock().remove(&domain).is_some() {
            debug!(domain = %domain, "Evicted cached handler on re-registration");
        }
        self.constructors.write().insert(domain, constructor);
    }

    /// Cached handler for `domain`, constructing it on first use.
    pub fn create_handler(
        &self,
        domain: &str,
        extra_dependencies: Option<&DependencyBag>,
    ) -> Result<Arc<dyn DomainHandler>, CliError> {
        let mut cache = self.cache.lock();
        if let Some(handler) = cache.get(domain) {
            return Ok(Arc::clone(handler));
        }

        let constructor = self
            .constructors
            .read()
            .get(domain)
            .cloned()
            .ok_or_else(|| CliError::HandlerConstruction {
                domain: domain.to_string(),
                source: Box::new(CliError::HandlerNotRegistered(domain.to_string())),
            })?;

        let dependencies = self.global_dependencies.read().merged(extra_dependencies);
        let handler = constructor(dependencies).map_err(|e| CliError::HandlerConstruction {
            domain: domain.to_string(),
            source: Box::new(e),
        })?;

        debug!(domain = %domain, "Handler constructed");
        cache.insert(domain.to_string(), Arc::clone(&handler));
        Ok(handler)
    }

    pub fn has_handler(&self, domain: &str) -> bool {
        self.constructors.read().contains_key(domain)
    }

    /// Cached instance for `domain`, without constructing one.
    pub fn get_handler(&self, domain: &str) -> Option<Arc<dyn DomainHandler>> {
        self.cache.lock().get(domain).cloned()
    }

    pub fn registered_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.constructors.read().keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Run `initialize` on every cached handler that opts in, concurrently.
    ///
    /// Each cached instance is initialized once; later calls skip it until it
    /// is evicted. The first failure fails the whole batch.
    pub async fn initialize_handlers(&self) -> Result<(), CliError> {
        let handlers: Vec<(String, Arc<dyn DomainHandler>)> = {
            let initialized = self.initialized.lock();
            self.cache
                .lock()
                .iter()
                .filter(|(domain, _)| !initialized.contains(*domain))
                .map(|(domain, handler)| (domain.clone(), Arc::clone(handler)))
                .collect()
        };
        let dependencies = self.global_dependencies();
        let dependencies = &dependencies;
        let initialized = &self.initialized;

        let pending = handlers.iter().filter_map(move |(domain, handler)| {
            let initializable = handler.as_initializable()?;
            Some(async move {
                debug!(domain = %domain, "Initializing handler");
                initializable.initialize(dependencies).await.map_err(|e| {
                    error!(domain = %domain, "Handler initialization failed: {}", e);
                    e
                })?;
                initialized.lock().insert(domain.clone());
                Ok::<(), CliError>(())
            })
        });

        try_join_all(pending).await?;
        Ok(())
    }

    /// Evict every cached instance.
    pub fn clear_cache(&self) {
        self.initialized.lock().clear();
        self.cache.lock().clear();
    }

    /// Trial-construct every registered handler and check its contract.
    ///
    /// Uses an empty dependency bag and never touches the instance cache.
    pub fn validate_handlers(&self) -> HandlerValidation {
        let constructors: Vec<(String, HandlerConstructor)> = self
            .constructors
            .read()
            .iter()
            .map(|(domain, constructor)| (domain.clone(), Arc::clone(constructor)))
            .collect();

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (domain, constructor) in constructors {
            let handler = match constructor(DependencyBag::new()) {
                Ok(handler) => handler,
                Err(e) => {
                    errors.push(format!("Handler for '{}' failed to construct: {}", domain, e));
                    continue;
                }
            };

            if handler.domain() != domain {
                warnings.push(format!(
                    "Handler registered for '{}' reports domain '{}'",
                    domain,
                    handler.domain()
                ));
            }

            let actions = handler.supported_actions();
            if actions.is_empty() {
                errors.push(format!("Handler for '{}' exposes no actions", domain));
            }
            for action in &actions {
                let probe = CliCommand::new(handler.domain(), action.clone());
                if !handler.can_handle(&probe) {
                    errors.push(format!(
                        "Handler for '{}' lists action '{}' but cannot handle it",
                        domain, action
                    ));
                }
            }
        }

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "Handler validation produced warnings");
        }

        HandlerValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn get_statistics(&self) -> HandlerStatistics {
        let domains = self.registered_domains();
        HandlerStatistics {
            registered_domains: domains.len(),
            cached_instances: self.cache.lock().len(),
            domains,
            global_dependency_keys: self.global_dependencies.read().keys(),
        }
    }
}
