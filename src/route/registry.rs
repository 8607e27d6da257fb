//! Route registry: pattern → Route mapping with a per-domain index.

use crate::route::{has_placeholder_markers, Route};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Route registry
///
/// Owns the primary pattern → Route mapping. The per-domain index holds
/// patterns in registration order and is updated entry-by-entry on every
/// registration; it is only rebuilt wholesale by [`RouteRegistry::clear`].
#[derive(Default)]
pub struct RouteRegistry {
    routes: HashMap<String, Route>,
    order: Vec<String>,
    domain_order: Vec<String>,
    by_domain: HashMap<String, Vec<String>>,
}

/// Outcome of [`RouteRegistry::validate_routes`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Read-only snapshot for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RouteStatistics {
    pub total_routes: usize,
    pub total_domains: usize,
    pub routes_per_domain: BTreeMap<String, usize>,
    pub patterns: Vec<String>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route, overwriting any route with the same pattern (last write wins).
    pub fn register_route(&mut self, route: Route) {
        let pattern = route.pattern.clone();
        let domain = route.domain.clone();

        match self.routes.insert(pattern.clone(), route) {
            Some(previous) => {
                warn!(
                    pattern = %pattern,
                    previous_domain = %previous.domain,
                    previous_action = %previous.action,
                    "Route pattern already registered, overwriting"
                );
                if previous.domain != domain {
                    self.remove_from_domain_index(&previous.domain, &pattern);
                    self.push_domain_index(&domain, pattern.clone());
                }
            }
            None => {
                self.order.push(pattern.clone());
                self.push_domain_index(&domain, pattern.clone());
            }
        }
        // by_domain and order never hold a pattern twice
        debug_assert_eq!(self.order.len(), self.routes.len());
        debug!(pattern = %pattern, domain = %domain, "Route registered");
    }

    /// Register routes in order; later entries win on pattern collision.
    pub fn register_routes<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = Route>,
    {
        for route in routes {
            self.register_route(route);
        }
    }

    pub fn get_route(&self, pattern: &str) -> Option<&Route> {
        self.routes.get(pattern)
    }

    pub fn has_route(&self, pattern: &str) -> bool {
        self.routes.contains_key(pattern)
    }

    /// Routes of `domain` in registration order; empty for an unknown domain.
    pub fn get_routes_by_domain(&self, domain: &str) -> Vec<&Route> {
        self.by_domain
            .get(domain)
            .map(|patterns| {
                patterns
                    .iter()
                    .filter_map(|pattern| self.routes.get(pattern))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All routes whose action equals `action`, across domains.
    pub fn get_routes_by_action(&self, action: &str) -> Vec<&Route> {
        self.routes().filter(|route| route.action == action).collect()
    }

    /// Case-insensitive substring search over pattern, domain and action.
    pub fn find_routes(&self, query: &str) -> Vec<&Route> {
        let needle = query.to_lowercase();
        self.routes()
            .filter(|route| {
                route.pattern.to_lowercase().contains(&needle)
                    || route.domain.to_lowercase().contains(&needle)
                    || route.action.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// First route, in registration order, bound to `{domain, action}`.
    pub fn find_route_for(&self, domain: &str, action: &str) -> Option<&Route> {
        self.get_routes_by_domain(domain)
            .into_iter()
            .find(|route| route.action == action)
    }

    /// First route, in registration order, addressed by `top [sub]`.
    ///
    /// This is the lookup used both for direct dispatch and for alias expansion.
    pub fn resolve_verbs(&self, top: &str, sub: Option<&str>) -> Option<&Route> {
        self.routes().find(|route| {
            let shape = route.shape();
            shape.top_level() == Some(top) && shape.sub_verb() == sub
        })
    }

    /// True when some route is bound to `{domain, action}`.
    pub fn has_domain_action(&self, domain: &str, action: &str) -> bool {
        self.find_route_for(domain, action).is_some()
    }

    /// Every route in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.order
            .iter()
            .filter_map(move |pattern| self.routes.get(pattern))
    }

    /// Domains in first-registration order.
    pub fn domains(&self) -> &[String] {
        &self.domain_order
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Check every route for required fields. Never fails; issues are reported.
    pub fn validate_routes(&self) -> RouteValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for route in self.routes() {
            if route.pattern.trim().is_empty() {
                errors.push(format!(
                    "Route for '{} {}' has an empty pattern",
                    route.domain, route.action
                ));
            }
            if route.domain.trim().is_empty() {
                errors.push(format!("Route '{}' is missing a domain", route.pattern));
            }
            if route.action.trim().is_empty() {
                errors.push(format!("Route '{}' is missing an action", route.pattern));
            }
            if route.pattern.contains(' ') && !has_placeholder_markers(&route.pattern) {
                warnings.push(format!(
                    "Route '{}' contains spaces but no parameter placeholders",
                    route.pattern
                ));
            }
        }

        RouteValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn get_statistics(&self) -> RouteStatistics {
        let routes_per_domain = self
            .by_domain
            .iter()
            .map(|(domain, patterns)| (domain.clone(), patterns.len()))
            .collect();
        RouteStatistics {
            total_routes: self.routes.len(),
            total_domains: self.domain_order.len(),
            routes_per_domain,
            patterns: self.order.clone(),
        }
    }

    /// Drop every route and index entry.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.order.clear();
        self.domain_order.clear();
        self.by_domain.clear();
    }

    fn push_domain_index(&mut self, domain: &str, pattern: String) {
        if !self.by_domain.contains_key(domain) {
            self.domain_order.push(domain.to_string());
        }
        let entries = self.by_domain.entry(domain.to_string()).or_default();
        if !entries.contains(&pattern) {
            entries.push(pattern);
        }
    }

    fn remove_from_domain_index(&mut self, domain: &str, pattern: &str) {
        let now_empty = match self.by_domain.get_mut(domain) {
            Some(entries) => {
                entries.retain(|p| p != pattern);
                entries.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.by_domain.remove(domain);
            self.domain_order.retain(|d| d != domain);
        }
    }
}
