//! Built-in boundary handlers registered for every routed domain.
//!
//! Domain generation logic lives outside this crate. These handlers accept the
//! actions the route table declares for their domain, enforce required
//! targets, and report the resolved invocation.

use crate::command::CliCommand;
use crate::error::CliError;
use crate::handler::{
    handler_constructor, DependencyBag, DomainHandler, HandlerFactory, Initializable,
};
use crate::route::RouteRegistry;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Action accepted by a built-in handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub name: String,
    pub requires_target: bool,
}

/// Actions per domain, derived from the route table in registration order.
pub fn actions_by_domain(registry: &RouteRegistry) -> BTreeMap<String, Vec<ActionSpec>> {
    let mut out: BTreeMap<String, Vec<ActionSpec>> = BTreeMap::new();
    for route in registry.routes() {
        let requires_target = route
            .shape()
            .target()
            .map(|placeholder| placeholder.required)
            .unwrap_or(false);
        let actions = out.entry(route.domain.clone()).or_default();
        match actions.iter_mut().find(|spec| spec.name == route.action) {
            // Synonym patterns: a target is required only if every spelling requires it
            Some(spec) => spec.requires_target &= requires_target,
            None => actions.push(ActionSpec {
                name: route.action.clone(),
                requires_target,
            }),
        }
    }
    out
}

/// Register a built-in handler for every routed domain that has none yet.
///
/// Returns the domains that received a built-in handler.
pub fn register_builtin_handlers(factory: &HandlerFactory, registry: &RouteRegistry) -> Vec<String> {
    let mut registered = Vec::new();
    for (domain, actions) in actions_by_domain(registry) {
        if factory.has_handler(&domain) {
            continue;
        }
        let ctor_domain = domain.clone();
        let constructor = if domain == "mcp" {
            handler_constructor(move |dependencies| {
                Ok(Arc::new(McpHandler::new(actions.clone(), dependencies)) as Arc<dyn DomainHandler>)
            })
        } else {
            handler_constructor(move |dependencies| {
                Ok(Arc::new(PlanHandler::new(
                    ctor_domain.clone(),
                    actions.clone(),
                    dependencies,
                )) as Arc<dyn DomainHandler>)
            })
        };
        factory.register_handler(domain.clone(), constructor);
        registered.push(domain);
    }
    debug!(count = registered.len(), "Built-in handlers registered");
    registered
}

/// Human-readable line describing what a command resolves to.
pub fn format_plan(command: &CliCommand) -> String {
    let prefix = if command.is_dry_run() {
        "[dry-run] Would run"
    } else {
        "Running"
    };
    let mut line = format!("{}: {}", prefix, command.display_line());
    let extra: Vec<String> = command
        .options
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "verbose" | "dryRun" | "config"))
        .map(|(key, value)| match value.as_str() {
            Some(s) => format!("{}={}", key, s),
            None => format!("{}={}", key, value),
        })
        .collect();
    if !extra.is_empty() {
        line.push_str(&format!(" ({})", extra.join(", ")));
    }
    line
}

fn check_command(
    domain: &str,
    actions: &[ActionSpec],
    command: &CliCommand,
) -> Result<(), CliError> {
    let spec = actions
        .iter()
        .find(|spec| spec.name == command.action)
        .filter(|_| command.domain == domain)
        .ok_or_else(|| CliError::UnsupportedAction {
            domain: command.domain.clone(),
            action: command.action.clone(),
        })?;
    if spec.requires_target && command.target.is_none() {
        return Err(CliError::MissingTarget {
            domain: command.domain.clone(),
            action: command.action.clone(),
        });
    }
    Ok(())
}

/// Generic handler that reports the resolved invocation.
pub struct PlanHandler {
    domain: String,
    actions: Vec<ActionSpec>,
    dependencies: DependencyBag,
}

impl PlanHandler {
    pub fn new(domain: String, actions: Vec<ActionSpec>, dependencies: DependencyBag) -> Self {
        Self {
            domain,
            actions,
            dependencies,
        }
    }
}

#[async_trait]
impl DomainHandler for PlanHandler {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn supported_actions(&self) -> Vec<String> {
        self.actions.iter().map(|spec| spec.name.clone()).collect()
    }

    async fn execute(&self, command: CliCommand) -> Result<(), CliError> {
        check_command(&self.domain, &self.actions, &command)?;
        info!(
            domain = %command.domain,
            action = %command.action,
            cli = self.dependencies.get_str("cli_name").unwrap_or("xaheen"),
            "Executing command"
        );
        println!("{}", format_plan(&command));
        Ok(())
    }
}

/// Resolved MCP server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpEndpoint {
    pub host: String,
    pub port: u16,
}

impl McpEndpoint {
    const DEFAULT_HOST: &'static str = "127.0.0.1";
    const DEFAULT_PORT: u16 = 3000;

    fn from_dependencies(dependencies: &DependencyBag) -> Result<Self, CliError> {
        let server = dependencies.get("mcp_server");
        let host = server
            .and_then(|s| s.get("host"))
            .and_then(|h| h.as_str())
            .unwrap_or(Self::DEFAULT_HOST)
            .to_string();
        let port = match server.and_then(|s| s.get("port")) {
            None => Self::DEFAULT_PORT,
            Some(value) => value
                .as_u64()
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| CliError::HandlerInitialization {
                    domain: "mcp".to_string(),
                    message: format!("invalid mcp_server.port: {}", value),
                })?,
        };
        Ok(Self { host, port })
    }
}

/// MCP handler; resolves its server endpoint during initialization.
pub struct McpHandler {
    actions: Vec<ActionSpec>,
    endpoint: Mutex<Option<McpEndpoint>>,
}

impl McpHandler {
    pub fn new(actions: Vec<ActionSpec>, _dependencies: DependencyBag) -> Self {
        Self {
            actions,
            endpoint: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> Option<McpEndpoint> {
        self.endpoint.lock().clone()
    }
}

#[async_trait]
impl DomainHandler for McpHandler {
    fn domain(&self) -> &str {
        "mcp"
    }

    fn supported_actions(&self) -> Vec<String> {
        self.actions.iter().map(|spec| spec.name.clone()).collect()
    }

    async fn execute(&self, command: CliCommand) -> Result<(), CliError> {
        check_command("mcp", &self.actions, &command)?;
        let endpoint = self.endpoint().ok_or_else(|| CliError::HandlerInitialization {
            domain: "mcp".to_string(),
            message: "handler used before initialization".to_string(),
        })?;
        let port = command
            .option("port")
            .and_then(|p| p.as_u64())
            .unwrap_or(u64::from(endpoint.port));
        println!("{} [{}:{}]", format_plan(&command), endpoint.host, port);
        Ok(())
    }

    fn as_initializable(&self) -> Option<&dyn Initializable> {
        Some(self)
    }
}

#[async_trait]
impl Initializable for McpHandler {
    async fn initialize(&self, dependencies: &DependencyBag) -> Result<(), CliError> {
        let endpoint = McpEndpoint::from_dependencies(dependencies)?;
        debug!(host = %endpoint.host, port = endpoint.port, "MCP endpoint resolved");
        *self.endpoint.lock() = Some(endpoint);
        Ok(())
    }
}
