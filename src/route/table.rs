//! Compiled-in route table.

use crate::command::CliCommand;
use crate::error::CliError;
use crate::handler::HandlerFactory;
use crate::route::{route_handler, LegacyNames, Route, RouteHandler};
use std::sync::Arc;
use tracing::debug;

struct RouteSpec {
    pattern: &'static str,
    domain: &'static str,
    action: &'static str,
    summary: &'static str,
    xaheen: &'static [&'static str],
    xala: &'static [&'static str],
}

const fn spec(
    pattern: &'static str,
    domain: &'static str,
    action: &'static str,
    summary: &'static str,
) -> RouteSpec {
    RouteSpec {
        pattern,
        domain,
        action,
        summary,
        xaheen: &[],
        xala: &[],
    }
}

const fn legacy(
    pattern: &'static str,
    domain: &'static str,
    action: &'static str,
    summary: &'static str,
    xaheen: &'static [&'static str],
    xala: &'static [&'static str],
) -> RouteSpec {
    RouteSpec {
        pattern,
        domain,
        action,
        summary,
        xaheen,
        xala,
    }
}

const ROUTES: &[RouteSpec] = &[
    // project
    legacy("project create [name]", "project", "create", "Create a new project", &["create", "new", "init"], &[]),
    spec("project new [name]", "project", "create", "Create a new project"),
    legacy("project validate [path]", "project", "validate", "Validate project structure", &["validate", "doctor"], &[]),
    legacy("project analyze [path]", "project", "analyze", "Analyze project health", &[], &["analyze"]),
    legacy("project upgrade [version]", "project", "upgrade", "Upgrade project dependencies", &["upgrade", "update"], &["migrate"]),
    // app
    spec("app create [name]", "app", "create", "Create an application in the workspace"),
    spec("app list [filter]", "app", "list", "List workspace applications"),
    // service
    legacy("service add [name]", "service", "add", "Add a service", &["add"], &[]),
    legacy("service remove <name>", "service", "remove", "Remove a service", &["remove"], &[]),
    spec("service list [filter]", "service", "list", "List configured services"),
    // component
    legacy("component create [name]", "component", "create", "Create a UI component", &[], &["create"]),
    legacy("component generate [description]", "component", "generate", "Generate a component from a description", &["generate"], &["generate"]),
    legacy("page create [name]", "page", "create", "Create a page", &[], &["new-page"]),
    // ai
    legacy("ai generate [prompt]", "ai", "generate", "Generate code with AI assistance", &[], &["prompt"]),
    spec("ai refactor [path]", "ai", "refactor", "Refactor code with AI assistance"),
    // mcp
    spec("mcp serve [profile]", "mcp", "serve", "Start the MCP server"),
    spec("mcp init [name]", "mcp", "init", "Initialize an MCP configuration"),
    spec("mcp test [server]", "mcp", "test", "Test an MCP server connection"),
    // registry
    legacy("registry add <component>", "registry", "add", "Install a registry component", &[], &["add", "install"]),
    legacy("registry list [category]", "registry", "list", "List registry components", &[], &["list"]),
    spec("registry search <query>", "registry", "search", "Search the component registry"),
    // security
    legacy("security scan [path]", "security", "scan", "Scan for vulnerabilities and secrets", &["scan", "security-scan"], &[]),
    legacy("security audit [path]", "security", "audit", "Audit dependencies and compliance", &["audit"], &[]),
    // deploy
    legacy("deploy docker [service]", "deploy", "docker", "Generate container deployment files", &["docker"], &[]),
    legacy("deploy k8s [environment]", "deploy", "k8s", "Generate Kubernetes manifests", &["kubernetes"], &[]),
    spec("deploy generate [platform]", "deploy", "generate", "Generate deployment configuration"),
    // make
    legacy("make model <name>", "make", "model", "Make a model", &["make:model"], &[]),
    legacy("make controller <name>", "make", "controller", "Make a controller", &["make:controller"], &[]),
    legacy("make service <name>", "make", "service", "Make a service class", &["make:service"], &[]),
    // template
    legacy("template modernize [path]", "template", "modernize", "Modernize legacy templates", &["upgrade-templates"], &["migrate-templates"]),
    spec("template list [category]", "template", "list", "List available templates"),
    // theme / docs
    legacy("theme create [name]", "theme", "create", "Create a theme", &[], &["create-theme"]),
    legacy("docs generate [path]", "docs", "generate", "Generate documentation", &["documentation"], &[]),
];

/// Route handler that dispatches through the handler factory by `command.domain`.
pub fn domain_dispatcher(factory: Arc<HandlerFactory>) -> RouteHandler {
    route_handler(move |command: CliCommand| {
        let factory = Arc::clone(&factory);
        async move {
            let handler = factory.create_handler(&command.domain, None)?;
            factory.initialize_handlers().await?;
            if !handler.can_handle(&command) {
                return Err(CliError::UnsupportedAction {
                    domain: command.domain,
                    action: command.action,
                });
            }
            debug!(command = %command.display_line(), "Dispatching to domain handler");
            handler.execute(command).await
        }
    })
}

/// Build the static route table, every route dispatching through `factory`.
pub fn builtin_routes(factory: Arc<HandlerFactory>) -> Vec<Route> {
    let handler = domain_dispatcher(factory);
    ROUTES
        .iter()
        .map(|spec| {
            let route = Route::new(spec.pattern, spec.domain, spec.action, Arc::clone(&handler))
                .with_summary(spec.summary);
            if spec.xaheen.is_empty() && spec.xala.is_empty() {
                route
            } else {
                route.with_legacy(
                    LegacyNames::new()
                        .xaheen(spec.xaheen.iter().copied())
                        .xala(spec.xala.iter().copied()),
                )
            }
        })
        .collect()
}
