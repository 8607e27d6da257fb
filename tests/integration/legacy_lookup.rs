//! Legacy command lookup and argv rewriting.

use crate::integration::test_utils::register_recording;
use std::sync::Arc;
use xaheen::cli::{AppContext, DispatchOutcome};
use xaheen::handler::HandlerFactory;
use xaheen::route::legacy::{find_route_by_legacy, resolve_legacy_verb};
use xaheen::route::table::builtin_routes;
use xaheen::route::{LegacyCli, RouteRegistry};

fn static_registry() -> RouteRegistry {
    let mut registry = RouteRegistry::new();
    registry.register_routes(builtin_routes(Arc::new(HandlerFactory::new())));
    registry
}

#[test]
fn test_xaheen_create_maps_to_project_create() {
    let registry = static_registry();
    let route = find_route_by_legacy(&registry, "xaheen", "create").unwrap();
    assert_eq!((route.domain.as_str(), route.action.as_str()), ("project", "create"));
}

#[test]
fn test_xala_create_maps_to_component_create() {
    let registry = static_registry();
    let route = find_route_by_legacy(&registry, "xala", "create").unwrap();
    assert_eq!((route.domain.as_str(), route.action.as_str()), ("component", "create"));
}

#[test]
fn test_unknown_verb_and_cli() {
    let registry = static_registry();
    assert!(find_route_by_legacy(&registry, "xaheen", "nonexistent-verb").is_none());
    assert!(find_route_by_legacy(&registry, "other-cli", "create").is_none());
}

#[test]
fn test_xaheen_generation_checked_first() {
    let registry = static_registry();
    let (cli, route) = resolve_legacy_verb(&registry, "generate").unwrap();
    assert_eq!(cli, LegacyCli::Xaheen);
    assert_eq!(route.pattern, "component generate [description]");

    let (cli, route) = resolve_legacy_verb(&registry, "install").unwrap();
    assert_eq!(cli, LegacyCli::Xala);
    assert_eq!(route.pattern, "registry add <component>");
}

#[tokio::test]
async fn test_legacy_argv_is_dispatched() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "make", &["model", "controller", "service"]);
    let parser = AppContext::new(factory).command_parser();

    let outcome = parser
        .dispatch(["xaheen", "make:model", "Invoice", "--force"])
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Completed { .. }));

    let calls = calls.lock();
    assert_eq!(calls[0].action, "model");
    assert_eq!(calls[0].target.as_deref(), Some("Invoice"));
    assert!(calls[0].flag("force"));
}

#[tokio::test]
async fn test_domain_names_are_not_rewritten() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "service", &["add", "remove", "list"]);
    let parser = AppContext::new(factory).command_parser();

    parser.dispatch(["xaheen", "service", "list"]).await.unwrap();
    assert_eq!(calls.lock()[0].action, "list");
}
