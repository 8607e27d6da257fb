//! Alias resolution against the compiled-in route table.

use std::sync::Arc;
use xaheen::alias::{Alias, AliasResolver};
use xaheen::cli::CommandParser;
use xaheen::command::CliCommand;
use xaheen::handler::HandlerFactory;
use xaheen::route::table::builtin_routes;
use xaheen::route::{route_handler, Route, RouteRegistry};

fn static_registry() -> RouteRegistry {
    let mut registry = RouteRegistry::new();
    registry.register_routes(builtin_routes(Arc::new(HandlerFactory::new())));
    registry
}

#[test]
fn test_every_builtin_alias_names_a_route() {
    let registry = static_registry();
    let resolver = AliasResolver::builtin();
    for alias in resolver.aliases() {
        let canonical = resolver
            .resolve(alias, &registry)
            .unwrap_or_else(|| panic!("alias '{}' does not resolve", alias.alias));
        assert!(
            registry.has_domain_action(&canonical.domain, &canonical.action),
            "{} -> {}",
            alias.alias,
            alias.original_command
        );
    }
}

#[test]
fn test_every_builtin_alias_is_registered_by_parser() {
    let parser = CommandParser::builder(Arc::new(HandlerFactory::new())).build();
    assert_eq!(
        parser.registered_aliases().len(),
        AliasResolver::builtin().aliases().len()
    );
}

#[test]
fn test_resolved_alias_finds_route_for_command() {
    let parser = CommandParser::builder(Arc::new(HandlerFactory::new())).build();
    for registered in parser.registered_aliases() {
        let canonical = &registered.canonical;
        let command = CliCommand::new(&canonical.domain, &canonical.action);
        let route = parser.find_route_for_command(&command).unwrap();
        assert_eq!(route.domain, canonical.domain);
        assert_eq!(route.action, canonical.action);
    }
}

#[test]
fn test_substring_lookup_is_loose() {
    let noop = || route_handler(|_| async { Ok(()) });
    let parser = CommandParser::builder(Arc::new(HandlerFactory::new()))
        .routes(vec![
            Route::new("microservice add [name]", "microservice", "add", noop()),
            Route::new("service add [name]", "service", "add", noop()),
        ])
        .alias_resolver(AliasResolver::new(vec![Alias::new("s", "service add", "")]))
        .build();

    let without_target = CliCommand::new("service", "add");
    assert_eq!(
        parser.find_route_for_command(&without_target).unwrap().pattern,
        "microservice add [name]"
    );

    let with_target = without_target.with_target(Some("auth".to_string()));
    assert_eq!(
        parser.find_route_for_command(&with_target).unwrap().pattern,
        "service add [name]"
    );
}

#[test]
fn test_process_arguments_on_static_table() {
    let registry = static_registry();
    let resolver = AliasResolver::builtin();
    let tokens: Vec<String> = ["mm", "User", "--force"].iter().map(|s| s.to_string()).collect();

    let resolution = resolver.process_arguments(&tokens, &registry);
    assert!(resolution.resolved);
    let command = resolution.command.unwrap();
    assert_eq!((command.domain.as_str(), command.action.as_str()), ("make", "model"));
    assert_eq!(command.target.as_deref(), Some("User"));
    assert!(command.flag("force"));
}
