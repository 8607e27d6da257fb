//! Handler factory behaviour through the public API.

use crate::integration::test_utils::register_recording;
use serde_json::json;
use std::sync::Arc;
use xaheen::command::CliCommand;
use xaheen::handler::builtin::register_builtin_handlers;
use xaheen::handler::{handler_constructor, DependencyBag, HandlerFactory};
use xaheen::route::table::builtin_routes;
use xaheen::route::RouteRegistry;

#[test]
fn test_unregistered_domain_fails_construction() {
    let factory = HandlerFactory::new();
    let err = factory.create_handler("ghost", None).err().unwrap();
    assert_eq!(err.code(), Some("HANDLER_CONSTRUCTION_FAILED"));
}

#[test]
fn test_handlers_are_cached_until_reregistered() {
    let factory = HandlerFactory::new();
    register_recording(&factory, "project", &["create"]);
    let first = factory.create_handler("project", None).unwrap();
    let second = factory.create_handler("project", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    register_recording(&factory, "project", &["create"]);
    assert!(factory.get_handler("project").is_none());
    let third = factory.create_handler("project", None).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn test_constructor_sees_merged_dependencies() {
    let factory = HandlerFactory::new();
    factory.set_global_dependencies(DependencyBag::new().with("cli_name", json!("xaheen")));
    factory.set_global_dependencies(DependencyBag::new().with("version", json!("1.1.0")));
    factory.register_handler(
        "inspect",
        handler_constructor(|deps| {
            assert_eq!(deps.get_str("cli_name"), Some("xaheen"));
            assert_eq!(deps.get_str("version"), Some("1.1.0"));
            assert_eq!(deps.get_str("extra"), Some("yes"));
            Err(xaheen::error::CliError::domain("INSPECTED", "done"))
        }),
    );
    let extra = DependencyBag::new().with("extra", json!("yes"));
    let err = factory.create_handler("inspect", Some(&extra)).err().unwrap();
    assert!(err.to_string().contains("done"));
}

#[tokio::test]
async fn test_builtin_handlers_validate_clean() {
    let factory = Arc::new(HandlerFactory::new());
    let mut registry = RouteRegistry::new();
    registry.register_routes(builtin_routes(Arc::clone(&factory)));
    let registered = register_builtin_handlers(&factory, &registry);
    assert_eq!(registered.len(), registry.domains().len());

    let validation = factory.validate_handlers();
    assert!(validation.is_valid, "{:?}", validation.errors);
    assert_eq!(factory.get_statistics().cached_instances, 0);

    let handler = factory.create_handler("docs", None).unwrap();
    assert!(handler.can_handle(&CliCommand::new("docs", "generate")));
    assert!(!handler.can_handle(&CliCommand::new("docs", "publish")));
    factory.initialize_handlers().await.unwrap();
}
