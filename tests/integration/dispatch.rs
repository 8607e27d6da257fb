//! End-to-end dispatch through the application context and the static route table.

use crate::integration::test_utils::register_recording;
use serde_json::json;
use std::sync::Arc;
use xaheen::alias::Alias;
use xaheen::cli::{AppContext, DispatchOutcome, ParserState};
use xaheen::handler::HandlerFactory;

#[tokio::test]
async fn test_project_create_reaches_project_handler() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "project", &["create", "validate"]);
    let mut app = AppContext::new(Arc::clone(&factory));
    let parser = app.command_parser();

    let outcome = parser
        .dispatch(["xaheen", "project", "create", "test-project"])
        .await
        .unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            domain: "project".to_string(),
            action: "create".to_string()
        }
    );

    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].domain, "project");
    assert_eq!(calls[0].action, "create");
    assert_eq!(calls[0].target.as_deref(), Some("test-project"));
    assert_eq!(calls[0].arguments.get("target"), Some(&json!("test-project")));
}

#[tokio::test]
async fn test_synonym_pattern_uses_route_action() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "project", &["create"]);
    let parser = AppContext::new(factory).command_parser();

    parser.dispatch(["xaheen", "project", "new", "demo"]).await.unwrap();
    assert_eq!(calls.lock()[0].action, "create");
}

#[tokio::test]
async fn test_augmented_options_reach_handler() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "deploy", &["k8s", "docker", "generate"]);
    let parser = AppContext::new(factory).command_parser();

    parser
        .dispatch([
            "xaheen", "deploy", "k8s", "staging", "--namespace", "web", "--replicas", "3",
            "--helm", "--dry-run",
        ])
        .await
        .unwrap();

    let calls = calls.lock();
    let command = &calls[0];
    assert_eq!(command.target.as_deref(), Some("staging"));
    assert_eq!(command.option("namespace"), Some(&json!("web")));
    assert_eq!(command.option("replicas"), Some(&json!(3)));
    assert_eq!(command.option("helm"), Some(&json!(true)));
    assert!(command.is_dry_run());
}

#[tokio::test]
async fn test_augmented_option_rejected_on_other_domain() {
    let factory = Arc::new(HandlerFactory::new());
    register_recording(&factory, "project", &["create"]);
    let parser = AppContext::new(factory).command_parser();

    let err = parser
        .dispatch(["xaheen", "project", "create", "x", "--namespace", "web"])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("INVALID_ARGUMENTS"));
}

#[tokio::test]
async fn test_alias_dispatches_canonical_command() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "component", &["create", "generate"]);
    let parser = AppContext::new(factory).command_parser();

    parser.dispatch(["xaheen", "c", "button", "--verbose"]).await.unwrap();
    let calls = calls.lock();
    assert_eq!(calls[0].domain, "component");
    assert_eq!(calls[0].action, "create");
    assert_eq!(calls[0].target.as_deref(), Some("button"));
    assert!(calls[0].flag("verbose"));
}

#[tokio::test]
async fn test_configured_alias_is_dispatchable() {
    let factory = Arc::new(HandlerFactory::new());
    let calls = register_recording(&factory, "service", &["add", "remove", "list"]);
    let mut app = AppContext::new(factory)
        .with_aliases(vec![Alias::new("rm", "service remove", "Remove a service")]);
    let parser = app.command_parser();

    parser.dispatch(["xaheen", "rm", "billing"]).await.unwrap();
    assert_eq!(calls.lock()[0].action, "remove");
    assert_eq!(calls.lock()[0].target.as_deref(), Some("billing"));
}

#[tokio::test]
async fn test_builtin_handler_serves_unclaimed_domains() {
    let factory = Arc::new(HandlerFactory::new());
    let parser = AppContext::new(Arc::clone(&factory)).command_parser();

    let outcome = parser
        .dispatch(["xaheen", "template", "list", "--dry-run"])
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Completed { .. }));
    assert!(factory.get_handler("template").is_some());
    assert!(factory.get_handler("deploy").is_none());
}

#[tokio::test]
async fn test_mcp_handler_initialized_on_dispatch() {
    let factory = Arc::new(HandlerFactory::new());
    let parser = AppContext::new(Arc::clone(&factory)).command_parser();
    parser
        .dispatch(["xaheen", "mcp", "serve", "--port", "4000"])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_groups_render_output() {
    let parser = AppContext::new(Arc::new(HandlerFactory::new())).command_parser();

    match parser.dispatch(["xaheen", "aliases"]).await.unwrap() {
        DispatchOutcome::Rendered(text) => {
            assert!(text.contains("component create"));
            assert!(text.contains("Total: 12 alias(es)"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    match parser.dispatch(["xaheen", "routes", "validate"]).await.unwrap() {
        DispatchOutcome::Rendered(text) => assert_eq!(text, "✓ Route table is valid"),
        other => panic!("unexpected outcome: {:?}", other),
    }

    match parser
        .dispatch(["xaheen", "routes", "stats", "--format", "json"])
        .await
        .unwrap()
    {
        DispatchOutcome::Rendered(text) => {
            let stats: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(stats["total_routes"], json!(parser.registry().len()));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_context_returns_singleton_until_reset() {
    let mut app = AppContext::new(Arc::new(HandlerFactory::new()));
    assert_eq!(app.state(), ParserState::Uninitialized);

    let first = app.command_parser();
    let second = app.command_parser();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(app.state(), ParserState::Ready);

    app.reset();
    assert_eq!(app.state(), ParserState::Uninitialized);
    let third = app.command_parser();
    assert!(!Arc::ptr_eq(&first, &third));
}
