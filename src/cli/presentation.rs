//! CLI presentation: text and json formatters for the diagnostic groups.

use crate::handler::{HandlerStatistics, HandlerValidation};
use crate::route::{LegacyCli, Route, RouteStatistics, RouteValidation};
use comfy_table::{presets::UTF8_FULL, Table};

fn legacy_column(route: &Route) -> String {
    let Some(legacy) = &route.legacy else {
        return String::new();
    };
    LegacyCli::ALL
        .iter()
        .filter(|cli| !legacy.verbs(**cli).is_empty())
        .map(|cli| format!("{}: {}", cli, legacy.verbs(*cli).join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn format_route_list(routes: &[&Route]) -> String {
    if routes.is_empty() {
        return "No routes found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Pattern", "Domain", "Action", "Legacy", "Summary"]);
    for route in routes {
        table.add_row(vec![
            route.pattern.clone(),
            route.domain.clone(),
            route.action.clone(),
            legacy_column(route),
            route.summary.clone().unwrap_or_default(),
        ]);
    }
    format!("{}\n\nTotal: {} route(s)", table, routes.len())
}

fn push_issues(output: &mut String, errors: &[String], warnings: &[String]) {
    if !errors.is_empty() {
        output.push_str(&format!("\n\nErrors ({}):", errors.len()));
        for e in errors {
            output.push_str(&format!("\n  ✗ {}", e));
        }
    }
    if !warnings.is_empty() {
        output.push_str(&format!("\n\nWarnings ({}):", warnings.len()));
        for w in warnings {
            output.push_str(&format!("\n  - {}", w));
        }
    }
}

pub fn format_route_validation(validation: &RouteValidation) -> String {
    let mut output = if validation.is_valid {
        "✓ Route table is valid".to_string()
    } else {
        "✗ Route table has errors".to_string()
    };
    push_issues(&mut output, &validation.errors, &validation.warnings);
    output
}

pub fn format_route_statistics_text(stats: &RouteStatistics) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Domain", "Routes"]);
    for (domain, count) in &stats.routes_per_domain {
        table.add_row(vec![domain.clone(), count.to_string()]);
    }
    format!(
        "Routes: {}\nDomains: {}\n{}",
        stats.total_routes, stats.total_domains, table
    )
}

pub fn format_route_statistics_json(stats: &RouteStatistics) -> String {
    serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_legacy_match(cli: LegacyCli, verb: &str, route: Option<&Route>) -> String {
    match route {
        Some(route) => format!(
            "{} {} → {} ({} {})",
            cli, verb, route.pattern, route.domain, route.action
        ),
        None => format!("No route maps legacy command '{} {}'", cli, verb),
    }
}

pub fn format_handler_report(validation: &HandlerValidation, stats: &HandlerStatistics) -> String {
    let mut output = format!(
        "Handlers: {} registered, {} cached\nDomains: {}",
        stats.registered_domains,
        stats.cached_instances,
        stats.domains.join(", ")
    );
    if !stats.global_dependency_keys.is_empty() {
        output.push_str(&format!(
            "\nGlobal dependencies: {}",
            stats.global_dependency_keys.join(", ")
        ));
    }
    output.push_str(if validation.is_valid {
        "\n\n✓ All handlers construct and accept their actions"
    } else {
        "\n\n✗ Handler validation failed"
    });
    push_issues(&mut output, &validation.errors, &validation.warnings);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{route_handler, LegacyNames};
    use std::collections::BTreeMap;

    fn route() -> Route {
        Route::new(
            "project create [name]",
            "project",
            "create",
            route_handler(|_| async { Ok(()) }),
        )
        .with_legacy(LegacyNames::new().xaheen(["create", "new"]))
        .with_summary("Create a new project")
    }

    #[test]
    fn test_route_list() {
        let r = route();
        let out = format_route_list(&[&r]);
        assert!(out.contains("project create [name]"));
        assert!(out.contains("xaheen: create, new"));
        assert!(out.ends_with("Total: 1 route(s)"));
        assert_eq!(format_route_list(&[]), "No routes found.");
    }

    #[test]
    fn test_route_validation() {
        let ok = RouteValidation {
            is_valid: true,
            ..Default::default()
        };
        assert_eq!(format_route_validation(&ok), "✓ Route table is valid");

        let bad = RouteValidation {
            is_valid: false,
            errors: vec!["Route 'x' has an empty domain".to_string()],
            warnings: vec!["w".to_string()],
        };
        let out = format_route_validation(&bad);
        assert!(out.contains("Errors (1):"));
        assert!(out.contains("Warnings (1):"));
    }

    #[test]
    fn test_statistics_json() {
        let stats = RouteStatistics {
            total_routes: 2,
            total_domains: 1,
            routes_per_domain: BTreeMap::from([("project".to_string(), 2)]),
            patterns: vec!["a".to_string(), "b".to_string()],
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_route_statistics_json(&stats)).unwrap();
        assert_eq!(value["total_routes"], 2);
        assert!(format_route_statistics_text(&stats).starts_with("Routes: 2\nDomains: 1"));
    }

    #[test]
    fn test_legacy_match() {
        let r = route();
        assert_eq!(
            format_legacy_match(LegacyCli::Xaheen, "create", Some(&r)),
            "xaheen create → project create [name] (project create)"
        );
        assert!(format_legacy_match(LegacyCli::Xala, "nope", None).starts_with("No route"));
    }
}
