//! Auxiliary command groups registered next to the routed domains.
//!
//! Groups are diagnostics over the parser's own state. A group that fails to
//! build its command, or whose name is taken, is skipped at startup.

use crate::alias::AliasResolver;
use crate::cli::presentation::{
    format_handler_report, format_legacy_match, format_route_list,
    format_route_statistics_json, format_route_statistics_text, format_route_validation,
};
use crate::cli::route::CommandParser;
use crate::error::CliError;
use crate::route::legacy::find_route_by_legacy;
use crate::route::LegacyCli;
use clap::{ArgMatches, Command, FromArgMatches, Subcommand};

/// Top-level command contributed outside the route table.
pub trait CommandGroup: Send + Sync {
    fn name(&self) -> &str;

    fn command(&self) -> Result<Command, CliError>;

    /// Run against the group's own matches; the returned text goes to stdout.
    fn run(&self, parser: &CommandParser, matches: &ArgMatches) -> Result<String, CliError>;
}

/// Groups registered by default.
pub fn builtin_groups() -> Vec<Box<dyn CommandGroup>> {
    vec![Box::new(AliasesGroup), Box::new(RoutesGroup)]
}

/// `xaheen aliases`
pub struct AliasesGroup;

impl CommandGroup for AliasesGroup {
    fn name(&self) -> &str {
        "aliases"
    }

    fn command(&self) -> Result<Command, CliError> {
        Ok(Command::new("aliases").about("List command aliases"))
    }

    fn run(&self, parser: &CommandParser, _matches: &ArgMatches) -> Result<String, CliError> {
        let registered = parser
            .registered_aliases()
            .iter()
            .map(|registered| registered.alias.clone())
            .collect();
        Ok(AliasResolver::new(registered).show_alias_help())
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum RoutesCommands {
    /// List registered routes
    List {
        /// Only routes of this domain
        #[arg(long)]
        domain: Option<String>,
    },
    /// Find routes whose pattern, domain or action contains a query
    Find { query: String },
    /// Check the route table for missing fields and malformed patterns
    Validate,
    /// Route counts per domain
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show which route a legacy command maps to
    Legacy {
        /// Legacy CLI name (xaheen or xala)
        cli: String,
        verb: String,
    },
    /// Construct every registered handler and report problems
    Handlers,
}

/// `xaheen routes ...`
pub struct RoutesGroup;

impl CommandGroup for RoutesGroup {
    fn name(&self) -> &str {
        "routes"
    }

    fn command(&self) -> Result<Command, CliError> {
        Ok(RoutesCommands::augment_subcommands(
            Command::new("routes")
                .about("Inspect the route table")
                .subcommand_required(true)
                .arg_required_else_help(true),
        ))
    }

    fn run(&self, parser: &CommandParser, matches: &ArgMatches) -> Result<String, CliError> {
        let command = RoutesCommands::from_arg_matches(matches)
            .map_err(|e| CliError::Usage(e.to_string()))?;
        let registry = parser.registry();
        match command {
            RoutesCommands::List { domain } => {
                let routes = match domain {
                    Some(domain) => registry.get_routes_by_domain(&domain),
                    None => registry.routes().collect(),
                };
                Ok(format_route_list(&routes))
            }
            RoutesCommands::Find { query } => Ok(format_route_list(&registry.find_routes(&query))),
            RoutesCommands::Validate => Ok(format_route_validation(&registry.validate_routes())),
            RoutesCommands::Stats { format } => {
                let stats = registry.get_statistics();
                Ok(match format.as_str() {
                    "json" => format_route_statistics_json(&stats),
                    _ => format_route_statistics_text(&stats),
                })
            }
            RoutesCommands::Legacy { cli, verb } => {
                let cli: LegacyCli = cli.parse().map_err(CliError::Usage)?;
                let route = find_route_by_legacy(registry, cli.as_str(), &verb);
                Ok(format_legacy_match(cli, &verb, route))
            }
            RoutesCommands::Handlers => {
                let factory = parser.factory();
                Ok(format_handler_report(
                    &factory.validate_handlers(),
                    &factory.get_statistics(),
                ))
            }
        }
    }
}
