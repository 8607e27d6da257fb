//! CLI domain: parse, route, help, output, and presentation.
//! The parser owns the route registry and alias set; domain work happens behind handlers.

pub mod groups;
mod help;
pub mod options;
mod output;
pub mod parse;
mod presentation;
mod route;

pub use groups::{builtin_groups, CommandGroup};
pub use help::{command_name, ROOT_ABOUT};
pub use options::{OptionKind, OptionSpec, OptionTable, BASELINE_OPTIONS};
pub use output::map_error;
pub use parse::{CommandSurface, GlobalFlags, RegisteredAlias, TopLevel};
pub use presentation::{
    format_handler_report, format_legacy_match, format_route_list,
    format_route_statistics_json, format_route_statistics_text, format_route_validation,
};
pub use route::{AppContext, CommandParser, CommandParserBuilder, DispatchOutcome, ParserState};
