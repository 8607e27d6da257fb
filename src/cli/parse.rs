//! CLI parse: the top-level name table and the clap command tree built from it.
//!
//! No dispatch here. [`CommandSurface`] records which top-level names are
//! taken and by what; [`build_command`] turns the surface into a clap
//! `Command` once startup is finished.

use crate::alias::{Alias, CanonicalCommand};
use crate::cli::help::{alias_about, domain_about, ROOT_ABOUT};
use crate::cli::options::{OptionSpec, OptionTable, BASELINE_OPTIONS};
use crate::route::{Placeholder, Route, RouteRegistry};
use clap::{Arg, ArgAction, Command};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Names no route, alias or group may claim.
pub const RESERVED_NAMES: &[&str] = &["help"];

/// What a top-level command name is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel {
    Domain,
    Alias,
    Group,
    Reserved,
}

/// Top-level command names and the `(verb, sub-verb) → pattern` bindings of routed domains.
#[derive(Debug, Clone)]
pub struct CommandSurface {
    top: BTreeMap<String, TopLevel>,
    verbs: BTreeMap<String, BTreeMap<Option<String>, String>>,
}

impl Default for CommandSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSurface {
    pub fn new() -> Self {
        let top = RESERVED_NAMES
            .iter()
            .map(|name| (name.to_string(), TopLevel::Reserved))
            .collect();
        Self {
            top,
            verbs: BTreeMap::new(),
        }
    }

    /// Bind `route`'s verbs. Re-claiming the same pattern is a no-op.
    pub fn claim_route(&mut self, route: &Route) -> Result<(), String> {
        let shape = route.shape();
        let (top, sub) = match shape.verbs.as_slice() {
            [] => return Err("pattern has no verbs".to_string()),
            [top] => (top.clone(), None),
            [top, sub] => (top.clone(), Some(sub.clone())),
            _ => return Err("pattern has more than two verbs".to_string()),
        };

        match self.top.get(&top) {
            None | Some(TopLevel::Domain) => {}
            Some(kind) => {
                return Err(format!("'{}' is already a top-level {}", top, kind_name(kind)))
            }
        }

        let bindings = self.verbs.get(&top);
        if let Some(bindings) = bindings {
            if let Some(existing) = bindings.get(&sub) {
                if existing == &route.pattern {
                    return Ok(());
                }
                return Err(format!("verbs already bound to '{}'", existing));
            }
            let has_direct = bindings.contains_key(&None);
            if sub.is_none() || has_direct {
                return Err(format!(
                    "'{}' cannot mix a direct route with sub-commands",
                    top
                ));
            }
        }

        self.top.insert(top.clone(), TopLevel::Domain);
        self.verbs
            .entry(top)
            .or_default()
            .insert(sub, route.pattern.clone());
        Ok(())
    }

    pub fn claim_alias(&mut self, token: &str) -> Result<(), String> {
        self.claim_name(token, TopLevel::Alias)
    }

    pub fn claim_group(&mut self, name: &str) -> Result<(), String> {
        self.claim_name(name, TopLevel::Group)
    }

    fn claim_name(&mut self, name: &str, kind: TopLevel) -> Result<(), String> {
        if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
            return Err(format!("'{}' is not a valid command name", name));
        }
        if let Some(existing) = self.top.get(name) {
            return Err(format!("'{}' is already a top-level {}", name, kind_name(existing)));
        }
        self.top.insert(name.to_string(), kind);
        Ok(())
    }

    pub fn kind(&self, name: &str) -> Option<&TopLevel> {
        self.top.get(name)
    }

    /// Pattern bound to `top [sub]`.
    pub fn route_pattern(&self, top: &str, sub: Option<&str>) -> Option<&str> {
        self.verbs
            .get(top)?
            .get(&sub.map(str::to_string))
            .map(String::as_str)
    }

    /// Names of the given kind, sorted.
    pub fn names(&self, kind: TopLevel) -> Vec<&str> {
        self.top
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

fn kind_name(kind: &TopLevel) -> &'static str {
    match kind {
        TopLevel::Domain => "domain",
        TopLevel::Alias => "alias",
        TopLevel::Group => "command group",
        TopLevel::Reserved => "reserved name",
    }
}

/// An alias that survived registration, with what it expands to.
#[derive(Debug, Clone)]
pub struct RegisteredAlias {
    pub alias: Alias,
    pub canonical: CanonicalCommand,
}

/// Build the clap tree: global baseline options, one command per routed
/// domain, one per alias, and the pre-built group commands.
pub fn build_command(
    surface: &CommandSurface,
    registry: &RouteRegistry,
    aliases: &[RegisteredAlias],
    options: &OptionTable,
    groups: Vec<Command>,
) -> Command {
    let mut root = Command::new("xaheen")
        .about(ROOT_ABOUT)
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(
            BASELINE_OPTIONS
                .iter()
                .map(|spec| spec.to_arg().global(true)),
        );

    for top in surface.names(TopLevel::Domain) {
        if let Some(command) = domain_command(top, surface, registry, options) {
            root = root.subcommand(command);
        }
    }
    for registered in aliases {
        root = root.subcommand(alias_command(registered, options));
    }
    root.subcommands(groups)
}

fn domain_command(
    top: &str,
    surface: &CommandSurface,
    registry: &RouteRegistry,
    options: &OptionTable,
) -> Option<Command> {
    let bindings = surface.verbs.get(top)?;
    if let Some(pattern) = bindings.get(&None) {
        let route = registry.get_route(pattern)?;
        return Some(route_args(Command::new(top.to_string()), route, options));
    }

    let mut command = Command::new(top.to_string())
        .about(domain_about(top))
        .subcommand_required(true)
        .arg_required_else_help(true);
    // Registration order, not alphabetical
    for route in registry.routes() {
        let shape = route.shape();
        let (Some(route_top), Some(sub)) = (shape.top_level(), shape.sub_verb()) else {
            continue;
        };
        if route_top != top || bindings.get(&Some(sub.to_string())) != Some(&route.pattern) {
            continue;
        }
        command = command.subcommand(route_args(Command::new(sub.to_string()), route, options));
    }
    Some(command)
}

fn route_args(mut command: Command, route: &Route, options: &OptionTable) -> Command {
    if let Some(summary) = &route.summary {
        command = command.about(summary.clone());
    }
    if let Some(placeholder) = route.shape().target() {
        command = command.arg(target_arg(placeholder));
    }
    command.args(
        options
            .options_for(&route.domain, &route.action)
            .iter()
            .map(OptionSpec::to_arg),
    )
}

fn target_arg(placeholder: &Placeholder) -> Arg {
    Arg::new("target")
        .value_name(placeholder.name.to_uppercase())
        .required(placeholder.required)
        .action(ArgAction::Set)
}

fn alias_command(registered: &RegisteredAlias, options: &OptionTable) -> Command {
    let canonical = &registered.canonical;
    Command::new(registered.alias.alias.clone())
        .about(alias_about(&registered.alias))
        .arg(Arg::new("target").value_name("TARGET").action(ArgAction::Set))
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .args(
            options
                .options_for(&canonical.domain, &canonical.action)
                .iter()
                .map(OptionSpec::to_arg),
        )
}

/// Baseline flags read straight from argv, before the parser exists.
///
/// Logging and configuration are set up from these so that route
/// registration warnings are already visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub verbose: bool,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

impl GlobalFlags {
    /// Scan `argv` (program name first). Stops at `--`.
    pub fn scan<S: AsRef<str>>(argv: &[S]) -> Self {
        let mut flags = GlobalFlags::default();
        let mut iter = argv.iter().skip(1).map(AsRef::as_ref);
        while let Some(token) = iter.next() {
            match token {
                "--" => break,
                "--verbose" => flags.verbose = true,
                "--dry-run" => flags.dry_run = true,
                "--config" => flags.config = iter.next().map(PathBuf::from),
                other => {
                    if let Some(path) = other.strip_prefix("--config=") {
                        flags.config = Some(PathBuf::from(path));
                    }
                }
            }
        }
        flags
    }
}

/// Index of the first token naming a command, skipping the program name,
/// flags and the value of `--config`.
pub fn first_command_index<S: AsRef<str>>(argv: &[S]) -> Option<usize> {
    let mut skip_value = false;
    for (index, token) in argv.iter().enumerate().skip(1) {
        let token = token.as_ref();
        if skip_value {
            skip_value = false;
            continue;
        }
        if token == "--config" {
            skip_value = true;
            continue;
        }
        if token == "--" {
            return None;
        }
        if !token.starts_with('-') {
            return Some(index);
        }
    }
    None
}
