//! CLI route: the command parser and the application context that owns it.
//!
//! Startup registers, in order, the route table, aliases, auxiliary groups and
//! built-in handlers. Anything that fails to register is logged and skipped;
//! startup itself never fails. Dispatch turns argv into a [`CliCommand`] and
//! hands it to the matched route's handler.

use crate::alias::{Alias, AliasResolver};
use crate::cli::groups::{builtin_groups, CommandGroup};
use crate::cli::help::command_name;
use crate::cli::options::{collect_options, OptionTable};
use crate::cli::parse::{
    build_command, first_command_index, CommandSurface, RegisteredAlias, TopLevel,
};
use crate::command::CliCommand;
use crate::error::CliError;
use crate::handler::builtin::register_builtin_handlers;
use crate::handler::HandlerFactory;
use crate::route::legacy::resolve_legacy_verb;
use crate::route::table::builtin_routes;
use crate::route::{Route, RouteRegistry};
use clap::error::ErrorKind;
use clap::{ArgMatches, Command};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Lifecycle of the parser slot in [`AppContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Uninitialized,
    Initializing,
    Ready,
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route handler ran to completion.
    Completed { domain: String, action: String },
    /// Help, version or group output to print on stdout.
    Rendered(String),
    /// An alias could not be turned into a routed command. Nothing ran.
    Unresolved { input: String },
}

impl DispatchOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchOutcome::Unresolved { .. } => 1,
            _ => 0,
        }
    }
}

/// Builder for [`CommandParser`]; defaults to the compiled-in tables.
pub struct CommandParserBuilder {
    factory: Arc<HandlerFactory>,
    routes: Option<Vec<Route>>,
    aliases: AliasResolver,
    groups: Vec<Box<dyn CommandGroup>>,
    options: Option<OptionTable>,
    builtin_handlers: bool,
}

impl CommandParserBuilder {
    /// Replace the route table.
    pub fn routes(mut self, routes: Vec<Route>) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Add aliases on top of the current set.
    pub fn aliases(mut self, aliases: Vec<Alias>) -> Self {
        self.aliases.extend(aliases);
        self
    }

    /// Replace the alias set.
    pub fn alias_resolver(mut self, resolver: AliasResolver) -> Self {
        self.aliases = resolver;
        self
    }

    pub fn group(mut self, group: Box<dyn CommandGroup>) -> Self {
        self.groups.push(group);
        self
    }

    pub fn option_table(mut self, options: OptionTable) -> Self {
        self.options = Some(options);
        self
    }

    /// Whether domains without a handler get a built-in one (default: true).
    pub fn builtin_handlers(mut self, enabled: bool) -> Self {
        self.builtin_handlers = enabled;
        self
    }

    pub fn build(self) -> CommandParser {
        let routes = self
            .routes
            .unwrap_or_else(|| builtin_routes(Arc::clone(&self.factory)));
        let options = self.options.unwrap_or_else(OptionTable::builtin);
        let mut surface = CommandSurface::new();
        let mut registry = RouteRegistry::new();

        for route in routes {
            if let Err(reason) = surface.claim_route(&route) {
                warn!(pattern = %route.pattern, "Skipping route: {}", reason);
                continue;
            }
            registry.register_route(route);
        }
        let validation = registry.validate_routes();
        for message in &validation.errors {
            error!("Route table: {}", message);
        }
        for message in &validation.warnings {
            warn!("Route table: {}", message);
        }

        let mut registered_aliases = Vec::new();
        for alias in self.aliases.aliases() {
            let Some(canonical) = self.aliases.resolve(alias, &registry) else {
                error!(
                    alias = %alias.alias,
                    command = %alias.original_command,
                    "Alias does not name a routed command; skipping"
                );
                continue;
            };
            if let Err(reason) = surface.claim_alias(&alias.alias) {
                error!(alias = %alias.alias, "Skipping alias: {}", reason);
                continue;
            }
            registered_aliases.push(RegisteredAlias {
                alias: alias.clone(),
                canonical,
            });
        }

        let mut groups = Vec::new();
        let mut group_commands = Vec::new();
        for group in self.groups {
            let command = match group.command() {
                Ok(command) => command,
                Err(e) => {
                    warn!(group = group.name(), error = %e, "Skipping command group");
                    continue;
                }
            };
            if let Err(reason) = surface.claim_group(group.name()) {
                warn!(group = group.name(), "Skipping command group: {}", reason);
                continue;
            }
            group_commands.push(command.name(group.name().to_string()));
            groups.push(group);
        }

        if self.builtin_handlers {
            register_builtin_handlers(&self.factory, &registry);
        }
        if !options.rejected().is_empty() {
            debug!(rejected = options.rejected().len(), "Option table entries rejected");
        }

        let command = build_command(&surface, &registry, &registered_aliases, &options, group_commands);
        info!(
            routes = registry.len(),
            domains = registry.domains().len(),
            aliases = registered_aliases.len(),
            groups = groups.len(),
            "Command parser ready"
        );

        CommandParser {
            factory: self.factory,
            registry,
            resolver: self.aliases,
            registered_aliases,
            groups,
            surface,
            options,
            command,
        }
    }
}

/// Routes argv to domain handlers.
pub struct CommandParser {
    factory: Arc<HandlerFactory>,
    registry: RouteRegistry,
    resolver: AliasResolver,
    registered_aliases: Vec<RegisteredAlias>,
    groups: Vec<Box<dyn CommandGroup>>,
    surface: CommandSurface,
    options: OptionTable,
    command: Command,
}

impl CommandParser {
    pub fn builder(factory: Arc<HandlerFactory>) -> CommandParserBuilder {
        CommandParserBuilder {
            factory,
            routes: None,
            aliases: AliasResolver::builtin(),
            groups: builtin_groups(),
            options: None,
            builtin_handlers: true,
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn factory(&self) -> &Arc<HandlerFactory> {
        &self.factory
    }

    pub fn alias_resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    /// Aliases that made it onto the command line surface.
    pub fn registered_aliases(&self) -> &[RegisteredAlias] {
        &self.registered_aliases
    }

    pub fn surface(&self) -> &CommandSurface {
        &self.surface
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Parse `argv` (program name first) and run whatever it names.
    pub async fn dispatch<I, S>(&self, argv: I) -> Result<DispatchOutcome, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = self.rewrite_legacy(argv.into_iter().map(Into::into).collect());
        let matches = match self.command.clone().try_get_matches_from(&argv) {
            Ok(matches) => matches,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        Ok(DispatchOutcome::Rendered(e.render().to_string()))
                    }
                    _ => Err(CliError::Usage(e.render().to_string())),
                }
            }
        };
        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(DispatchOutcome::Rendered(self.render_help()));
        };

        match self.surface.kind(name) {
            Some(TopLevel::Domain) => self.dispatch_route(name, sub_matches).await,
            Some(TopLevel::Alias) => self.dispatch_alias(name, sub_matches).await,
            Some(TopLevel::Group) => {
                let group = self
                    .groups
                    .iter()
                    .find(|group| group.name() == name)
                    .ok_or_else(|| CliError::RouteNotFound(name.to_string()))?;
                group.run(self, sub_matches).map(DispatchOutcome::Rendered)
            }
            Some(TopLevel::Reserved) | None => Err(CliError::RouteNotFound(name.to_string())),
        }
    }

    async fn dispatch_route(
        &self,
        top: &str,
        matches: &ArgMatches,
    ) -> Result<DispatchOutcome, CliError> {
        let (sub, leaf) = match matches.subcommand() {
            Some((sub, leaf)) => (Some(sub), leaf),
            None => (None, matches),
        };
        let route = self
            .surface
            .route_pattern(top, sub)
            .and_then(|pattern| self.registry.get_route(pattern))
            .ok_or_else(|| {
                CliError::RouteNotFound(match sub {
                    Some(sub) => format!("{} {}", top, sub),
                    None => top.to_string(),
                })
            })?;

        let target = leaf.try_get_one::<String>("target").ok().flatten().cloned();
        let mut command = CliCommand::new(&route.domain, &route.action).with_target(target);
        command.options = collect_options(
            &self.options.all_options_for(&route.domain, &route.action),
            leaf,
        );
        self.invoke(route, command).await
    }

    async fn dispatch_alias(
        &self,
        token: &str,
        matches: &ArgMatches,
    ) -> Result<DispatchOutcome, CliError> {
        // clap already took the known options; what is left is literal
        let mut tokens = vec![token.to_string(), "--".to_string()];
        tokens.extend(matches.try_get_one::<String>("target").ok().flatten().cloned());
        if let Ok(Some(args)) = matches.try_get_many::<String>("args") {
            tokens.extend(args.cloned());
        }

        let resolution = self.resolver.process_arguments(&tokens, &self.registry);
        let command = match resolution.command {
            Some(command) if resolution.resolved => command,
            _ => {
                error!(alias = token, "Alias could not be resolved");
                return Ok(DispatchOutcome::Unresolved {
                    input: token.to_string(),
                });
            }
        };

        let overrides = collect_options(
            &self.options.all_options_for(&command.domain, &command.action),
            matches,
        );
        let command = command.redirected(&overrides);
        let Some(route) = self.find_route_for_command(&command) else {
            let original = self
                .resolver
                .get(token)
                .map(|alias| alias.original_command.clone())
                .unwrap_or_else(|| command.display_line());
            error!(alias = token, command = %original, "No route found for alias command");
            return Ok(DispatchOutcome::Unresolved {
                input: token.to_string(),
            });
        };
        self.invoke(route, command).await
    }

    /// Route for an alias-produced command.
    ///
    /// First a route whose pattern contains `"<domain> <action>[ <target>]"`
    /// as a substring, then the first route for `{domain, action}`. The
    /// substring test is loose: `"service add"` also matches a
    /// `"microservice add [name]"` registered before it.
    pub fn find_route_for_command(&self, command: &CliCommand) -> Option<&Route> {
        let composed = command.display_line();
        self.registry
            .routes()
            .find(|route| route.pattern.contains(&composed))
            .or_else(|| self.registry.find_route_for(&command.domain, &command.action))
    }

    /// Rewrite a leading legacy verb into its route's verbs (on a copy).
    fn rewrite_legacy(&self, mut argv: Vec<String>) -> Vec<String> {
        let Some(index) = first_command_index(&argv) else {
            return argv;
        };
        if self.surface.kind(&argv[index]).is_some() {
            return argv;
        }
        let Some((cli, route)) = resolve_legacy_verb(&self.registry, &argv[index]) else {
            return argv;
        };
        info!(
            legacy_cli = %cli,
            verb = %argv[index],
            route = %route.pattern,
            "Legacy command mapped"
        );
        let verbs = route.shape().verbs;
        argv.splice(index..=index, verbs);
        argv
    }

    async fn invoke(&self, route: &Route, command: CliCommand) -> Result<DispatchOutcome, CliError> {
        let name = command_name(&command);
        info!(
            command = %name,
            pattern = %route.pattern,
            dry_run = command.is_dry_run(),
            "Dispatching command"
        );
        let (domain, action) = (command.domain.clone(), command.action.clone());
        (route.handler)(command).await?;
        debug!(command = %name, "Command completed");
        Ok(DispatchOutcome::Completed { domain, action })
    }
}

/// Application-scoped owner of the command parser.
///
/// Created once in `main`. [`AppContext::command_parser`] builds the parser on
/// first use and hands out the same instance afterwards.
pub struct AppContext {
    factory: Arc<HandlerFactory>,
    aliases: Vec<Alias>,
    state: ParserState,
    parser: Option<Arc<CommandParser>>,
}

impl AppContext {
    pub fn new(factory: Arc<HandlerFactory>) -> Self {
        Self {
            factory,
            aliases: Vec::new(),
            state: ParserState::Uninitialized,
            parser: None,
        }
    }

    /// Extra aliases (from configuration) layered over the built-in set.
    pub fn with_aliases(mut self, aliases: Vec<Alias>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn factory(&self) -> &Arc<HandlerFactory> {
        &self.factory
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn command_parser(&mut self) -> Arc<CommandParser> {
        if let Some(parser) = &self.parser {
            return Arc::clone(parser);
        }
        self.state = ParserState::Initializing;
        debug!("Building command parser");
        let parser = Arc::new(
            CommandParser::builder(Arc::clone(&self.factory))
                .aliases(self.aliases.clone())
                .build(),
        );
        self.parser = Some(Arc::clone(&parser));
        self.state = ParserState::Ready;
        parser
    }

    /// Drop the parser; the next [`AppContext::command_parser`] builds a new one.
    pub fn reset(&mut self) {
        self.parser = None;
        self.state = ParserState::Uninitialized;
    }
}
