//! Alias resolution: short tokens that expand to a canonical `{domain, action, target}`.
//!
//! Aliases are independent of the route registry; they are resolved against it
//! with the same verb lookup the dispatcher uses for direct invocations.

use crate::command::{CliCommand, ValueMap};
use crate::route::RouteRegistry;
use comfy_table::Table;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Short token expanding to a canonical command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub alias: String,
    pub original_command: String,
    #[serde(default)]
    pub description: String,
}

impl Alias {
    pub fn new(
        alias: impl Into<String>,
        original_command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            original_command: original_command.into(),
            description: description.into(),
        }
    }
}

/// `{domain, action, target?}` an alias expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCommand {
    pub domain: String,
    pub action: String,
    pub target: Option<String>,
}

/// Result of [`AliasResolver::process_arguments`].
#[derive(Debug, Clone, PartialEq)]
pub struct AliasResolution {
    pub resolved: bool,
    pub command: Option<CliCommand>,
}

impl AliasResolution {
    fn unresolved() -> Self {
        Self {
            resolved: false,
            command: None,
        }
    }
}

const BUILTIN_ALIASES: &[(&str, &str, &str)] = &[
    ("new", "project create", "Create a new project"),
    ("c", "component create", "Create a new component"),
    ("s", "service add", "Add a service to the project"),
    ("g", "ai generate", "Generate code with AI assistance"),
    ("ls", "registry list", "List registry components"),
    ("i", "registry add", "Install a registry component"),
    ("sec", "security scan", "Run a security scan"),
    ("k8s", "deploy k8s", "Generate Kubernetes manifests"),
    ("up", "deploy docker", "Generate container deployment files"),
    ("mm", "make model", "Make a model"),
    ("mcp-start", "mcp serve", "Start the MCP server"),
    ("modernize", "template modernize", "Modernize legacy templates"),
];

/// Alias resolver
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    aliases: Vec<Alias>,
}

impl AliasResolver {
    pub fn new(aliases: Vec<Alias>) -> Self {
        Self { aliases }
    }

    /// Resolver holding the built-in alias set.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ALIASES
                .iter()
                .map(|(alias, command, description)| Alias::new(*alias, *command, *description))
                .collect(),
        )
    }

    /// Add aliases; an alias reusing an existing token replaces it.
    pub fn extend<I>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = Alias>,
    {
        for alias in aliases {
            if let Some(existing) = self.aliases.iter_mut().find(|a| a.alias == alias.alias) {
                warn!(
                    alias = %alias.alias,
                    previous = %existing.original_command,
                    replacement = %alias.original_command,
                    "Alias redefined"
                );
                *existing = alias;
            } else {
                self.aliases.push(alias);
            }
        }
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn get(&self, token: &str) -> Option<&Alias> {
        self.aliases.iter().find(|alias| alias.alias == token)
    }

    /// Expand `alias` to the `{domain, action, target}` it names, if that pair is routed.
    pub fn resolve(&self, alias: &Alias, registry: &RouteRegistry) -> Option<CanonicalCommand> {
        resolve_canonical(&alias.original_command, registry)
    }

    /// Resolve `tokens` (alias token followed by its arguments) into a command.
    ///
    /// Positionals fill the target (unless the canonical command fixes one) and
    /// then `arguments["args"]`. `--key value`, `--key=value` and bare `--flag`
    /// tokens become camelCase options; `--key` consumes the next token unless it
    /// starts with `--`. Everything after a bare `--` is positional.
    pub fn process_arguments(&self, tokens: &[String], registry: &RouteRegistry) -> AliasResolution {
        let Some((token, rest)) = tokens.split_first() else {
            return AliasResolution::unresolved();
        };
        let Some(alias) = self.get(token) else {
            return AliasResolution::unresolved();
        };
        let Some(canonical) = self.resolve(alias, registry) else {
            return AliasResolution::unresolved();
        };

        let (positionals, options) = split_tokens(rest);
        let mut positionals = positionals.into_iter();
        let target = canonical.target.clone().or_else(|| positionals.next());
        let extra: Vec<Value> = positionals.map(Value::String).collect();

        let mut command = CliCommand::new(canonical.domain, canonical.action).with_target(target);
        if !extra.is_empty() {
            command.arguments.insert("args".to_string(), Value::Array(extra));
        }
        command.options = options;

        AliasResolution {
            resolved: true,
            command: Some(command),
        }
    }

    /// Formatted listing of every alias.
    pub fn show_alias_help(&self) -> String {
        if self.aliases.is_empty() {
            return "No aliases configured.".to_string();
        }
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Alias", "Command", "Description"]);
        for alias in &self.aliases {
            table.add_row(vec![
                alias.alias.as_str(),
                alias.original_command.as_str(),
                alias.description.as_str(),
            ]);
        }
        format!(
            "Command aliases:\n{}\n\nTotal: {} alias(es)",
            table,
            self.aliases.len()
        )
    }
}

/// Map a canonical command string to a routed `{domain, action, target}`.
///
/// The first two tokens are looked up as verbs (so synonym spellings such as
/// `project new` resolve to their route's action); failing that they are taken
/// literally as a `{domain, action}` pair. A third token is the target.
pub fn resolve_canonical(original_command: &str, registry: &RouteRegistry) -> Option<CanonicalCommand> {
    let tokens: Vec<&str> = original_command.split_whitespace().collect();
    let (first, second) = match tokens.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => return None,
    };
    let target = tokens.get(2).map(|t| t.to_string());

    if let Some(route) = registry.resolve_verbs(first, Some(second)) {
        return Some(CanonicalCommand {
            domain: route.domain.clone(),
            action: route.action.clone(),
            target,
        });
    }
    if registry.has_domain_action(first, second) {
        return Some(CanonicalCommand {
            domain: first.to_string(),
            action: second.to_string(),
            target,
        });
    }
    None
}

/// `--dry-run` → `dryRun`.
pub fn option_key(flag: &str) -> String {
    let mut key = String::with_capacity(flag.len());
    let mut upper = false;
    for ch in flag.chars() {
        if ch == '-' || ch == '_' {
            upper = !key.is_empty();
        } else if upper {
            key.extend(ch.to_uppercase());
            upper = false;
        } else {
            key.push(ch);
        }
    }
    key
}

fn split_tokens(tokens: &[String]) -> (Vec<String>, ValueMap) {
    let mut positionals = Vec::new();
    let mut options = ValueMap::new();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        if token == "--" {
            positionals.extend(iter.by_ref().cloned());
            break;
        }
        let Some(flag) = token.strip_prefix("--") else {
            positionals.push(token.clone());
            continue;
        };
        if let Some((name, value)) = flag.split_once('=') {
            options.insert(option_key(name), Value::String(value.to_string()));
            continue;
        }
        match iter.peek() {
            Some(next) if !next.starts_with("--") => {
                options.insert(option_key(flag), Value::String((*next).clone()));
                iter.next();
            }
            _ => {
                options.insert(option_key(flag), Value::Bool(true));
            }
        }
    }
    (positionals, options)
}
