//! Option table: the shared baseline plus per-domain/action augmentations.
//!
//! Domains whose handlers drive an external tool (deploy, security, make,
//! mcp, template) accept extra options. Augmentation is purely additive: an
//! entry that would redefine a baseline option is rejected when the table is
//! built and the baseline is left untouched.

use clap::{value_parser, Arg, ArgAction, ArgMatches};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Flag,
    Value,
    Number,
}

/// One recognised option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Key in `CliCommand::options` (camelCase).
    pub key: &'static str,
    /// Long flag without leading dashes.
    pub long: &'static str,
    pub help: &'static str,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub const fn flag(key: &'static str, long: &'static str, help: &'static str) -> Self {
        Self {
            key,
            long,
            help,
            kind: OptionKind::Flag,
        }
    }

    pub const fn value(key: &'static str, long: &'static str, help: &'static str) -> Self {
        Self {
            key,
            long,
            help,
            kind: OptionKind::Value,
        }
    }

    pub const fn number(key: &'static str, long: &'static str, help: &'static str) -> Self {
        Self {
            key,
            long,
            help,
            kind: OptionKind::Number,
        }
    }

    pub fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.key).long(self.long).help(self.help);
        match self.kind {
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Value => arg.action(ArgAction::Set).num_args(1),
            OptionKind::Number => arg
                .action(ArgAction::Set)
                .num_args(1)
                .value_parser(value_parser!(u64)),
        }
    }

    /// Value parsed by clap, if this option is defined on `matches`.
    pub fn read(&self, matches: &ArgMatches) -> Option<Value> {
        match self.kind {
            OptionKind::Flag => matches
                .try_get_one::<bool>(self.key)
                .ok()
                .flatten()
                .map(|b| Value::Bool(*b)),
            OptionKind::Value => matches
                .try_get_one::<String>(self.key)
                .ok()
                .flatten()
                .map(|s| Value::String(s.clone())),
            OptionKind::Number => matches
                .try_get_one::<u64>(self.key)
                .ok()
                .flatten()
                .map(|n| Value::from(*n)),
        }
    }
}

/// Options every command accepts.
pub const BASELINE_OPTIONS: &[OptionSpec] = &[
    OptionSpec::flag("verbose", "verbose", "Enable verbose output"),
    OptionSpec::flag("dryRun", "dry-run", "Show what would be done without doing it"),
    OptionSpec::value("config", "config", "Path to a configuration file"),
];

struct Augmentation {
    domain: &'static str,
    action: Option<&'static str>,
    options: &'static [OptionSpec],
}

const AUGMENTATIONS: &[Augmentation] = &[
    Augmentation {
        domain: "deploy",
        action: None,
        options: &[
            OptionSpec::value("platform", "platform", "Target platform (aws, azure, gcp)"),
            OptionSpec::value("environment", "env", "Deployment environment"),
            OptionSpec::value("namespace", "namespace", "Kubernetes namespace"),
            OptionSpec::number("replicas", "replicas", "Replica count"),
        ],
    },
    Augmentation {
        domain: "deploy",
        action: Some("k8s"),
        options: &[OptionSpec::flag("helm", "helm", "Emit a Helm chart")],
    },
    Augmentation {
        domain: "security",
        action: None,
        options: &[
            OptionSpec::value("severity", "severity", "Minimum severity to report"),
            OptionSpec::value("format", "format", "Report format (text, json, sarif)"),
            OptionSpec::value("output", "output", "Write the report to a file"),
            OptionSpec::flag("failOnCritical", "fail-on-critical", "Exit 2 on critical findings"),
        ],
    },
    Augmentation {
        domain: "make",
        action: None,
        options: &[
            OptionSpec::flag("force", "force", "Overwrite existing files"),
            OptionSpec::value("template", "template", "Template to generate from"),
        ],
    },
    Augmentation {
        domain: "mcp",
        action: None,
        options: &[
            OptionSpec::number("port", "port", "Server port"),
            OptionSpec::value("host", "host", "Server host"),
        ],
    },
    Augmentation {
        domain: "mcp",
        action: Some("serve"),
        options: &[OptionSpec::value("transport", "transport", "Transport (stdio, sse)")],
    },
    Augmentation {
        domain: "template",
        action: Some("modernize"),
        options: &[
            OptionSpec::value("from", "from", "Source template generation"),
            OptionSpec::value("to", "to", "Target template generation"),
            OptionSpec::flag("backup", "backup", "Back up files before rewriting"),
        ],
    },
];

type TableKey = (String, Option<String>);

/// Validated `{domain, action?} → options` table.
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    entries: HashMap<TableKey, Vec<OptionSpec>>,
    rejected: Vec<String>,
}

impl OptionTable {
    /// Table built from the compiled-in augmentations.
    pub fn builtin() -> Self {
        Self::from_entries(
            AUGMENTATIONS
                .iter()
                .map(|aug| (aug.domain, aug.action, aug.options.to_vec())),
        )
    }

    /// Build and validate a table. Rejected entries are logged and kept in
    /// [`OptionTable::rejected`].
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>, Vec<OptionSpec>)>,
    {
        let mut table = OptionTable::default();
        for (domain, action, options) in entries {
            let key = (domain.to_string(), action.map(str::to_string));
            for option in options {
                if let Some(reason) = table.rejection_reason(&key, &option) {
                    let scope = match action {
                        Some(action) => format!("{} {}", domain, action),
                        None => domain.to_string(),
                    };
                    warn!(scope = %scope, option = option.long, "Option rejected: {}", reason);
                    table
                        .rejected
                        .push(format!("{}: --{} ({})", scope, option.long, reason));
                    continue;
                }
                table.entries.entry(key.clone()).or_default().push(option);
            }
        }
        table
    }

    fn rejection_reason(&self, key: &TableKey, option: &OptionSpec) -> Option<&'static str> {
        let clashes = |other: &OptionSpec| other.key == option.key || other.long == option.long;
        if BASELINE_OPTIONS.iter().any(clashes) {
            return Some("redefines a baseline option");
        }
        if option.long.is_empty() || option.long.starts_with('-') {
            return Some("invalid long name");
        }
        let domain_wide = (key.0.clone(), None);
        let scopes = [Some(key), if key.1.is_some() { Some(&domain_wide) } else { None }];
        let duplicate = scopes
            .iter()
            .flatten()
            .filter_map(|scope| self.entries.get(*scope))
            .any(|existing| existing.iter().any(clashes));
        if duplicate {
            return Some("duplicates an option in the same scope");
        }
        None
    }

    /// Domain-wide options followed by action-specific ones (no baseline).
    pub fn options_for(&self, domain: &str, action: &str) -> Vec<OptionSpec> {
        let mut out = Vec::new();
        for key in [
            (domain.to_string(), None),
            (domain.to_string(), Some(action.to_string())),
        ] {
            if let Some(options) = self.entries.get(&key) {
                out.extend(options.iter().cloned());
            }
        }
        out
    }

    /// Baseline followed by [`OptionTable::options_for`].
    pub fn all_options_for(&self, domain: &str, action: &str) -> Vec<OptionSpec> {
        let mut out = BASELINE_OPTIONS.to_vec();
        out.extend(self.options_for(domain, action));
        out
    }

    pub fn augmented_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.entries.keys().map(|(d, _)| d.clone()).collect();
        domains.sort();
        domains.dedup();
        domains
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

/// Read every option in `specs` from `matches` into a value map.
pub fn collect_options(specs: &[OptionSpec], matches: &ArgMatches) -> crate::command::ValueMap {
    specs
        .iter()
        .filter_map(|spec| spec.read(matches).map(|value| (spec.key.to_string(), value)))
        .collect()
}
