//! CLI help text and the command-name contract used in log fields.

use crate::alias::Alias;
use crate::command::CliCommand;

pub const ROOT_ABOUT: &str = "Xaheen: project scaffolding, generation and deployment tooling";

/// Command name for logs (e.g. "project.create").
pub fn command_name(command: &CliCommand) -> String {
    format!("{}.{}", command.domain, command.action)
}

pub fn domain_about(domain: &str) -> String {
    format!("{} commands", capitalize(domain))
}

pub fn alias_about(alias: &Alias) -> String {
    if alias.description.is_empty() {
        format!("Alias for `{}`", alias.original_command)
    } else {
        format!("{} (alias for `{}`)", alias.description, alias.original_command)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
