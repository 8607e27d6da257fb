//! Legacy verb compatibility: spellings from the two earlier CLI generations.

use crate::route::{Route, RouteRegistry};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Earlier CLI generation whose verbs are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LegacyCli {
    Xaheen,
    Xala,
}

impl LegacyCli {
    pub const ALL: [LegacyCli; 2] = [LegacyCli::Xaheen, LegacyCli::Xala];

    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyCli::Xaheen => "xaheen",
            LegacyCli::Xala => "xala",
        }
    }
}

impl fmt::Display for LegacyCli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegacyCli {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xaheen" => Ok(LegacyCli::Xaheen),
            "xala" => Ok(LegacyCli::Xala),
            other => Err(format!("Unknown legacy CLI: {}", other)),
        }
    }
}

/// Legacy verbs a route answers to, per CLI generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyNames {
    verbs: BTreeMap<LegacyCli, Vec<String>>,
}

impl LegacyNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xaheen<I, S>(self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(LegacyCli::Xaheen, verbs)
    }

    pub fn xala<I, S>(self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(LegacyCli::Xala, verbs)
    }

    pub fn with<I, S>(mut self, cli: LegacyCli, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.verbs
            .entry(cli)
            .or_default()
            .extend(verbs.into_iter().map(Into::into));
        self
    }

    pub fn verbs(&self, cli: LegacyCli) -> &[String] {
        self.verbs.get(&cli).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// First route, in registration order, whose `legacy[cli_name]` contains `verb`.
///
/// An unknown `cli_name` is treated as "no match".
pub fn find_route_by_legacy<'a>(
    registry: &'a RouteRegistry,
    cli_name: &str,
    verb: &str,
) -> Option<&'a Route> {
    let cli = cli_name.parse::<LegacyCli>().ok()?;
    registry.routes().find(|route| route.matches_legacy(cli, verb))
}

/// Resolve a bare verb against every legacy generation, newest first.
pub fn resolve_legacy_verb<'a>(
    registry: &'a RouteRegistry,
    verb: &str,
) -> Option<(LegacyCli, &'a Route)> {
    LegacyCli::ALL.iter().find_map(|cli| {
        find_route_by_legacy(registry, cli.as_str(), verb).map(|route| (*cli, route))
    })
}
