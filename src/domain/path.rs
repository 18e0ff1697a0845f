//! Command paths and the command-name grammar

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Ordered command names from the entry to the resolved command.
///
/// Only ever grows during resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    pub fn new(entry: impl Into<String>) -> Self {
        Self(vec![entry.into()])
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Names below the entry, i.e. the subcommand tokens that were consumed.
    pub fn subcommands(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for CommandPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

fn command_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("command name pattern is valid")
    })
}

/// Whether `token` can name a command: alphanumeric segments joined by single hyphens.
pub fn is_command_name(token: &str) -> bool {
    command_name_pattern().is_match(token)
}
