use serde::{Deserialize, Serialize};
use std::fmt;

/// The allow-list entry that skips prefix matching.
pub const WILDCARD: &str = "*";

/// One entry of an allowed link or image prefix list.
///
/// Written in config as a plain string: `"*"` is the wildcard, anything
/// else is a URL prefix such as `"https://github.com/"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AllowedPrefix {
    /// Any origin, restricted to `http`/`https`.
    Wildcard,
    /// A URL prefix, matched on origin and normalized string prefix.
    Specific(String),
}

impl AllowedPrefix {
    pub fn parse(s: &str) -> Self {
        if s == WILDCARD {
            Self::Wildcard
        } else {
            Self::Specific(s.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl From<String> for AllowedPrefix {
    fn from(s: String) -> Self {
        if s == WILDCARD {
            Self::Wildcard
        } else {
            Self::Specific(s)
        }
    }
}

impl From<&str> for AllowedPrefix {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<AllowedPrefix> for String {
    fn from(prefix: AllowedPrefix) -> Self {
        match prefix {
            AllowedPrefix::Wildcard => WILDCARD.to_string(),
            AllowedPrefix::Specific(s) => s,
        }
    }
}

impl fmt::Display for AllowedPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Specific(s) => f.write_str(s),
        }
    }
}

/// Parse a list of prefix strings from config.
pub fn parse_all<S: AsRef<str>>(prefixes: &[S]) -> Vec<AllowedPrefix> {
    prefixes.iter().map(|s| AllowedPrefix::parse(s.as_ref())).collect()
}

/// Whether the list holds at least one non-wildcard entry.
pub fn has_specific(prefixes: &[AllowedPrefix]) -> bool {
    prefixes.iter().any(|p| !p.is_wildcard())
}

/// Whether the list holds the wildcard.
pub fn has_wildcard(prefixes: &[AllowedPrefix]) -> bool {
    prefixes.iter().any(AllowedPrefix::is_wildcard)
}
