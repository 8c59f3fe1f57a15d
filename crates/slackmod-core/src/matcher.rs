//! Matchers decide whether an inbound event routes to a listener.
//!
//! A [`Matcher`] is the value recorded on a handler descriptor. It is kept
//! exactly as written: a pattern stays as its source string until the client
//! compiles it at registration time into a [`CompiledMatcher`].

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// A listener matcher as written by the application.
///
/// The catch-all matcher is the absence of one (`Option::<Matcher>::None`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Matcher {
    /// A literal string.
    Exact(String),
    /// A regular expression source.
    Pattern(String),
}

impl Matcher {
    /// Creates a literal matcher.
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    /// Creates a pattern matcher from a regular expression source.
    ///
    /// The source is not validated here; the client rejects malformed
    /// patterns when the listener is registered.
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(source.into())
    }

    /// Returns the matcher text exactly as it was written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(s) | Self::Pattern(s) => s,
        }
    }

    /// Compiles this matcher for dispatch.
    pub fn compile(&self) -> Result<CompiledMatcher, RegistrationError> {
        match self {
            Self::Exact(s) => Ok(CompiledMatcher::Exact(s.clone())),
            Self::Pattern(source) => Regex::new(source)
                .map(CompiledMatcher::Pattern)
                .map_err(|e| RegistrationError::InvalidPattern {
                    pattern: source.clone(),
                    source: e,
                }),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_string())
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Self::Exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(value: Regex) -> Self {
        Self::Pattern(value.as_str().to_string())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "{s:?}"),
            Self::Pattern(s) => write!(f, "/{s}/"),
        }
    }
}

/// A matcher ready for dispatch.
#[derive(Debug, Clone)]
pub enum CompiledMatcher {
    /// A literal string.
    Exact(String),
    /// A compiled regular expression.
    Pattern(Regex),
}

impl CompiledMatcher {
    /// Matches an identifier (action id, command name, callback id, event type).
    ///
    /// Literals must be equal; patterns may match anywhere in the value.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => s == value,
            Self::Pattern(re) => re.is_match(value),
        }
    }

    /// Matches message text.
    ///
    /// Literals match as a substring of the text.
    pub fn is_match_text(&self, text: &str) -> bool {
        match self {
            Self::Exact(s) => text.contains(s.as_str()),
            Self::Pattern(re) => re.is_match(text),
        }
    }
}
