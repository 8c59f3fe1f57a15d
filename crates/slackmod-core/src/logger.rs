//! The logger shape a Slack client writes to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a client log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostics.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected but recoverable.
    Warn,
    /// A failure.
    Error,
}

impl LogLevel {
    /// Returns the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// The logger a client reports through.
///
/// Implementations use interior mutability: the name and level can be
/// changed on a logger that is already shared.
pub trait Logger: Send + Sync {
    /// Writes one record at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Sets the minimum level that is written.
    fn set_level(&self, level: LogLevel);

    /// Returns the minimum level that is written.
    fn level(&self) -> LogLevel;

    /// Sets the name records are tagged with.
    fn set_name(&self, name: &str);

    /// Writes a debug record.
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Writes an info record.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Writes a warning record.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Writes an error record.
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
