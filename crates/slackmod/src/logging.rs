//! Logging for the Slack module.
//!
//! Two pieces live here:
//!
//! - [`LoggerProxy`] - the [`Logger`] handed to the Slack client. Every record
//!   becomes a `tracing` event tagged with the proxy's name.
//! - [`LoggingBuilder`] - installs a `tracing-subscriber` for applications
//!   that do not set one up themselves.
//!
//! ```rust,ignore
//! use slackmod::logging::{LogFormat, LoggingBuilder};
//!
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("slackmod=trace")
//!     .format(LogFormat::Pretty)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use slackmod_core::{LogLevel, Logger};
use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

// =============================================================================
// LoggerProxy
// =============================================================================

/// Forwards client log records to `tracing`.
///
/// Records below the configured level are dropped before they reach the
/// subscriber. The level starts at [`LogLevel::Debug`].
#[derive(Debug)]
pub struct LoggerProxy {
    name: RwLock<String>,
    level: RwLock<LogLevel>,
}

impl Default for LoggerProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerProxy {
    /// Creates a proxy named `slackmod` at debug level.
    pub fn new() -> Self {
        Self {
            name: RwLock::new("slackmod".to_string()),
            level: RwLock::new(LogLevel::Debug),
        }
    }

    /// Returns the name records are tagged with.
    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    /// Returns whether a record at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.level.read()
    }
}

impl Logger for LoggerProxy {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let name = self.name.read();
        let logger = name.as_str();
        match level {
            LogLevel::Debug => debug!(logger, "{message}"),
            LogLevel::Info => info!(logger, "{message}"),
            LogLevel::Warn => warn!(logger, "{message}"),
            LogLevel::Error => error!(logger, "{message}"),
        }
    }

    fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    fn level(&self) -> LogLevel {
        *self.level.read()
    }

    fn set_name(&self, name: &str) {
        *self.name.write() = name.to_string();
    }
}

/// Maps a client log level onto the matching `tracing` level.
pub fn tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    }
}

// =============================================================================
// Subscriber setup
// =============================================================================

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Single-line with all span context.
    Full,
    /// Multi-line, human oriented.
    Pretty,
    /// Newline-delimited JSON.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where the installed subscriber writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// The file set with [`LoggingBuilder::file_path`].
    File,
}

/// A builder for the global `tracing` subscriber.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    with_thread_ids: bool,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Creates a builder writing compact records to stdout.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Sets the base level used when `RUST_LOG` is not set.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the base level from a client log level.
    pub fn with_log_level(self, level: LogLevel) -> Self {
        self.with_level(tracing_level(level))
    }

    /// Adds a filter directive such as `slackmod=trace`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Sets the file written when the output is [`LogOutput::File`].
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base = self
            .level
            .unwrap_or(tracing::Level::INFO)
            .to_string()
            .to_lowercase();

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base));
        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => tracing_subscriber::registry()
                        .with(fmt::layer().json().with_writer($writer))
                        .with(filter)
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(
                            fmt::layer()
                                .compact()
                                .with_target(self.with_target)
                                .with_thread_ids(self.with_thread_ids)
                                .with_writer($writer),
                        )
                        .with(filter)
                        .try_init(),
                    LogFormat::Full => tracing_subscriber::registry()
                        .with(
                            fmt::layer()
                                .with_target(self.with_target)
                                .with_thread_ids(self.with_thread_ids)
                                .with_writer($writer),
                        )
                        .with(filter)
                        .try_init(),
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(
                            fmt::layer()
                                .pretty()
                                .with_target(self.with_target)
                                .with_thread_ids(self.with_thread_ids)
                                .with_writer($writer),
                        )
                        .with(filter)
                        .try_init(),
                }
            };
        }

        match self.output {
            LogOutput::Stdout => init_with_writer!(std::io::stdout),
            LogOutput::Stderr => init_with_writer!(std::io::stderr),
            LogOutput::File => match &self.file_path {
                Some(path) => {
                    let appender = tracing_appender::rolling::never(
                        path.parent().unwrap_or_else(|| Path::new(".")),
                        path.file_name().unwrap_or_else(|| OsStr::new("slackmod.log")),
                    );
                    init_with_writer!(appender)
                }
                None => {
                    let result = init_with_writer!(std::io::stdout);
                    warn!("File output requested but no file path configured, using stdout");
                    result
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Capture::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        sink.text()
    }

    #[test]
    fn test_default_level_is_debug() {
        let proxy = LoggerProxy::new();
        assert_eq!(proxy.level(), LogLevel::Debug);
        assert!(proxy.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_records_carry_logger_name() {
        let proxy = LoggerProxy::new();
        proxy.set_name("Slack");

        let out = capture(|| proxy.info("socket connected"));
        assert!(out.contains("socket connected"));
        assert!(out.contains("logger=\"Slack\"") || out.contains("logger=Slack"));
    }

    #[test]
    fn test_records_below_level_are_dropped() {
        let proxy = LoggerProxy::new();
        proxy.set_level(LogLevel::Warn);

        let out = capture(|| {
            proxy.debug("noisy detail");
            proxy.info("routine");
            proxy.error("request failed");
        });
        assert!(!out.contains("noisy detail"));
        assert!(!out.contains("routine"));
        assert!(out.contains("request failed"));
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(tracing_level(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing_level(LogLevel::Debug), tracing::Level::DEBUG);
    }
}
