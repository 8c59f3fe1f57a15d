//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults ([`SlackConfig::default`])
//! 2. Configuration file (`slack.toml`), when one is given or found
//! 3. Environment variables
//! 4. Caller overrides ([`SlackModuleOptions`])
//!
//! # Environment Variables
//!
//! Only these four are read; every other `SLACK_*` variable is ignored:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SLACK_BOT_TOKEN` | `bot_token` |
//! | `SLACK_SIGNING_SECRET` | `signing_secret` |
//! | `SLACK_SOCKET_MODE` | `socket_mode` |
//! | `SLACK_APP_TOKEN` | `app_token` |
//!
//! Values are taken verbatim, so a token such as `123456` stays a string.
//! `SLACK_SOCKET_MODE` is false when empty or one of `0`, `false`, `no`, `off`
//! (any case) and true otherwise.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .with_current_dir()
//!     .load(&SlackModuleOptions::new().token("xoxb-..."))?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::options::SlackModuleOptions;
use slackmod_core::SlackConfig;

/// Environment variables the loader reads, without the `SLACK_` prefix.
const ENV_KEYS: [&str; 4] = ["bot_token", "signing_secret", "socket_mode", "app_token"];

/// `SLACK_SOCKET_MODE` values that turn socket mode off.
const FALSE_WORDS: [&str; 4] = ["0", "false", "no", "off"];

/// Base names searched for in each search path.
#[cfg(feature = "toml-config")]
const FILE_NAMES: [&str; 2] = ["slack.toml", "slackmod.toml"];

/// Configuration loader with figment-based multi-source support.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Directories searched for a configuration file.
    search_paths: Vec<PathBuf>,
    /// Whether to read environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader that reads defaults and the environment.
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a directory to search for `slack.toml`.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds `<user config dir>/slackmod` to the search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("slackmod"))
        } else {
            self
        }
    }

    /// Loads this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables reading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables reading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Assembles the configuration, applying `options` last.
    pub fn load(&self, options: &SlackModuleOptions) -> ConfigResult<SlackConfig> {
        let figment = self
            .build_figment()?
            .merge(Serialized::defaults(options.overrides()));

        let config: SlackConfig = figment.extract()?;
        debug!(
            socket_mode = config.socket_mode,
            bot_token = config.bot_token.is_some(),
            signing_secret = config.signing_secret.is_some(),
            app_token = config.app_token.is_some(),
            extra = config.extra.len(),
            "Slack configuration loaded"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SlackConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_config_file(figment, path)?;
        } else if let Some(path) = self.find_config_file() {
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_config_file(figment, &path)?;
        }

        if self.load_env {
            trace!("Loading SLACK_ environment variables");
            figment = figment.merge(Serialized::defaults(EnvLayer::read()));
        }

        Ok(figment)
    }

    #[cfg(feature = "toml-config")]
    fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.exists())
    }

    #[cfg(not(feature = "toml-config"))]
    fn find_config_file(&self) -> Option<PathBuf> {
        if !self.search_paths.is_empty() {
            trace!("toml-config is disabled, skipping configuration file search");
        }
        None
    }
}

/// The `SLACK_*` variables that are set, kept as raw strings.
#[derive(Debug, Default, Serialize)]
struct EnvLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    socket_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_token: Option<String>,
}

impl EnvLayer {
    fn read() -> Self {
        let mut layer = Self::default();
        for (key, value) in Env::prefixed("SLACK_").only(&ENV_KEYS).iter() {
            match key.as_str() {
                "bot_token" => layer.bot_token = Some(value),
                "signing_secret" => layer.signing_secret = Some(value),
                "socket_mode" => layer.socket_mode = Some(is_truthy(&value)),
                "app_token" => layer.app_token = Some(value),
                _ => {}
            }
        }
        layer
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value))
}

/// Merges a single config file, dispatching on its extension.
fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use slackmod_core::LogLevel;

    #[test]
    fn test_defaults_without_env() {
        let config = ConfigLoader::new()
            .without_env()
            .load(&SlackModuleOptions::new())
            .unwrap();
        assert_eq!(config, SlackConfig::default());
    }

    #[test]
    fn test_overrides_win_over_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SLACK_BOT_TOKEN", "env-token");
            jail.set_env("SLACK_SIGNING_SECRET", "env-secret");

            let options = SlackModuleOptions::new().token("override-token");
            let config = ConfigLoader::new()
                .load(&options)
                .map_err(|e| e.to_string())?;

            assert_eq!(config.bot_token.as_deref(), Some("override-token"));
            assert_eq!(config.signing_secret.as_deref(), Some("env-secret"));
            Ok(())
        });
    }

    #[test]
    fn test_only_known_env_vars_are_read() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SLACK_SOCKET_MODE", "true");
            jail.set_env("SLACK_APP_TOKEN", "xapp-1");
            jail.set_env("SLACK_LOG_LEVEL", "error");
            jail.set_env("SLACK_CHANNEL", "general");

            let config = ConfigLoader::new()
                .load(&SlackModuleOptions::new())
                .map_err(|e| e.to_string())?;

            assert!(config.socket_mode);
            assert_eq!(config.app_token.as_deref(), Some("xapp-1"));
            assert_eq!(config.log_level, None);
            assert!(config.extra.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_env_values_are_not_typed() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SLACK_BOT_TOKEN", "true");
            jail.set_env("SLACK_SIGNING_SECRET", "123456");
            jail.set_env("SLACK_APP_TOKEN", "1.5");

            let config = ConfigLoader::new()
                .load(&SlackModuleOptions::new())
                .map_err(|e| e.to_string())?;

            assert_eq!(config.bot_token.as_deref(), Some("true"));
            assert_eq!(config.signing_secret.as_deref(), Some("123456"));
            assert_eq!(config.app_token.as_deref(), Some("1.5"));
            Ok(())
        });
    }

    #[test]
    fn test_socket_mode_truthiness() {
        let cases = [
            ("1", true),
            ("TRUE", true),
            ("yes", true),
            ("", false),
            ("0", false),
            ("False", false),
            (" off ", false),
        ];
        for (raw, expected) in cases {
            Jail::expect_with(|jail| {
                jail.clear_env();
                jail.set_env("SLACK_SOCKET_MODE", raw);

                let config = ConfigLoader::new()
                    .load(&SlackModuleOptions::new())
                    .map_err(|e| e.to_string())?;

                assert_eq!(config.socket_mode, expected, "SLACK_SOCKET_MODE={raw:?}");
                Ok(())
            });
        }
    }

    #[test]
    fn test_file_then_env_then_overrides() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "slack.toml",
                r#"
                bot_token = "file-token"
                signing_secret = "file-secret"
                app_token = "file-app"
                log_level = "warn"

                [extra]
                retries = 3
                "#,
            )?;
            jail.set_env("SLACK_SIGNING_SECRET", "env-secret");
            jail.set_env("SLACK_APP_TOKEN", "env-app");

            let options = SlackModuleOptions::new().app_token("override-app");
            let config = ConfigLoader::new()
                .search_path(".")
                .load(&options)
                .map_err(|e| e.to_string())?;

            assert_eq!(config.bot_token.as_deref(), Some("file-token"));
            assert_eq!(config.signing_secret.as_deref(), Some("env-secret"));
            assert_eq!(config.app_token.as_deref(), Some("override-app"));
            assert_eq!(config.log_level, Some(LogLevel::Warn));
            assert_eq!(config.extra.get("retries"), Some(&serde_json::json!(3)));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let err = ConfigLoader::new()
            .without_env()
            .file("/nonexistent/slack.toml")
            .load(&SlackModuleOptions::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
