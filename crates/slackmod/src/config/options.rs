//! Caller-supplied module options.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use slackmod_core::{LogLevel, Logger};

/// Options passed to [`SlackModule::for_root`](crate::SlackModule::for_root)
/// or returned by the async factory.
///
/// Every field is an override: unset fields leave the value from defaults,
/// the config file or the environment in place.
#[derive(Clone, Default)]
pub struct SlackModuleOptions {
    /// Bot token, overrides `SLACK_BOT_TOKEN`.
    pub token: Option<String>,
    /// Signing secret, overrides `SLACK_SIGNING_SECRET`.
    pub signing_secret: Option<String>,
    /// Socket mode switch, overrides `SLACK_SOCKET_MODE`.
    pub socket_mode: Option<bool>,
    /// App-level token, overrides `SLACK_APP_TOKEN`.
    pub app_token: Option<String>,
    /// Minimum client log level.
    pub log_level: Option<LogLevel>,
    /// Logger the client writes to instead of the module's logger proxy.
    pub logger: Option<Arc<dyn Logger>>,
    /// Client options passed through as-is.
    pub extra: BTreeMap<String, Value>,
}

impl SlackModuleOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bot token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the signing secret.
    pub fn signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = Some(secret.into());
        self
    }

    /// Enables or disables socket mode.
    pub fn socket_mode(mut self, enabled: bool) -> Self {
        self.socket_mode = Some(enabled);
        self
    }

    /// Sets the app-level token.
    pub fn app_token(mut self, token: impl Into<String>) -> Self {
        self.app_token = Some(token.into());
        self
    }

    /// Sets the client log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Replaces the logger handed to the client.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Adds a pass-through client option.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The overrides as a configuration layer: only fields that are set.
    pub(crate) fn overrides(&self) -> Overrides<'_> {
        Overrides {
            bot_token: self.token.as_deref(),
            signing_secret: self.signing_secret.as_deref(),
            socket_mode: self.socket_mode,
            app_token: self.app_token.as_deref(),
            log_level: self.log_level,
            extra: &self.extra,
        }
    }
}

impl fmt::Debug for SlackModuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("SlackModuleOptions")
            .field("token", &redact(&self.token))
            .field("signing_secret", &redact(&self.signing_secret))
            .field("socket_mode", &self.socket_mode)
            .field("app_token", &redact(&self.app_token))
            .field("log_level", &self.log_level)
            .field("logger", &self.logger.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Serialized form of [`SlackModuleOptions`], keyed like `SlackConfig`.
#[derive(Serialize)]
pub(crate) struct Overrides<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing_secret: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    socket_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<LogLevel>,
    #[serde(skip_serializing_if = "no_extra")]
    extra: &'a BTreeMap<String, Value>,
}

fn no_extra(extra: &&BTreeMap<String, Value>) -> bool {
    extra.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_set_fields_are_serialized() {
        let options = SlackModuleOptions::new().token("xoxb-1").socket_mode(false);
        let value = serde_json::to_value(options.overrides()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "bot_token": "xoxb-1", "socket_mode": false })
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let options = SlackModuleOptions::new().signing_secret("hunter2");
        let printed = format!("{options:?}");
        assert!(!printed.contains("hunter2"));
    }
}
