//! Client configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::logger::LogLevel;

/// Settings a Slack client is constructed from.
///
/// Credentials are optional at this level; [`validate`](Self::validate)
/// decides which combination a client accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot user OAuth token (`xoxb-...`).
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Secret used to verify HTTP requests from Slack.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Receive events over a socket-mode connection instead of HTTP.
    #[serde(default)]
    pub socket_mode: bool,

    /// App-level token (`xapp-...`) used by socket mode.
    #[serde(default)]
    pub app_token: Option<String>,

    /// Minimum level for the client logger.
    #[serde(default)]
    pub log_level: Option<LogLevel>,

    /// Client options this crate does not interpret.
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

impl SlackConfig {
    /// Checks that the credentials needed by the configured mode are present.
    pub fn validate(&self) -> Result<(), ClientError> {
        if is_blank(&self.bot_token) {
            return Err(ClientError::MissingBotToken);
        }
        if self.socket_mode {
            if is_blank(&self.app_token) {
                return Err(ClientError::MissingAppToken);
            }
        } else if is_blank(&self.signing_secret) {
            return Err(ClientError::MissingSigningSecret);
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
