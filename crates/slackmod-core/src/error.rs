//! Error types for the slackmod core.

use thiserror::Error;
use tower::BoxError;

use crate::kind::EventKind;

/// Result type returned by listeners and middleware.
pub type HandlerResult = Result<(), BoxError>;

/// Errors raised when a handler cannot be registered with a client.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A pattern matcher is not a valid regular expression.
    #[error("invalid matcher pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern source as written.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A descriptor was routed to a registration call for another kind.
    #[error("{owner}::{method} is a {actual} handler, cannot register it as {expected}")]
    KindMismatch {
        /// Owning component.
        owner: &'static str,
        /// Method name.
        method: &'static str,
        /// The kind of the registration call.
        expected: EventKind,
        /// The kind recorded on the descriptor.
        actual: EventKind,
    },

    /// The callable of a descriptor does not fit its kind.
    #[error("{owner}::{method} is tagged {kind} but carries a {found} callable")]
    CallableMismatch {
        /// Owning component.
        owner: &'static str,
        /// Method name.
        method: &'static str,
        /// The kind recorded on the descriptor.
        kind: EventKind,
        /// `"listener"` or `"middleware"`.
        found: &'static str,
    },

    /// A middleware descriptor carries a matcher.
    #[error("middleware {owner}::{method} cannot have a matcher")]
    MiddlewareMatcher {
        /// Owning component.
        owner: &'static str,
        /// Method name.
        method: &'static str,
    },

    /// The client refused the registration.
    #[error("registration rejected: {0}")]
    Rejected(String),
}

impl RegistrationError {
    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Errors raised while constructing a client from its configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No bot token was configured.
    #[error("a bot token is required (SLACK_BOT_TOKEN)")]
    MissingBotToken,

    /// No signing secret was configured for HTTP mode.
    #[error("a signing secret is required unless socket mode is enabled (SLACK_SIGNING_SECRET)")]
    MissingSigningSecret,

    /// Socket mode was enabled without an app-level token.
    #[error("socket mode requires an app-level token (SLACK_APP_TOKEN)")]
    MissingAppToken,
}

/// Errors raised while dispatching an inbound event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A middleware returned an error; no listener ran after it.
    #[error("middleware failed: {0}")]
    Middleware(#[source] BoxError),

    /// One or more listeners returned an error.
    #[error("{} listener(s) failed, first: {}", .0.len(), .0[0])]
    Listeners(Vec<BoxError>),
}
