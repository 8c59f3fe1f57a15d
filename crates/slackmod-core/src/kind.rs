//! Event kinds a handler can be tagged with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of inbound Slack traffic a handler is registered for.
///
/// [`EventKind::Middleware`] is special: middleware is registered globally and
/// runs for every inbound event before the kind-specific listeners fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A message posted in a conversation the app can see.
    Message,
    /// An interactive component action (button click, select, ...).
    Action,
    /// A slash command invocation.
    Command,
    /// An Events API event (`app_mention`, `reaction_added`, ...).
    Event,
    /// A global or message shortcut.
    Shortcut,
    /// A modal view submission or close.
    View,
    /// A global pre-dispatch hook.
    Middleware,
}

impl EventKind {
    /// All kinds, in the order the composition root registers their buckets.
    pub const ALL: [EventKind; 7] = [
        EventKind::Message,
        EventKind::Action,
        EventKind::Command,
        EventKind::Event,
        EventKind::Shortcut,
        EventKind::View,
        EventKind::Middleware,
    ];

    /// Returns the kind name as used in logs and attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Action => "action",
            Self::Command => "command",
            Self::Event => "event",
            Self::Shortcut => "shortcut",
            Self::View => "view",
            Self::Middleware => "middleware",
        }
    }

    /// Returns `true` for kinds dispatched to keyed listeners.
    pub fn is_listener(&self) -> bool {
        !matches!(self, Self::Middleware)
    }

    /// Returns `true` for kinds Slack expects to be acknowledged.
    pub fn requires_ack(&self) -> bool {
        matches!(
            self,
            Self::Action | Self::Command | Self::Shortcut | Self::View
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
