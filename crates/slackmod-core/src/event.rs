//! Inbound Slack events.
//!
//! A [`SlackEvent`] pairs the routing kind with two JSON views of the request:
//! the *body* is the full envelope Slack delivered, the *payload* is the part
//! listeners usually care about (the inner event, the first action, the view,
//! and so on).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::kind::EventKind;

/// An inbound event ready for dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackEvent {
    kind: EventKind,
    payload: Value,
    body: Value,
}

impl SlackEvent {
    /// Creates an event whose body is the payload itself.
    ///
    /// Events of kind [`EventKind::Middleware`] only reach middleware.
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            kind,
            body: payload.clone(),
            payload,
        }
    }

    /// Creates an event with a distinct envelope body.
    pub fn with_body(kind: EventKind, payload: Value, body: Value) -> Self {
        Self {
            kind,
            payload,
            body,
        }
    }

    /// A plain `message` event with the given text.
    pub fn message(text: impl Into<String>) -> Self {
        let payload = json!({ "type": "message", "text": text.into() });
        let body = json!({ "type": "event_callback", "event": payload.clone() });
        Self::with_body(EventKind::Message, payload, body)
    }

    /// A `block_actions` request carrying a single action.
    pub fn action(action_id: impl Into<String>) -> Self {
        let payload = json!({ "action_id": action_id.into() });
        let body = json!({ "type": "block_actions", "actions": [payload.clone()] });
        Self::with_body(EventKind::Action, payload, body)
    }

    /// A slash command invocation.
    pub fn command(command: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            EventKind::Command,
            json!({ "command": command.into(), "text": text.into() }),
        )
    }

    /// An Events API event of the given type.
    pub fn event(event_type: impl Into<String>) -> Self {
        let payload = json!({ "type": event_type.into() });
        let body = json!({ "type": "event_callback", "event": payload.clone() });
        Self::with_body(EventKind::Event, payload, body)
    }

    /// A global shortcut.
    pub fn shortcut(callback_id: impl Into<String>) -> Self {
        Self::new(
            EventKind::Shortcut,
            json!({ "type": "shortcut", "callback_id": callback_id.into() }),
        )
    }

    /// A view submission.
    pub fn view(callback_id: impl Into<String>) -> Self {
        let payload = json!({ "callback_id": callback_id.into() });
        let body = json!({ "type": "view_submission", "view": payload.clone() });
        Self::with_body(EventKind::View, payload, body)
    }

    /// Classifies a raw request body as delivered by Slack.
    ///
    /// Returns `None` when the body is not a recognised request type.
    pub fn from_envelope(body: Value) -> Option<Self> {
        if body.get("command").and_then(Value::as_str).is_some() {
            return Some(Self::new(EventKind::Command, body));
        }

        match body.get("type").and_then(Value::as_str)? {
            "event_callback" => {
                let event = body.get("event")?.clone();
                let kind = match event.get("type").and_then(Value::as_str) {
                    Some("message") => EventKind::Message,
                    Some(_) => EventKind::Event,
                    None => return None,
                };
                Some(Self::with_body(kind, event, body))
            }
            "block_actions" | "interactive_message" => {
                let action = body.get("actions")?.get(0)?.clone();
                Some(Self::with_body(EventKind::Action, action, body))
            }
            "view_submission" | "view_closed" => {
                let view = body.get("view")?.clone();
                Some(Self::with_body(EventKind::View, view, body))
            }
            "shortcut" | "message_action" => Some(Self::new(EventKind::Shortcut, body)),
            _ => None,
        }
    }

    /// Returns the routing kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the listener-facing payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the full request body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the value listener matchers are tested against.
    pub fn routing_key(&self) -> Option<&str> {
        let key = match self.kind {
            EventKind::Message => "text",
            EventKind::Action => "action_id",
            EventKind::Command => "command",
            EventKind::Event => "type",
            EventKind::Shortcut | EventKind::View => "callback_id",
            EventKind::Middleware => return None,
        };
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Returns the message text, if any.
    pub fn text(&self) -> Option<&str> {
        self.payload.get("text").and_then(Value::as_str)
    }

    /// Returns the conversation the event happened in, if known.
    pub fn channel_id(&self) -> Option<&str> {
        self.payload
            .get("channel")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("channel_id").and_then(Value::as_str))
            .or_else(|| {
                self.body
                    .get("channel")
                    .and_then(|c| c.get("id"))
                    .and_then(Value::as_str)
            })
    }

    /// Returns the user who triggered the event, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.payload
            .get("user")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("user_id").and_then(Value::as_str))
            .or_else(|| {
                self.body
                    .get("user")
                    .and_then(|u| u.get("id"))
                    .and_then(Value::as_str)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_keys() {
        assert_eq!(SlackEvent::message("hi there").routing_key(), Some("hi there"));
        assert_eq!(SlackEvent::action("approve").routing_key(), Some("approve"));
        assert_eq!(SlackEvent::command("/echo", "x").routing_key(), Some("/echo"));
        assert_eq!(SlackEvent::event("app_mention").routing_key(), Some("app_mention"));
        assert_eq!(SlackEvent::shortcut("open").routing_key(), Some("open"));
        assert_eq!(SlackEvent::view("modal").routing_key(), Some("modal"));
    }

    #[test]
    fn test_envelope_message_and_event() {
        let message = SlackEvent::from_envelope(json!({
            "type": "event_callback",
            "event": { "type": "message", "text": "hello", "channel": "C1", "user": "U1" }
        }))
        .unwrap();
        assert_eq!(message.kind(), EventKind::Message);
        assert_eq!(message.text(), Some("hello"));
        assert_eq!(message.channel_id(), Some("C1"));
        assert_eq!(message.user_id(), Some("U1"));

        let mention = SlackEvent::from_envelope(json!({
            "type": "event_callback",
            "event": { "type": "app_mention", "text": "<@U0> hi" }
        }))
        .unwrap();
        assert_eq!(mention.kind(), EventKind::Event);
        assert_eq!(mention.routing_key(), Some("app_mention"));
    }

    #[test]
    fn test_envelope_interactive() {
        let action = SlackEvent::from_envelope(json!({
            "type": "block_actions",
            "channel": { "id": "C9" },
            "actions": [{ "action_id": "approve_1" }, { "action_id": "other" }]
        }))
        .unwrap();
        assert_eq!(action.kind(), EventKind::Action);
        assert_eq!(action.routing_key(), Some("approve_1"));
        assert_eq!(action.channel_id(), Some("C9"));

        let view = SlackEvent::from_envelope(json!({
            "type": "view_submission",
            "view": { "callback_id": "signup" }
        }))
        .unwrap();
        assert_eq!(view.kind(), EventKind::View);
        assert_eq!(view.routing_key(), Some("signup"));

        let command = SlackEvent::from_envelope(json!({
            "command": "/deploy", "text": "prod", "channel_id": "C2", "user_id": "U2"
        }))
        .unwrap();
        assert_eq!(command.kind(), EventKind::Command);
        assert_eq!(command.channel_id(), Some("C2"));
    }

    #[test]
    fn test_envelope_unknown() {
        assert!(SlackEvent::from_envelope(json!({ "type": "url_verification" })).is_none());
        assert!(SlackEvent::from_envelope(json!({ "nothing": true })).is_none());
    }
}
