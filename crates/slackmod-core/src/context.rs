//! Per-dispatch context handed to middleware and listeners.
//!
//! One [`SlackContext`] is created for every inbound event and shared, behind
//! an `Arc`, by all middleware and listeners that process it. Besides the
//! event it collects what the handlers produced: the acknowledgement and any
//! messages they asked to post.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::SlackEvent;

/// A message a handler asked to post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Target conversation, taken from the event when known.
    pub channel: Option<String>,
    /// Message text.
    pub text: String,
}

/// The context for one dispatch cycle.
#[derive(Debug)]
pub struct SlackContext {
    event: SlackEvent,
    /// `Some` once acknowledged; the inner value is the optional response body.
    ack: Mutex<Option<Option<Value>>>,
    outbox: Mutex<Vec<OutgoingMessage>>,
    values: RwLock<HashMap<String, Value>>,
}

impl SlackContext {
    /// Creates a fresh context for the given event.
    pub fn new(event: SlackEvent) -> Self {
        Self {
            event,
            ack: Mutex::new(None),
            outbox: Mutex::new(Vec::new()),
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the event being dispatched.
    pub fn event(&self) -> &SlackEvent {
        &self.event
    }

    /// Returns the listener-facing payload.
    pub fn payload(&self) -> &Value {
        self.event.payload()
    }

    /// Returns the message text, if any.
    pub fn text(&self) -> Option<&str> {
        self.event.text()
    }

    /// Acknowledges the request, optionally with a response body.
    ///
    /// Returns `false` if the request had already been acknowledged; the
    /// first acknowledgement is kept.
    pub fn ack(&self, response: Option<Value>) -> bool {
        let mut ack = self.ack.lock();
        if ack.is_some() {
            return false;
        }
        *ack = Some(response);
        true
    }

    /// Returns `true` once [`ack`](Self::ack) has been called.
    pub fn is_acked(&self) -> bool {
        self.ack.lock().is_some()
    }

    /// Queues a message to the conversation the event came from.
    pub fn say(&self, text: impl Into<String>) {
        self.outbox.lock().push(OutgoingMessage {
            channel: self.event.channel_id().map(str::to_string),
            text: text.into(),
        });
    }

    /// Stores a value for handlers later in the chain.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values.write().insert(key.into(), value);
    }

    /// Reads a value stored by an earlier handler.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    /// Takes the acknowledgement, leaving the context unacknowledged.
    pub(crate) fn take_ack(&self) -> Option<Option<Value>> {
        self.ack.lock().take()
    }

    /// Drains the queued messages.
    pub(crate) fn take_outbox(&self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut *self.outbox.lock())
    }
}
