//! Handler discovery.
//!
//! The [`Explorer`] asks every component registered in a [`Container`] for
//! its descriptors and groups them by event kind. Components are visited in
//! registration order and descriptors keep their declaration order inside
//! each bucket.

use slackmod_core::{EventKind, HandlerDescriptor};
use tracing::debug;

use crate::container::Container;

/// Descriptors grouped by event kind.
#[derive(Debug, Clone, Default)]
pub struct ExploredHandlers {
    /// `message` listeners.
    pub messages: Vec<HandlerDescriptor>,
    /// Interactive action listeners.
    pub actions: Vec<HandlerDescriptor>,
    /// Slash command listeners.
    pub commands: Vec<HandlerDescriptor>,
    /// Events API listeners.
    pub events: Vec<HandlerDescriptor>,
    /// Shortcut listeners.
    pub shortcuts: Vec<HandlerDescriptor>,
    /// View submission listeners.
    pub views: Vec<HandlerDescriptor>,
    /// Global middleware.
    pub middleware: Vec<HandlerDescriptor>,
}

impl ExploredHandlers {
    /// Returns the bucket for `kind`.
    pub fn bucket(&self, kind: EventKind) -> &[HandlerDescriptor] {
        match kind {
            EventKind::Message => &self.messages,
            EventKind::Action => &self.actions,
            EventKind::Command => &self.commands,
            EventKind::Event => &self.events,
            EventKind::Shortcut => &self.shortcuts,
            EventKind::View => &self.views,
            EventKind::Middleware => &self.middleware,
        }
    }

    fn bucket_mut(&mut self, kind: EventKind) -> &mut Vec<HandlerDescriptor> {
        match kind {
            EventKind::Message => &mut self.messages,
            EventKind::Action => &mut self.actions,
            EventKind::Command => &mut self.commands,
            EventKind::Event => &mut self.events,
            EventKind::Shortcut => &mut self.shortcuts,
            EventKind::View => &mut self.views,
            EventKind::Middleware => &mut self.middleware,
        }
    }

    /// Total number of descriptors across all buckets.
    pub fn total(&self) -> usize {
        EventKind::ALL.iter().map(|k| self.bucket(*k).len()).sum()
    }

    /// Returns `true` if no descriptor was found.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Collects handler descriptors from registered components.
#[derive(Debug, Clone, Copy, Default)]
pub struct Explorer;

impl Explorer {
    /// Creates an explorer.
    pub fn new() -> Self {
        Self
    }

    /// Walks every component in `container` and groups its descriptors.
    pub fn explore(&self, container: &Container) -> ExploredHandlers {
        let mut found = ExploredHandlers::default();

        for component in container.components() {
            let name = component.component_name();
            for descriptor in component.handlers() {
                debug!(
                    component = name,
                    method = descriptor.method(),
                    kind = %descriptor.kind(),
                    matcher = ?descriptor.matcher(),
                    "Discovered Slack handler"
                );
                found.bucket_mut(descriptor.kind()).push(descriptor);
            }
        }

        debug!(total = found.total(), "Handler discovery finished");
        found
    }
}
