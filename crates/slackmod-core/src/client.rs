//! The registration interface of a Slack client.
//!
//! [`SlackClient`] is the seam between handler discovery and whatever client
//! dispatches events at runtime. The bundled [`App`](crate::app::App)
//! implements it in-process; tests implement it to observe registrations.

use crate::error::RegistrationError;
use crate::handler::{BoxedHandler, BoxedMiddleware};
use crate::kind::EventKind;
use crate::matcher::Matcher;

/// Registration calls a Slack client exposes.
///
/// Keyed registrations take an optional matcher; `None` matches every event
/// of that kind. Implementations receive the matcher exactly as it was
/// declared.
pub trait SlackClient: Send + Sync {
    /// Registers a listener for `message` events.
    fn message(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a listener for interactive actions.
    fn action(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a listener for slash commands.
    fn command(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a listener for Events API events.
    fn event(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a listener for shortcuts.
    fn shortcut(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a listener for view submissions.
    fn view(&self, matcher: Option<Matcher>, handler: BoxedHandler)
    -> Result<(), RegistrationError>;

    /// Registers a global middleware that runs before every listener.
    fn use_middleware(&self, middleware: BoxedMiddleware) -> Result<(), RegistrationError>;

    /// Registers a listener by kind.
    ///
    /// [`EventKind::Middleware`] has no keyed registration and is rejected.
    fn listener(
        &self,
        kind: EventKind,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        match kind {
            EventKind::Message => self.message(matcher, handler),
            EventKind::Action => self.action(matcher, handler),
            EventKind::Command => self.command(matcher, handler),
            EventKind::Event => self.event(matcher, handler),
            EventKind::Shortcut => self.shortcut(matcher, handler),
            EventKind::View => self.view(matcher, handler),
            EventKind::Middleware => Err(RegistrationError::rejected(
                "middleware must be registered with use_middleware",
            )),
        }
    }
}
