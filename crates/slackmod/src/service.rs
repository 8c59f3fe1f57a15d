//! Binds discovered descriptors to a client's registration calls.

use std::sync::Arc;

use slackmod_core::{Callable, EventKind, HandlerDescriptor, RegistrationError, SlackClient};
use tracing::debug;

/// Registers handler descriptors with a [`SlackClient`].
///
/// Each `register_*` call walks one bucket in order. A descriptor that does not
/// belong in the bucket is refused before the client sees it; a client
/// rejection is returned unchanged and stops the walk.
#[derive(Clone)]
pub struct SlackService {
    client: Arc<dyn SlackClient>,
}

impl SlackService {
    /// Creates a service for the given client.
    pub fn new(client: Arc<dyn SlackClient>) -> Self {
        Self { client }
    }

    /// The client registrations go to.
    pub fn client(&self) -> &Arc<dyn SlackClient> {
        &self.client
    }

    /// Registers `message` listeners.
    pub fn register_messages(
        &self,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::Message, handlers)
    }

    /// Registers action listeners.
    pub fn register_actions(
        &self,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::Action, handlers)
    }

    /// Registers slash command listeners.
    pub fn register_commands(
        &self,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::Command, handlers)
    }

    /// Registers Events API listeners.
    pub fn register_events(&self, handlers: &[HandlerDescriptor]) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::Event, handlers)
    }

    /// Registers shortcut listeners.
    pub fn register_shortcuts(
        &self,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::Shortcut, handlers)
    }

    /// Registers view listeners.
    pub fn register_views(&self, handlers: &[HandlerDescriptor]) -> Result<(), RegistrationError> {
        self.register_listeners(EventKind::View, handlers)
    }

    /// Registers global middleware through the client's `use_middleware`.
    ///
    /// Middleware never goes through a keyed registration, and a middleware
    /// descriptor must not carry a matcher.
    pub fn register_middleware(
        &self,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        for d in handlers {
            check_kind(d, EventKind::Middleware)?;
            if d.matcher().is_some() {
                return Err(RegistrationError::MiddlewareMatcher {
                    owner: d.owner(),
                    method: d.method(),
                });
            }
            let Callable::Middleware(middleware) = d.callable() else {
                return Err(callable_mismatch(d, "listener"));
            };

            debug!(component = d.owner(), method = d.method(), "Registering middleware");
            self.client.use_middleware(Arc::clone(middleware))?;
        }
        Ok(())
    }

    fn register_listeners(
        &self,
        kind: EventKind,
        handlers: &[HandlerDescriptor],
    ) -> Result<(), RegistrationError> {
        for d in handlers {
            check_kind(d, kind)?;
            let Callable::Listener(handler) = d.callable() else {
                return Err(callable_mismatch(d, "middleware"));
            };

            debug!(
                component = d.owner(),
                method = d.method(),
                kind = %kind,
                matcher = ?d.matcher(),
                "Registering listener"
            );
            self.client.listener(kind, d.matcher().cloned(), Arc::clone(handler))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SlackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackService").finish_non_exhaustive()
    }
}

fn check_kind(d: &HandlerDescriptor, expected: EventKind) -> Result<(), RegistrationError> {
    if d.kind() == expected {
        Ok(())
    } else {
        Err(RegistrationError::KindMismatch {
            owner: d.owner(),
            method: d.method(),
            expected,
            actual: d.kind(),
        })
    }
}

fn callable_mismatch(d: &HandlerDescriptor, found: &'static str) -> RegistrationError {
    RegistrationError::CallableMismatch {
        owner: d.owner(),
        method: d.method(),
        kind: d.kind(),
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;

    use slackmod_core::{Handlers, Matcher, Next, handler_fn};

    fn service(client: &Arc<RecordingClient>) -> SlackService {
        SlackService::new(Arc::clone(client) as Arc<dyn SlackClient>)
    }

    #[test]
    fn test_matchers_are_forwarded_verbatim() {
        let client = Arc::new(RecordingClient::default());
        let handlers = Handlers::new(Arc::new(()), "Unit")
            .message("a", Some(Matcher::pattern("^hi.*$")), |_, _| async {})
            .message("b", Some(Matcher::exact("  Hello ")), |_, _| async {})
            .message("c", None, |_, _| async {})
            .build();

        service(&client).register_messages(&handlers).unwrap();
        assert_eq!(
            client.calls(),
            vec![
                ("message", Some(Matcher::pattern("^hi.*$"))),
                ("message", Some(Matcher::exact("  Hello "))),
                ("message", None),
            ]
        );
    }

    #[test]
    fn test_each_bucket_uses_its_registration() {
        let client = Arc::new(RecordingClient::default());
        let unit = Arc::new(());
        let svc = service(&client);

        let one = |kind: EventKind| {
            let h = Handlers::new(Arc::clone(&unit), "Unit");
            let h = match kind {
                EventKind::Action => h.action("x", None, |_, _| async {}),
                EventKind::Command => h.command("x", None, |_, _| async {}),
                EventKind::Event => h.event("x", None, |_, _| async {}),
                EventKind::Shortcut => h.shortcut("x", None, |_, _| async {}),
                _ => h.view("x", None, |_, _| async {}),
            };
            h.build()
        };
        svc.register_actions(&one(EventKind::Action)).unwrap();
        svc.register_commands(&one(EventKind::Command)).unwrap();
        svc.register_events(&one(EventKind::Event)).unwrap();
        svc.register_shortcuts(&one(EventKind::Shortcut)).unwrap();
        svc.register_views(&one(EventKind::View)).unwrap();

        let names: Vec<_> = client.calls().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["action", "command", "event", "shortcut", "view"]);
    }

    #[test]
    fn test_middleware_uses_global_hook() {
        let client = Arc::new(RecordingClient::default());
        let handlers = Handlers::new(Arc::new(()), "Unit")
            .middleware("audit", |_, cx, next: Next| async move { next.run(cx).await })
            .build();

        service(&client).register_middleware(&handlers).unwrap();
        assert_eq!(client.calls(), vec![("use_middleware", None)]);
    }

    #[test]
    fn test_middleware_with_matcher_is_refused() {
        let client = Arc::new(RecordingClient::default());
        let odd = HandlerDescriptor::listener(
            "Odd",
            "tagged",
            EventKind::Middleware,
            Some(Matcher::exact("x")),
            handler_fn(|_cx| async {}),
        );

        let err = service(&client).register_middleware(&[odd]).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MiddlewareMatcher {
                owner: "Odd",
                method: "tagged"
            }
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_middleware_without_middleware_callable_is_refused() {
        let client = Arc::new(RecordingClient::default());
        let odd = HandlerDescriptor::listener(
            "Odd",
            "tagged",
            EventKind::Middleware,
            None,
            handler_fn(|_cx| async {}),
        );

        let err = service(&client).register_middleware(&[odd]).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::CallableMismatch {
                kind: EventKind::Middleware,
                found: "listener",
                ..
            }
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_wrong_bucket_is_refused() {
        let client = Arc::new(RecordingClient::default());
        let handlers = Handlers::new(Arc::new(()), "Unit")
            .action("a", None, |_, _| async {})
            .build();

        let err = service(&client).register_messages(&handlers).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::KindMismatch {
                expected: EventKind::Message,
                actual: EventKind::Action,
                ..
            }
        ));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_client_rejection_propagates() {
        let client = Arc::new(RecordingClient::rejecting_duplicates());
        let handlers = Handlers::new(Arc::new(()), "Unit")
            .command("a", Some("/deploy".into()), |_, _| async {})
            .command("b", Some("/deploy".into()), |_, _| async {})
            .command("c", Some("/rollback".into()), |_, _| async {})
            .build();

        let err = service(&client).register_commands(&handlers).unwrap_err();
        assert!(matches!(err, RegistrationError::Rejected(_)));
        assert_eq!(client.calls().len(), 1);
    }
}
