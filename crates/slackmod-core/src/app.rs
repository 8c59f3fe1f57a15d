//! In-process Slack client.
//!
//! [`App`] keeps the listeners and middleware registered through
//! [`SlackClient`] and dispatches already-received [`SlackEvent`]s to them.
//! Receiving events (HTTP or socket mode) is left to the caller.
//!
//! # Dispatch
//!
//! 1. A [`SlackContext`] is created for the event.
//! 2. Global middleware runs in registration order. Each one continues the
//!    chain with `next.run(cx)`; returning without calling it stops the event.
//! 3. Every listener whose kind and matcher accept the event runs, in
//!    registration order. A failing listener does not stop the others.
//!
//! `App` also implements `tower::Service<SlackEvent>`, so it can be wrapped in
//! tower middleware:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let svc = ServiceBuilder::new()
//!     .concurrency_limit(16)
//!     .service(app.clone());
//! let outcome = svc.oneshot(SlackEvent::message("hello")).await?;
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tower::{BoxError, Service};
use tracing::{Instrument, debug_span};

use crate::client::SlackClient;
use crate::config::SlackConfig;
use crate::context::{OutgoingMessage, SlackContext};
use crate::error::{ClientError, DispatchError, HandlerResult, RegistrationError};
use crate::event::SlackEvent;
use crate::handler::{BoxedHandler, BoxedMiddleware, Endpoint, Next};
use crate::kind::EventKind;
use crate::logger::Logger;
use crate::matcher::{CompiledMatcher, Matcher};

/// Options an [`App`] is constructed from.
#[derive(Clone)]
pub struct AppOptions {
    /// Client configuration.
    pub config: SlackConfig,
    /// Logger the client reports through.
    pub logger: Arc<dyn Logger>,
}

impl AppOptions {
    /// Creates options from a configuration and a logger.
    pub fn new(config: SlackConfig, logger: Arc<dyn Logger>) -> Self {
        Self { config, logger }
    }
}

/// The result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    /// Kind of the dispatched event.
    pub kind: EventKind,
    /// Number of listeners that ran.
    pub listeners: usize,
    /// Whether a handler acknowledged the request.
    pub acked: bool,
    /// Response body passed to the acknowledgement, if any.
    pub ack_response: Option<Value>,
    /// Messages handlers asked to post.
    pub messages: Vec<OutgoingMessage>,
}

struct Listener {
    kind: EventKind,
    matcher: Option<CompiledMatcher>,
    handler: BoxedHandler,
}

impl Listener {
    fn accepts(&self, event: &SlackEvent) -> bool {
        if self.kind == event.kind() {
            let Some(matcher) = &self.matcher else {
                return true;
            };
            return match (self.kind, event.routing_key()) {
                (_, None) => false,
                (EventKind::Message, Some(text)) => matcher.is_match_text(text),
                (_, Some(key)) => matcher.is_match(key),
            };
        }

        // Message events are Events API events too.
        self.kind == EventKind::Event
            && event.kind() == EventKind::Message
            && self.matcher.as_ref().is_none_or(|m| m.is_match("message"))
    }
}

struct AppInner {
    config: SlackConfig,
    logger: Arc<dyn Logger>,
    listeners: RwLock<Vec<Listener>>,
    middleware: RwLock<Vec<BoxedMiddleware>>,
}

/// An in-process Slack client.
///
/// Cloning is cheap; clones share the same registrations.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    /// Creates a client, validating the configured credentials.
    pub fn new(options: AppOptions) -> Result<Self, ClientError> {
        let AppOptions { config, logger } = options;

        if let Some(level) = config.log_level {
            logger.set_level(level);
        }
        if let Err(e) = config.validate() {
            logger.error(&format!("invalid client configuration: {e}"));
            return Err(e);
        }

        logger.debug(&format!(
            "client initialized (socket_mode: {})",
            config.socket_mode
        ));

        Ok(Self {
            inner: Arc::new(AppInner {
                config,
                logger,
                listeners: RwLock::new(Vec::new()),
                middleware: RwLock::new(Vec::new()),
            }),
        })
    }

    /// Returns the configuration the client was built from.
    pub fn config(&self) -> &SlackConfig {
        &self.inner.config
    }

    /// Returns the client logger.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.inner.logger
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    /// Returns the number of registered middleware.
    pub fn middleware_count(&self) -> usize {
        self.inner.middleware.read().len()
    }

    fn add_listener(
        &self,
        kind: EventKind,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        let compiled = match matcher.as_ref().map(Matcher::compile).transpose() {
            Ok(compiled) => compiled,
            Err(e) => {
                self.inner.logger.error(&e.to_string());
                return Err(e);
            }
        };

        self.inner.logger.debug(&format!(
            "registered {kind} listener for {}",
            matcher.as_ref().map_or_else(|| "*".to_string(), Matcher::to_string)
        ));

        self.inner.listeners.write().push(Listener {
            kind,
            matcher: compiled,
            handler,
        });
        Ok(())
    }

    fn route(&self, event: &SlackEvent) -> Vec<BoxedHandler> {
        self.inner
            .listeners
            .read()
            .iter()
            .filter(|l| l.accepts(event))
            .map(|l| Arc::clone(&l.handler))
            .collect()
    }

    /// Dispatches one event through middleware and matching listeners.
    pub async fn dispatch(&self, event: SlackEvent) -> Result<DispatchOutcome, DispatchError> {
        let kind = event.kind();
        let logger = Arc::clone(&self.inner.logger);
        logger.debug(&format!(
            "dispatching {kind} event ({})",
            event.routing_key().unwrap_or("-")
        ));

        let span = debug_span!(
            "dispatch",
            kind = %kind,
            key = event.routing_key().unwrap_or_default()
        );
        let cx = Arc::new(SlackContext::new(event));
        let chain: Arc<[BoxedMiddleware]> = self.inner.middleware.read().clone().into();

        let ran = Arc::new(AtomicUsize::new(0));
        let failures: Arc<Mutex<Vec<BoxError>>> = Arc::new(Mutex::new(Vec::new()));

        let endpoint: Endpoint = {
            let app = self.clone();
            let ran = Arc::clone(&ran);
            let failures = Arc::clone(&failures);
            Arc::new(
                move |cx: Arc<SlackContext>| -> BoxFuture<'static, HandlerResult> {
                    let handlers = app.route(cx.event());
                    let ran = Arc::clone(&ran);
                    let failures = Arc::clone(&failures);
                    Box::pin(async move {
                        ran.store(handlers.len(), Ordering::SeqCst);
                        for handler in handlers {
                            if let Err(e) = handler.call(Arc::clone(&cx)).await {
                                failures.lock().push(e);
                            }
                        }
                        Ok(())
                    })
                },
            )
        };

        let result = Next::new(chain, endpoint)
            .run(Arc::clone(&cx))
            .instrument(span)
            .await;
        if let Err(e) = result {
            logger.error(&format!("middleware failed: {e}"));
            return Err(DispatchError::Middleware(e));
        }

        let failures = std::mem::take(&mut *failures.lock());
        let ack = cx.take_ack();
        let outcome = DispatchOutcome {
            kind,
            listeners: ran.load(Ordering::SeqCst),
            acked: ack.is_some(),
            ack_response: ack.flatten(),
            messages: cx.take_outbox(),
        };

        if kind.requires_ack() && outcome.listeners > 0 && !outcome.acked {
            logger.warn(&format!("{kind} request was not acknowledged"));
        }
        if outcome.listeners == 0 {
            logger.debug(&format!("no listener matched {kind} event"));
        }

        if !failures.is_empty() {
            for e in &failures {
                logger.error(&format!("{kind} listener failed: {e}"));
            }
            return Err(DispatchError::Listeners(failures));
        }

        Ok(outcome)
    }
}

impl SlackClient for App {
    fn message(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::Message, matcher, handler)
    }

    fn action(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::Action, matcher, handler)
    }

    fn command(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::Command, matcher, handler)
    }

    fn event(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::Event, matcher, handler)
    }

    fn shortcut(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::Shortcut, matcher, handler)
    }

    fn view(
        &self,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Result<(), RegistrationError> {
        self.add_listener(EventKind::View, matcher, handler)
    }

    fn use_middleware(&self, middleware: BoxedMiddleware) -> Result<(), RegistrationError> {
        self.inner.middleware.write().push(middleware);
        self.inner.logger.debug("registered global middleware");
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("socket_mode", &self.inner.config.socket_mode)
            .field("listener_count", &self.listener_count())
            .field("middleware_count", &self.middleware_count())
            .finish()
    }
}

// ============================================================================
// Tower Service Implementation for App
// ============================================================================

impl Service<SlackEvent> for App {
    type Response = DispatchOutcome;
    type Error = DispatchError;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: SlackEvent) -> Self::Future {
        let app = self.clone();
        Box::pin(async move { app.dispatch(event).await })
    }
}
