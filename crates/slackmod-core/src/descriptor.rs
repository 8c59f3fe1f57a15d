//! Handler descriptors and the components that declare them.
//!
//! A [`HandlerDescriptor`] records that a method of a component handles one
//! [`EventKind`], optionally narrowed by a [`Matcher`]. Descriptors are built
//! with the [`Handlers`] builder, either by hand or by the `#[slack_handlers]`
//! attribute, and collected from every registered [`Component`] during
//! discovery.
//!
//! ```rust,ignore
//! struct Greeter;
//!
//! impl Greeter {
//!     async fn on_hello(&self, cx: Arc<SlackContext>) -> String {
//!         "hi there".into()
//!     }
//! }
//!
//! impl Component for Greeter {
//!     fn handlers(self: Arc<Self>) -> Vec<HandlerDescriptor> {
//!         Handlers::new(self, "Greeter")
//!             .message("on_hello", Some(Matcher::exact("hello")), |this, cx| async move {
//!                 this.on_hello(cx).await
//!             })
//!             .build()
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::SlackContext;
use crate::handler::{
    BoxedHandler, BoxedMiddleware, IntoHandlerResult, Next, handler_fn, middleware_fn,
};
use crate::kind::EventKind;
use crate::matcher::Matcher;

// ─── Callable ─────────────────────────────────────────────────────────────────

/// The bound invocation a descriptor carries.
#[derive(Clone)]
pub enum Callable {
    /// A keyed listener.
    Listener(BoxedHandler),
    /// A global middleware.
    Middleware(BoxedMiddleware),
}

// ─── HandlerDescriptor ────────────────────────────────────────────────────────

/// A record binding a component method to an event kind and optional matcher.
#[derive(Clone)]
pub struct HandlerDescriptor {
    owner: &'static str,
    method: &'static str,
    kind: EventKind,
    matcher: Option<Matcher>,
    callable: Callable,
}

impl HandlerDescriptor {
    /// Creates a listener descriptor.
    pub fn listener(
        owner: &'static str,
        method: &'static str,
        kind: EventKind,
        matcher: Option<Matcher>,
        handler: BoxedHandler,
    ) -> Self {
        Self {
            owner,
            method,
            kind,
            matcher,
            callable: Callable::Listener(handler),
        }
    }

    /// Creates a middleware descriptor. Middleware never has a matcher.
    pub fn middleware(
        owner: &'static str,
        method: &'static str,
        middleware: BoxedMiddleware,
    ) -> Self {
        Self {
            owner,
            method,
            kind: EventKind::Middleware,
            matcher: None,
            callable: Callable::Middleware(middleware),
        }
    }

    /// Name of the component that declared the handler.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Name of the method the handler invokes.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// The event kind the handler is registered for.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The matcher, exactly as declared.
    pub fn matcher(&self) -> Option<&Matcher> {
        self.matcher.as_ref()
    }

    /// The bound invocation.
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Splits the descriptor into its matcher and callable.
    pub fn into_parts(self) -> (Option<Matcher>, Callable) {
        (self.matcher, self.callable)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("owner", &self.owner)
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

// ─── Component ────────────────────────────────────────────────────────────────

/// An application component that declares Slack handlers.
///
/// Components are registered with the container as shared instances; the
/// descriptors they return hold an `Arc` of the instance, so every handler runs
/// against the component's own state.
pub trait Component: Send + Sync + 'static {
    /// The name used in logs and descriptors.
    fn component_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Returns the handlers this component declares, in declaration order.
    fn handlers(self: Arc<Self>) -> Vec<HandlerDescriptor>;
}

// ─── Handlers builder ─────────────────────────────────────────────────────────

/// Builds the descriptors of one component.
///
/// Each call tags one method. Tagging the same method with the same kind again
/// replaces the earlier descriptor in place; tagging it with another kind adds
/// a second descriptor.
pub struct Handlers<C> {
    owner: Arc<C>,
    name: &'static str,
    descriptors: Vec<HandlerDescriptor>,
}

macro_rules! listener_methods {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<F, Fut, R>(self, method: &'static str, matcher: Option<Matcher>, f: F) -> Self
            where
                F: Fn(Arc<C>, Arc<SlackContext>) -> Fut + Send + Sync + 'static,
                Fut: Future<Output = R> + Send + 'static,
                R: IntoHandlerResult + 'static,
            {
                self.listener(EventKind::$kind, method, matcher, f)
            }
        )*
    };
}

impl<C> Handlers<C>
where
    C: Send + Sync + 'static,
{
    /// Starts a builder for the given component instance.
    pub fn new(owner: Arc<C>, name: &'static str) -> Self {
        Self {
            owner,
            name,
            descriptors: Vec::new(),
        }
    }

    listener_methods! {
        /// Tags a `message` listener.
        message => Message;
        /// Tags an action listener.
        action => Action;
        /// Tags a slash command listener.
        command => Command;
        /// Tags an Events API listener.
        event => Event;
        /// Tags a shortcut listener.
        shortcut => Shortcut;
        /// Tags a view listener.
        view => View;
    }

    /// Tags a global middleware.
    pub fn middleware<F, Fut, R>(self, method: &'static str, f: F) -> Self
    where
        F: Fn(Arc<C>, Arc<SlackContext>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult + 'static,
    {
        let owner = Arc::clone(&self.owner);
        let bound = middleware_fn(move |cx, next| f(Arc::clone(&owner), cx, next));
        let descriptor = HandlerDescriptor::middleware(self.name, method, bound);
        self.push(descriptor)
    }

    /// Finishes the builder.
    pub fn build(self) -> Vec<HandlerDescriptor> {
        self.descriptors
    }

    fn listener<F, Fut, R>(
        self,
        kind: EventKind,
        method: &'static str,
        matcher: Option<Matcher>,
        f: F,
    ) -> Self
    where
        F: Fn(Arc<C>, Arc<SlackContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult + 'static,
    {
        let owner = Arc::clone(&self.owner);
        let bound = handler_fn(move |cx| f(Arc::clone(&owner), cx));
        let descriptor = HandlerDescriptor::listener(self.name, method, kind, matcher, bound);
        self.push(descriptor)
    }

    fn push(mut self, descriptor: HandlerDescriptor) -> Self {
        let existing = self
            .descriptors
            .iter_mut()
            .find(|d| d.method == descriptor.method && d.kind == descriptor.kind);
        match existing {
            Some(slot) => *slot = descriptor,
            None => self.descriptors.push(descriptor),
        }
        self
    }
}
