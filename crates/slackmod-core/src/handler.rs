//! Listener and middleware callables.
//!
//! Handlers are stored type-erased so descriptors of every component can sit
//! in the same bucket. Any async closure taking the context (and, for
//! middleware, the [`Next`] continuation) can be turned into one with
//! [`handler_fn`] or [`middleware_fn`].
//!
//! ```rust,ignore
//! let greet = handler_fn(|cx: Arc<SlackContext>| async move {
//!     cx.say("hi!");
//! });
//!
//! let audit = middleware_fn(|cx: Arc<SlackContext>, next: Next| async move {
//!     tracing::info!(kind = %cx.event().kind(), "inbound");
//!     next.run(cx).await
//! });
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;
use tower::BoxError;

use crate::context::SlackContext;
use crate::error::HandlerResult;

// ============================================================================
// IntoHandlerResult - Handle handler return values
// ============================================================================

/// Types a handler may return.
///
/// `()` and `Result<(), E>` are the common cases. Returning a `String` posts it
/// to the event's conversation, like calling [`SlackContext::say`].
pub trait IntoHandlerResult: Send {
    /// Converts the return value, applying any side effect to the context.
    fn into_handler_result(self, cx: &SlackContext) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self, _cx: &SlackContext) -> HandlerResult {
        Ok(())
    }
}

impl IntoHandlerResult for String {
    fn into_handler_result(self, cx: &SlackContext) -> HandlerResult {
        cx.say(self);
        Ok(())
    }
}

impl IntoHandlerResult for &'static str {
    fn into_handler_result(self, cx: &SlackContext) -> HandlerResult {
        cx.say(self);
        Ok(())
    }
}

impl<T: IntoHandlerResult> IntoHandlerResult for Option<T> {
    fn into_handler_result(self, cx: &SlackContext) -> HandlerResult {
        match self {
            Some(t) => t.into_handler_result(cx),
            None => Ok(()),
        }
    }
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoHandlerResult,
    E: Into<BoxError> + Send,
{
    fn into_handler_result(self, cx: &SlackContext) -> HandlerResult {
        match self {
            Ok(t) => t.into_handler_result(cx),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// A type-erased listener that can be stored in collections.
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Type-erased listener trait for dynamic dispatch.
pub trait ErasedHandler: Send + Sync {
    /// Runs the listener for one event.
    fn call(&self, cx: Arc<SlackContext>) -> BoxFuture<'static, HandlerResult>;
}

/// Wraps an async closure as a listener.
pub struct HandlerFn<F, R> {
    f: F,
    _marker: PhantomData<fn() -> R>,
}

impl<F, Fut, R> ErasedHandler for HandlerFn<F, R>
where
    F: Fn(Arc<SlackContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + 'static,
{
    fn call(&self, cx: Arc<SlackContext>) -> BoxFuture<'static, HandlerResult> {
        let fut = (self.f)(Arc::clone(&cx));
        Box::pin(async move { fut.await.into_handler_result(&cx) })
    }
}

/// Converts an async closure into a [`BoxedHandler`].
pub fn handler_fn<F, Fut, R>(f: F) -> BoxedHandler
where
    F: Fn(Arc<SlackContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + 'static,
{
    Arc::new(HandlerFn {
        f,
        _marker: PhantomData,
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// A type-erased middleware that can be stored in collections.
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware>;

/// Type-erased middleware trait for dynamic dispatch.
pub trait ErasedMiddleware: Send + Sync {
    /// Runs the middleware; it continues the chain by calling `next.run(cx)`.
    fn call(&self, cx: Arc<SlackContext>, next: Next) -> BoxFuture<'static, HandlerResult>;
}

/// Wraps an async closure as a middleware.
pub struct MiddlewareFn<F, R> {
    f: F,
    _marker: PhantomData<fn() -> R>,
}

impl<F, Fut, R> ErasedMiddleware for MiddlewareFn<F, R>
where
    F: Fn(Arc<SlackContext>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + 'static,
{
    fn call(&self, cx: Arc<SlackContext>, next: Next) -> BoxFuture<'static, HandlerResult> {
        let fut = (self.f)(Arc::clone(&cx), next);
        Box::pin(async move { fut.await.into_handler_result(&cx) })
    }
}

/// Converts an async closure into a [`BoxedMiddleware`].
pub fn middleware_fn<F, Fut, R>(f: F) -> BoxedMiddleware
where
    F: Fn(Arc<SlackContext>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + 'static,
{
    Arc::new(MiddlewareFn {
        f,
        _marker: PhantomData,
    })
}

/// The end of a middleware chain.
pub type Endpoint =
    Arc<dyn Fn(Arc<SlackContext>) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// The remainder of a middleware chain.
///
/// A middleware that never calls [`run`](Next::run) stops the event: neither
/// later middleware nor any listener sees it.
#[derive(Clone)]
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    index: usize,
    endpoint: Endpoint,
}

impl Next {
    /// Creates a chain that runs `chain` in order, then `endpoint`.
    pub fn new(chain: Arc<[BoxedMiddleware]>, endpoint: Endpoint) -> Self {
        Self {
            chain,
            index: 0,
            endpoint,
        }
    }

    /// Runs the rest of the chain.
    pub fn run(self, cx: Arc<SlackContext>) -> BoxFuture<'static, HandlerResult> {
        match self.chain.get(self.index).cloned() {
            Some(middleware) => {
                let next = Self {
                    chain: self.chain,
                    index: self.index + 1,
                    endpoint: self.endpoint,
                };
                middleware.call(cx, next)
            }
            None => (self.endpoint)(cx),
        }
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &(self.chain.len() - self.index))
            .finish_non_exhaustive()
    }
}
