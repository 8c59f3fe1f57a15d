//! # slackmod core
//!
//! Building blocks shared by the slackmod crates:
//!
//! - **Descriptors**: [`HandlerDescriptor`], built with [`Handlers`] and
//!   returned by every [`Component`]
//! - **Matchers**: literal or pattern [`Matcher`]s, kept verbatim until a
//!   client compiles them
//! - **Client interface**: the [`SlackClient`] registration trait and the
//!   [`Logger`] shape a client writes to
//! - **In-process client**: [`App`], which stores registrations and
//!   dispatches [`SlackEvent`]s through middleware and listeners
//!
//! ```text
//! ┌────────────┐  descriptors  ┌──────────────┐  register  ┌──────────────┐
//! │ Component  │──────────────▶│ bucket/kind  │───────────▶│ SlackClient  │
//! └────────────┘               └──────────────┘            └──────────────┘
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod handler;
pub mod kind;
pub mod logger;
pub mod matcher;

pub use app::{App, AppOptions, DispatchOutcome};
pub use client::SlackClient;
pub use config::SlackConfig;
pub use context::{OutgoingMessage, SlackContext};
pub use descriptor::{Callable, Component, HandlerDescriptor, Handlers};
pub use error::{ClientError, DispatchError, HandlerResult, RegistrationError};
pub use event::SlackEvent;
pub use handler::{
    BoxedHandler, BoxedMiddleware, Endpoint, ErasedHandler, ErasedMiddleware, IntoHandlerResult,
    Next, handler_fn, middleware_fn,
};
pub use kind::EventKind;
pub use logger::{LogLevel, Logger};
pub use matcher::{CompiledMatcher, Matcher};

pub use tower::BoxError;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        App, Component, EventKind, HandlerDescriptor, HandlerResult, Handlers, Matcher, Next,
        SlackClient, SlackContext, SlackEvent,
    };
}
