//! # slackmod
//!
//! Hosts a Slack app inside a component-based application: handler methods
//! are tagged on ordinary components, discovered at bootstrap and registered
//! with a Slack client.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐      ┌──────────┐  buckets  ┌──────────────┐      ┌─────────────┐
//! │ Container │─────▶│ Explorer │──────────▶│ SlackService │─────▶│ SlackClient │
//! │components │      └──────────┘           └──────────────┘      │  (App)      │
//! └───────────┘                                                   └─────────────┘
//! ```
//!
//! - **Container**: the service locator holding providers and components
//! - **Explorer**: collects descriptors and groups them by event kind
//! - **SlackService**: binds each bucket to the client's registration calls
//! - **SlackModule**: builds the client from layered configuration and runs
//!   discovery on bootstrap
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slackmod::prelude::*;
//!
//! #[derive(Default)]
//! struct Greeter;
//!
//! #[slack_handlers]
//! impl Greeter {
//!     #[message("hello")]
//!     async fn on_hello(&self, cx: Arc<SlackContext>) -> String {
//!         "hi there".into()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let container = Container::new();
//!     container.component(Greeter);
//!
//!     let module = SlackModule::for_root(SlackModuleOptions::new())
//!         .build(&container)
//!         .await?;
//!     module.on_application_bootstrap()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: read `slack.toml` configuration files
//! - `json-log`: JSON output for [`LoggingBuilder`]

pub mod config;
pub mod container;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod module;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ConfigLoader, ConfigResult, SlackModuleOptions};
pub use container::{Container, Providers};
pub use error::{ContainerError, RuntimeError, RuntimeResult};
pub use explorer::{ExploredHandlers, Explorer};
pub use logging::{LogFormat, LogOutput, LoggerProxy, LoggingBuilder};
pub use module::{LOGGER_NAME, OnApplicationBootstrap, SlackModule, SlackModuleSetup};
pub use service::SlackService;

pub use slackmod_core as core;
pub use slackmod_macros::slack_handlers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use std::sync::Arc;

    pub use slackmod_core::prelude::*;
    pub use slackmod_core::{BoxError, Logger, LogLevel, SlackConfig};

    pub use crate::{
        Container, OnApplicationBootstrap, SlackModule, SlackModuleOptions, slack_handlers,
    };
}
