//! Configuration for the Slack module.
//!
//! The client configuration ([`SlackConfig`]) is assembled by the
//! [`ConfigLoader`] from layered sources, with the caller's
//! [`SlackModuleOptions`] applied last.

pub mod error;
pub mod loader;
pub mod options;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use options::SlackModuleOptions;
pub use slackmod_core::SlackConfig;
