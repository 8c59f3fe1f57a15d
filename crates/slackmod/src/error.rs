//! Runtime error types.

use slackmod_core::{BoxError, ClientError, RegistrationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the service container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// No service of the requested type was provided.
    #[error("no provider registered for {type_name}")]
    Missing {
        /// Name of the requested type.
        type_name: &'static str,
    },

    /// A singleton of this type was already provided.
    #[error("a provider for {type_name} is already registered")]
    AlreadyProvided {
        /// Name of the provided type.
        type_name: &'static str,
    },
}

/// Errors that can occur while building or bootstrapping the Slack module.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The async options factory failed.
    #[error("Failed to resolve Slack module options: {0}")]
    Options(#[source] BoxError),

    /// Configuration could not be assembled.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bundled client rejected its configuration.
    #[error("Failed to construct Slack client: {0}")]
    Client(#[from] ClientError),

    /// A custom client factory failed.
    #[error("Client factory failed: {0}")]
    ClientFactory(#[source] BoxError),

    /// A provider could not be registered or resolved.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A handler could not be registered with the client.
    #[error("Failed to register Slack handler: {0}")]
    Registration(#[from] RegistrationError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
