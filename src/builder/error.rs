//! Errors raised while assembling a navigator.

use crate::error::RouteError;
use thiserror::Error;

/// Errors that can occur when building a navigator or its configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Host not specified. Call .host(host) before .build()")]
    MissingHost,

    #[error("Input port name must not be empty")]
    EmptyInputPort,

    /// Configuration text could not be parsed.
    #[error("Invalid navigator configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// The declared-transition interceptor could not be installed on the host.
    #[error("Interceptor installation failed: {0}")]
    Interceptor(#[from] RouteError),
}
