//! Errors surfaced by transition nodes.

use thiserror::Error;

/// Errors that can occur while resolving, wiring or firing a transition.
///
/// Every variant is recoverable: the node reports it and the caller decides
/// what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No destination screen could be produced, or it was already destroyed.
    #[error("Destination screen is unavailable")]
    DestinationUnavailable,

    /// Neither the destination's input capability nor the destination itself
    /// has the expected type.
    #[error("Can't cast \"{actual}\" to {expected}")]
    CapabilityMismatch { expected: String, actual: String },

    /// A required screen or container is absent (e.g. no navigation stack).
    #[error("{0} context is missing")]
    NavigationContextMissing(String),

    /// The node already fired (or failed) and cannot be used again.
    #[error("Transition node has already fired")]
    AlreadyFired,

    /// Anything else, described in words.
    #[error("{0}")]
    Custom(String),
}

impl RouteError {
    pub(crate) fn mismatch<T: ?Sized>(actual: impl Into<String>) -> Self {
        RouteError::CapabilityMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: actual.into(),
        }
    }

    pub(crate) fn missing(context: impl Into<String>) -> Self {
        RouteError::NavigationContextMissing(context.into())
    }

    pub(crate) fn custom(message: impl Into<String>) -> Self {
        RouteError::Custom(message.into())
    }
}
