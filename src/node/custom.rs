//! Nodes whose transition mechanics belong to the caller.

use super::{wire_capability, DeferredAction, NodeContext, TransitionNode};
use crate::capability::{CapabilityResolver, IntoOutput};
use crate::error::RouteError;
use crate::host::Presentation;
use crate::screen::{ScreenRef, WeakScreen};
use std::any::Any;
use std::marker::PhantomData;

/// A node that gave up built-in wiring.
///
/// The only thing left to decide is how source and destination meet, via
/// [`CustomTransitionNode::transition`]. The node produced there is
/// protected: built-in configuration calls are refused and logged.
pub struct CustomTransitionNode<T> {
    context: NodeContext,
    source: WeakScreen,
    destination: ScreenRef,
    presentation: Presentation,
    port: Option<String>,
    _capability: PhantomData<fn() -> T>,
}

impl<T: Any> CustomTransitionNode<T> {
    pub(crate) fn new(
        context: NodeContext,
        source: WeakScreen,
        destination: ScreenRef,
        presentation: Presentation,
        port: Option<String>,
    ) -> Self {
        Self {
            context,
            source,
            destination,
            presentation,
            port,
            _capability: PhantomData,
        }
    }

    pub fn destination(&self) -> &ScreenRef {
        &self.destination
    }

    /// Resolve the input capability from a named port.
    pub fn select_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Configure the destination now, without firing anything.
    ///
    /// Useful when the custom block presents the destination itself and the
    /// caller still wants its input configured and output attached.
    pub fn configure<R, F>(&self, block: F) -> Result<(), RouteError>
    where
        R: IntoOutput,
        F: FnOnce(&T) -> R,
    {
        let resolver = CapabilityResolver::for_port(&self.context.input_port, self.port.as_deref());
        wire_capability::<T, R, F>(&self.destination, &resolver, block)
    }

    /// Bind caller-supplied mechanics as the node's only action.
    pub fn transition<F>(self, block: F) -> TransitionNode<T>
    where
        F: FnOnce(&ScreenRef, &ScreenRef) + 'static,
    {
        let action = DeferredAction::Custom {
            destination: self.destination.clone(),
            block: Box::new(block),
        };
        TransitionNode::protected(
            self.context,
            self.source,
            self.destination,
            action,
            self.presentation,
            self.port,
        )
    }
}

impl<T> std::fmt::Debug for CustomTransitionNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomTransitionNode")
            .field("destination", &self.destination.describe())
            .field("port", &self.port)
            .finish()
    }
}
