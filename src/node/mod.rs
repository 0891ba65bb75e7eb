//! Transition nodes: single-use, configure-then-fire transitions.
//!
//! A node binds a source screen, a destination and an expected capability
//! type `T`. Calling [`TransitionNode::configure_then_fire`] resolves the
//! destination's input capability as a `T`, runs the caller's block against
//! it, attaches the block's return value to the destination as its output,
//! and finally hands the node's [`DeferredAction`] to the host.
//!
//! Variants:
//! - [`TransitionNode`]: destination already instantiated (scene id or factory)
//! - [`CustomTransitionNode`]: caller supplies the transition mechanics
//! - [`DeclaredTransitionNode`]: destination resolved later by the host
//! - [`CloseTransitionNode`]: destination implied ("go back")

mod action;
mod close;
mod custom;
mod declared;

pub use action::{CustomTransitionBlock, DeferredAction};
pub use close::{CloseNavigationStyle, CloseStyle, CloseTransitionNode};
pub use custom::CustomTransitionNode;
pub use declared::{DeclaredTransitionNode, TransitionTicket};

use crate::builder::NavigatorConfig;
use crate::capability::{CapabilityResolver, IntoOutput, OutputStore};
use crate::core::{NodeLifecycle, NodeState, State, StateHistory};
use crate::error::RouteError;
use crate::host::{Host, ModalStyle, Presentation, SplitStyle, TransitionStrategy};
use crate::screen::{ScreenRef, WeakScreen};
use action::navigation_of;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::{debug, warn};
use uuid::Uuid;

/// How a bound destination reaches the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionStyle {
    /// Present modally from the source.
    Default,
    /// Go through the source's navigation container.
    Navigation(NavigationStyle),
    /// Go through the source's split container.
    Split(SplitStyle),
    /// Present modally from the source with an explicit modal style.
    Modal(ModalStyle),
}

/// Navigation-container flavour of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationStyle {
    Push,
    /// Unwind to the stack screen sharing the destination's restoration id.
    Pop,
    Present,
}

/// Destination held by a node: owned while freshly created, weak once it is
/// someone else's (already in a stack, or handed to the host).
#[derive(Clone)]
pub(crate) enum Destination {
    Owned(ScreenRef),
    Attached(WeakScreen),
}

impl Destination {
    pub(crate) fn get(&self) -> Option<ScreenRef> {
        match self {
            Self::Owned(screen) => Some(screen.clone()),
            Self::Attached(screen) => screen.upgrade(),
        }
    }

    fn release(&mut self) {
        if let Self::Owned(screen) = self {
            *self = Self::Attached(Rc::downgrade(screen));
        }
    }
}

/// Settings every node inherits from its navigator.
#[derive(Clone)]
pub(crate) struct NodeContext {
    pub(crate) host: Rc<dyn Host>,
    pub(crate) input_port: String,
    pub(crate) defer_declared: bool,
    pub(crate) animated: bool,
}

impl NodeContext {
    pub(crate) fn new(host: Rc<dyn Host>, config: &NavigatorConfig) -> Self {
        Self {
            host,
            input_port: config.input_port.clone(),
            defer_declared: config.defer_declared_transitions,
            animated: config.animated,
        }
    }
}

/// Resolve `T` on `destination`, run `block`, attach its output.
///
/// The input capability wins; the destination itself is tried second.
pub(crate) fn wire_capability<T, R, F>(
    destination: &ScreenRef,
    resolver: &CapabilityResolver,
    block: F,
) -> Result<(), RouteError>
where
    T: Any,
    R: IntoOutput,
    F: FnOnce(&T) -> R,
{
    let output = if let Some(capability) = resolver.resolve::<T>(destination.as_ref()) {
        block(&capability)
    } else if let Some(screen) = destination.as_any().downcast_ref::<T>() {
        block(screen)
    } else {
        return Err(RouteError::mismatch::<T>(destination.describe()));
    };
    OutputStore::set(destination, output.into_output());
    Ok(())
}

/// Transition to a destination that already exists.
///
/// # Example
///
/// ```rust,ignore
/// navigator
///     .to_scene_by_id::<DetailInput>(&source, "detail")?
///     .to(TransitionStyle::Navigation(NavigationStyle::Push))?
///     .with_animation(false)
///     .configure_then_fire(|input| input.show("hello"))?;
/// ```
pub struct TransitionNode<T> {
    context: NodeContext,
    source: WeakScreen,
    destination: Option<Destination>,
    action: Option<DeferredAction>,
    presentation: Presentation,
    port: Option<String>,
    protected: bool,
    lifecycle: NodeLifecycle,
    _capability: PhantomData<fn() -> T>,
}

impl<T: Any> TransitionNode<T> {
    /// Node bound to a freshly created destination; presents by default.
    pub(crate) fn bound(context: NodeContext, source: &ScreenRef, destination: ScreenRef) -> Self {
        let presentation = Presentation::animated(context.animated);
        Self {
            context,
            source: Rc::downgrade(source),
            action: Some(DeferredAction::Present {
                destination: destination.clone(),
            }),
            destination: Some(Destination::Owned(destination)),
            presentation,
            port: None,
            protected: false,
            lifecycle: NodeLifecycle::bound(),
            _capability: PhantomData,
        }
    }

    /// Protected node whose action is exactly `action`.
    pub(crate) fn protected(
        context: NodeContext,
        source: WeakScreen,
        destination: ScreenRef,
        action: DeferredAction,
        presentation: Presentation,
        port: Option<String>,
    ) -> Self {
        Self {
            context,
            source,
            destination: Some(Destination::Owned(destination)),
            action: Some(action),
            presentation,
            port,
            protected: true,
            lifecycle: NodeLifecycle::bound(),
            _capability: PhantomData,
        }
    }

    pub fn id(&self) -> Uuid {
        self.lifecycle.id()
    }

    pub fn state(&self) -> NodeState {
        self.lifecycle.state()
    }

    pub fn history(&self) -> &StateHistory<NodeState> {
        self.lifecycle.history()
    }

    pub fn is_animated(&self) -> bool {
        self.presentation.animated
    }

    /// True once built-in configuration is refused.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// The action this node will run when fired.
    pub fn action(&self) -> Option<&DeferredAction> {
        self.action.as_ref()
    }

    /// The bound destination, if it still exists.
    pub fn destination(&self) -> Option<ScreenRef> {
        self.destination.as_ref().and_then(Destination::get)
    }

    fn refuses(&self, operation: &str) -> bool {
        if self.lifecycle.state().is_final() || self.protected {
            warn!(
                node = %self.lifecycle.id(),
                operation,
                state = ?self.lifecycle.state(),
                protected = self.protected,
                "Ignoring reconfiguration of transition node"
            );
            true
        } else {
            false
        }
    }

    /// Turn animation on or off. Animated by default.
    pub fn with_animation(mut self, animated: bool) -> Self {
        if !self.refuses("with_animation") {
            self.presentation.animated = animated;
        }
        self
    }

    /// Carry an opaque transition strategy to the host.
    pub fn with_strategy(mut self, strategy: TransitionStrategy) -> Self {
        if !self.refuses("with_strategy") {
            self.presentation.strategy = Some(strategy);
        }
        self
    }

    /// Resolve the input capability from a named port.
    pub fn select_port(mut self, port: impl Into<String>) -> Self {
        if !self.refuses("select_port") {
            self.port = Some(port.into());
        }
        self
    }

    /// Choose how the destination reaches the screen.
    ///
    /// Replaces the previous action and modal style; only the last call
    /// counts.
    pub fn to(mut self, style: TransitionStyle) -> Result<Self, RouteError> {
        if self.refuses("to") {
            return Ok(self);
        }
        let destination = self.live_destination()?;

        let mut modal = None;
        let action = match style {
            TransitionStyle::Default => DeferredAction::Present { destination },
            TransitionStyle::Modal(style) => {
                modal = Some(style);
                DeferredAction::Present { destination }
            }
            TransitionStyle::Split(style) => DeferredAction::ShowInSplit { destination, style },
            TransitionStyle::Navigation(NavigationStyle::Push) => {
                DeferredAction::Push { destination }
            }
            TransitionStyle::Navigation(NavigationStyle::Present) => {
                DeferredAction::PresentFromNavigation { destination }
            }
            TransitionStyle::Navigation(NavigationStyle::Pop) => {
                let target = self.stack_counterpart(&destination)?;
                self.destination = Some(Destination::Attached(Rc::downgrade(&target)));
                DeferredAction::PopTo {
                    target: Rc::downgrade(&target),
                }
            }
        };
        self.action = Some(action);
        self.presentation.modal = modal;
        Ok(self)
    }

    /// Screen in the source's navigation stack with the destination's
    /// restoration identifier.
    fn stack_counterpart(&self, destination: &ScreenRef) -> Result<ScreenRef, RouteError> {
        let source = self.live_source()?;
        let navigation = navigation_of(&source)?;
        let wanted = destination.restoration_id();
        navigation
            .children()
            .into_iter()
            .find(|screen| wanted.is_some() && screen.restoration_id() == wanted)
            .ok_or_else(|| RouteError::custom("can't find the pop target in the navigation stack"))
    }

    /// Give the destination to `block` for direct configuration.
    pub fn apply<F>(self, block: F) -> Result<Self, RouteError>
    where
        F: FnOnce(&ScreenRef),
    {
        let destination = self.live_destination()?;
        block(&destination);
        Ok(self)
    }

    /// Give up built-in wiring in favour of caller-supplied mechanics.
    ///
    /// The resulting node, and the node it produces, are protected.
    pub fn as_custom_transition(mut self) -> Result<CustomTransitionNode<T>, RouteError> {
        self.lifecycle.ensure_open()?;
        if self.protected {
            return Err(RouteError::custom("transition node is protected"));
        }
        let destination = self.live_destination()?;
        self.action = None;
        Ok(CustomTransitionNode::new(
            self.context,
            self.source,
            destination,
            self.presentation,
            self.port,
        ))
    }

    /// Resolve the capability, run `block`, attach its output, then fire.
    pub fn configure_then_fire<R, F>(&mut self, block: F) -> Result<(), RouteError>
    where
        R: IntoOutput,
        F: FnOnce(&T) -> R,
    {
        self.lifecycle.ensure_open()?;
        let wired = self.live_destination().and_then(|destination| {
            let resolver =
                CapabilityResolver::for_port(&self.context.input_port, self.port.as_deref());
            wire_capability::<T, R, F>(&destination, &resolver, block)
        });
        if let Err(error) = wired {
            self.action = None;
            return self.lifecycle.settle(Err(error));
        }
        self.fire()
    }

    /// Run the deferred action without any capability wiring.
    pub fn fire(&mut self) -> Result<(), RouteError> {
        self.lifecycle.ensure_open()?;
        let action = self.action.take();
        let result = self.execute(action);
        if let Some(destination) = self.destination.as_mut() {
            destination.release();
        }
        self.lifecycle.settle(result)
    }

    fn execute(&self, action: Option<DeferredAction>) -> Result<(), RouteError> {
        let action = action.ok_or(RouteError::AlreadyFired)?;
        let source = self.live_source()?;
        debug!(
            node = %self.lifecycle.id(),
            action = action.kind(),
            source = %source.describe(),
            animated = self.presentation.animated,
            "Firing transition"
        );
        action.execute(self.context.host.as_ref(), &source, &self.presentation)
    }

    fn live_source(&self) -> Result<ScreenRef, RouteError> {
        self.source
            .upgrade()
            .ok_or_else(|| RouteError::missing("source screen"))
    }

    fn live_destination(&self) -> Result<ScreenRef, RouteError> {
        self.destination()
            .ok_or(RouteError::DestinationUnavailable)
    }
}

impl<T> std::fmt::Debug for TransitionNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionNode")
            .field("id", &self.lifecycle.id())
            .field("state", &self.lifecycle.state())
            .field("action", &self.action)
            .field("animated", &self.presentation.animated)
            .field("protected", &self.protected)
            .finish()
    }
}
