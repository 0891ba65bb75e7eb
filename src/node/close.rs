//! Reverse transitions: the destination is wherever "back" leads.

use super::action::navigation_of;
use super::{wire_capability, DeferredAction, NodeContext};
use crate::capability::{CapabilityResolver, IntoOutput};
use crate::core::{NodeLifecycle, NodeState, ScreenGuard, State, StateHistory};
use crate::error::RouteError;
use crate::host::{Presentation, TransitionStrategy};
use crate::screen::{same_screen, Screen, ScreenRef, WeakScreen};
use std::any::Any;
use std::rc::Rc;
use tracing::{debug, warn};
use uuid::Uuid;

/// How a close node unwinds.
#[derive(Clone, Debug)]
pub enum CloseStyle {
    /// Pop one level when the navigation stack allows it, otherwise dismiss.
    Automatic,
    /// Pop to the stack's root when there is a stack to pop, otherwise dismiss.
    RootOrDismiss,
    /// Dismiss the source.
    Dismiss,
    /// Unwind the source's navigation stack.
    Navigation(CloseNavigationStyle),
}

/// Navigation-stack flavour of a close.
#[derive(Clone, Debug)]
pub enum CloseNavigationStyle {
    /// Pop until the given screen is on top.
    PopTo(WeakScreen),
    /// Pop exactly one level.
    PopOne,
    PopToRoot,
    /// Pop to the nearest stack member accepted by [`CloseTransitionNode::find`].
    PopToFound,
}

/// Transition that closes the source.
///
/// # Example
///
/// ```rust,ignore
/// navigator
///     .close(&screen)
///     .find(|s| s.restoration_id() == Some("home"))?
///     .fire()?;
/// ```
pub struct CloseTransitionNode {
    context: NodeContext,
    source: WeakScreen,
    style: CloseStyle,
    guard: Option<ScreenGuard>,
    presentation: Presentation,
    lifecycle: NodeLifecycle,
}

impl CloseTransitionNode {
    pub(crate) fn new(context: NodeContext, source: &ScreenRef, style: CloseStyle) -> Self {
        let presentation = Presentation::animated(context.animated);
        Self {
            context,
            source: Rc::downgrade(source),
            style,
            guard: None,
            presentation,
            lifecycle: NodeLifecycle::bound(),
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

    pub fn style(&self) -> &CloseStyle {
        &self.style
    }

    pub fn is_animated(&self) -> bool {
        self.presentation.animated
    }

    fn refuses(&self, operation: &str) -> bool {
        let refused = self.lifecycle.state().is_final();
        if refused {
            warn!(
                node = %self.lifecycle.id(),
                operation,
                "Ignoring reconfiguration of fired close node"
            );
        }
        refused
    }

    pub fn with_animation(mut self, animated: bool) -> Self {
        if !self.refuses("with_animation") {
            self.presentation.animated = animated;
        }
        self
    }

    pub fn with_strategy(mut self, strategy: TransitionStrategy) -> Self {
        if !self.refuses("with_strategy") {
            self.presentation.strategy = Some(strategy);
        }
        self
    }

    /// Replace the close style.
    pub fn to(mut self, style: CloseStyle) -> Self {
        if !self.refuses("to") {
            self.style = style;
        }
        self
    }

    /// Pop to the nearest screen below the source accepted by `predicate`.
    ///
    /// The predicate runs when the node plans its action, against the stack
    /// as it is at that moment.
    pub fn find<F>(mut self, predicate: F) -> Result<Self, RouteError>
    where
        F: Fn(&dyn Screen) -> bool + 'static,
    {
        let source = self.live_source()?;
        navigation_of(&source)?;
        self.guard = Some(ScreenGuard::new(predicate));
        self.style = CloseStyle::Navigation(CloseNavigationStyle::PopToFound);
        Ok(self)
    }

    /// The action this node would run if fired now.
    pub fn plan(&self) -> Result<DeferredAction, RouteError> {
        let source = self.live_source()?;
        match &self.style {
            CloseStyle::Dismiss => Ok(DeferredAction::Dismiss),
            CloseStyle::Automatic => match navigation_of(&source) {
                Ok(navigation) => match predecessor(&navigation.children()) {
                    Some(target) => Ok(DeferredAction::PopTo { target }),
                    None => Ok(DeferredAction::Dismiss),
                },
                Err(_) => Ok(DeferredAction::Dismiss),
            },
            CloseStyle::RootOrDismiss => {
                let depth = navigation_of(&source)
                    .map(|navigation| navigation.children().len())
                    .unwrap_or(0);
                if depth >= 2 {
                    Ok(DeferredAction::PopToRoot)
                } else {
                    warn!(
                        source = %source.describe(),
                        depth,
                        "Nothing to pop, dismissing instead"
                    );
                    Ok(DeferredAction::Dismiss)
                }
            }
            CloseStyle::Navigation(style) => self.plan_navigation(&source, style),
        }
    }

    fn plan_navigation(
        &self,
        source: &ScreenRef,
        style: &CloseNavigationStyle,
    ) -> Result<DeferredAction, RouteError> {
        let navigation = navigation_of(source)?;
        let stack = navigation.children();

        match style {
            CloseNavigationStyle::PopTo(target) => {
                let target = target.upgrade().ok_or(RouteError::DestinationUnavailable)?;
                Ok(DeferredAction::PopTo {
                    target: Rc::downgrade(&target),
                })
            }
            CloseNavigationStyle::PopOne => {
                let target = predecessor(&stack).ok_or_else(|| shortfall(source, stack.len()))?;
                Ok(DeferredAction::PopTo { target })
            }
            CloseNavigationStyle::PopToRoot => {
                if stack.len() < 2 {
                    return Err(shortfall(source, stack.len()));
                }
                Ok(DeferredAction::PopToRoot)
            }
            CloseNavigationStyle::PopToFound => {
                let guard = self
                    .guard
                    .as_ref()
                    .ok_or_else(|| RouteError::custom("no screen predicate to pop to"))?;
                stack
                    .iter()
                    .rev()
                    .filter(|screen| !same_screen(screen, source))
                    .find(|screen| guard.check(screen.as_ref()))
                    .map(|screen| DeferredAction::PopTo {
                        target: Rc::downgrade(screen),
                    })
                    .ok_or_else(|| {
                        RouteError::custom("no screen in the navigation stack matches")
                    })
            }
        }
    }

    /// Screen revealed by closing, when the plan pops to a known screen.
    pub fn revealed(&self) -> Option<ScreenRef> {
        match self.plan().ok()? {
            DeferredAction::PopTo { target } => target.upgrade(),
            DeferredAction::PopToRoot => {
                let source = self.source.upgrade()?;
                navigation_of(&source).ok()?.children().into_iter().next()
            }
            _ => None,
        }
    }

    /// Configure the screen being returned to, then close.
    ///
    /// Fails with `DestinationUnavailable` when the close does not reveal a
    /// known screen (a dismiss).
    pub fn configure_then_fire<T, R, F>(&mut self, block: F) -> Result<(), RouteError>
    where
        T: Any,
        R: IntoOutput,
        F: FnOnce(&T) -> R,
    {
        self.lifecycle.ensure_open()?;
        let wired = self
            .revealed()
            .ok_or(RouteError::DestinationUnavailable)
            .and_then(|destination| {
                let resolver = CapabilityResolver::conventional(self.context.input_port.as_str());
                wire_capability::<T, R, F>(&destination, &resolver, block)
            });
        if let Err(error) = wired {
            return self.lifecycle.settle(Err(error));
        }
        self.fire()
    }

    pub fn fire(&mut self) -> Result<(), RouteError> {
        self.lifecycle.ensure_open()?;
        let result = self.plan().and_then(|action| {
            let source = self.live_source()?;
            debug!(
                node = %self.lifecycle.id(),
                action = action.kind(),
                source = %source.describe(),
                "Closing screen"
            );
            action.execute(self.context.host.as_ref(), &source, &self.presentation)
        });
        self.lifecycle.settle(result)
    }

    fn live_source(&self) -> Result<ScreenRef, RouteError> {
        self.source
            .upgrade()
            .ok_or_else(|| RouteError::missing("source screen"))
    }
}

impl std::fmt::Debug for CloseTransitionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseTransitionNode")
            .field("id", &self.lifecycle.id())
            .field("state", &self.lifecycle.state())
            .field("style", &self.style)
            .finish()
    }
}

fn predecessor(stack: &[ScreenRef]) -> Option<WeakScreen> {
    let index = stack.len().checked_sub(2)?;
    Some(Rc::downgrade(&stack[index]))
}

fn shortfall(source: &ScreenRef, depth: usize) -> RouteError {
    warn!(
        source = %source.describe(),
        depth,
        "Navigation stack too shallow to pop"
    );
    RouteError::custom("insufficient stack depth")
}
