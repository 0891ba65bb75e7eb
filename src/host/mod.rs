//! The host container the router drives.
//!
//! The host owns scene graphs and performs the actual presentation and
//! dismissal. The router only calls the abstract operations below, and the
//! embedding application wires one [`Host`] implementation at startup.

mod hooks;

pub use hooks::{BeforeTransitionHook, DeclaredTransition, TransitionHooks};

use crate::error::RouteError;
use crate::screen::ScreenRef;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::rc::Rc;

/// Opaque, caller-supplied transition choreography (custom animations,
/// interactive transitions). The router only carries it to the host.
#[derive(Clone)]
pub struct TransitionStrategy(Rc<dyn Any>);

impl TransitionStrategy {
    pub fn new<S: Any>(strategy: S) -> Self {
        Self(Rc::new(strategy))
    }

    pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
        self.0.downcast_ref::<S>()
    }
}

impl std::fmt::Debug for TransitionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransitionStrategy(..)")
    }
}

/// Where a split container shows a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitStyle {
    /// Replace the detail column.
    Detail,
    /// Let the split container pick the column for its current layout.
    Default,
}

/// Animation used when a modal screen appears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalTransition {
    #[default]
    CoverVertical,
    FlipHorizontal,
    CrossDissolve,
    PartialCurl,
}

/// How much of the presenter a modal screen covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalPresentation {
    #[default]
    Automatic,
    FullScreen,
    PageSheet,
    FormSheet,
    OverFullScreen,
    OverCurrentContext,
    Popover,
}

/// Look of a modal presentation, applied to the destination by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalStyle {
    pub transition: ModalTransition,
    pub presentation: ModalPresentation,
}

impl ModalStyle {
    pub fn new(transition: ModalTransition, presentation: ModalPresentation) -> Self {
        Self {
            transition,
            presentation,
        }
    }
}

/// How a screen should be shown.
#[derive(Clone, Debug)]
pub struct Presentation {
    pub animated: bool,
    pub strategy: Option<TransitionStrategy>,
    /// Set when the destination is presented with an explicit modal style.
    pub modal: Option<ModalStyle>,
}

impl Presentation {
    pub fn animated(animated: bool) -> Self {
        Self {
            animated,
            strategy: None,
            modal: None,
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::animated(true)
    }
}

/// Container primitives and resolution operations provided by the host.
pub trait Host {
    /// Present `screen` modally from `presenter`.
    fn present(&self, presenter: &ScreenRef, screen: ScreenRef, presentation: &Presentation);

    /// Push `screen` onto the `navigation` container's stack.
    fn push(&self, navigation: &ScreenRef, screen: ScreenRef, presentation: &Presentation);

    /// Unwind `navigation` until `screen` is on top.
    fn pop_to(&self, navigation: &ScreenRef, screen: &ScreenRef, animated: bool);

    /// Unwind `navigation` to its first screen.
    fn pop_to_root(&self, navigation: &ScreenRef, animated: bool);

    /// Dismiss `screen` (and whatever it presented).
    fn dismiss(&self, screen: &ScreenRef, animated: bool);

    /// Show `screen` in the `split` container.
    fn show_in_split(
        &self,
        split: &ScreenRef,
        screen: ScreenRef,
        style: SplitStyle,
        presentation: &Presentation,
    );

    /// Instantiate the scene registered under `id` in the source's scene graph.
    fn resolve_scene_by_id(&self, source: &ScreenRef, id: &str) -> Option<ScreenRef>;

    /// Perform the declared transition `id` from `source`.
    ///
    /// The host resolves the destination and must call
    /// [`TransitionHooks::dispatch`] on [`Host::transition_hooks`] before the
    /// transition completes.
    fn perform_declared_transition(&self, source: &ScreenRef, id: &str, presentation: &Presentation);

    /// The host's before-transition extension point.
    fn transition_hooks(&self) -> &TransitionHooks;

    /// Run `task` on the next turn of the host's event loop.
    fn schedule(&self, task: Box<dyn FnOnce()>);
}

/// Produces destination screens on demand.
pub trait ScreenFactory {
    fn instantiate(&self) -> Result<ScreenRef, RouteError>;
}

/// Factory instantiating a scene by identifier through the host.
pub struct SceneFactory {
    host: Rc<dyn Host>,
    source: ScreenRef,
    scene_id: String,
}

impl SceneFactory {
    pub fn new(host: Rc<dyn Host>, source: ScreenRef, scene_id: impl Into<String>) -> Self {
        Self {
            host,
            source,
            scene_id: scene_id.into(),
        }
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }
}

impl ScreenFactory for SceneFactory {
    fn instantiate(&self) -> Result<ScreenRef, RouteError> {
        self.host
            .resolve_scene_by_id(&self.source, &self.scene_id)
            .ok_or_else(|| RouteError::custom(format!("screen `{}` not found", self.scene_id)))
    }
}

impl<F> ScreenFactory for F
where
    F: Fn() -> Result<ScreenRef, RouteError>,
{
    fn instantiate(&self) -> Result<ScreenRef, RouteError> {
        self()
    }
}
