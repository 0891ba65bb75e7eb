//! The one thing a node does when it fires.

use crate::error::RouteError;
use crate::host::{Host, Presentation, SplitStyle};
use crate::screen::{enclosing, ContainerKind, ScreenRef, WeakScreen};

/// Caller-supplied transition mechanics for protected nodes.
pub type CustomTransitionBlock = Box<dyn FnOnce(&ScreenRef, &ScreenRef)>;

/// Deferred transition, carrying exactly what its host primitive needs.
///
/// Nodes keep at most one action and discard it once fired, so an action
/// executes at most once.
pub enum DeferredAction {
    /// Present `destination` modally from the source.
    Present { destination: ScreenRef },
    /// Push `destination` onto the source's navigation stack.
    Push { destination: ScreenRef },
    /// Present `destination` modally from the source's navigation container.
    PresentFromNavigation { destination: ScreenRef },
    /// Show `destination` in the source's split container.
    ShowInSplit {
        destination: ScreenRef,
        style: SplitStyle,
    },
    /// Unwind the source's navigation stack to `target`.
    PopTo { target: WeakScreen },
    /// Unwind the source's navigation stack to its root.
    PopToRoot,
    /// Dismiss the source.
    Dismiss,
    /// Run caller-supplied mechanics between source and `destination`.
    Custom {
        destination: ScreenRef,
        block: CustomTransitionBlock,
    },
}

impl DeferredAction {
    /// Short name for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Present { .. } => "present",
            Self::Push { .. } => "push",
            Self::PresentFromNavigation { .. } => "present-from-navigation",
            Self::ShowInSplit { .. } => "show-in-split",
            Self::PopTo { .. } => "pop-to",
            Self::PopToRoot => "pop-to-root",
            Self::Dismiss => "dismiss",
            Self::Custom { .. } => "custom",
        }
    }

    /// Screen this action brings on stage, if it still exists.
    pub fn destination(&self) -> Option<ScreenRef> {
        match self {
            Self::Present { destination }
            | Self::Push { destination }
            | Self::PresentFromNavigation { destination }
            | Self::ShowInSplit { destination, .. }
            | Self::Custom { destination, .. } => Some(destination.clone()),
            Self::PopTo { target } => target.upgrade(),
            Self::PopToRoot | Self::Dismiss => None,
        }
    }

    /// Hand the action to the host.
    pub fn execute(
        self,
        host: &dyn Host,
        source: &ScreenRef,
        presentation: &Presentation,
    ) -> Result<(), RouteError> {
        match self {
            Self::Present { destination } => host.present(source, destination, presentation),
            Self::Push { destination } => {
                let navigation = navigation_of(source)?;
                host.push(&navigation, destination, presentation);
            }
            Self::PresentFromNavigation { destination } => {
                let navigation = navigation_of(source)?;
                host.present(&navigation, destination, presentation);
            }
            Self::ShowInSplit { destination, style } => {
                let split = enclosing(source, ContainerKind::Split)
                    .ok_or_else(|| RouteError::missing("split"))?;
                host.show_in_split(&split, destination, style, presentation);
            }
            Self::PopTo { target } => {
                let navigation = navigation_of(source)?;
                let target = target.upgrade().ok_or(RouteError::DestinationUnavailable)?;
                host.pop_to(&navigation, &target, presentation.animated);
            }
            Self::PopToRoot => {
                let navigation = navigation_of(source)?;
                host.pop_to_root(&navigation, presentation.animated);
            }
            Self::Dismiss => host.dismiss(source, presentation.animated),
            Self::Custom { destination, block } => block(source, &destination),
        }
        Ok(())
    }
}

impl std::fmt::Debug for DeferredAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("DeferredAction");
        out.field("kind", &self.kind());
        if let Some(destination) = self.destination() {
            out.field("destination", &destination.describe());
        }
        out.finish()
    }
}

pub(crate) fn navigation_of(screen: &ScreenRef) -> Result<ScreenRef, RouteError> {
    enclosing(screen, ContainerKind::Navigation).ok_or_else(|| RouteError::missing("navigation"))
}
