//! Host-managed screens as seen by the router.
//!
//! The router never owns a screen's lifetime. It sees screens through the
//! [`Screen`] trait, holds them as [`ScreenRef`] only while a freshly created
//! destination waits to be presented, and otherwise keeps [`WeakScreen`]
//! handles that are checked for liveness at use time.

use crate::capability::CapabilityRequest;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::rc::{Rc, Weak};

/// Shared handle to a screen.
pub type ScreenRef = Rc<dyn Screen>;

/// Non-owning handle to a screen.
pub type WeakScreen = Weak<dyn Screen>;

/// Kinds of container screens the router knows how to look inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    /// A stack of screens; the active child is the top of the stack.
    Navigation,
    /// A set of branches; the active child is the selected branch.
    Tabs,
    /// A primary screen beside a detail screen; the active child is the
    /// detail.
    Split,
}

/// A host-managed UI unit.
///
/// Only [`Screen::as_any`] is required. Everything else has a default that
/// describes a plain leaf screen with no capabilities, no parent and no
/// children.
pub trait Screen: Any {
    /// Upcast used for nominal capability matching.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable description used in errors and logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Declared restoration identifier, if any.
    fn restoration_id(&self) -> Option<&str> {
        None
    }

    /// Answer a capability request.
    ///
    /// Screens opt in by calling [`CapabilityRequest::provide`] (conventional
    /// port) or [`CapabilityRequest::provide_on`] (named port).
    fn provide_input(&self, request: &mut CapabilityRequest<'_>) {
        let _ = request;
    }

    /// `Some` when this screen hosts child screens.
    fn container_kind(&self) -> Option<ContainerKind> {
        None
    }

    /// Child screens in declaration order (bottom of stack first).
    fn children(&self) -> Vec<ScreenRef> {
        Vec::new()
    }

    /// Currently active child: stack top or selected branch.
    fn active_child(&self) -> Option<ScreenRef> {
        None
    }

    /// Container this screen is a member of.
    fn parent(&self) -> Option<ScreenRef> {
        None
    }

    /// True when this screen may host destinations of embed transitions.
    fn is_embed_container(&self) -> bool {
        false
    }
}

/// Identity key of a screen, stable for as long as the screen is alive.
pub(crate) fn screen_key(screen: &ScreenRef) -> usize {
    Rc::as_ptr(screen) as *const () as usize
}

/// True when both handles point at the same screen.
pub fn same_screen(a: &ScreenRef, b: &ScreenRef) -> bool {
    screen_key(a) == screen_key(b)
}

/// Parents of `screen`, nearest first.
pub fn ancestors(screen: &ScreenRef) -> impl Iterator<Item = ScreenRef> {
    std::iter::successors(screen.parent(), |current| current.parent())
}

/// Nearest ancestor container of the given kind.
pub fn enclosing(screen: &ScreenRef, kind: ContainerKind) -> Option<ScreenRef> {
    ancestors(screen).find(|ancestor| ancestor.container_kind() == Some(kind))
}
