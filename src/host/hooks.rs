//! Before-transition extension point owned by the host.
//!
//! The host resolves declared transitions on its own schedule. Just before it
//! completes one it calls [`TransitionHooks::dispatch`], which runs every
//! installed hook and then the host's own preparation step. Installation is
//! idempotent per token, so the router's interceptor is applied exactly once
//! no matter how many navigators share a host.

use crate::error::RouteError;
use crate::screen::ScreenRef;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// A declared transition the host is about to complete.
#[derive(Clone)]
pub struct DeclaredTransition {
    identifier: String,
    source: ScreenRef,
    destination: ScreenRef,
    embed: bool,
}

impl DeclaredTransition {
    pub fn new(identifier: impl Into<String>, source: ScreenRef, destination: ScreenRef) -> Self {
        Self {
            identifier: identifier.into(),
            source,
            destination,
            embed: false,
        }
    }

    /// Mark the transition as embedding its destination inside the source.
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Screen that requested the transition.
    pub fn source(&self) -> &ScreenRef {
        &self.source
    }

    /// Destination exactly as the host resolved it (possibly a container).
    pub fn destination(&self) -> &ScreenRef {
        &self.destination
    }

    /// True when the destination is embedded inside the source.
    pub fn is_embed(&self) -> bool {
        self.embed
    }
}

impl std::fmt::Debug for DeclaredTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclaredTransition")
            .field("identifier", &self.identifier)
            .field("source", &self.source.describe())
            .field("destination", &self.destination.describe())
            .field("embed", &self.embed)
            .finish()
    }
}

/// Hook run before the host completes a declared transition.
pub type BeforeTransitionHook = Rc<dyn Fn(&DeclaredTransition) -> Result<(), RouteError>>;

struct Installation {
    token: &'static str,
    state: Rc<dyn Any>,
    hook: BeforeTransitionHook,
}

/// Registry of before-transition hooks.
#[derive(Default)]
pub struct TransitionHooks {
    installed: RefCell<Vec<Installation>>,
}

impl TransitionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self, token: &str) -> bool {
        self.installed.borrow().iter().any(|i| i.token == token)
    }

    pub fn len(&self) -> usize {
        self.installed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.borrow().is_empty()
    }

    /// Install a hook under `token` unless one is already there.
    ///
    /// `install` builds the hook together with the state it serves; the state
    /// of the first installation is returned to every later caller. A token
    /// already bound to state of another type is a conflict.
    pub fn install_once<S, F>(&self, token: &'static str, install: F) -> Result<Rc<S>, RouteError>
    where
        S: Any,
        F: FnOnce() -> (Rc<S>, BeforeTransitionHook),
    {
        if let Some(existing) = self
            .installed
            .borrow()
            .iter()
            .find(|i| i.token == token)
        {
            return Rc::clone(&existing.state).downcast::<S>().map_err(|_| {
                RouteError::custom(format!("hook token `{token}` is bound to another state type"))
            });
        }

        let (state, hook) = install();
        debug!(token, "Installing before-transition hook");
        self.installed.borrow_mut().push(Installation {
            token,
            state: Rc::clone(&state) as Rc<dyn Any>,
            hook,
        });
        Ok(state)
    }

    /// Run installed hooks in installation order, then `original`.
    ///
    /// The first failing hook stops the dispatch; `original` is skipped and
    /// the error is returned to the host.
    pub fn dispatch<F>(&self, transition: &DeclaredTransition, original: F) -> Result<(), RouteError>
    where
        F: FnOnce(&DeclaredTransition),
    {
        // Hooks may install or dispatch again, so nothing stays borrowed.
        let hooks: Vec<BeforeTransitionHook> = self
            .installed
            .borrow()
            .iter()
            .map(|i| Rc::clone(&i.hook))
            .collect();

        for hook in hooks {
            if let Err(error) = hook(transition) {
                warn!(
                    identifier = transition.identifier(),
                    %error,
                    "Before-transition hook failed"
                );
                return Err(error);
            }
        }

        original(transition);
        Ok(())
    }
}

impl std::fmt::Debug for TransitionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<&str> = self.installed.borrow().iter().map(|i| i.token).collect();
        f.debug_struct("TransitionHooks")
            .field("tokens", &tokens)
            .finish()
    }
}
