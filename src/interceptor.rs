//! Observing host-driven declared transitions.
//!
//! The router cannot see when the host resolves a declared transition, so it
//! installs one before-transition hook per host (idempotent by
//! [`INTERCEPTOR_TOKEN`]). Each requested transition enqueues a completion;
//! when the host dispatches its hooks, the interceptor runs the completion
//! of the oldest request with the same source and identifier. Transitions
//! the router never asked for pass straight through.

use crate::error::RouteError;
use crate::host::{BeforeTransitionHook, DeclaredTransition, TransitionHooks};
use crate::screen::{same_screen, ScreenRef, WeakScreen};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;
use uuid::Uuid;

/// Installation token of the router's before-transition hook.
pub const INTERCEPTOR_TOKEN: &str = "routewire.declared-transition.before-complete";

/// Work to run against the resolved transition.
pub type Completion = Box<dyn FnOnce(&DeclaredTransition) -> Result<(), RouteError>>;

struct PendingRequest {
    id: Uuid,
    source: WeakScreen,
    identifier: String,
    completion: Completion,
}

impl PendingRequest {
    fn matches(&self, transition: &DeclaredTransition) -> bool {
        self.identifier == transition.identifier()
            && self
                .source
                .upgrade()
                .is_some_and(|source| same_screen(&source, transition.source()))
    }
}

/// Queue of declared-transition requests awaiting the host's hook.
#[derive(Default)]
pub struct DeclaredTransitionInterceptor {
    pending: RefCell<VecDeque<PendingRequest>>,
}

impl DeclaredTransitionInterceptor {
    /// Install into `hooks`, or return the interceptor installed earlier.
    pub fn install(hooks: &TransitionHooks) -> Result<Rc<Self>, RouteError> {
        hooks.install_once(INTERCEPTOR_TOKEN, || {
            let interceptor = Rc::new(Self::default());
            let weak = Rc::downgrade(&interceptor);
            let hook: BeforeTransitionHook = Rc::new(move |transition: &DeclaredTransition| {
                match weak.upgrade() {
                    Some(interceptor) => interceptor.intercept(transition),
                    None => Ok(()),
                }
            });
            (interceptor, hook)
        })
    }

    /// Register `completion` for the next `identifier` transition from `source`.
    pub fn enqueue(&self, source: &ScreenRef, identifier: &str, completion: Completion) -> Uuid {
        let id = Uuid::new_v4();
        debug!(%id, identifier, source = %source.describe(), "Declared transition requested");
        self.pending.borrow_mut().push_back(PendingRequest {
            id,
            source: Rc::downgrade(source),
            identifier: identifier.to_string(),
            completion,
        });
        id
    }

    /// Drop request `id`. Returns false when it already ran or never existed.
    pub fn cancel(&self, id: Uuid) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|request| request.id != id);
        let cancelled = pending.len() != before;
        if cancelled {
            debug!(%id, "Declared transition request cancelled");
        }
        cancelled
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run the completion matching `transition`, if any.
    pub fn intercept(&self, transition: &DeclaredTransition) -> Result<(), RouteError> {
        let request = {
            let mut pending = self.pending.borrow_mut();
            pending.retain(|request| request.source.strong_count() > 0);
            let position = pending.iter().position(|request| request.matches(transition));
            position.and_then(|index| pending.remove(index))
        };

        match request {
            Some(request) => {
                debug!(
                    id = %request.id,
                    identifier = transition.identifier(),
                    destination = %transition.destination().describe(),
                    "Declared transition intercepted"
                );
                (request.completion)(transition)
            }
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for DeclaredTransitionInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclaredTransitionInterceptor")
            .field("pending", &self.pending_count())
            .finish()
    }
}
