//! Nodes whose destination the host decides.
//!
//! Firing a declared-transition node only asks the host to perform the
//! transition. The node's wiring runs later, inside the host's
//! before-transition hook, and reports its outcome through a
//! [`TransitionTicket`].

use super::{wire_capability, NodeContext};
use crate::capability::{CapabilityResolver, IntoOutput};
use crate::core::{NodeLifecycle, NodeState, State, StateHistory};
use crate::error::RouteError;
use crate::host::{DeclaredTransition, Host, Presentation, TransitionStrategy};
use crate::interceptor::{Completion, DeclaredTransitionInterceptor};
use crate::screen::{ContainerKind, ScreenRef, WeakScreen};
use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

type Wiring = Box<dyn FnOnce(&ScreenRef, &CapabilityResolver) -> Result<(), RouteError>>;

struct TicketState {
    id: Uuid,
    identifier: String,
    outcome: RefCell<Option<Result<(), RouteError>>>,
    destination: RefCell<Option<WeakScreen>>,
}

/// Handle on the eventual outcome of a declared transition.
///
/// Settles once: when the wiring ran inside the host's hook, or when the
/// request was abandoned (source gone, host never called the hook).
#[derive(Clone)]
pub struct TransitionTicket {
    state: Rc<TicketState>,
}

impl TransitionTicket {
    fn new(id: Uuid, identifier: &str) -> Self {
        Self {
            state: Rc::new(TicketState {
                id,
                identifier: identifier.to_string(),
                outcome: RefCell::new(None),
                destination: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn identifier(&self) -> &str {
        &self.state.identifier
    }

    pub fn is_settled(&self) -> bool {
        self.state.outcome.borrow().is_some()
    }

    /// `None` while the host has not reached the transition yet.
    pub fn outcome(&self) -> Option<Result<(), RouteError>> {
        self.state.outcome.borrow().clone()
    }

    /// The screen the wiring ran against, while it is alive.
    pub fn destination(&self) -> Option<ScreenRef> {
        self.state
            .destination
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn bind(&self, destination: &ScreenRef) {
        *self.state.destination.borrow_mut() = Some(Rc::downgrade(destination));
    }

    fn settle(&self, outcome: Result<(), RouteError>) {
        let mut slot = self.state.outcome.borrow_mut();
        if slot.is_none() {
            debug!(ticket = %self.state.id, ok = outcome.is_ok(), "Declared transition settled");
            *slot = Some(outcome);
        }
    }
}

impl std::fmt::Debug for TransitionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTicket")
            .field("id", &self.state.id)
            .field("identifier", &self.state.identifier)
            .field("outcome", &self.state.outcome.borrow())
            .finish()
    }
}

/// Top screen of a navigation container; any other screen as is.
fn top_of(screen: &ScreenRef) -> ScreenRef {
    match screen.container_kind() {
        Some(ContainerKind::Navigation) => screen.active_child().unwrap_or_else(|| screen.clone()),
        _ => screen.clone(),
    }
}

/// The screen a declared transition really lands on.
///
/// Navigation containers unwrap to their top screen. Tab hosts stay as they
/// are when they expose `T` themselves; otherwise the first branch, in
/// declaration order, that exposes or is a `T` is used, unwrapped to its top
/// screen when the branch is a navigation stack.
pub(crate) fn locate<T: Any>(
    destination: &ScreenRef,
    resolver: &CapabilityResolver,
) -> Result<ScreenRef, RouteError> {
    match destination.container_kind() {
        Some(ContainerKind::Tabs) => {
            if destination.as_any().is::<T>()
                || resolver.resolve_direct::<T>(destination.as_ref()).is_some()
            {
                return Ok(destination.clone());
            }
            destination
                .children()
                .into_iter()
                .find(|branch| resolver.matches::<T>(branch.as_ref()))
                .map(|branch| top_of(&branch))
                .ok_or_else(|| RouteError::mismatch::<T>(destination.describe()))
        }
        _ => Ok(top_of(destination)),
    }
}

/// Transition performed by the host under an identifier.
///
/// # Example
///
/// ```rust,ignore
/// let ticket = navigator
///     .to_declared_transition::<DetailInput>(&source, "showDetail")?
///     .configure_then_fire(|input| input.show("hello"))?;
/// host.run_pending();
/// assert_eq!(ticket.outcome(), Some(Ok(())));
/// ```
pub struct DeclaredTransitionNode<T> {
    context: NodeContext,
    interceptor: Rc<DeclaredTransitionInterceptor>,
    source: WeakScreen,
    identifier: String,
    presentation: Presentation,
    port: Option<String>,
    defer: bool,
    lifecycle: NodeLifecycle,
    _capability: PhantomData<fn() -> T>,
}

impl<T: Any> DeclaredTransitionNode<T> {
    pub(crate) fn new(
        context: NodeContext,
        interceptor: Rc<DeclaredTransitionInterceptor>,
        source: &ScreenRef,
        identifier: impl Into<String>,
    ) -> Self {
        let presentation = Presentation::animated(context.animated);
        let defer = context.defer_declared;
        Self {
            context,
            interceptor,
            source: Rc::downgrade(source),
            identifier: identifier.into(),
            presentation,
            port: None,
            defer,
            lifecycle: NodeLifecycle::new(),
            _capability: PhantomData,
        }
    }

    pub fn id(&self) -> Uuid {
        self.lifecycle.id()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
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

    /// True when the request waits for the host's next event-loop turn.
    pub fn is_deferred(&self) -> bool {
        self.defer
    }

    fn refuses(&self, operation: &str) -> bool {
        let refused = self.lifecycle.state().is_final();
        if refused {
            warn!(
                node = %self.lifecycle.id(),
                operation,
                "Ignoring reconfiguration of fired declared transition"
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

    pub fn select_port(mut self, port: impl Into<String>) -> Self {
        if !self.refuses("select_port") {
            self.port = Some(port.into());
        }
        self
    }

    /// Override the navigator's choice of handing the request to the host
    /// on its next turn (`true`) or right away (`false`).
    pub fn deferred(mut self, defer: bool) -> Self {
        if !self.refuses("deferred") {
            self.defer = defer;
        }
        self
    }

    /// Request the transition; configure the destination once the host
    /// resolves it.
    ///
    /// Errors found before the hand-off are returned here. Errors raised
    /// inside the host's hook land on the returned ticket.
    pub fn configure_then_fire<R, F>(&mut self, block: F) -> Result<TransitionTicket, RouteError>
    where
        R: IntoOutput,
        F: FnOnce(&T) -> R + 'static,
    {
        let wiring: Wiring = Box::new(move |destination: &ScreenRef, resolver: &CapabilityResolver| {
            wire_capability::<T, R, F>(destination, resolver, block)
        });
        self.request(Some(wiring))
    }

    /// Request the transition without configuring the destination.
    pub fn fire(&mut self) -> Result<TransitionTicket, RouteError> {
        self.request(None)
    }

    fn request(&mut self, wiring: Option<Wiring>) -> Result<TransitionTicket, RouteError> {
        self.lifecycle.ensure_open()?;
        let source = match self.source.upgrade() {
            Some(source) => source,
            None => return self.lifecycle.settle(Err(RouteError::missing("source screen"))),
        };

        let ticket = TransitionTicket::new(self.lifecycle.id(), &self.identifier);
        let resolver = CapabilityResolver::for_port(&self.context.input_port, self.port.as_deref());
        let completion = completion::<T>(ticket.clone(), resolver, wiring);
        let request = self.interceptor.enqueue(&source, &self.identifier, completion);

        let host = Rc::downgrade(&self.context.host);
        let interceptor = Rc::clone(&self.interceptor);
        let weak_source = self.source.clone();
        let identifier = self.identifier.clone();
        let presentation = self.presentation.clone();
        let task_ticket = ticket.clone();
        let perform = move || {
            let (Some(host), Some(source)) = (host.upgrade(), weak_source.upgrade()) else {
                interceptor.cancel(request);
                task_ticket.settle(Err(RouteError::missing("source screen")));
                return;
            };
            host.perform_declared_transition(&source, &identifier, &presentation);
            if interceptor.cancel(request) {
                warn!(
                    identifier = identifier.as_str(),
                    "Host performed declared transition without calling the before-transition hook"
                );
                task_ticket.settle(Err(RouteError::DestinationUnavailable));
            }
        };

        debug!(
            node = %self.lifecycle.id(),
            identifier = self.identifier.as_str(),
            deferred = self.defer,
            "Requesting declared transition"
        );
        if self.defer {
            self.context.host.schedule(Box::new(perform));
        } else {
            perform();
        }
        self.lifecycle.settle(Ok(ticket))
    }
}

fn completion<T: Any>(
    ticket: TransitionTicket,
    resolver: CapabilityResolver,
    wiring: Option<Wiring>,
) -> Completion {
    Box::new(move |transition: &DeclaredTransition| {
        if transition.is_embed() && !transition.source().is_embed_container() {
            let refused = RouteError::custom(format!(
                "source screen `{}` can't host embed transitions",
                transition.source().describe()
            ));
            ticket.settle(Err(refused.clone()));
            return Err(refused);
        }
        let result = match wiring {
            Some(wiring) => locate::<T>(transition.destination(), &resolver).and_then(|destination| {
                ticket.bind(&destination);
                wiring(&destination, &resolver)
            }),
            None => {
                ticket.bind(&top_of(transition.destination()));
                Ok(())
            }
        };
        ticket.settle(result.clone());
        result
    })
}

impl<T> std::fmt::Debug for DeclaredTransitionNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclaredTransitionNode")
            .field("id", &self.lifecycle.id())
            .field("identifier", &self.identifier)
            .field("state", &self.lifecycle.state())
            .field("deferred", &self.defer)
            .finish()
    }
}
