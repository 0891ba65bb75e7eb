//! Identity, state and history shared by every node variant.

use super::history::{StateHistory, StateTransition};
use super::state::{NodeState, State};
use crate::error::RouteError;
use uuid::Uuid;

/// Single-use lifecycle of a transition node.
#[derive(Clone, Debug)]
pub struct NodeLifecycle {
    id: Uuid,
    state: NodeState,
    history: StateHistory<NodeState>,
}

impl NodeLifecycle {
    /// Start a lifecycle in `Pending`.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: NodeState::Pending,
            history: StateHistory::new(),
        }
    }

    /// Start a lifecycle whose destination is already known.
    pub fn bound() -> Self {
        let mut lifecycle = Self::new();
        lifecycle.advance(NodeState::Bound);
        lifecycle
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn history(&self) -> &StateHistory<NodeState> {
        &self.history
    }

    /// Move to `next`, recording the change.
    pub fn advance(&mut self, next: NodeState) {
        if self.state == next {
            return;
        }
        self.history = self
            .history
            .record(StateTransition::now(self.state, next));
        self.state = next;
    }

    /// Fails with `AlreadyFired` once the node reached a terminal state.
    pub fn ensure_open(&self) -> Result<(), RouteError> {
        if self.state.is_final() {
            Err(RouteError::AlreadyFired)
        } else {
            Ok(())
        }
    }

    /// Record the outcome of a fire attempt and hand it back.
    pub fn settle<T>(&mut self, result: Result<T, RouteError>) -> Result<T, RouteError> {
        match &result {
            Ok(_) => self.advance(NodeState::Fired),
            Err(_) => self.advance(NodeState::Failed),
        }
        result
    }
}

impl Default for NodeLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
