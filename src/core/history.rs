//! Lifecycle history tracking.
//!
//! Nodes keep an immutable record of every state change so a caller (or a
//! test) can inspect how a transition got where it is.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state change.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Record a change happening now.
    pub fn now(from: S, to: S) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of state changes.
///
/// History is immutable: `record` returns a new history with the change
/// appended.
///
/// # Example
///
/// ```rust
/// use routewire::core::{NodeState, StateHistory, StateTransition};
///
/// let history = StateHistory::new()
///     .record(StateTransition::now(NodeState::Pending, NodeState::Bound))
///     .record(StateTransition::now(NodeState::Bound, NodeState::Fired));
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&NodeState::Pending, &NodeState::Bound, &NodeState::Fired]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a change, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the initial state followed by the `to` state of each change.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// The most recently entered state, if anything was recorded.
    pub fn last_state(&self) -> Option<&S> {
        self.transitions.last().map(|t| &t.to)
    }

    /// Time between the first and last recorded change.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded changes, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }
}
