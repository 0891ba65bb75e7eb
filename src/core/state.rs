//! Lifecycle states for transition nodes.
//!
//! Every node moves through the same small state machine:
//! `Pending` → `Bound` → `Fired`, or into the terminal `Failed` state when
//! resolution or wiring surfaces an error.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for lifecycle states.
///
/// All methods are pure. States are plain values describing where a node is
/// in its single-use lifecycle.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records
/// - `PartialEq`: states are compared when guarding operations
/// - `Debug`: states show up in logs
/// - `Serialize` + `Deserialize`: history can be exported for diagnostics
pub trait State: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> {
    /// Name of the state for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Where a transition node is in its lifecycle.
///
/// # Example
///
/// ```rust
/// use routewire::core::{NodeState, State};
///
/// assert!(!NodeState::Bound.is_final());
/// assert!(NodeState::Fired.is_final());
/// assert!(NodeState::Failed.is_error());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum NodeState {
    /// Destination not yet known, action not fired.
    Pending,
    /// Destination known, waiting to fire.
    Bound,
    /// Deferred action handed to the host.
    Fired,
    /// Resolution or wiring failed.
    Failed,
}

impl State for NodeState {
    fn name(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Bound => "Bound",
            Self::Fired => "Fired",
            Self::Failed => "Failed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Fired | Self::Failed)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }
}
