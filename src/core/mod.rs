//! Core lifecycle types shared by every transition node.
//!
//! This module contains the pure part of the crate:
//! - Node states via the `State` trait and `NodeState`
//! - Immutable lifecycle history
//! - Screen guards used to locate unwind targets

mod guard;
mod history;
mod lifecycle;
mod state;

pub use guard::ScreenGuard;
pub use history::{StateHistory, StateTransition};
pub use lifecycle::NodeLifecycle;
pub use state::{NodeState, State};
