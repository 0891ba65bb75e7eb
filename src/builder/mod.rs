//! Builder API for assembling navigators.
//!
//! This module provides the navigator builder, its serializable
//! configuration, and the errors either can report.

pub mod config;
pub mod error;
pub mod navigator;

pub use config::{NavigatorConfig, DEFAULT_INPUT_PORT};
pub use error::BuildError;
pub use navigator::NavigatorBuilder;
