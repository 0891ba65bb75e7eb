//! Capability discovery on screens.
//!
//! A capability is any value a screen exposes for configuration (its input)
//! or produces after its work is done (its output). Screens opt in by
//! answering a [`CapabilityRequest`]; the [`CapabilityResolver`] asks the
//! screen, and, for containers, its active child.
//!
//! # Example
//!
//! ```rust
//! use routewire::capability::{CapabilityRequest, CapabilityResolver};
//! use routewire::screen::Screen;
//! use std::any::Any;
//!
//! #[derive(Clone)]
//! struct DetailInput(&'static str);
//!
//! struct DetailScreen;
//!
//! impl Screen for DetailScreen {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn provide_input(&self, request: &mut CapabilityRequest<'_>) {
//!         request.provide(|| DetailInput("detail"));
//!     }
//! }
//!
//! let resolver = CapabilityResolver::conventional("output");
//! let input = resolver.resolve::<DetailInput>(&DetailScreen).unwrap();
//! assert_eq!(input.0, "detail");
//! assert!(resolver.resolve::<u32>(&DetailScreen).is_none());
//! ```

mod output;

pub use output::{IntoOutput, OutputStore, OutputValue};

use crate::screen::Screen;
use std::any::{Any, TypeId};

/// A pending question to a screen: "do you expose a `T` on this port?"
///
/// The first provider whose type and port match wins; later providers are
/// ignored.
pub struct CapabilityRequest<'a> {
    port: &'a str,
    conventional: bool,
    wanted: TypeId,
    slot: Option<Box<dyn Any>>,
}

impl<'a> CapabilityRequest<'a> {
    pub(crate) fn new<T: Any>(port: &'a str, conventional: bool) -> Self {
        Self {
            port,
            conventional,
            wanted: TypeId::of::<T>(),
            slot: None,
        }
    }

    /// Port name being asked for.
    pub fn port(&self) -> &str {
        self.port
    }

    /// True when the request targets the conventional input port.
    pub fn is_conventional(&self) -> bool {
        self.conventional
    }

    /// True when the request asks for a `T`.
    pub fn wants<T: Any>(&self) -> bool {
        self.wanted == TypeId::of::<T>()
    }

    /// True once a provider answered.
    pub fn is_satisfied(&self) -> bool {
        self.slot.is_some()
    }

    /// Offer a `T` on the conventional port.
    ///
    /// `make` only runs when the request actually wants a `T`.
    pub fn provide<T: Any>(&mut self, make: impl FnOnce() -> T) -> &mut Self {
        if self.conventional {
            self.fill(make);
        }
        self
    }

    /// Offer a `T` on a named port.
    pub fn provide_on<T: Any>(&mut self, port: &str, make: impl FnOnce() -> T) -> &mut Self {
        if self.port == port {
            self.fill(make);
        }
        self
    }

    fn fill<T: Any>(&mut self, make: impl FnOnce() -> T) {
        if self.slot.is_none() && self.wants::<T>() {
            self.slot = Some(Box::new(make()));
        }
    }

    fn take<T: Any>(self) -> Option<T> {
        self.slot
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }
}

/// Locates input capabilities on screens.
///
/// Resolution never fails loudly: absence is reported as `None` and turned
/// into a typed error by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityResolver {
    port: String,
    conventional: bool,
}

impl CapabilityResolver {
    /// Resolve from the conventional input port.
    pub fn conventional(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            conventional: true,
        }
    }

    /// Resolve from a specific named port only.
    pub fn named(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            conventional: false,
        }
    }

    pub(crate) fn for_port(conventional_port: &str, selected: Option<&str>) -> Self {
        match selected {
            Some(port) => Self::named(port),
            None => Self::conventional(conventional_port),
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Ask the screen itself, without looking into children.
    pub fn resolve_direct<T: Any>(&self, screen: &dyn Screen) -> Option<T> {
        let mut request = CapabilityRequest::new::<T>(&self.port, self.conventional);
        screen.provide_input(&mut request);
        request.take::<T>()
    }

    /// Ask the screen, then recurse into the active child of containers.
    pub fn resolve<T: Any>(&self, screen: &dyn Screen) -> Option<T> {
        self.resolve_direct::<T>(screen).or_else(|| {
            screen.container_kind()?;
            let child = screen.active_child()?;
            self.resolve::<T>(child.as_ref())
        })
    }

    /// True when the screen exposes a `T` or is itself a `T`.
    pub fn matches<T: Any>(&self, screen: &dyn Screen) -> bool {
        screen.as_any().is::<T>() || self.resolve::<T>(screen).is_some()
    }
}
