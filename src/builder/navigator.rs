//! Builder for constructing navigators.

use crate::builder::config::NavigatorConfig;
use crate::builder::error::BuildError;
use crate::host::Host;
use crate::navigator::Navigator;
use std::rc::Rc;

/// Builder for constructing a [`Navigator`] with a fluent API.
#[derive(Default)]
pub struct NavigatorBuilder {
    host: Option<Rc<dyn Host>>,
    config: NavigatorConfig,
}

impl NavigatorBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host (required).
    pub fn host(mut self, host: Rc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.config.animated = animated;
        self
    }

    pub fn input_port(mut self, port: impl Into<String>) -> Self {
        self.config.input_port = port.into();
        self
    }

    pub fn defer_declared_transitions(mut self, defer: bool) -> Self {
        self.config.defer_declared_transitions = defer;
        self
    }

    /// Build the navigator, installing the interceptor on the host.
    /// Returns an error if the host is missing or the configuration invalid.
    pub fn build(self) -> Result<Navigator, BuildError> {
        let host = self.host.ok_or(BuildError::MissingHost)?;
        self.config.validate()?;
        Ok(Navigator::with_config(host, self.config)?)
    }
}
