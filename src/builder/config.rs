//! Navigator configuration.

use super::error::BuildError;
use serde::{Deserialize, Serialize};

/// Conventional input port name.
pub const DEFAULT_INPUT_PORT: &str = "output";

/// Defaults applied to every node a navigator creates.
///
/// Missing fields take their default when deserialized, so a partial JSON
/// object is a valid configuration.
///
/// # Example
///
/// ```rust
/// use routewire::builder::NavigatorConfig;
///
/// let config = NavigatorConfig::from_json(r#"{ "animated": false }"#).unwrap();
/// assert!(!config.animated);
/// assert_eq!(config.input_port, "output");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Animation flag new nodes start with.
    pub animated: bool,

    /// Port name the capability resolver treats as conventional.
    pub input_port: String,

    /// Perform declared transitions on the host's next turn instead of inline.
    pub defer_declared_transitions: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            animated: true,
            input_port: DEFAULT_INPUT_PORT.to_string(),
            defer_declared_transitions: true,
        }
    }
}

impl NavigatorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.input_port.trim().is_empty() {
            return Err(BuildError::EmptyInputPort);
        }
        Ok(())
    }
}
