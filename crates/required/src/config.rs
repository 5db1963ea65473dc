//! Validator configuration.

use crate::constraint::ZeroBound;
use crate::evaluate::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Settings shared by both run modes.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use required::{Config, ZeroBound};
///
/// let config = Config::from_json(r#"{ "zero_bound": "literal" }"#).unwrap();
/// assert_eq!(config.zero_bound, ZeroBound::Literal);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How a declared `min=0` / `max=0` is read.
    pub zero_bound: ZeroBound,
    /// How many levels of nested records are followed before a nested
    /// record is treated as opaque.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zero_bound: ZeroBound::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
