//! Naming configuration for composite fragments.

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Joins outer and inner fragment names (`H*F`).
    pub fragment_separator: String,
    /// Qualifies a port with its fragment's name (`F.q0`).
    pub port_separator: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            fragment_separator: "*".to_string(),
            port_separator: ".".to_string(),
        }
    }
}

impl NamingConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn composite_name(&self, outer: &str, inner: &str) -> String {
        format!("{outer}{}{inner}", self.fragment_separator)
    }

    pub fn qualify(&self, fragment: &str, port: &str) -> String {
        format!("{fragment}{}{port}", self.port_separator)
    }
}
