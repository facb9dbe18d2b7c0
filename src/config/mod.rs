mod env_overrides;
mod store;

pub use env_overrides::{DialogBackend, Settings};
pub use store::{FileStore, MemoryStore, PolicyStore, default_config_path};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Extensions that are never opened without an explicit allow entry.
const DEFAULT_BLOCKED: &[&str] = &[
    "*.exe", "*.bat", "*.cmd", "*.ps1", "*.vbs", "*.js", "*.msi", "*.scr", "*.com", "*.pif",
    "*.reg", "*.wsf", "*.wsh",
];

/// Persisted open policy: two ordered lists of base-name globs.
///
/// Deserialization overlays the file onto [`Policy::default`], so a file that
/// only names `allowed` keeps the built-in block-list. Any other key, such
/// as a misspelled `alowed`, makes the file malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    pub blocked: Vec<String>,
    pub allowed: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            blocked: default_blocked_patterns(),
            allowed: Vec::new(),
        }
    }
}

#[must_use]
pub fn default_blocked_patterns() -> Vec<String> {
    DEFAULT_BLOCKED.iter().map(|p| (*p).to_string()).collect()
}

impl Policy {
    /// A policy with both lists empty.
    pub fn empty() -> Self {
        Self {
            blocked: Vec::new(),
            allowed: Vec::new(),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
