//! Store configuration
//!
//! A stores file lists the registries a client consults, e.g.
//!
//! ```toml
//! [[stores]]
//! name = "primary"
//! url = "https://registry.example.com"
//! priority = 10
//!
//! [[stores]]
//! url = "http://localhost:8080"
//! timeout_secs = 5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a single manifest store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Registry base URL
    pub url: String,
    /// Name used in logs
    #[serde(default = "default_name")]
    pub name: String,
    /// Higher priorities are consulted first
    #[serde(default)]
    pub priority: i32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl StoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: default_name(),
            priority: 0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the store name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.url.trim().is_empty() {
            return Err(StoreError::Config(format!("store '{}' has an empty url", self.name)));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config(format!(
                "store '{}' has a zero timeout",
                self.name
            )));
        }
        Ok(())
    }
}

/// A list of stores, as loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoresFile {
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
}

impl StoresFile {
    pub fn from_toml_str(content: &str) -> StoreResult<Self> {
        let file: Self = toml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))?;
        for store in &file.stores {
            store.validate()?;
        }
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Add a store
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.stores.push(store);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
