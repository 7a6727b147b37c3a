//! Registry configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use aims_logging::LogConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for the reference registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            logging: LogConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Listen on an OS-assigned loopback port
    pub fn ephemeral() -> Self {
        Self::default().with_bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
    }

    /// Set the listening address
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Set the logging configuration
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn from_toml_str(content: &str) -> RegistryResult<Self> {
        toml::from_str(content).map_err(|e| RegistryError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}
