//! # AIMS Registry
//!
//! Reference registry for the AIMS manifest store protocol. Manifests are
//! kept in memory, keyed by their `did` string, last write wins.
//!
//! ```ignore
//! use aims_registry::{RegistryConfig, spawn};
//!
//! let registry = spawn(RegistryConfig::ephemeral()).await?;
//! let store = aims_store::ManifestStore::new(registry.url(), timeout)?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{DEFAULT_PORT, RegistryConfig};
pub use error::{RegistryError, RegistryResult};
pub use routes::{PublishReceipt, router};
pub use server::{RunningRegistry, serve, spawn};
pub use state::{RegistryState, StoredManifest, WriteOutcome};
