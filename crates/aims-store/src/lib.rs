//! # AIMS Store
//!
//! Client side of the manifest store protocol: publish a manifest to a
//! registry, resolve one by identifier, and verify what comes back.
//!
//! ## Key Types
//!
//! - [`ManifestStore`]: client for one registry
//! - [`StoreResolver`]: several stores consulted by priority
//! - [`StoreConfig`] / [`StoresFile`]: TOML-backed store configuration
//!
//! ## Transports
//!
//! - [`RegistryTransport`]: request/response seam
//! - [`HttpTransport`]: reqwest-backed HTTP
//! - [`MockRegistry`]: in-memory registry for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use aims_store::ManifestStore;
//!
//! let store = ManifestStore::new("https://registry.example.com", Duration::from_secs(30))?;
//! store.publish(&manifest).await?;
//!
//! match store.resolve("did:aims:web:example.com:agent").await? {
//!     Some(manifest) => println!("{}", manifest.trust_state(&verifier, &key)),
//!     None => println!("not published"),
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod resolver;
pub mod transport;

pub use client::{DEFAULT_TIMEOUT, ManifestStore};
pub use config::{DEFAULT_TIMEOUT_SECS, StoreConfig, StoresFile};
pub use error::{StoreError, StoreResult, TransportError};
pub use http::HttpTransport;
pub use mock::MockRegistry;
pub use resolver::{NamedStore, StoreResolver};
pub use transport::{RegistryResponse, RegistryTransport};
