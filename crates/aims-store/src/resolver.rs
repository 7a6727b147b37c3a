//! Priority resolution across several stores

use std::cmp::Reverse;

use aims_core::{Manifest, SignatureVerifier};
use tracing::{debug, info, warn};

use crate::client::ManifestStore;
use crate::config::StoresFile;
use crate::error::{StoreError, StoreResult};
use crate::http::HttpTransport;
use crate::transport::RegistryTransport;

/// A store with its resolution priority
#[derive(Debug, Clone)]
pub struct NamedStore<T: RegistryTransport = HttpTransport> {
    pub name: String,
    pub priority: i32,
    pub store: ManifestStore<T>,
}

/// Consults stores in descending priority order
///
/// Stores with equal priority keep the order they were added in.
#[derive(Debug, Clone)]
pub struct StoreResolver<T: RegistryTransport = HttpTransport> {
    stores: Vec<NamedStore<T>>,
}

impl StoreResolver<HttpTransport> {
    /// Build HTTP stores for every entry of a stores file
    pub fn from_config(file: &StoresFile) -> StoreResult<Self> {
        if file.is_empty() {
            return Err(StoreError::Config("no stores configured".to_string()));
        }

        let mut resolver = Self::new();
        for config in &file.stores {
            let store = ManifestStore::from_config(config)?;
            resolver = resolver.with_store(config.name.clone(), config.priority, store);
        }
        Ok(resolver)
    }
}

impl<T: RegistryTransport> Default for StoreResolver<T> {
    fn default() -> Self {
        Self { stores: Vec::new() }
    }
}

impl<T: RegistryTransport> StoreResolver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store
    pub fn with_store(mut self, name: impl Into<String>, priority: i32, store: ManifestStore<T>) -> Self {
        self.stores.push(NamedStore {
            name: name.into(),
            priority,
            store,
        });
        self.stores.sort_by_key(|s| Reverse(s.priority));
        self
    }

    /// Store names in consultation order
    pub fn store_names(&self) -> Vec<&str> {
        self.stores.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn stores(&self) -> &[NamedStore<T>] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Resolve from the highest-priority store that has the manifest
    ///
    /// A failing store is skipped. If no store has the manifest and at least
    /// one failed, the last failure is returned.
    pub async fn resolve(&self, did: &str) -> StoreResult<Option<Manifest>> {
        let mut last_error = None;

        for entry in &self.stores {
            match entry.store.resolve(did).await {
                Ok(Some(manifest)) => {
                    info!(did = %did, store = %entry.name, "Resolved manifest from store");
                    return Ok(Some(manifest));
                }
                Ok(None) => {
                    debug!(did = %did, store = %entry.name, "Store has no manifest");
                }
                Err(StoreError::Format(e)) => return Err(e.into()),
                Err(e) => {
                    warn!(did = %did, store = %entry.name, error = %e, "Store failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    pub async fn verify(&self, did: &str) -> StoreResult<bool> {
        Ok(self.resolve(did).await?.is_some_and(|m| m.verify()))
    }

    pub async fn verify_with(
        &self,
        did: &str,
        verifier: &dyn SignatureVerifier,
        public_key: &[u8],
    ) -> StoreResult<bool> {
        Ok(self
            .resolve(did)
            .await?
            .is_some_and(|m| m.verify_with(verifier, public_key)))
    }
}
