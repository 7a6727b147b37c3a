//! In-memory registry for testing
//!
//! [`MockRegistry`] speaks the store protocol in process, so store and
//! resolver logic can be exercised without a network. Failures are injected
//! with [`MockRegistry::set_forced_status`] and [`MockRegistry::set_latency`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aims_store::{ManifestStore, MockRegistry};
//!
//! let registry = Arc::new(MockRegistry::new());
//! let store = ManifestStore::with_transport("mock://registry", timeout, registry.clone());
//!
//! store.publish(&manifest).await?;
//! assert_eq!(registry.len(), 1);
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{RegistryResponse, RegistryTransport};

const MANIFESTS_PATH: &str = "/manifests";

#[derive(Debug, Clone)]
struct StoredEntry {
    body: Vec<u8>,
    revision: u64,
}

/// An in-process manifest registry
#[derive(Debug, Default)]
pub struct MockRegistry {
    /// Stored wire bodies keyed by DID string
    manifests: DashMap<String, StoredEntry>,
    /// Status returned for every request when non-zero
    forced_status: AtomicU16,
    /// Delay applied before every response
    latency: Mutex<Duration>,
    /// Number of requests received
    requests: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with `status` until cleared
    pub fn set_forced_status(&self, status: Option<u16>) {
        self.forced_status.store(status.unwrap_or(0), Ordering::SeqCst);
    }

    /// Delay every response by `latency`
    pub fn set_latency(&self, latency: Duration) {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = latency;
        }
    }

    /// Store a raw body under `did`, bypassing the protocol
    ///
    /// Lets tests plant bodies that do not decode as manifests.
    pub fn insert_raw(&self, did: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.store(did.into(), body.into());
    }

    /// Insert or replace under one entry lock; returns the new revision and
    /// whether the entry was created
    fn store(&self, did: String, body: Vec<u8>) -> (u64, bool) {
        match self.manifests.entry(did) {
            Entry::Occupied(mut entry) => {
                let revision = entry.get().revision + 1;
                entry.insert(StoredEntry { body, revision });
                (revision, false)
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredEntry { body, revision: 1 });
                (1, true)
            }
        }
    }

    /// Current revision for `did`, if stored
    pub fn revision(&self, did: &str) -> Option<u64> {
        self.manifests.get(did).map(|e| e.revision)
    }

    pub fn contains(&self, did: &str) -> bool {
        self.manifests.contains_key(did)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn before_response(&self) -> Option<RegistryResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency.lock().map(|guard| *guard).unwrap_or_default();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match self.forced_status.load(Ordering::SeqCst) {
            0 => None,
            status => Some(RegistryResponse::new(status, "forced failure")),
        }
    }

    fn publish(&self, body: Vec<u8>) -> RegistryResponse {
        let did = match serde_json::from_slice::<Value>(&body) {
            Ok(value) => match value.get("did").and_then(Value::as_str) {
                Some(did) => did.to_string(),
                None => return RegistryResponse::new(400, "manifest has no did"),
            },
            Err(e) => return RegistryResponse::new(400, e.to_string()),
        };

        let (revision, created) = self.store(did.clone(), body);
        debug!(did = %did, revision, created, "Mock registry stored manifest");

        let status = if created { 201 } else { 200 };
        RegistryResponse::new(status, json!({ "did": did, "revision": revision }).to_string())
    }

    fn lookup(&self, did: &str) -> RegistryResponse {
        match self.manifests.get(did) {
            Some(entry) => RegistryResponse::new(200, entry.body.clone()),
            None => RegistryResponse::new(404, "not found"),
        }
    }
}

/// Path suffix following the manifests collection, if the URL addresses it
fn manifests_suffix(url: &str) -> Option<&str> {
    url.rfind(MANIFESTS_PATH)
        .map(|idx| &url[idx + MANIFESTS_PATH.len()..])
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[async_trait]
impl RegistryTransport for MockRegistry {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RegistryResponse, TransportError> {
        if let Some(forced) = self.before_response().await {
            return Ok(forced);
        }
        match manifests_suffix(url) {
            Some("") => Ok(self.publish(body)),
            _ => Ok(RegistryResponse::new(404, "not found")),
        }
    }

    async fn get(&self, url: &str) -> Result<RegistryResponse, TransportError> {
        if let Some(forced) = self.before_response().await {
            return Ok(forced);
        }
        match manifests_suffix(url).and_then(|rest| rest.strip_prefix('/')) {
            Some(did) if !did.is_empty() => Ok(self.lookup(did)),
            _ => Ok(RegistryResponse::new(404, "not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DID: &str = "did:aims:web:example.com:agent";

    fn body(did: &str) -> Vec<u8> {
        json!({ "did": did }).to_string().into_bytes()
    }

    #[tokio::test]
    async fn test_publish_then_get() {
        let registry = MockRegistry::new();

        let response = registry.post_json("mock://r/manifests", body(DID)).await.unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(registry.revision(DID), Some(1));

        let response = registry.get(&format!("mock://r/manifests/{DID}")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, body(DID));
    }

    #[tokio::test]
    async fn test_republish_bumps_revision() {
        let registry = MockRegistry::new();
        registry.post_json("mock://r/manifests", body(DID)).await.unwrap();
        let response = registry.post_json("mock://r/manifests", body(DID)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(registry.revision(DID), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishes_get_distinct_revisions() {
        let registry = std::sync::Arc::new(MockRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.post_json("mock://r/manifests", body(DID)).await.unwrap()
                })
            })
            .collect();

        let mut created = 0;
        let mut revisions = Vec::new();
        for handle in handles {
            let response = handle.await.unwrap();
            if response.status == 201 {
                created += 1;
            }
            let receipt: Value = serde_json::from_slice(&response.body).unwrap();
            revisions.push(receipt["revision"].as_u64().unwrap());
        }

        revisions.sort_unstable();
        assert_eq!(created, 1);
        assert_eq!(revisions, (1..=16).collect::<Vec<u64>>());
        assert_eq!(registry.revision(DID), Some(16));
    }

    #[tokio::test]
    async fn test_missing_did_is_404() {
        let registry = MockRegistry::new();
        let response = registry.get("mock://r/manifests/did:aims:web:x.com:absent").await.unwrap();
        assert!(response.is_not_found());
    }

    #[tokio::test]
    async fn test_publish_without_did_is_400() {
        let registry = MockRegistry::new();
        let response = registry.post_json("mock://r/manifests", b"{}".to_vec()).await.unwrap();
        assert_eq!(response.status, 400);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_forced_status() {
        let registry = MockRegistry::new();
        registry.set_forced_status(Some(503));

        let response = registry.post_json("mock://r/manifests", body(DID)).await.unwrap();
        assert_eq!(response.status, 503);
        assert!(registry.is_empty());

        registry.set_forced_status(None);
        let response = registry.post_json("mock://r/manifests", body(DID)).await.unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(registry.request_count(), 2);
    }

    #[test]
    fn test_manifests_suffix() {
        assert_eq!(manifests_suffix("http://h/manifests"), Some(""));
        assert_eq!(manifests_suffix("http://h/base/manifests/did:x"), Some("/did:x"));
        assert_eq!(manifests_suffix("http://h/manifestsx"), None);
        assert_eq!(manifests_suffix("http://h/health"), None);
    }
}
