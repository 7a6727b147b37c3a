//! Manifest store client
//!
//! [`ManifestStore`] publishes manifests to a registry and resolves them by
//! identifier. Every call is bounded by the store's timeout.

use std::future::Future;
use std::time::Duration;

use aims_core::{Did, Manifest, SignatureVerifier};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult, TransportError};
use crate::http::HttpTransport;
use crate::transport::{RegistryResponse, RegistryTransport};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a single manifest registry
///
/// Holds only immutable configuration and a shareable transport, so one
/// instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct ManifestStore<T: RegistryTransport = HttpTransport> {
    base_url: String,
    timeout: Duration,
    transport: T,
}

impl ManifestStore<HttpTransport> {
    /// Create a store client speaking HTTP to `base_url`
    ///
    /// A zero timeout is rejected, since every call would expire at once.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        if timeout.is_zero() {
            return Err(StoreError::Config("store timeout must be non-zero".to_string()));
        }
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(base_url, timeout, transport))
    }

    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Self::new(config.url.clone(), config.timeout())
    }
}

impl<T: RegistryTransport> ManifestStore<T> {
    /// Create a store client over an existing transport
    pub fn with_transport(base_url: impl Into<String>, timeout: Duration, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn manifests_url(&self) -> String {
        format!("{}/manifests", self.base_url)
    }

    async fn round_trip<F>(&self, request: F) -> Result<RegistryResponse, TransportError>
    where
        F: Future<Output = Result<RegistryResponse, TransportError>>,
    {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }

    /// Publish a manifest
    ///
    /// Returns the manifest's own `did` string. The identifier is not parsed
    /// here; the registry decides what it accepts.
    pub async fn publish(&self, manifest: &Manifest) -> StoreResult<String> {
        let body = serde_json::to_vec(manifest).map_err(|e| StoreError::Encode(e.to_string()))?;
        let url = self.manifests_url();
        debug!(url = %url, did = %manifest.did, bytes = body.len(), "Publishing manifest");

        let response = self.round_trip(self.transport.post_json(&url, body)).await?;
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body_text(),
            }
            .into());
        }

        info!(did = %manifest.did, status = response.status, store = %self.base_url, "Published manifest");
        Ok(manifest.did.clone())
    }

    /// Resolve a manifest by identifier
    ///
    /// The identifier is parsed first. A registry miss is `Ok(None)`. A body
    /// that does not decode, describes a different identifier, or carries
    /// invalid layers is a decode error.
    pub async fn resolve(&self, did: &str) -> StoreResult<Option<Manifest>> {
        let did = Did::parse(did)?;
        let url = format!("{}/{}", self.manifests_url(), did);
        debug!(url = %url, "Resolving manifest");

        let response = self.round_trip(self.transport.get(&url)).await?;
        if response.is_not_found() {
            debug!(did = %did, store = %self.base_url, "Manifest not found");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body_text(),
            }
            .into());
        }

        let manifest: Manifest =
            serde_json::from_slice(&response.body).map_err(|e| StoreError::Decode(e.to_string()))?;
        let requested = did.to_string();
        if manifest.did != requested {
            warn!(did = %requested, served = %manifest.did, store = %self.base_url, "Registry served another identifier");
            return Err(StoreError::Decode(format!(
                "requested {requested} but registry served {}",
                manifest.did
            )));
        }
        manifest
            .validate()
            .map_err(|e| StoreError::Decode(format!("invalid manifest for {requested}: {e}")))?;

        info!(did = %did, store = %self.base_url, signed = manifest.is_signed(), "Resolved manifest");
        Ok(Some(manifest))
    }

    /// Resolve and verify with the default verifier
    ///
    /// An absent manifest verifies as `false`.
    pub async fn verify(&self, did: &str) -> StoreResult<bool> {
        Ok(self.resolve(did).await?.is_some_and(|m| m.verify()))
    }

    /// Resolve and verify with an injected verifier
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aims_core::{
        BrandAffiliation, ContentAccessLayer, DeploymentLayer, FoundationLayer, RedistributionPolicy,
    };

    use super::*;
    use crate::mock::MockRegistry;

    const DID: &str = "did:aims:web:retailer.com:shopping-assistant";

    fn mock_store() -> (Arc<MockRegistry>, ManifestStore<Arc<MockRegistry>>) {
        let registry = Arc::new(MockRegistry::new());
        let store =
            ManifestStore::with_transport("mock://registry/", Duration::from_secs(5), registry.clone());
        (registry, store)
    }

    fn manifest() -> Manifest {
        Manifest::new(DID)
            .with_foundation(FoundationLayer::new().with_rsl_compliance(true))
            .with_content_access(
                ContentAccessLayer::new().with_redistribution_policy(RedistributionPolicy::Attributed),
            )
    }

    #[test]
    fn test_base_url_trimmed() {
        let (_, store) = mock_store();
        assert_eq!(store.base_url(), "mock://registry");
        assert_eq!(store.manifests_url(), "mock://registry/manifests");
    }

    #[tokio::test]
    async fn test_publish_and_resolve() {
        let (registry, store) = mock_store();

        let original = manifest();
        let did = store.publish(&original).await.unwrap();
        assert_eq!(did, DID);
        assert!(registry.contains(DID));

        let resolved = store.resolve(DID).await.unwrap().unwrap();
        assert_eq!(resolved, original);
        assert!(resolved.foundation.rsl_compliance);
        assert_eq!(
            resolved.content_access.redistribution_policy,
            RedistributionPolicy::Attributed
        );
    }

    #[tokio::test]
    async fn test_resolve_absent_is_none() {
        let (_, store) = mock_store();
        assert!(store.resolve("did:aims:web:example.com:absent-agent").await.unwrap().is_none());
        assert!(!store.verify("did:aims:web:example.com:absent-agent").await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_did_before_request() {
        let (registry, store) = mock_store();
        let err = store.resolve("did:web:example.com:agent").await.unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
        assert_eq!(registry.request_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_does_not_parse_did() {
        let (registry, store) = mock_store();
        let did = store.publish(&Manifest::new("not-a-did")).await.unwrap();
        assert_eq!(did, "not-a-did");
        assert!(registry.contains("not-a-did"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let (registry, store) = mock_store();
        registry.set_forced_status(Some(500));

        let err = store.publish(&manifest()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Transport(TransportError::Status { status: 500, .. })
        ));
        assert!(err.is_retryable());

        let err = store.resolve(DID).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let (registry, store) = mock_store();
        registry.insert_raw(DID, "{\"did\": 42}");

        let err = store.resolve(DID).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_registry_times_out() {
        let registry = Arc::new(MockRegistry::new());
        registry.set_latency(Duration::from_secs(10));
        let store = ManifestStore::with_transport("mock://r", Duration::from_millis(100), registry);

        let err = store.resolve(DID).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Transport(TransportError::Timeout(d)) if d == Duration::from_millis(100)
        ));
    }

    #[tokio::test]
    async fn test_verify_signed_manifest() {
        let (_, store) = mock_store();
        let mut signed = manifest();
        signed.sign(b"publisher key").unwrap();
        store.publish(&signed).await.unwrap();

        assert!(store.verify(DID).await.unwrap());
    }

    struct RejectAll;

    impl SignatureVerifier for RejectAll {
        fn validate(&self, _: &[u8], _: &str, _: &[u8]) -> bool {
            false
        }

        fn is_authoritative(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_verify_with_rejecting_verifier() {
        let (_, store) = mock_store();

        // Unsigned manifests pass any verifier
        store.publish(&manifest()).await.unwrap();
        assert!(store.verify_with(DID, &RejectAll, &[]).await.unwrap());

        let mut signed = manifest();
        signed.sign(b"publisher key").unwrap();
        store.publish(&signed).await.unwrap();
        assert!(!store.verify_with(DID, &RejectAll, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_manifest_for_other_did_is_decode_error() {
        let (registry, store) = mock_store();
        let impostor = Manifest::new("did:aims:web:evil.com:impostor");
        registry.insert_raw(DID, serde_json::to_vec(&impostor).unwrap());

        let err = store.resolve(DID).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(ref msg) if msg.contains("evil.com")));
        assert!(store.verify(DID).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_layers_are_decode_error() {
        let (registry, store) = mock_store();
        let invalid = Manifest::new(DID).with_deployment(
            DeploymentLayer::new().with_brand_affiliation(BrandAffiliation::new("", "")),
        );
        registry.insert_raw(DID, serde_json::to_vec(&invalid).unwrap());

        let err = store.resolve(DID).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(ref msg) if msg.contains("brand")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ManifestStore::new("http://localhost:8080", Duration::ZERO).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(ManifestStore::new("http://localhost:8080", Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_client() {
        let (registry, store) = mock_store();
        let dids: Vec<String> = (0..4)
            .map(|i| format!("did:aims:web:example.com:agent-{i}"))
            .collect();
        let manifests: Vec<Manifest> = dids.iter().map(|d| Manifest::new(d.as_str())).collect();

        let (a, b, c, d) = tokio::join!(
            store.publish(&manifests[0]),
            store.publish(&manifests[1]),
            store.publish(&manifests[2]),
            store.publish(&manifests[3]),
        );
        for (published, did) in [a, b, c, d].into_iter().zip(&dids) {
            assert_eq!(&published.unwrap(), did);
        }
        assert_eq!(registry.len(), 4);

        let (a, b, c, missing) = tokio::join!(
            store.resolve(&dids[0]),
            store.resolve(&dids[1]),
            store.resolve(&dids[2]),
            store.resolve("did:aims:web:example.com:absent-agent"),
        );
        for (resolved, expected) in [a, b, c].into_iter().zip(&manifests) {
            assert_eq!(&resolved.unwrap().unwrap(), expected);
        }
        assert!(missing.unwrap().is_none());
    }
}
