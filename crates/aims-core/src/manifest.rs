//! The AI Manifest document
//!
//! A manifest combines the three layers for one DID:
//!
//! - Foundation: training data licensing provenance
//! - Deployment: commercial and operational context
//! - Content access: runtime content access rights
//!
//! ## Identity
//!
//! The `did` field is stored as a plain string and only parsed on demand via
//! [`Manifest::parsed_did`]. A document with a malformed identity still
//! deserializes, stores, and travels; only operations that need the identity
//! fail.
//!
//! ## Trust
//!
//! Valid and trusted are different states. An unsigned manifest is valid
//! ([`Manifest::verify`] returns `true`) but untrusted
//! ([`TrustState::Unsigned`]). Callers deciding whether to act on a
//! manifest's claims should use [`Manifest::trust_state`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::did::Did;
use crate::error::{FormatError, ManifestError, ManifestResult, ValidationError};
use crate::layers::{ContentAccessLayer, DeploymentLayer, FoundationLayer, Validate};
use crate::signature::{KeyedDigestSigner, ManifestSigner, SignatureVerifier, UnverifiedSignatures};

/// Manifest schema version written by this crate
pub const MANIFEST_VERSION: &str = "1.0";

/// Trust evaluation of a manifest's signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustState {
    /// No signature: well-formed but untrusted
    Unsigned,
    /// Signature present, but the verifier cannot establish trust
    Unverified,
    /// Signature validated by an authoritative verifier
    Verified,
    /// Signature present and rejected
    Invalid,
}

impl TrustState {
    /// Whether the manifest's claims may be acted on as trusted
    pub fn is_trusted(&self) -> bool {
        matches!(self, TrustState::Verified)
    }

    /// Whether the manifest passes verification (trusted or not)
    pub fn is_valid(&self) -> bool {
        !matches!(self, TrustState::Invalid)
    }
}

impl fmt::Display for TrustState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrustState::Unsigned => "unsigned (valid, untrusted)",
            TrustState::Unverified => "signed, unverified (valid, untrusted)",
            TrustState::Verified => "verified (trusted)",
            TrustState::Invalid => "invalid signature",
        };
        f.write_str(s)
    }
}

/// An AI Manifest documenting licensing and trust boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireManifest")]
pub struct Manifest {
    /// Decentralized identifier of the AI system
    pub did: String,
    /// Manifest schema version
    pub version: String,
    pub foundation: FoundationLayer,
    pub deployment: DeploymentLayer,
    pub content_access: ContentAccessLayer,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    signature: Option<String>,
    /// URL to the system's Model Card
    pub model_card_url: Option<String>,
    /// URL to the Dataset Card
    pub dataset_card_url: Option<String>,
    /// URL to the A2A Agent Card
    pub a2a_card_url: Option<String>,
}

impl Manifest {
    /// Create an unsigned manifest with empty layers
    pub fn new(did: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            did: did.into(),
            version: MANIFEST_VERSION.to_string(),
            foundation: FoundationLayer::default(),
            deployment: DeploymentLayer::default(),
            content_access: ContentAccessLayer::default(),
            created_at: now,
            updated_at: now,
            signature: None,
            model_card_url: None,
            dataset_card_url: None,
            a2a_card_url: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_foundation(mut self, foundation: FoundationLayer) -> Self {
        self.foundation = foundation;
        self
    }

    pub fn with_deployment(mut self, deployment: DeploymentLayer) -> Self {
        self.deployment = deployment;
        self
    }

    pub fn with_content_access(mut self, content_access: ContentAccessLayer) -> Self {
        self.content_access = content_access;
        self
    }

    pub fn with_model_card_url(mut self, url: impl Into<String>) -> Self {
        self.model_card_url = Some(url.into());
        self
    }

    pub fn with_dataset_card_url(mut self, url: impl Into<String>) -> Self {
        self.dataset_card_url = Some(url.into());
        self
    }

    pub fn with_a2a_card_url(mut self, url: impl Into<String>) -> Self {
        self.a2a_card_url = Some(url.into());
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Parse the stored DID string
    pub fn parsed_did(&self) -> Result<Did, FormatError> {
        Did::parse(&self.did)
    }

    /// Validate all three layers
    ///
    /// Identity is not checked here; see [`Manifest::parsed_did`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.foundation.validate()?;
        self.deployment.validate()?;
        self.content_access.validate()
    }

    /// Record an edit made before republishing
    pub fn touch(&mut self) {
        self.updated_at = self.updated_at.max(Utc::now());
    }

    /// Content covered by the signature
    ///
    /// The wire form without `signature`, with object keys sorted at every
    /// level, rendered as compact JSON.
    pub fn canonical_bytes(&self) -> ManifestResult<Vec<u8>> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("signature");
        }
        Ok(serde_json::to_vec(&canonicalize(value))?)
    }

    /// Verify the signature with the default (non-authoritative) verifier
    ///
    /// Returns `true` when the signature is absent or validates, `false` when
    /// it is present and invalid. `true` does not mean trusted.
    pub fn verify(&self) -> bool {
        self.verify_with(&UnverifiedSignatures, &[])
    }

    /// Verify the signature with an injected verifier
    pub fn verify_with(&self, verifier: &dyn SignatureVerifier, public_key: &[u8]) -> bool {
        self.trust_state(verifier, public_key).is_valid()
    }

    /// Evaluate the manifest's trust state
    pub fn trust_state(&self, verifier: &dyn SignatureVerifier, public_key: &[u8]) -> TrustState {
        let Some(signature) = self.signature.as_deref() else {
            return TrustState::Unsigned;
        };

        let content = match self.canonical_bytes() {
            Ok(content) => content,
            Err(e) => {
                warn!(did = %self.did, error = %e, "Cannot canonicalize manifest for verification");
                return TrustState::Invalid;
            }
        };

        if !verifier.validate(&content, signature, public_key) {
            TrustState::Invalid
        } else if verifier.is_authoritative() {
            TrustState::Verified
        } else {
            TrustState::Unverified
        }
    }

    /// Sign with raw private key material using the default signer
    pub fn sign(&mut self, private_key: &[u8]) -> ManifestResult<()> {
        let signer = KeyedDigestSigner::from_key_material(private_key)?;
        self.sign_with(&signer)
    }

    /// Sign with an injected signer
    ///
    /// Advances `updated_at` first, so the signature covers the new
    /// timestamp. Any previous signature is replaced. On failure the manifest
    /// is left unchanged.
    pub fn sign_with(&mut self, signer: &dyn ManifestSigner) -> ManifestResult<()> {
        let previous = self.updated_at;
        self.touch();

        let signed = self
            .canonical_bytes()
            .and_then(|content| signer.sign(&content).map_err(ManifestError::from));

        match signed {
            Ok(signature) => {
                self.signature = Some(signature);
                debug!(did = %self.did, updated_at = %self.updated_at, "Signed manifest");
                Ok(())
            }
            Err(e) => {
                self.updated_at = previous;
                Err(e)
            }
        }
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn default_version() -> String {
    MANIFEST_VERSION.to_string()
}

/// Wire form accepted on input; missing fields take their defaults
#[derive(Deserialize)]
struct WireManifest {
    did: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    foundation: FoundationLayer,
    #[serde(default)]
    deployment: DeploymentLayer,
    #[serde(default)]
    content_access: ContentAccessLayer,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    signature: Option<String>,
    model_card_url: Option<String>,
    dataset_card_url: Option<String>,
    a2a_card_url: Option<String>,
}

impl TryFrom<WireManifest> for Manifest {
    type Error = ManifestError;

    fn try_from(wire: WireManifest) -> Result<Self, Self::Error> {
        let now = Utc::now();
        let (created_at, updated_at) = match (wire.created_at, wire.updated_at) {
            (Some(created), Some(updated)) => (created, updated),
            (Some(created), None) => (created, created.max(now)),
            (None, Some(updated)) => (updated.min(now), updated),
            (None, None) => (now, now),
        };

        if updated_at < created_at {
            return Err(ManifestError::TimestampOrder {
                created_at: created_at.to_rfc3339(),
                updated_at: updated_at.to_rfc3339(),
            });
        }

        Ok(Self {
            did: wire.did,
            version: wire.version,
            foundation: wire.foundation,
            deployment: wire.deployment,
            content_access: wire.content_access,
            created_at,
            updated_at,
            signature: wire.signature,
            model_card_url: wire.model_card_url,
            dataset_card_url: wire.dataset_card_url,
            a2a_card_url: wire.a2a_card_url,
        })
    }
}
