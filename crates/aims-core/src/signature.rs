//! Signature seam for manifests
//!
//! Verification is delegated to a [`SignatureVerifier`]. The default
//! [`UnverifiedSignatures`] accepts any present signature but is not
//! authoritative, so a manifest checked with it is never reported as
//! trusted. Swapping in a real public-key verifier changes which manifests
//! are trusted without changing what [`Manifest::verify`] means.
//!
//! [`Manifest::verify`]: crate::Manifest::verify

use crate::error::SignatureError;

/// Scheme tag prefixed to signatures produced by [`KeyedDigestSigner`]
pub const KEYED_DIGEST_SCHEME: &str = "blake3-keyed";

const KEY_CONTEXT: &str = "aims manifest signing key v1";

/// Checks a signature against a manifest's canonical content
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` validates `content` under `public_key`
    fn validate(&self, content: &[u8], signature: &str, public_key: &[u8]) -> bool;

    /// Whether a successful validation establishes trust
    ///
    /// Placeholder verifiers return `false`.
    fn is_authoritative(&self) -> bool;
}

/// Default verifier: accepts every present signature, establishes no trust
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedSignatures;

impl SignatureVerifier for UnverifiedSignatures {
    fn validate(&self, _content: &[u8], _signature: &str, _public_key: &[u8]) -> bool {
        true
    }

    fn is_authoritative(&self) -> bool {
        false
    }
}

/// Produces a signature over a manifest's canonical content
pub trait ManifestSigner {
    fn sign(&self, content: &[u8]) -> Result<String, SignatureError>;
}

/// Deterministic placeholder signer
///
/// Computes a BLAKE3 keyed hash of the content under a key derived from the
/// supplied key material. This is a commitment, not a public-key signature:
/// nothing holding only public material can check it.
pub struct KeyedDigestSigner {
    key: [u8; 32],
}

impl KeyedDigestSigner {
    /// Derive the signing key from raw private key bytes
    pub fn from_key_material(private_key: &[u8]) -> Result<Self, SignatureError> {
        if private_key.is_empty() {
            return Err(SignatureError::EmptyKey);
        }
        Ok(Self {
            key: blake3::derive_key(KEY_CONTEXT, private_key),
        })
    }
}

impl ManifestSigner for KeyedDigestSigner {
    fn sign(&self, content: &[u8]) -> Result<String, SignatureError> {
        let digest = blake3::keyed_hash(&self.key, content);
        Ok(format!("{}:{}", KEYED_DIGEST_SCHEME, hex::encode(digest.as_bytes())))
    }
}

impl std::fmt::Debug for KeyedDigestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedDigestSigner").finish_non_exhaustive()
    }
}
