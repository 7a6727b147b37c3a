//! # AIMS Core
//!
//! Identifiers, layered manifests, and the signature seam for the AI
//! Manifest Standard.
//!
//! An AI system publishes a [`Manifest`] disclosing its training-data
//! licensing provenance, its commercial context, and its runtime
//! content-access rights, keyed by a [`Did`].
//!
//! ## Key Types
//!
//! - [`Did`]: `did:aims:<method>:<organization>:<system_id>` identifiers
//! - [`Manifest`]: the three-layer trust document
//! - [`FoundationLayer`], [`DeploymentLayer`], [`ContentAccessLayer`]: layer records
//! - [`TrustState`]: unsigned / unverified / verified / invalid
//!
//! ## Key Traits
//!
//! - [`Validate`]: constructor-time validation of layer records
//! - [`SignatureVerifier`]: pluggable signature verification
//! - [`ManifestSigner`]: pluggable signing
//!
//! ## Example
//!
//! ```
//! use aims_core::{ContentAccessLayer, FoundationLayer, Manifest, RedistributionPolicy, TrustState, UnverifiedSignatures};
//!
//! let mut manifest = Manifest::new("did:aims:web:retailer.com:shopping-assistant")
//!     .with_foundation(FoundationLayer::new().with_rsl_compliance(true))
//!     .with_content_access(
//!         ContentAccessLayer::new().with_redistribution_policy(RedistributionPolicy::Attributed),
//!     );
//!
//! assert_eq!(manifest.trust_state(&UnverifiedSignatures, &[]), TrustState::Unsigned);
//!
//! manifest.sign(b"publisher key material").unwrap();
//! assert!(manifest.verify());
//! ```

pub mod did;
pub mod error;
pub mod layers;
pub mod manifest;
pub mod signature;

pub use did::{DID_PREFIX, Did, WEB_METHOD};
pub use error::{FormatError, ManifestError, ManifestResult, SignatureError, ValidationError};
pub use layers::{
    BrandAffiliation, ContentAccessLayer, DatasetReference, DeploymentLayer, FoundationLayer,
    LicensedSource, RedistributionPolicy, Validate,
};
pub use manifest::{MANIFEST_VERSION, Manifest, TrustState};
pub use signature::{
    KEYED_DIGEST_SCHEME, KeyedDigestSigner, ManifestSigner, SignatureVerifier,
    UnverifiedSignatures,
};
