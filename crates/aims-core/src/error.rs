//! Error types for AIMS core
//!
//! Everything here is local and synchronous: these errors describe bad
//! caller input and are never retryable.

use thiserror::Error;

/// An identifier string that does not match the AIMS DID grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid AIMS DID format: {input}")]
pub struct FormatError {
    /// The offending raw input
    pub input: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Errors raised while constructing or validating layer records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field value: {field} - {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Unknown {kind} variant: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Errors related to signing manifests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Signing key material is empty")]
    EmptyKey,

    #[error("Signer failed: {0}")]
    SignerFailed(String),
}

/// Errors raised by manifest operations
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Identity error: {0}")]
    Format(#[from] FormatError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("updated_at ({updated_at}) precedes created_at ({created_at})")]
    TimestampOrder {
        created_at: String,
        updated_at: String,
    },
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Serialization(e.to_string())
    }
}

/// Result type alias for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
