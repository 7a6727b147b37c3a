//! Error types for the manifest store client

use std::time::Duration;

use aims_core::FormatError;
use thiserror::Error;

/// Failures talking to a manifest registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Registry returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Identity error: {0}")]
    Format(#[from] FormatError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Cannot decode manifest: {0}")]
    Decode(String),

    #[error("Cannot encode manifest: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether the same call might succeed if repeated
    ///
    /// Only transport failures qualify; bad identifiers and bad payloads fail
    /// the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
