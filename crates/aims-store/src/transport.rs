//! Transport abstraction for registry round trips
//!
//! The [`RegistryTransport`] trait carries raw request/response pairs
//! between a [`ManifestStore`](crate::ManifestStore) and a registry. This
//! lets the store logic run against both real HTTP and an in-process
//! registry for testing.
//!
//! ## Implementations
//!
//! - [`HttpTransport`](crate::HttpTransport): reqwest-backed HTTP
//! - [`MockRegistry`](crate::MockRegistry): in-memory registry for tests

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

/// A raw registry response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl RegistryResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Body as text, for error reports
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Request/response channel to a manifest registry
///
/// Implementations report a response with any status code as `Ok`; only
/// failures to complete the round trip are errors.
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// POST a JSON body to `url`
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RegistryResponse, TransportError>;

    /// GET `url`
    async fn get(&self, url: &str) -> Result<RegistryResponse, TransportError>;
}

#[async_trait]
impl<T: RegistryTransport + ?Sized> RegistryTransport for Arc<T> {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RegistryResponse, TransportError> {
        (**self).post_json(url, body).await
    }

    async fn get(&self, url: &str) -> Result<RegistryResponse, TransportError> {
        (**self).get(url).await
    }
}
