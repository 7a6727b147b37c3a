//! HTTP transport built on reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{RegistryResponse, RegistryTransport};

const JSON: &str = "application/json";

/// reqwest-backed [`RegistryTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aims-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Connection(err.to_string())
        }
    }

    async fn finish(&self, response: reqwest::Response) -> Result<RegistryResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        debug!(status, bytes = body.len(), "Registry responded");
        Ok(RegistryResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl RegistryTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<RegistryResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.finish(response).await
    }

    async fn get(&self, url: &str) -> Result<RegistryResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.finish(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on loopback is closed in test environments
        let err = transport.get("http://127.0.0.1:9/manifests/x").await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout(_)
        ));
    }

    #[test]
    fn test_timeout_is_recorded() {
        let transport = HttpTransport::new(Duration::from_millis(250)).unwrap();
        assert_eq!(transport.timeout(), Duration::from_millis(250));
    }
}
