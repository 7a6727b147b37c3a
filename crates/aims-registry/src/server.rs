//! Listener setup for the reference registry

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::routes::router;
use crate::state::RegistryState;

async fn bind(config: &RegistryConfig) -> RegistryResult<TcpListener> {
    TcpListener::bind(config.bind)
        .await
        .map_err(|source| RegistryError::Bind {
            addr: config.bind,
            source,
        })
}

/// Serve until Ctrl-C
pub async fn serve(config: RegistryConfig) -> RegistryResult<()> {
    let listener = bind(&config).await?;
    info!(addr = %listener.local_addr()?, "AIMS registry listening");

    axum::serve(listener, router(RegistryState::new()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

/// Serve in a background task
///
/// The server stops when the returned handle is dropped.
pub async fn spawn(config: RegistryConfig) -> RegistryResult<RunningRegistry> {
    let listener = bind(&config).await?;
    let addr = listener.local_addr()?;
    let state = RegistryState::new();

    let app = router(state.clone());
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    info!(addr = %addr, "AIMS registry started");

    Ok(RunningRegistry { addr, state, handle })
}

/// A registry serving in the background
#[derive(Debug)]
pub struct RunningRegistry {
    addr: SocketAddr,
    state: RegistryState,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningRegistry {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for store clients
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }
}

impl Drop for RunningRegistry {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
