//! Server bootstrap: listener, accept loop, and the idle-room sweep.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use triplet_game::RegistryConfig;
use triplet_protocol::JsonCodec;

use crate::handler::handle_connection;
use crate::hub::Hub;
use crate::ServerError;

/// How often the idle-room sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Shared server state handed to every connection task.
pub(crate) struct ServerState {
    pub(crate) hub: Mutex<Hub>,
    pub(crate) codec: JsonCodec,
}

/// A running Triplet server.
///
/// Bind, then call [`run`](Self::run) to accept connections until the
/// process is terminated.
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Binds to `addr` with default registry settings.
    pub async fn bind(addr: &str) -> Result<Self, ServerError> {
        Self::with_config(addr, RegistryConfig::default()).await
    }

    /// Binds to `addr` with explicit registry settings.
    pub async fn with_config(
        addr: &str,
        config: RegistryConfig,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "listening for WebSocket connections");
        Ok(Self {
            listener,
            state: Arc::new(ServerState {
                hub: Mutex::new(Hub::new(config)),
                codec: JsonCodec,
            }),
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection and
    /// the periodic sweep task alongside.
    pub async fn run(self) -> Result<(), ServerError> {
        tokio::spawn(sweep_task(Arc::clone(&self.state)));

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    tracing::debug!(%addr, "accepted connection");
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(error) = handle_connection(stream, state).await {
                            tracing::debug!(%error, "connection ended with error");
                        }
                    });
                }
                Err(error) => {
                    tracing::error!(%error, "accept failed");
                }
            }
        }
    }
}

/// Evicts idle rooms on a timer. Takes the hub lock, so it can't race
/// in-flight command handling.
async fn sweep_task(state: Arc<ServerState>) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    // The first tick completes immediately; skip it so sweeps start one
    // full interval after boot.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let evicted = state.hub.lock().await.registry.sweep_idle();
        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "idle sweep evicted rooms");
        }
    }
}
