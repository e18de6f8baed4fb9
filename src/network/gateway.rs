//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds to a socket and spawns a Connection task for each
//! incoming client. The accept loop never waits on a connection.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::backend::BackendHandle;
use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::{ServerInfo, SessionRegistry};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    server: Arc<ServerInfo>,
    registry: Arc<Registry>,
    sessions: Arc<SessionRegistry>,
    backend: BackendHandle,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        server: Arc<ServerInfo>,
        sessions: Arc<SessionRegistry>,
        backend: BackendHandle,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "Listener bound");

        Ok(Self {
            listener,
            server,
            registry: Arc::new(Registry::new()),
            sessions,
            backend,
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection accepted");

                    let connection = Connection::new(
                        stream,
                        addr,
                        Arc::clone(&self.server),
                        Arc::clone(&self.registry),
                        Arc::clone(&self.sessions),
                        self.backend.clone(),
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            error!(%addr, error = %e, "Connection error");
                        }
                        info!(%addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
