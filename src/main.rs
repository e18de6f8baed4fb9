//! qqircd - IRC gateway for a QQ-style messaging account.
//!
//! Exposes the account's groups as channels and its contacts as nicks, so
//! any IRC client can talk to them.

mod backend;
mod config;
mod error;
mod handlers;
mod network;
mod state;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::backend::{BackendEvent, BackendLoop, EventSink, MemoryBackend};
use crate::config::Config;
use crate::network::Gateway;
use crate::state::{ServerInfo, SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        network = %config.server.network,
        listen = %config.listen.address,
        "Starting qqircd"
    );

    let sessions = Arc::new(SessionRegistry::new());

    // Backend events fan out to every live session.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();
    let fanout = Arc::clone(&sessions);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let delivered = fanout.broadcast(event);
            debug!(sessions = delivered, "Backend event broadcast");
        }
    });

    let backend = MemoryBackend::from_config(&config.backend);
    let (_backend_loop, backend) = BackendLoop::spawn(backend, EventSink::new(event_tx))?;

    let server = Arc::new(ServerInfo::from_config(&config.server));
    let gateway = Gateway::bind(config.listen.address, server, sessions, backend).await?;

    tokio::select! {
        result = gateway.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
