//! Network listener configuration.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "127.0.0.1:6667").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 6667))
}
