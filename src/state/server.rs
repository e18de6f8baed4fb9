//! Immutable server settings shared by every connection.

use crate::config::ServerConfig;

pub const VERSION: &str = concat!("qqircd-", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub password: Option<String>,
    pub user_host: String,
    pub all_traffic_channel: String,
    pub named_channels: bool,
    pub autojoin: bool,
}

impl ServerInfo {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            network: config.network.clone(),
            password: config.password.clone(),
            user_host: config.user_host.clone(),
            all_traffic_channel: config.all_traffic_channel.clone(),
            named_channels: config.named_channels,
            autojoin: config.autojoin,
        }
    }

    /// Whether `name` refers to the all-traffic pseudo-channel.
    pub fn is_all_traffic(&self, name: &str) -> bool {
        qqirc_proto::irc_eq(name, &self.all_traffic_channel)
    }
}
