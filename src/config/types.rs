//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::listen::ListenConfig;
use super::roster::BackendConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity and session behaviour.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// In-memory backend roster.
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(content)?;
        super::validation::validate(&config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ConfigError::Invalid(joined)
        })?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used as the prefix of server replies.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Network name advertised in 005.
    #[serde(default = "default_network")]
    pub network: String,
    /// Shared connection password. When absent any non-empty PASS is accepted.
    pub password: Option<String>,
    /// Host part of synthesized hostmasks.
    #[serde(default = "default_user_host")]
    pub user_host: String,
    /// Pseudo-channel that carries traffic for channels the client has not joined.
    #[serde(default = "default_all_traffic_channel")]
    pub all_traffic_channel: String,
    /// Start sessions with channel names derived from group nicks.
    #[serde(default)]
    pub named_channels: bool,
    /// Join every group right after registration.
    #[serde(default)]
    pub autojoin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            network: default_network(),
            password: None,
            user_host: default_user_host(),
            all_traffic_channel: default_all_traffic_channel(),
            named_channels: false,
            autojoin: false,
        }
    }
}

fn default_server_name() -> String {
    "qq.bot".to_string()
}

fn default_network() -> String {
    "QQ".to_string()
}

fn default_user_host() -> String {
    "qq.com".to_string()
}

fn default_all_traffic_channel() -> String {
    "&qq".to_string()
}
