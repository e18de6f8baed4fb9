//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ConfigError)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`roster`]: In-memory backend roster (BackendConfig and its entries)
//! - [`validation`]: Startup checks

mod listen;
mod roster;
mod types;
mod validation;

pub use roster::BackendConfig;
pub use types::{Config, ServerConfig};
