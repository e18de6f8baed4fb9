//! Network layer: TCP accept loop and per-connection pipeline.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
