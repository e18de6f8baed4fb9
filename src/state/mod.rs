//! Session state, server settings and the shared registry of live sessions.

mod namemap;
mod registry;
mod server;
mod session;

pub use registry::{SessionRegistry, Work, WorkSender};
pub use server::{ServerInfo, VERSION};
pub use session::{Capability, Phase, Session};
