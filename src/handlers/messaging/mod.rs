//! Messaging: PRIVMSG/NOTICE towards the backend, and backend messages
//! rendered back as PRIVMSG lines.

mod delivery;
mod privmsg;
mod transcode;

pub use delivery::render_event;
pub use privmsg::{NoticeHandler, PrivmsgHandler};
