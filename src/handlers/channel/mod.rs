//! Channel command handlers.
//!
//! Handles JOIN, PART, TOPIC, NAMES and LIST. Channels are backend groups
//! plus the all-traffic pseudo-channel.

mod join;
mod list;
mod names;
mod part;
pub(crate) mod resolve;
mod topic;

pub use join::{JoinHandler, join_all_groups};
pub use list::ListHandler;
pub use names::NamesHandler;
pub use part::PartHandler;
pub use topic::TopicHandler;

/// Topic of the all-traffic pseudo-channel.
pub const ALL_TRAFFIC_TOPIC: &str = "Messages from channels you have not joined";
