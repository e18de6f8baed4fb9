//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! incoming IRC messages to appropriate handlers.
//!
//! ## Zero-Copy Architecture
//!
//! Handlers receive `MessageRef<'_>` which borrows directly from the line the
//! reader produced. Use `msg.arg(n)` to access arguments as `&str` slices.

mod channel;
mod connection;
mod core;
mod helpers;
mod messaging;
mod user_query;

#[cfg(test)]
mod testing;

pub use self::core::{Context, Handler, Registry};
pub use messaging::render_event;
