//! # qqirc-proto
//!
//! The IRC wire protocol pieces used by the `qqircd` gateway.
//!
//! ## Features
//!
//! - Line parsing with prefix and trailing-parameter handling ([`MessageRef`])
//! - Owned outbound messages with a typed [`Command`] and [`Response`] numerics
//! - A newline-delimited [`LineCodec`](line::LineCodec) for tokio
//! - Formatting/color stripping and CTCP envelope handling
//! - RFC 1459 case mapping
//!
//! ## Quick Start
//!
//! ```rust
//! use qqirc_proto::{Message, MessageRef, Prefix};
//!
//! let line = MessageRef::parse("PRIVMSG #rust :hello there").unwrap();
//! assert_eq!(line.command_name(), "PRIVMSG");
//! assert_eq!(line.arg(1), Some("hello there"));
//!
//! let reply = Message::privmsg("#rust", "hi!")
//!     .with_prefix(Prefix::new_from_str("bob!20001@qq.com"));
//! assert_eq!(reply.to_string(), ":bob!20001@qq.com PRIVMSG #rust :hi!");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod command;
pub mod ctcp;
pub mod error;
pub mod format;
pub mod isupport;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::command::Command;
pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::format::FormattedStringExt;
pub use self::isupport::IsupportBuilder;
pub use self::message::{Message, MessageRef};
pub use self::prefix::Prefix;
pub use self::response::Response;
