//! CTCP (Client-to-Client Protocol) envelopes.
//!
//! CTCP requests ride inside PRIVMSG/NOTICE bodies wrapped in `\x01`.
//!
//! # Example
//!
//! ```
//! use qqirc_proto::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Action);
//! assert_eq!(ctcp.params, Some("waves hello"));
//!
//! assert_eq!(Ctcp::action("dances").to_string(), "\x01ACTION dances\x01");
//! ```

use std::fmt;

const CTCP_DELIM: char = '\x01';

/// CTCP command types the gateway distinguishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CtcpKind {
    /// `/me` style action.
    Action,
    /// VERSION request or reply.
    Version,
    /// PING request or reply.
    Ping,
    /// Anything else.
    Unknown(String),
}

impl CtcpKind {
    /// Parse a CTCP command name.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Canonical command name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Unknown(s) => s,
        }
    }
}

/// A parsed CTCP message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The CTCP command type.
    pub kind: CtcpKind,
    /// Parameters following the command, if any.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a message body as CTCP.
    ///
    /// The body must be enclosed in `\x01` on both ends; anything else is
    /// plain text and yields `None`.
    pub fn parse(text: &'a str) -> Option<Self> {
        let inner = text.strip_prefix(CTCP_DELIM)?.strip_suffix(CTCP_DELIM)?;
        if inner.is_empty() {
            return None;
        }

        let (command, params) = match inner.split_once(' ') {
            Some((command, params)) => (command, Some(params).filter(|p| !p.is_empty())),
            None => (inner, None),
        };

        Some(Self {
            kind: CtcpKind::parse(command),
            params,
        })
    }

    /// Check whether a body starts a CTCP envelope.
    #[inline]
    pub fn is_ctcp(text: &str) -> bool {
        text.starts_with(CTCP_DELIM)
    }

    /// Create an ACTION.
    pub fn action(text: &'a str) -> Self {
        Self {
            kind: CtcpKind::Action,
            params: Some(text),
        }
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CTCP_DELIM}{}", self.kind.as_str())?;
        if let Some(params) = self.params {
            write!(f, " {params}")?;
        }
        write!(f, "{CTCP_DELIM}")
    }
}
