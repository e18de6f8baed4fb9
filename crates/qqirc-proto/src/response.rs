//! IRC numeric response codes emitted by the gateway.
//!
//! Only the numerics the gateway actually produces are listed; anything
//! else seen on the wire parses into [`Command::Raw`](crate::Command::Raw).
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration (001-099) ===
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 004 - Server info (name, version, user modes, channel modes)
    RPL_MYINFO = 4,
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,

    // === Command Responses (200-399) ===
    /// 302 - USERHOST reply
    RPL_USERHOST = 302,
    /// 315 - End of WHO list
    RPL_ENDOFWHO = 315,
    /// 321 - LIST start
    RPL_LISTSTART = 321,
    /// 322 - LIST entry
    RPL_LIST = 322,
    /// 323 - End of LIST
    RPL_LISTEND = 323,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 333 - Who set the topic and when
    RPL_TOPICWHOTIME = 333,
    /// 352 - WHO entry
    RPL_WHOREPLY = 352,
    /// 353 - NAMES entry
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES list
    RPL_ENDOFNAMES = 366,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,

    // === Error Replies (400-599) ===
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
}

impl Response {
    /// The numeric value of this response.
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a response by its numeric value.
    pub fn from_code(code: u16) -> Option<Self> {
        use Response::*;
        Some(match code {
            1 => RPL_WELCOME,
            4 => RPL_MYINFO,
            5 => RPL_ISUPPORT,
            302 => RPL_USERHOST,
            315 => RPL_ENDOFWHO,
            321 => RPL_LISTSTART,
            322 => RPL_LIST,
            323 => RPL_LISTEND,
            332 => RPL_TOPIC,
            333 => RPL_TOPICWHOTIME,
            352 => RPL_WHOREPLY,
            353 => RPL_NAMREPLY,
            366 => RPL_ENDOFNAMES,
            376 => RPL_ENDOFMOTD,
            401 => ERR_NOSUCHNICK,
            403 => ERR_NOSUCHCHANNEL,
            421 => ERR_UNKNOWNCOMMAND,
            433 => ERR_NICKNAMEINUSE,
            442 => ERR_NOTONCHANNEL,
            461 => ERR_NEEDMOREPARAMS,
            _ => return None,
        })
    }

    /// Whether this is an error numeric (400-599).
    #[inline]
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
