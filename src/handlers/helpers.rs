//! Helper functions for IRC command handlers.
//!
//! Numeric reply builders and the NAMES line buffer.

use qqirc_proto::{Command, Message, Prefix, Response};

/// Longest line we emit, excluding CRLF.
pub const MAX_LINE_LEN: usize = 510;

// ============================================================================
// Common reply helpers
// ============================================================================

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message {
        prefix: Some(Prefix::ServerName(server_name.to_string())),
        command: Command::Response(response, params),
    }
}

/// Create ERR_NEEDMOREPARAMS reply (461) - not enough parameters.
pub fn err_needmoreparams(server_name: &str, nick: &str, command: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NEEDMOREPARAMS,
        vec![
            nick.to_string(),
            command.to_string(),
            "Not enough parameters".to_string(),
        ],
    )
}

/// Create ERR_NOSUCHNICK reply (401) - no such nick/channel.
pub fn err_nosuchnick(server_name: &str, nick: &str, target: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NOSUCHNICK,
        vec![
            nick.to_string(),
            target.to_string(),
            "No such nick/channel".to_string(),
        ],
    )
}

/// Create ERR_NOSUCHCHANNEL reply (403) - no such channel.
pub fn err_nosuchchannel(server_name: &str, nick: &str, channel: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NOSUCHCHANNEL,
        vec![
            nick.to_string(),
            channel.to_string(),
            "No such channel".to_string(),
        ],
    )
}

/// Create ERR_NOTONCHANNEL reply (442) - you're not on that channel.
pub fn err_notonchannel(server_name: &str, nick: &str, channel: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NOTONCHANNEL,
        vec![
            nick.to_string(),
            channel.to_string(),
            "You're not on that channel".to_string(),
        ],
    )
}

/// Create ERR_UNKNOWNCOMMAND reply (421).
pub fn err_unknowncommand(server_name: &str, nick: &str, command: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_UNKNOWNCOMMAND,
        vec![
            nick.to_string(),
            command.to_string(),
            "Unknown command".to_string(),
        ],
    )
}

/// Create ERR_NICKNAMEINUSE reply (433).
pub fn err_nicknameinuse(server_name: &str, nick: &str, wanted: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NICKNAMEINUSE,
        vec![
            nick.to_string(),
            wanted.to_string(),
            "Nickname is already in use".to_string(),
        ],
    )
}

// ============================================================================
// NAMES buffer
// ============================================================================

/// Packs NAMES tokens into 353 lines that stay within [`MAX_LINE_LEN`].
pub struct NamesBuffer {
    server_name: String,
    nick: String,
    channel: String,
    header_len: usize,
    current: Vec<String>,
    current_len: usize,
    lines: Vec<Message>,
}

impl NamesBuffer {
    pub fn new(server_name: &str, nick: &str, channel: &str) -> Self {
        // ":<server> 353 <nick> = <channel> :"
        let header_len = 1 + server_name.len() + 5 + nick.len() + 3 + channel.len() + 2;
        Self {
            server_name: server_name.to_string(),
            nick: nick.to_string(),
            channel: channel.to_string(),
            header_len,
            current: Vec::new(),
            current_len: 0,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, token: String) {
        let added = if self.current.is_empty() {
            token.len()
        } else {
            token.len() + 1
        };
        if !self.current.is_empty() && self.header_len + self.current_len + added > MAX_LINE_LEN {
            self.flush();
            self.current_len = token.len();
        } else {
            self.current_len += added;
        }
        self.current.push(token);
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let names = std::mem::take(&mut self.current).join(" ");
        self.current_len = 0;
        self.lines.push(server_reply(
            &self.server_name,
            Response::RPL_NAMREPLY,
            vec![
                self.nick.clone(),
                "=".to_string(),
                self.channel.clone(),
                names,
            ],
        ));
    }

    /// The 353 lines, without the 366 terminator.
    pub fn finish(mut self) -> Vec<Message> {
        self.flush();
        self.lines
    }
}
