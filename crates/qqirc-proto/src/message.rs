//! Inbound (borrowed) and outbound (owned) IRC messages.

use std::fmt;
use std::str::FromStr;

use crate::command::{Command, scrub};
use crate::error::MessageParseError;
use crate::prefix::Prefix;

// ============================================================================
// MessageRef
// ============================================================================

/// A parsed inbound line borrowing from the original text.
///
/// Parameters are split on spaces; the first ` :` starts the trailing
/// parameter, which may contain spaces and may be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRef<'a> {
    prefix: Option<&'a str>,
    command: &'a str,
    args: Vec<&'a str>,
}

impl<'a> MessageRef<'a> {
    /// Parse a single line (with or without its line terminator).
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let mut rest = line.trim_end_matches(['\r', '\n']).trim_start_matches(' ');
        if rest.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let prefix = match rest.strip_prefix(':') {
            Some(after) => {
                let (prefix, tail) = after.split_once(' ').unwrap_or((after, ""));
                rest = tail.trim_start_matches(' ');
                Some(prefix)
            }
            None => None,
        };

        let (head, trailing) = match rest.find(" :") {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 2..])),
            None => (rest, None),
        };

        let mut words = head.split(' ').filter(|w| !w.is_empty());
        let command = words.next().ok_or(MessageParseError::MissingCommand)?;
        let mut args: Vec<&str> = words.collect();
        args.extend(trailing);

        Ok(Self {
            prefix,
            command,
            args,
        })
    }

    /// The raw prefix text, without the leading `:`.
    pub fn prefix(&self) -> Option<&'a str> {
        self.prefix
    }

    /// The command verb as sent by the client.
    pub fn command_name(&self) -> &'a str {
        self.command
    }

    /// The `n`-th parameter, counting from zero.
    #[inline]
    pub fn arg(&self, n: usize) -> Option<&'a str> {
        self.args.get(n).copied()
    }

    /// All parameters in order.
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }

    /// Convert into an owned [`Message`].
    pub fn to_owned_message(&self) -> Message {
        Message {
            prefix: self.prefix.map(Prefix::new_from_str),
            command: Command::new(self.command, self.args.clone()),
        }
    }
}

// ============================================================================
// Message
// ============================================================================

/// An owned IRC message, typically outbound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Origin of the message; `None` writes no prefix.
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// `NOTICE <target> :<text>`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::NOTICE(target.into(), text.into()).into()
    }

    /// `JOIN <channel>`
    pub fn join(channel: impl Into<String>) -> Self {
        Command::JOIN(channel.into()).into()
    }

    /// `PART <channel>`
    pub fn part(channel: impl Into<String>) -> Self {
        Command::PART(channel.into(), None).into()
    }

    /// `PONG <server> :<token>`
    pub fn pong(server: impl Into<String>, token: Option<String>) -> Self {
        Command::PONG(server.into(), token).into()
    }

    /// `ERROR :<reason>`
    pub fn error(reason: impl Into<String>) -> Self {
        Command::ERROR(reason.into()).into()
    }

    /// Attach a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Nickname of the prefix, if it is a user prefix.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Self {
            prefix: None,
            command,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", scrub(&prefix.to_string()))?;
        }
        write!(f, "{}", self.command)
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageRef::parse(s).map(|m| m.to_owned_message())
    }
}
