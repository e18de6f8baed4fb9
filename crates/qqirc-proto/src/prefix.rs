//! IRC message prefix types.
//!
//! A prefix identifies the origin of a message: either a server name or a
//! user's `nick!user@host` mask.

use std::fmt;

/// IRC message prefix - identifies the origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "qq.bot")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Build a user prefix from its three parts.
    pub fn hostmask(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Self::Nickname(nick.into(), user.into(), host.into())
    }

    /// Parse a prefix string leniently.
    ///
    /// Anything containing `!` or `@` is a user mask; a bare token containing
    /// a dot is a server name; any other bare token is a nickname.
    pub fn new_from_str(s: &str) -> Self {
        let (name, rest) = match s.find(['!', '@']) {
            Some(pos) => (&s[..pos], &s[pos..]),
            None if s.contains('.') => return Self::ServerName(s.to_owned()),
            None => return Self::Nickname(s.to_owned(), String::new(), String::new()),
        };

        let (user, host) = match rest.strip_prefix('!') {
            Some(after) => match after.split_once('@') {
                Some((user, host)) => (user, host),
                None => (after, ""),
            },
            None => ("", rest.trim_start_matches('@')),
        };

        Self::Nickname(name.to_owned(), user.to_owned(), host.to_owned())
    }

    /// The nickname part of a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::Nickname(nick, _, _) => Some(nick),
            Self::ServerName(_) => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerName(name) => f.write_str(name),
            Self::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{user}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}
