//! IRC commands and their wire serialization.

use std::borrow::Cow;
use std::fmt;

use crate::response::Response;

/// An IRC command with its parameters.
///
/// The typed variants cover what the gateway emits and what its tests
/// inspect; everything else is carried verbatim by [`Command::Raw`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS <password>`
    PASS(String),
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <user> <mode> * :<realname>`
    USER(String, String, String),
    /// `PING <server> [<token>]`
    PING(String, Option<String>),
    /// `PONG <server> [<token>]`
    PONG(String, Option<String>),
    /// `QUIT [:<reason>]`
    QUIT(Option<String>),
    /// `JOIN <channel>`
    JOIN(String),
    /// `PART <channel> [:<reason>]`
    PART(String, Option<String>),
    /// `TOPIC <channel> [:<topic>]`
    TOPIC(String, Option<String>),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
    /// `ERROR :<reason>`
    ERROR(String),
    /// Numeric reply with its parameters (target nick first).
    Response(Response, Vec<String>),
    /// Any other command, verbatim.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a command from a verb and its arguments.
    ///
    /// Known verbs with too few arguments fall back to [`Command::Raw`] so
    /// that parsing never fails on arity.
    pub fn new(verb: &str, args: Vec<&str>) -> Self {
        let upper = verb.to_ascii_uppercase();
        let owned = |i: usize| args.get(i).map(|s| (*s).to_owned());

        let parsed = match (upper.as_str(), args.len()) {
            ("PASS", 1..) => owned(0).map(Command::PASS),
            ("NICK", 1..) => owned(0).map(Command::NICK),
            ("USER", 4..) => Some(Command::USER(
                args[0].to_owned(),
                args[1].to_owned(),
                args[3].to_owned(),
            )),
            ("PING", 1..) => Some(Command::PING(args[0].to_owned(), owned(1))),
            ("PONG", 1..) => Some(Command::PONG(args[0].to_owned(), owned(1))),
            ("QUIT", _) => Some(Command::QUIT(owned(0))),
            ("JOIN", 1..) => owned(0).map(Command::JOIN),
            ("PART", 1..) => Some(Command::PART(args[0].to_owned(), owned(1))),
            ("TOPIC", 1..) => Some(Command::TOPIC(args[0].to_owned(), owned(1))),
            ("PRIVMSG", 2..) => Some(Command::PRIVMSG(args[0].to_owned(), args[1].to_owned())),
            ("NOTICE", 2..) => Some(Command::NOTICE(args[0].to_owned(), args[1].to_owned())),
            ("ERROR", 1..) => owned(0).map(Command::ERROR),
            _ => None,
        };

        if let Some(cmd) = parsed {
            return cmd;
        }

        if upper.len() == 3 && upper.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(resp) = upper.parse().ok().and_then(Response::from_code) {
                return Command::Response(resp, args.into_iter().map(str::to_owned).collect());
            }
        }

        Command::Raw(upper, args.into_iter().map(str::to_owned).collect())
    }

    /// The verb as it appears on the wire.
    pub fn verb(&self) -> String {
        match self {
            Command::PASS(_) => "PASS".into(),
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::PING(..) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::JOIN(_) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::TOPIC(..) => "TOPIC".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::NOTICE(..) => "NOTICE".into(),
            Command::ERROR(_) => "ERROR".into(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(verb, _) => verb.clone(),
        }
    }

    /// Parameters in wire order, plus whether the last one is always
    /// written in trailing (`:`) form.
    fn params(&self) -> (Vec<&str>, bool) {
        match self {
            Command::PASS(p) | Command::NICK(p) | Command::JOIN(p) => (vec![p], false),
            Command::USER(user, mode, realname) => (vec![user, mode, "*", realname], true),
            Command::PING(server, token) | Command::PONG(server, token) => {
                let mut params = vec![server.as_str()];
                params.extend(token.as_deref());
                (params, token.is_some())
            }
            Command::QUIT(reason) => (reason.as_deref().into_iter().collect(), true),
            Command::PART(chan, reason) | Command::TOPIC(chan, reason) => {
                let mut params = vec![chan.as_str()];
                params.extend(reason.as_deref());
                (params, reason.is_some())
            }
            Command::PRIVMSG(target, text) | Command::NOTICE(target, text) => {
                (vec![target, text], true)
            }
            Command::ERROR(reason) => (vec![reason], true),
            Command::Response(_, args) => (
                args.iter().map(String::as_str).collect(),
                args.len() >= 2,
            ),
            Command::Raw(_, args) => (args.iter().map(String::as_str).collect(), false),
        }
    }
}

/// Replace the characters that would end or corrupt a wire line with spaces.
pub(crate) fn scrub(param: &str) -> Cow<'_, str> {
    if param.contains(['\r', '\n', '\0']) {
        Cow::Owned(param.replace(['\r', '\n', '\0'], " "))
    } else {
        Cow::Borrowed(param)
    }
}

/// Whether a final parameter must be written in trailing form.
fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb())?;
        let (params, force_trailing) = self.params();
        let last = params.len().saturating_sub(1);
        for (i, param) in params.iter().enumerate() {
            let param = scrub(param);
            if i == last && (force_trailing || needs_trailing(&param)) {
                write!(f, " :{param}")?;
            } else {
                write!(f, " {param}")?;
            }
        }
        Ok(())
    }
}
