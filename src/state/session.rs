//! Per-connection session state.
//!
//! A session is owned by its connection's worker task and never shared, so
//! nothing here is synchronized.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use qqirc_proto::Prefix;
use tracing::warn;

use super::namemap::{NameKind, UniqNameMap};
use crate::backend::BackendEvent;

/// Most events held for a session that has not registered yet.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Registration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unregistered,
    Registered,
    Closed,
}

/// Protocol extensions a client can request with PROTOCTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// NAMES entries carry full hostmasks.
    UhNames,
    /// Multiple prefixes in NAMES (accepted; members carry one role).
    NamesX,
    /// Channel names come from group display names instead of ids.
    NamedChannels,
}

impl Capability {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "UHNAMES" => Some(Self::UhNames),
            "NAMESX" => Some(Self::NamesX),
            "NAMEDCHANNELS" => Some(Self::NamedChannels),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::UhNames => "UHNAMES",
            Self::NamesX => "NAMESX",
            Self::NamedChannels => "NAMEDCHANNELS",
        }
    }

    pub const ALL: [Capability; 3] = [Self::UhNames, Self::NamesX, Self::NamedChannels];
}

pub struct Session {
    pub phase: Phase,
    pub nick: Option<String>,
    pub username: Option<String>,
    pub realname: Option<String>,
    pub password: Option<String>,
    /// Account id of the logged-in backend user.
    pub identity: Option<String>,
    pub capabilities: HashSet<Capability>,
    /// Canonical names of joined channels.
    pub joined: HashSet<String>,
    pub channels: UniqNameMap,
    pub nicks: UniqNameMap,
    /// Backend events that arrived before the namespace was populated.
    /// `None` once they have been replayed.
    pub pending: Option<VecDeque<Arc<BackendEvent>>>,
    /// Unix time the session started, used as topic time.
    pub connected_at: i64,
}

impl Session {
    pub fn new(named_channels: bool) -> Self {
        let mut capabilities = HashSet::new();
        if named_channels {
            capabilities.insert(Capability::NamedChannels);
        }
        Self {
            phase: Phase::Unregistered,
            nick: None,
            username: None,
            realname: None,
            password: None,
            identity: None,
            capabilities,
            joined: HashSet::new(),
            channels: UniqNameMap::new(NameKind::Channel),
            nicks: UniqNameMap::new(NameKind::Nick),
            pending: Some(VecDeque::new()),
            connected_at: chrono::Utc::now().timestamp(),
        }
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        self.phase == Phase::Registered
    }

    /// The nick, or `*` before one was chosen.
    pub fn nick_or_star(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }

    /// Whether NICK and USER have both been received.
    pub fn can_register(&self) -> bool {
        self.phase == Phase::Unregistered && self.nick.is_some() && self.realname.is_some()
    }

    pub fn has(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// User part of this session's hostmask: the identity when known.
    pub fn user(&self) -> &str {
        self.identity
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("qq")
    }

    /// Hostmask of this session's own user.
    pub fn hostmask(&self, user_host: &str) -> Prefix {
        Prefix::hostmask(self.nick_or_star(), self.user(), user_host)
    }

    /// Queue an event if the namespace is not ready yet.
    ///
    /// Returns the event back when it should be delivered now. A full queue
    /// drops its oldest event.
    pub fn defer(&mut self, event: Arc<BackendEvent>) -> Option<Arc<BackendEvent>> {
        match &mut self.pending {
            Some(queue) => {
                if queue.len() >= MAX_PENDING_EVENTS {
                    queue.pop_front();
                    warn!(
                        nick = self.nick.as_deref().unwrap_or("*"),
                        limit = MAX_PENDING_EVENTS,
                        "Pending event queue full, dropping oldest event"
                    );
                }
                queue.push_back(event);
                None
            }
            None => Some(event),
        }
    }

    /// Take the queued events and stop queueing.
    pub fn retire_pending(&mut self) -> VecDeque<Arc<BackendEvent>> {
        self.pending.take().unwrap_or_default()
    }
}
