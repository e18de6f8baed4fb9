//! Backend facade abstraction.
//!
//! The backend is the messaging account the gateway exposes. It owns its
//! state on a dedicated loop (see [`bridge`]); everything else reaches it only
//! through submitted closures.

use std::fmt;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::BackendError;

pub mod bridge;
pub mod memory;

pub use bridge::{BackendHandle, BackendLoop, Fetcher};
pub use memory::MemoryBackend;

// ============================================================================
// Entities
// ============================================================================

/// Membership role of a contact inside a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    #[default]
    Member,
}

impl Role {
    /// NAMES/WHO prefix symbol for this role.
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Owner => "@",
            Role::Admin => "+",
            Role::Member => "",
        }
    }
}

/// A group chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Option<String>,
    pub nick: String,
    pub mark: String,
    pub code: String,
}

impl Group {
    /// Topic text: the non-empty descriptive fields joined with ` | `.
    pub fn topic(&self) -> String {
        [&self.nick, &self.mark, &self.code]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// A buddy or a group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<String>,
    pub name: String,
    pub role: Role,
}

/// Conversation a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Group(Group),
    Buddy(Contact),
}

impl Dialog {
    pub fn id(&self) -> Option<&str> {
        match self {
            Dialog::Group(g) => g.id.as_deref(),
            Dialog::Buddy(c) => c.id.as_deref(),
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, id) = match self {
            Dialog::Group(g) => ("group", g.id.as_deref()),
            Dialog::Buddy(c) => ("buddy", c.id.as_deref()),
        };
        write!(f, "{kind}:{}", id.unwrap_or("?"))
    }
}

/// Something that happened on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A message arrived. `member` is the sender inside a group dialog.
    Message {
        dialog: Dialog,
        member: Option<Contact>,
        text: String,
    },
}

// ============================================================================
// Event sink
// ============================================================================

/// Where a backend reports inbound events.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<BackendEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self { tx }
    }

    pub fn on_message(&self, dialog: Dialog, member: Option<Contact>, text: impl Into<String>) {
        let event = BackendEvent::Message {
            dialog,
            member,
            text: text.into(),
        };
        if self.tx.send(event).is_err() {
            warn!("Event sink closed, dropping backend event");
        }
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// The messaging account behind the gateway.
///
/// Every method runs on the backend loop thread.
pub trait Backend: Send + 'static {
    /// Called once on the loop thread before any task runs.
    fn start(&mut self, sink: EventSink);

    /// Account id of the logged-in user, if known.
    fn identity(&self) -> Option<String>;

    fn list_groups(&self) -> Result<Vec<Group>, BackendError>;

    fn list_buddies(&self) -> Result<Vec<Contact>, BackendError>;

    fn list_members(&self, group: &Group) -> Result<Vec<Contact>, BackendError>;

    fn send_message(&mut self, target: &Dialog, text: &str) -> Result<(), BackendError>;

    /// Group with the given id.
    fn find_group(&self, id: &str) -> Result<Option<Group>, BackendError> {
        Ok(self
            .list_groups()?
            .into_iter()
            .find(|g| g.id.as_deref() == Some(id)))
    }

    /// Buddy with the given id.
    fn find_buddy(&self, id: &str) -> Result<Option<Contact>, BackendError> {
        Ok(self
            .list_buddies()?
            .into_iter()
            .find(|c| c.id.as_deref() == Some(id)))
    }
}
