//! Roster for the in-memory backend.
//!
//! Ids are optional so that entries without a backend id can be modelled;
//! the gateway never puts such entries on the wire.

use serde::Deserialize;

use crate::backend::Role;

/// `[backend]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Account id of the logged-in user.
    pub identity: Option<String>,
    /// Loop sent messages back as inbound events.
    #[serde(default)]
    pub echo: bool,
    /// Groups the account belongs to.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    /// Buddies (direct contacts).
    #[serde(default)]
    pub buddies: Vec<BuddyEntry>,
}

/// `[[backend.groups]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntry {
    pub id: Option<String>,
    pub nick: String,
    #[serde(default)]
    pub mark: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

/// Group member.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberEntry {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// `[[backend.buddies]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BuddyEntry {
    pub id: Option<String>,
    pub name: String,
}
