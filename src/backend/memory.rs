//! In-memory backend driven by the configured roster.
//!
//! Suitable for development and end-to-end tests: it serves a fixed set of
//! groups and buddies and can echo sent messages back as inbound events.

use tracing::{debug, info};

use super::{Backend, Contact, Dialog, EventSink, Group, Role};
use crate::config::BackendConfig;
use crate::error::BackendError;

pub struct MemoryBackend {
    identity: Option<String>,
    echo: bool,
    groups: Vec<(Group, Vec<Contact>)>,
    buddies: Vec<Contact>,
    sink: Option<EventSink>,
}

impl MemoryBackend {
    pub fn from_config(config: &BackendConfig) -> Self {
        let groups = config
            .groups
            .iter()
            .map(|entry| {
                let group = Group {
                    id: entry.id.clone(),
                    nick: entry.nick.clone(),
                    mark: entry.mark.clone(),
                    code: entry.code.clone(),
                };
                let members = entry
                    .members
                    .iter()
                    .map(|m| Contact {
                        id: m.id.clone(),
                        name: m.name.clone(),
                        role: m.role,
                    })
                    .collect();
                (group, members)
            })
            .collect();

        let buddies = config
            .buddies
            .iter()
            .map(|b| Contact {
                id: b.id.clone(),
                name: b.name.clone(),
                role: Role::Member,
            })
            .collect();

        Self {
            identity: config.identity.clone(),
            echo: config.echo,
            groups,
            buddies,
            sink: None,
        }
    }

    fn group_entry(&self, id: Option<&str>) -> Result<&(Group, Vec<Contact>), BackendError> {
        id.and_then(|id| {
            self.groups
                .iter()
                .find(|(g, _)| g.id.as_deref() == Some(id))
        })
        .ok_or_else(|| BackendError::NotFound(format!("group {}", id.unwrap_or("?"))))
    }

    /// The account's own entry inside a group, for echoed group messages.
    fn self_member(&self, members: &[Contact]) -> Contact {
        members
            .iter()
            .find(|m| m.id.is_some() && m.id == self.identity)
            .cloned()
            .unwrap_or_else(|| Contact {
                id: self.identity.clone(),
                name: self.identity.clone().unwrap_or_default(),
                role: Role::Member,
            })
    }
}

impl Backend for MemoryBackend {
    fn start(&mut self, sink: EventSink) {
        info!(
            groups = self.groups.len(),
            buddies = self.buddies.len(),
            echo = self.echo,
            "Memory backend started"
        );
        self.sink = Some(sink);
    }

    fn identity(&self) -> Option<String> {
        self.identity.clone()
    }

    fn list_groups(&self) -> Result<Vec<Group>, BackendError> {
        Ok(self.groups.iter().map(|(g, _)| g.clone()).collect())
    }

    fn list_buddies(&self) -> Result<Vec<Contact>, BackendError> {
        Ok(self.buddies.clone())
    }

    fn list_members(&self, group: &Group) -> Result<Vec<Contact>, BackendError> {
        let (_, members) = self.group_entry(group.id.as_deref())?;
        Ok(members.clone())
    }

    fn send_message(&mut self, target: &Dialog, text: &str) -> Result<(), BackendError> {
        if text.is_empty() {
            return Err(BackendError::Failed("empty message".into()));
        }
        let echoed = match target {
            Dialog::Group(group) => {
                let (group, members) = self.group_entry(group.id.as_deref())?;
                let member = self.self_member(members);
                (Dialog::Group(group.clone()), Some(member))
            }
            Dialog::Buddy(buddy) => {
                let buddy = buddy
                    .id
                    .as_deref()
                    .and_then(|id| self.buddies.iter().find(|b| b.id.as_deref() == Some(id)))
                    .ok_or_else(|| BackendError::NotFound(target.to_string()))?;
                (Dialog::Buddy(buddy.clone()), None)
            }
        };

        info!(target = %target, len = text.len(), "Message delivered");

        if self.echo
            && let Some(sink) = &self.sink
        {
            debug!(target = %target, "Echoing message back");
            let (dialog, member) = echoed;
            sink.on_message(dialog, member, text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendEvent;
    use crate::config::Config;
    use tokio::sync::mpsc;

    fn backend(echo: bool) -> MemoryBackend {
        let doc = format!(
            r#"
[backend]
identity = "10000"
echo = {echo}

[[backend.groups]]
id = "1001"
nick = "Rust"
members = [{{ id = "10000", name = "me", role = "owner" }}, {{ id = "20001", name = "Bob" }}]

[[backend.groups]]
nick = "Ghost"

[[backend.buddies]]
id = "20001"
name = "Bob"
"#
        );
        let config: Config = doc.parse().unwrap();
        MemoryBackend::from_config(&config.backend)
    }

    fn bob() -> Dialog {
        Dialog::Buddy(Contact {
            id: Some("20001".into()),
            name: "Bob".into(),
            role: Role::Member,
        })
    }

    #[test]
    fn lists_roster() {
        let b = backend(false);
        assert_eq!(b.identity().as_deref(), Some("10000"));
        let groups = b.list_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].id, None);

        let members = b.list_members(&groups[0]).unwrap();
        assert_eq!(members[0].role, Role::Owner);
        assert!(matches!(
            b.list_members(&groups[1]),
            Err(BackendError::NotFound(_))
        ));
    }

    #[test]
    fn find_helpers_match_ids() {
        let b = backend(false);
        assert_eq!(b.find_group("1001").unwrap().unwrap().nick, "Rust");
        assert!(b.find_group("999999").unwrap().is_none());
        assert_eq!(b.find_buddy("20001").unwrap().unwrap().name, "Bob");
    }

    #[test]
    fn send_to_unknown_target_fails() {
        let mut b = backend(false);
        let stranger = Dialog::Buddy(Contact {
            id: Some("3".into()),
            name: "x".into(),
            role: Role::Member,
        });
        assert!(matches!(
            b.send_message(&stranger, "hi"),
            Err(BackendError::NotFound(_))
        ));
        assert!(b.send_message(&bob(), "hi").is_ok());
    }

    #[test]
    fn empty_text_is_refused() {
        let mut b = backend(false);
        assert_eq!(
            b.send_message(&bob(), ""),
            Err(BackendError::Failed("empty message".into()))
        );
    }

    #[test]
    fn echo_reemits_buddy_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut b = backend(true);
        b.start(EventSink::new(tx));
        b.send_message(&bob(), "ping").unwrap();

        let BackendEvent::Message { dialog, member, text } = rx.try_recv().unwrap();
        assert_eq!(dialog, bob());
        assert!(member.is_none());
        assert_eq!(text, "ping");
    }

    #[test]
    fn echo_group_message_comes_from_own_member() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut b = backend(true);
        b.start(EventSink::new(tx));
        let group = b.find_group("1001").unwrap().unwrap();
        b.send_message(&Dialog::Group(group), "hello").unwrap();

        let BackendEvent::Message { member, .. } = rx.try_recv().unwrap();
        let member = member.unwrap();
        assert_eq!(member.id.as_deref(), Some("10000"));
        assert_eq!(member.name, "me");
    }

    #[test]
    fn no_echo_when_disabled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut b = backend(false);
        b.start(EventSink::new(tx));
        b.send_message(&bob(), "quiet").unwrap();
        assert!(rx.try_recv().is_err());
    }
}
