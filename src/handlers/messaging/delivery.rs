//! Inbound delivery: backend messages rendered as PRIVMSG lines.

use qqirc_proto::{Message, Prefix};
use tracing::warn;

use crate::backend::{BackendEvent, Dialog};
use crate::handlers::channel::resolve::{register_contact, register_group};
use crate::state::{ServerInfo, Session};

use super::transcode::inbound_lines;

/// Lines to send to one session for a backend event.
///
/// Group messages go to the channel when it is joined and to the
/// all-traffic channel otherwise, tagged with the channel name. Buddy
/// messages are addressed to the session's own nick. Events whose dialog or
/// sender has no backend id are dropped.
pub fn render_event(server: &ServerInfo, session: &mut Session, event: &BackendEvent) -> Vec<Message> {
    let BackendEvent::Message {
        dialog,
        member,
        text,
    } = event;

    match dialog {
        Dialog::Group(group) => {
            let Some(channel) = register_group(session, group) else {
                warn!(dialog = %dialog, "Dropping message from group without id");
                return Vec::new();
            };
            let Some((member_id, nick)) = member.as_ref().and_then(|m| {
                let id = m.id.clone()?;
                Some((id, register_contact(session, m)?))
            }) else {
                warn!(dialog = %dialog, "Dropping group message without sender id");
                return Vec::new();
            };
            let source = Prefix::hostmask(nick, member_id, &server.user_host);

            if session.joined.contains(&channel) {
                inbound_lines(text)
                    .map(|line| Message::privmsg(&channel, line).with_prefix(source.clone()))
                    .collect()
            } else {
                inbound_lines(text)
                    .map(|line| {
                        Message::privmsg(&server.all_traffic_channel, format!("[{channel}] {line}"))
                            .with_prefix(source.clone())
                    })
                    .collect()
            }
        }
        Dialog::Buddy(buddy) => {
            let (Some(id), Some(nick)) = (buddy.id.clone(), register_contact(session, buddy)) else {
                warn!(dialog = %dialog, "Dropping message from buddy without id");
                return Vec::new();
            };
            let source = Prefix::hostmask(nick, id, &server.user_host);
            let target = session.nick_or_star().to_string();
            inbound_lines(text)
                .map(|line| Message::privmsg(&target, line).with_prefix(source.clone()))
                .collect()
        }
    }
}
