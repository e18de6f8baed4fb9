//! Channel and nick resolution against the session's name maps.
//!
//! Names the maps do not know yet trigger one refresh from the backend before
//! they are reported as unknown.

use crate::backend::{Contact, Group};
use crate::error::HandlerError;
use crate::handlers::Context;
use crate::state::{Capability, Session};

/// Register a group in the channel map; returns its channel name.
pub fn register_group(session: &mut Session, group: &Group) -> Option<String> {
    let id = group.id.as_deref()?;
    let base = if session.has(Capability::NamedChannels) && !group.nick.is_empty() {
        group.nick.as_str()
    } else {
        id
    };
    if !session.channels.register(Some(id), base) {
        return None;
    }
    session.channels.irc_name(id).map(str::to_owned)
}

/// Register a contact in the nick map; returns its nick.
///
/// The account's own id always maps to the session nick.
pub fn register_contact(session: &mut Session, contact: &Contact) -> Option<String> {
    let id = contact.id.as_deref()?;
    if session.identity.as_deref() == Some(id) {
        return session.nick.clone();
    }
    if !session.nicks.register(Some(id), &contact.name) {
        return None;
    }
    session.nicks.irc_name(id).map(str::to_owned)
}

/// The group a channel name refers to, within an already fetched list.
pub fn find_in<'g>(session: &Session, groups: &'g [Group], channel: &str) -> Option<&'g Group> {
    let id = session.channels.backend_id(channel)?;
    groups.iter().find(|g| g.id.as_deref() == Some(id))
}

/// Fetch every group and register it in the channel map.
pub async fn fetch_groups(ctx: &mut Context<'_>) -> Result<Vec<Group>, HandlerError> {
    let groups = ctx.fetcher.fetch(|b| b.list_groups()).await?;
    for group in &groups {
        register_group(ctx.session, group);
    }
    Ok(groups)
}

/// Resolve a channel name to its group.
pub async fn resolve_group(
    ctx: &mut Context<'_>,
    channel: &str,
) -> Result<Option<Group>, HandlerError> {
    if !channel.starts_with('#') {
        return Ok(None);
    }
    if let Some(id) = ctx.session.channels.backend_id(channel).map(str::to_owned) {
        return Ok(ctx.fetcher.fetch(move |b| b.find_group(&id)).await?);
    }

    let groups = fetch_groups(ctx).await?;
    Ok(find_in(ctx.session, &groups, channel).cloned())
}

/// Resolve a nick to a buddy.
pub async fn resolve_buddy(
    ctx: &mut Context<'_>,
    nick: &str,
) -> Result<Option<Contact>, HandlerError> {
    if let Some(id) = ctx.session.nicks.backend_id(nick).map(str::to_owned) {
        return Ok(ctx.fetcher.fetch(move |b| b.find_buddy(&id)).await?);
    }

    let buddies = ctx.fetcher.fetch(|b| b.list_buddies()).await?;
    for buddy in &buddies {
        register_contact(ctx.session, buddy);
    }
    let Some(id) = ctx.session.nicks.backend_id(nick) else {
        return Ok(None);
    };
    Ok(buddies.into_iter().find(|b| b.id.as_deref() == Some(id)))
}
