//! JOIN command handler.
//!
//! Joining is local to the session: the backend has no notion of an IRC
//! client being "in" a group, so a join only adds the channel to the joined
//! set and replays JOIN, topic and NAMES to the client.

use async_trait::async_trait;
use qqirc_proto::{Message, MessageRef};
use tracing::{debug, info, warn};

use super::names::{send_all_traffic_names, send_names};
use super::resolve::{fetch_groups, find_in, register_contact, register_group};
use super::topic::send_topic;
use super::ALL_TRAFFIC_TOPIC;
use crate::backend::{Contact, Group};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::err_nosuchchannel;
use crate::handlers::{Context, Handler};

/// Handler for JOIN command.
///
/// `JOIN *` joins every group.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        // JOIN <channel>{,<channel>}
        let targets: Vec<&str> = msg
            .arg(0)
            .ok_or(HandlerError::NeedMoreParams)?
            .split(',')
            .filter(|t| !t.is_empty())
            .collect();
        if targets.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let groups = fetch_groups(ctx).await?;

        for target in targets {
            if target == "*" {
                for group in &groups {
                    join_group(ctx, group).await?;
                }
            } else if ctx.server.is_all_traffic(target) {
                join_all_traffic(ctx).await?;
            } else if let Some(group) = find_in(ctx.session, &groups, target) {
                join_group(ctx, group).await?;
            } else {
                debug!(channel = %target, "JOIN to unknown channel");
                let reply = err_nosuchchannel(&ctx.server.name, &ctx.nick(), target);
                ctx.send(reply);
            }
        }
        Ok(())
    }
}

/// Join every group with a backend id.
pub async fn join_all_groups(ctx: &mut Context<'_>) -> HandlerResult {
    let groups = fetch_groups(ctx).await?;
    for group in &groups {
        join_group(ctx, group).await?;
    }
    Ok(())
}

async fn join_group(ctx: &mut Context<'_>, group: &Group) -> HandlerResult {
    let Some(channel) = register_group(ctx.session, group) else {
        debug!(group = %group.nick, "Skipping group without backend id");
        return Ok(());
    };
    if ctx.session.joined.contains(&channel) {
        return Ok(());
    }

    let target = group.clone();
    let members = ctx.fetcher.fetch(move |b| b.list_members(&target)).await?;

    ctx.session.joined.insert(channel.clone());
    info!(nick = %ctx.nick(), channel = %channel, "Joined channel");

    let join = Message::join(channel.clone()).with_prefix(ctx.me());
    ctx.send(join);
    send_topic(ctx, &channel, &group.topic());
    send_names(ctx, &channel, &members);
    Ok(())
}

/// Join the all-traffic channel, learning every buddy and group member.
async fn join_all_traffic(ctx: &mut Context<'_>) -> HandlerResult {
    let channel = ctx.server.all_traffic_channel.clone();
    if ctx.session.joined.contains(&channel) {
        return Ok(());
    }

    let contacts: Vec<Contact> = ctx
        .fetcher
        .fetch(|b| {
            let mut contacts = b.list_buddies()?;
            for group in b.list_groups()? {
                if group.id.is_none() {
                    continue;
                }
                match b.list_members(&group) {
                    Ok(members) => contacts.extend(members),
                    Err(e) => warn!(group = %group.nick, error = %e, "Failed to list members"),
                }
            }
            Ok(contacts)
        })
        .await?;
    for contact in &contacts {
        register_contact(ctx.session, contact);
    }

    ctx.session.joined.insert(channel.clone());
    info!(nick = %ctx.nick(), channel = %channel, "Joined all-traffic channel");

    let join = Message::join(channel.clone()).with_prefix(ctx.me());
    ctx.send(join);
    send_topic(ctx, &channel, ALL_TRAFFIC_TOPIC);
    send_all_traffic_names(ctx);
    Ok(())
}
