//! User query handlers: WHO, USERHOST.

use async_trait::async_trait;
use qqirc_proto::{MessageRef, Response, irc_eq};

use crate::backend::Contact;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::channel::resolve::{register_contact, resolve_buddy, resolve_group};
use crate::handlers::{Context, Handler};

/// Handler for WHO command.
///
/// `WHO <channel>` lists the group's members, `WHO <nick>` a single user.
pub struct WhoHandler;

#[async_trait]
impl Handler for WhoHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let mask = msg.arg(0).unwrap_or("*");

        if mask.starts_with('#') {
            if let Some(group) = resolve_group(ctx, mask).await? {
                let channel = ctx
                    .session
                    .channels
                    .canonical(mask)
                    .unwrap_or(mask)
                    .to_string();
                let members = ctx.fetcher.fetch(move |b| b.list_members(&group)).await?;
                for member in &members {
                    who_reply(ctx, &channel, member);
                }
            }
        } else if ctx.server.is_all_traffic(mask) {
            let channel = ctx.server.all_traffic_channel.clone();
            let known: Vec<(String, String)> = ctx
                .session
                .nicks
                .iter()
                .map(|(id, nick)| (id.to_string(), nick.to_string()))
                .collect();
            for (id, nick) in known {
                send_who_line(ctx, &channel, &id, &nick, "", &nick);
            }
        } else if irc_eq(mask, ctx.session.nick_or_star()) {
            let nick = ctx.nick();
            let user = ctx.session.user().to_string();
            let realname = ctx.session.realname.clone().unwrap_or_default();
            send_who_line(ctx, "*", &user, &nick, "", &realname);
        } else if let Some(buddy) = resolve_buddy(ctx, mask).await? {
            who_reply(ctx, "*", &buddy);
        } else if let Some(id) = ctx.session.nicks.backend_id(mask).map(str::to_owned) {
            // A group member seen before, but not a buddy.
            let nick = ctx.session.nicks.canonical(mask).unwrap_or(mask).to_string();
            send_who_line(ctx, "*", &id, &nick, "", &nick);
        }

        let nick = ctx.nick();
        ctx.send_reply(
            Response::RPL_ENDOFWHO,
            vec![nick, mask.to_string(), "End of WHO list".to_string()],
        );
        Ok(())
    }
}

fn who_reply(ctx: &mut Context<'_>, channel: &str, contact: &Contact) {
    let Some(id) = contact.id.as_deref() else {
        return;
    };
    let Some(nick) = register_contact(ctx.session, contact) else {
        return;
    };
    send_who_line(ctx, channel, id, &nick, contact.role.prefix(), &contact.name);
}

// <channel> <user> <host> <server> <nick> H<prefix> :0 <realname>
fn send_who_line(
    ctx: &mut Context<'_>,
    channel: &str,
    user: &str,
    nick: &str,
    prefix: &str,
    realname: &str,
) {
    let params = vec![
        ctx.nick(),
        channel.to_string(),
        user.to_string(),
        ctx.server.user_host.clone(),
        ctx.server.name.clone(),
        nick.to_string(),
        format!("H{prefix}"),
        format!("0 {realname}"),
    ];
    ctx.send_reply(Response::RPL_WHOREPLY, params);
}

/// Handler for USERHOST command.
pub struct UserhostHandler;

#[async_trait]
impl Handler for UserhostHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        if msg.args().is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let mut entries = Vec::new();
        for nick in msg.args().iter().take(5) {
            if irc_eq(nick, ctx.session.nick_or_star()) {
                entries.push(format!(
                    "{}=+{}@{}",
                    ctx.session.nick_or_star(),
                    ctx.session.user(),
                    ctx.server.user_host
                ));
                continue;
            }
            let Some(id) = ctx.session.nicks.backend_id(nick) else {
                continue;
            };
            let name = ctx.session.nicks.canonical(nick).unwrap_or(nick);
            entries.push(format!("{name}=+{id}@{}", ctx.server.user_host));
        }

        let nick = ctx.nick();
        ctx.send_reply(Response::RPL_USERHOST, vec![nick, entries.join(" ")]);
        Ok(())
    }
}
