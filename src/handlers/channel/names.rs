//! NAMES command handler.

use async_trait::async_trait;
use qqirc_proto::{MessageRef, Response};

use super::resolve::{register_contact, resolve_group};
use crate::backend::Contact;
use crate::error::HandlerResult;
use crate::handlers::helpers::NamesBuffer;
use crate::handlers::{Context, Handler};
use crate::state::Capability;

/// Handler for NAMES command.
pub struct NamesHandler;

#[async_trait]
impl Handler for NamesHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let Some(targets) = msg.arg(0) else {
            end_of_names(ctx, "*");
            return Ok(());
        };

        for channel in targets.split(',').filter(|c| !c.is_empty()) {
            if ctx.server.is_all_traffic(channel) {
                send_all_traffic_names(ctx);
                continue;
            }

            let Some(group) = resolve_group(ctx, channel).await? else {
                end_of_names(ctx, channel);
                continue;
            };
            let name = ctx
                .session
                .channels
                .canonical(channel)
                .unwrap_or(channel)
                .to_string();
            let members = ctx.fetcher.fetch(move |b| b.list_members(&group)).await?;
            send_names(ctx, &name, &members);
        }
        Ok(())
    }
}

/// Send the 353 lines for `members` followed by 366.
///
/// Members without a backend id are skipped.
pub fn send_names(ctx: &mut Context<'_>, channel: &str, members: &[Contact]) {
    let verbose = ctx.session.has(Capability::UhNames);
    let mut buffer = NamesBuffer::new(&ctx.server.name, &ctx.nick(), channel);

    for member in members {
        let Some(id) = member.id.as_deref() else {
            continue;
        };
        let Some(nick) = register_contact(ctx.session, member) else {
            continue;
        };
        let token = if verbose {
            format!("{}{}", member.role.prefix(), ctx.user_prefix(&nick, id))
        } else {
            format!("{}{}", member.role.prefix(), nick)
        };
        buffer.push(token);
    }

    for line in buffer.finish() {
        ctx.send(line);
    }
    end_of_names(ctx, channel);
}

/// NAMES for the all-traffic channel: every nick this session knows about.
pub(super) fn send_all_traffic_names(ctx: &mut Context<'_>) {
    let verbose = ctx.session.has(Capability::UhNames);
    let own = ctx.nick();

    let mut tokens: Vec<String> = ctx
        .session
        .nicks
        .iter()
        .map(|(id, nick)| {
            if verbose {
                ctx.user_prefix(nick, id).to_string()
            } else {
                nick.to_string()
            }
        })
        .collect();
    if ctx.session.identity.is_none() {
        tokens.push(if verbose { ctx.me().to_string() } else { own });
    }
    tokens.sort();
    tokens.dedup();

    let channel = ctx.server.all_traffic_channel.clone();
    let mut buffer = NamesBuffer::new(&ctx.server.name, &ctx.nick(), &channel);
    for token in tokens {
        buffer.push(token);
    }
    for line in buffer.finish() {
        ctx.send(line);
    }
    end_of_names(ctx, &channel);
}

fn end_of_names(ctx: &mut Context<'_>, channel: &str) {
    let nick = ctx.nick();
    ctx.send_reply(
        Response::RPL_ENDOFNAMES,
        vec![nick, channel.to_string(), "End of /NAMES list.".to_string()],
    );
}
