//! PART command handler.

use async_trait::async_trait;
use qqirc_proto::{Message, MessageRef};
use tracing::info;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::{err_nosuchchannel, err_notonchannel};
use crate::handlers::{Context, Handler};

/// Handler for PART command.
pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        // PART <channel>{,<channel>} [<reason>]
        let targets = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

        for target in targets.split(',').filter(|t| !t.is_empty()) {
            let channel = if ctx.server.is_all_traffic(target) {
                Some(ctx.server.all_traffic_channel.clone())
            } else {
                ctx.session.channels.canonical(target).map(str::to_owned)
            };

            let Some(channel) = channel else {
                let reply = err_nosuchchannel(&ctx.server.name, &ctx.nick(), target);
                ctx.send(reply);
                continue;
            };

            if !ctx.session.joined.remove(&channel) {
                let reply = err_notonchannel(&ctx.server.name, &ctx.nick(), &channel);
                ctx.send(reply);
                continue;
            }

            info!(nick = %ctx.nick(), channel = %channel, "Left channel");
            let part = Message::part(channel).with_prefix(ctx.me());
            ctx.send(part);
        }
        Ok(())
    }
}
