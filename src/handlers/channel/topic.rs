//! TOPIC command handler.
//!
//! Topics are read-only: they mirror the group's display nick, mark and code.

use async_trait::async_trait;
use qqirc_proto::{MessageRef, Response};
use tracing::debug;

use super::ALL_TRAFFIC_TOPIC;
use super::resolve::resolve_group;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::err_nosuchchannel;
use crate::handlers::{Context, Handler};

/// Handler for TOPIC command.
pub struct TopicHandler;

#[async_trait]
impl Handler for TopicHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        // TOPIC <channel> [new_topic]
        let channel = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

        if msg.arg(1).is_some() {
            debug!(channel = %channel, "Ignoring topic change");
            return Ok(());
        }

        if ctx.server.is_all_traffic(channel) {
            let name = ctx.server.all_traffic_channel.clone();
            send_topic(ctx, &name, ALL_TRAFFIC_TOPIC);
            return Ok(());
        }

        match resolve_group(ctx, channel).await? {
            Some(group) => {
                let name = ctx
                    .session
                    .channels
                    .canonical(channel)
                    .unwrap_or(channel)
                    .to_string();
                send_topic(ctx, &name, &group.topic());
            }
            None => {
                let reply = err_nosuchchannel(&ctx.server.name, &ctx.nick(), channel);
                ctx.send(reply);
            }
        }
        Ok(())
    }
}

/// Send RPL_TOPIC and RPL_TOPICWHOTIME for a channel.
pub fn send_topic(ctx: &mut Context<'_>, channel: &str, topic: &str) {
    let nick = ctx.nick();
    ctx.send_reply(
        Response::RPL_TOPIC,
        vec![nick.clone(), channel.to_string(), topic.to_string()],
    );
    let setter = ctx.server.name.clone();
    let set_at = ctx.session.connected_at.to_string();
    ctx.send_reply(
        Response::RPL_TOPICWHOTIME,
        vec![nick, channel.to_string(), setter, set_at],
    );
}
