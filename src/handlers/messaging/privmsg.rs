//! PRIVMSG and NOTICE handlers.

use std::collections::HashSet;

use async_trait::async_trait;
use qqirc_proto::{MessageRef, irc_to_lower};
use tracing::debug;

use super::transcode::outbound_text;
use crate::backend::Dialog;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::channel::resolve::{resolve_buddy, resolve_group};
use crate::handlers::helpers::err_nosuchnick;
use crate::handlers::{Context, Handler};

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        relay(ctx, msg, false).await
    }
}

/// Handler for NOTICE command.
pub struct NoticeHandler;

#[async_trait]
impl Handler for NoticeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        relay(ctx, msg, true).await
    }
}

/// Send a message body to every target, each once.
async fn relay(ctx: &mut Context<'_>, msg: &MessageRef<'_>, notice: bool) -> HandlerResult {
    // PRIVMSG <target>{,<target>} <text>
    let targets = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    let body = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;

    let Some(text) = outbound_text(body, notice) else {
        debug!("Nothing to relay");
        return Ok(());
    };

    let mut seen = HashSet::new();
    for target in targets.split(',').filter(|t| !t.is_empty()) {
        if !seen.insert(irc_to_lower(target)) {
            continue;
        }

        let dialog = if target.starts_with('#') {
            resolve_group(ctx, target).await?.map(Dialog::Group)
        } else if target.starts_with('&') {
            None
        } else {
            resolve_buddy(ctx, target).await?.map(Dialog::Buddy)
        };

        let Some(dialog) = dialog else {
            let reply = err_nosuchnick(&ctx.server.name, &ctx.nick(), target);
            ctx.send(reply);
            continue;
        };

        debug!(target = %target, dialog = %dialog, "Relaying message");
        let text = text.clone();
        ctx.fetcher
            .fetch(move |b| b.send_message(&dialog, &text))
            .await?;
    }
    Ok(())
}
