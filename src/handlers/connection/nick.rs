//! NICK command handlers.

use async_trait::async_trait;
use qqirc_proto::{Command, Message, MessageRef};
use tracing::{debug, info};

use super::welcome::try_register;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::err_nicknameinuse;
use crate::handlers::{Context, Handler};

/// Handler for NICK before registration.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let nick = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        if nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        debug!(nick = %nick, "Nick set");
        ctx.session.nick = Some(nick.to_string());
        try_register(ctx).await
    }
}

/// Handler for NICK after registration.
///
/// The account's identity follows the new nick in the nick map. A name that
/// already belongs to a contact is refused with 433.
pub struct NickChangeHandler;

#[async_trait]
impl Handler for NickChangeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let new_nick = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        if new_nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if ctx.session.nick.as_deref() == Some(new_nick) {
            return Ok(());
        }

        let taken = match ctx.session.identity.clone() {
            Some(id) => ctx.session.nicks.rename(&id, new_nick).is_err(),
            None => ctx.session.nicks.backend_id(new_nick).is_some(),
        };
        if taken {
            let reply = err_nicknameinuse(&ctx.server.name, &ctx.nick(), new_nick);
            ctx.send(reply);
            return Ok(());
        }

        let change = Message::from(Command::NICK(new_nick.to_string())).with_prefix(ctx.me());
        ctx.send(change);
        info!(old = %ctx.nick(), new = %new_nick, "Nick changed");
        ctx.session.nick = Some(new_nick.to_string());
        Ok(())
    }
}
