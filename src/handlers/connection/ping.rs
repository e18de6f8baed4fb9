//! PING and PONG handlers.

use async_trait::async_trait;
use qqirc_proto::{Message, MessageRef, Prefix};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        // PING <token>
        let token = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

        let pong = Message::pong(ctx.server.name.clone(), Some(token.to_string()))
            .with_prefix(Prefix::ServerName(ctx.server.name.clone()));
        ctx.send(pong);
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, _msg: &MessageRef<'_>) -> HandlerResult {
        Ok(())
    }
}
