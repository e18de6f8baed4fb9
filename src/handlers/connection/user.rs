//! USER command handler.

use async_trait::async_trait;
use qqirc_proto::MessageRef;
use tracing::{debug, warn};

use super::welcome::try_register;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};

/// Handler for USER command.
///
/// `USER <username> <mode> <unused> <realname>`
///
/// Also looks up the backend account this session speaks for.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let username = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        let realname = msg.arg(3).ok_or(HandlerError::NeedMoreParams)?;

        ctx.session.username = Some(username.to_string());
        ctx.session.realname = Some(realname.to_string());

        let identity = ctx.fetcher.fetch(|b| Ok(b.identity())).await?;
        match &identity {
            Some(id) => debug!(identity = %id, "Backend identity"),
            None => warn!("Backend has no identity yet"),
        }
        ctx.session.identity = identity;

        try_register(ctx).await
    }
}
