//! PASS command handler.

use async_trait::async_trait;
use qqirc_proto::MessageRef;
use tracing::debug;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};

/// Handler for PASS command.
///
/// `PASS <password>` stores the password; it is checked when registration
/// completes.
pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let password = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        debug!(addr = %ctx.remote_addr, "Password received");
        ctx.session.password = Some(password.to_string());
        Ok(())
    }
}
