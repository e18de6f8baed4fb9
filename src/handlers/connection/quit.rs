//! QUIT handler for terminating client sessions.

use async_trait::async_trait;
use qqirc_proto::MessageRef;
use tracing::info;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};

/// Handler for QUIT command.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let quit_msg = msg.arg(0).map(|s| s.to_string());

        info!(
            nick = %ctx.session.nick_or_star(),
            message = ?quit_msg,
            "Client quit"
        );

        // The connection loop sends the closing ERROR line.
        Err(HandlerError::Quit(quit_msg))
    }
}
