//! PROTOCTL and MODE handlers.

use async_trait::async_trait;
use qqirc_proto::MessageRef;
use tracing::debug;

use crate::error::HandlerResult;
use crate::handlers::channel::resolve::fetch_groups;
use crate::handlers::{Context, Handler};
use crate::state::Capability;

/// Handler for PROTOCTL command.
///
/// Each known token turns on a protocol extension for the session. Unknown
/// tokens are ignored.
pub struct ProtoctlHandler;

#[async_trait]
impl Handler for ProtoctlHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        for token in msg.args() {
            let Some(cap) = Capability::parse(token) else {
                debug!(token = %token, "Ignoring unknown PROTOCTL token");
                continue;
            };
            if !ctx.session.capabilities.insert(cap) {
                continue;
            }
            debug!(cap = cap.token(), "Extension enabled");

            if cap == Capability::NamedChannels && ctx.session.is_registered() {
                rename_channels(ctx).await?;
            }
        }
        Ok(())
    }
}

/// Rebuild channel names after switching to named channels.
///
/// Joined channels keep their names, so the map is only rebuilt while the
/// session has none.
async fn rename_channels(ctx: &mut Context<'_>) -> HandlerResult {
    if !ctx.session.joined.is_empty() {
        debug!("Channels joined, keeping existing channel names");
        return Ok(());
    }
    ctx.session.channels.clear();
    fetch_groups(ctx).await?;
    Ok(())
}

/// Handler for MODE command.
///
/// Modes are not modelled; MODE is accepted and ignored.
pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        debug!(target = ?msg.arg(0), "Ignoring MODE");
        Ok(())
    }
}
