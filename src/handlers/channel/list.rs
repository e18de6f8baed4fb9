//! LIST command handler.

use async_trait::async_trait;
use qqirc_proto::{MessageRef, Response};
use tracing::warn;

use super::resolve::register_group;
use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};

/// Handler for LIST command.
///
/// Lists every group with its member count. Filters are not supported.
pub struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &MessageRef<'_>) -> HandlerResult {
        let rows = ctx
            .fetcher
            .fetch(|b| {
                let rows = b
                    .list_groups()?
                    .into_iter()
                    .map(|group| {
                        let count = match b.list_members(&group) {
                            Ok(members) => members.iter().filter(|m| m.id.is_some()).count(),
                            Err(e) => {
                                warn!(group = %group.nick, error = %e, "Failed to count members");
                                0
                            }
                        };
                        (group, count)
                    })
                    .collect::<Vec<_>>();
                Ok(rows)
            })
            .await?;

        let nick = ctx.nick();
        ctx.send_reply(
            Response::RPL_LISTSTART,
            vec![nick.clone(), "Channel".to_string(), "Users  Name".to_string()],
        );
        for (group, count) in rows {
            let Some(channel) = register_group(ctx.session, &group) else {
                continue;
            };
            ctx.send_reply(
                Response::RPL_LIST,
                vec![nick.clone(), channel, count.to_string(), group.topic()],
            );
        }
        ctx.send_reply(
            Response::RPL_LISTEND,
            vec![nick, "End of /LIST".to_string()],
        );
        Ok(())
    }
}
