//! Command handler registry and dispatch.
//!
//! Two explicit tables: one for unregistered sessions, one for registered
//! ones. The table is chosen by the session's phase at dispatch time.

use std::collections::HashMap;

use qqirc_proto::MessageRef;
use tracing::{Instrument, Level, debug, span};

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{JoinHandler, ListHandler, NamesHandler, PartHandler, TopicHandler},
    connection::{
        ModeHandler, NickChangeHandler, NickHandler, PassHandler, PingHandler, PongHandler,
        ProtoctlHandler, QuitHandler, UserHandler,
    },
    helpers::{err_needmoreparams, err_unknowncommand},
    messaging::{NoticeHandler, PrivmsgHandler},
    user_query::{UserhostHandler, WhoHandler},
};

type Table = HashMap<&'static str, Box<dyn Handler>>;

/// Registry of command handlers.
pub struct Registry {
    pre_reg: Table,
    post_reg: Table,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut pre_reg: Table = HashMap::new();
        pre_reg.insert("PASS", Box::new(PassHandler));
        pre_reg.insert("NICK", Box::new(NickHandler));
        pre_reg.insert("USER", Box::new(UserHandler));
        pre_reg.insert("QUIT", Box::new(QuitHandler));
        pre_reg.insert("PING", Box::new(PingHandler));
        pre_reg.insert("PONG", Box::new(PongHandler));
        pre_reg.insert("PROTOCTL", Box::new(ProtoctlHandler));

        let mut post_reg: Table = HashMap::new();
        // Connection
        post_reg.insert("NICK", Box::new(NickChangeHandler));
        post_reg.insert("PING", Box::new(PingHandler));
        post_reg.insert("PONG", Box::new(PongHandler));
        post_reg.insert("MODE", Box::new(ModeHandler));
        post_reg.insert("PROTOCTL", Box::new(ProtoctlHandler));
        post_reg.insert("QUIT", Box::new(QuitHandler));

        // Channels
        post_reg.insert("JOIN", Box::new(JoinHandler));
        post_reg.insert("PART", Box::new(PartHandler));
        post_reg.insert("LIST", Box::new(ListHandler));
        post_reg.insert("TOPIC", Box::new(TopicHandler));
        post_reg.insert("NAMES", Box::new(NamesHandler));

        // Queries
        post_reg.insert("WHO", Box::new(WhoHandler));
        post_reg.insert("USERHOST", Box::new(UserhostHandler));

        // Messaging
        post_reg.insert("PRIVMSG", Box::new(PrivmsgHandler));
        post_reg.insert("NOTICE", Box::new(NoticeHandler));

        Self { pre_reg, post_reg }
    }

    /// Dispatch a message to the handler for the session's phase.
    ///
    /// Missing parameters become 461. Unknown commands become 421 once
    /// registered and are ignored before that.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let cmd_name = msg.command_name().to_ascii_uppercase();
        let registered = ctx.session.is_registered();
        let table = if registered {
            &self.post_reg
        } else {
            &self.pre_reg
        };

        let Some(handler) = table.get(cmd_name.as_str()) else {
            if registered {
                let reply = err_unknowncommand(&ctx.server.name, &ctx.nick(), &cmd_name);
                ctx.send(reply);
            } else {
                debug!(command = %cmd_name, "Ignoring command before registration");
            }
            return Ok(());
        };

        let irc_span = span!(
            Level::DEBUG,
            "irc.command",
            command = %cmd_name,
            nick = %ctx.session.nick_or_star(),
            registered,
        );

        match handler.handle(ctx, msg).instrument(irc_span).await {
            Err(HandlerError::NeedMoreParams) => {
                let nick = if registered { ctx.nick() } else { "*".to_string() };
                let reply = err_needmoreparams(&ctx.server.name, &nick, &cmd_name);
                ctx.send(reply);
                Ok(())
            }
            Err(e) => {
                debug!(command = %cmd_name, error = %e, code = e.error_code(), "Command error");
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
