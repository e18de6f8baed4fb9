//! Command handler context and the handler trait.

use std::net::SocketAddr;

use async_trait::async_trait;
use qqirc_proto::{Message, MessageRef, Prefix, Response};

use crate::backend::Fetcher;
use crate::error::HandlerResult;
use crate::handlers::helpers::server_reply;
use crate::state::{ServerInfo, Session};

/// Handler context passed to each command handler.
///
/// Replies are collected in `outbox` and written by the connection worker
/// once the handler returns, in the order they were queued.
pub struct Context<'a> {
    /// Shared server settings.
    pub server: &'a ServerInfo,
    /// This connection's session.
    pub session: &'a mut Session,
    /// This connection's bridge to the backend loop.
    pub fetcher: &'a mut Fetcher,
    /// Outgoing messages for this client.
    pub outbox: &'a mut Vec<Message>,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
}

impl Context<'_> {
    /// Queue a message for the client.
    #[inline]
    pub fn send(&mut self, msg: Message) {
        self.outbox.push(msg);
    }

    /// Build and queue a server reply in one call.
    #[inline]
    pub fn send_reply(&mut self, response: Response, params: Vec<String>) {
        let reply = server_reply(&self.server.name, response, params);
        self.outbox.push(reply);
    }

    /// Current nick, or `*` before registration.
    #[inline]
    pub fn nick(&self) -> String {
        self.session.nick_or_star().to_string()
    }

    /// Hostmask of this client.
    pub fn me(&self) -> Prefix {
        self.session.hostmask(&self.server.user_host)
    }

    /// Hostmask for another user of the gateway.
    pub fn user_prefix(&self, nick: &str, id: &str) -> Prefix {
        Prefix::hostmask(nick, id, &self.server.user_host)
    }
}

/// A command handler.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult;
}
