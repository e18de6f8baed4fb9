//! Handler test harness: a session wired to a [`MemoryBackend`] on a real
//! backend loop.

use std::net::SocketAddr;

use qqirc_proto::MessageRef;
use tokio::sync::mpsc;

use crate::backend::{BackendEvent, BackendLoop, EventSink, Fetcher, MemoryBackend};
use crate::config::Config;
use crate::error::HandlerResult;
use crate::handlers::{Context, Registry};
use crate::state::{ServerInfo, Session};

pub const ROSTER: &str = r#"
[server]
password = "secret"

[backend]
identity = "10000"
echo = true

[[backend.groups]]
id = "1001"
nick = "Rust"
mark = "rs"
code = "55501"
members = [
    { id = "10000", name = "me", role = "owner" },
    { id = "20001", name = "Bob" },
    { name = "ghost" },
]

[[backend.groups]]
id = "1002"
nick = "Tea Room"
members = [{ id = "20002", name = "Carol", role = "admin" }]

[[backend.buddies]]
id = "20001"
name = "Bob"
"#;

pub struct Harness {
    pub server: ServerInfo,
    pub session: Session,
    pub events: mpsc::UnboundedReceiver<BackendEvent>,
    fetcher: Fetcher,
    registry: Registry,
}

impl Harness {
    pub fn new(doc: &str) -> Self {
        let config: Config = doc.parse().unwrap();
        let (tx, events) = mpsc::unbounded_channel();
        let backend = MemoryBackend::from_config(&config.backend);
        let (_backend_loop, handle) = BackendLoop::spawn(backend, EventSink::new(tx)).unwrap();
        Self {
            server: ServerInfo::from_config(&config.server),
            session: Session::new(config.server.named_channels),
            events,
            fetcher: handle.fetcher(),
            registry: Registry::new(),
        }
    }

    /// Dispatch one line, returning the handler result and the rendered replies.
    pub async fn exchange(&mut self, line: &str) -> (HandlerResult, Vec<String>) {
        let msg = MessageRef::parse(line).unwrap();
        let mut outbox = Vec::new();
        let remote_addr: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        let mut ctx = Context {
            server: &self.server,
            session: &mut self.session,
            fetcher: &mut self.fetcher,
            outbox: &mut outbox,
            remote_addr,
        };
        let result = self.registry.dispatch(&mut ctx, &msg).await;
        (result, outbox.iter().map(ToString::to_string).collect())
    }

    /// Dispatch one line that must succeed.
    pub async fn send(&mut self, line: &str) -> Vec<String> {
        let (result, lines) = self.exchange(line).await;
        if let Err(e) = result {
            panic!("{line:?} failed: {e}");
        }
        lines
    }

    /// PASS, NICK alice, USER.
    pub async fn register(&mut self) -> Vec<String> {
        self.send("PASS secret").await;
        self.send("NICK alice").await;
        self.send("USER alice 0 * :Alice Realname").await
    }
}

/// Numeric or command token of each rendered line.
pub fn verbs(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter_map(|l| l.split(' ').nth(1))
        .collect()
}
