//! Connection - Handles an individual client connection.
//!
//! Each Connection is split in two tasks:
//!
//! ```text
//!   ┌────────────┐  Work::Line   ┌──────────────────────────┐
//!   │   reader   │──────────────▶│                          │
//!   │ FramedRead │  Work::Shutdown│   worker (owns Session)  │──▶ FramedWrite
//!   └────────────┘               │   one item at a time     │
//!   SessionRegistry ────────────▶│                          │
//!        Work::Event             └──────────────────────────┘
//! ```
//!
//! The worker drains a single FIFO queue, so replies and backend deliveries
//! reach the client in the order their work items were queued.

use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::{FutureExt, SinkExt, StreamExt};
use qqirc_proto::line::LineCodec;
use qqirc_proto::{Message, MessageRef};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, instrument, warn};

use crate::backend::{BackendHandle, Fetcher};
use crate::error::HandlerError;
use crate::handlers::{Context, Registry, render_event};
use crate::state::{ServerInfo, Session, SessionRegistry, Work, WorkSender};

/// A client connection handler.
pub struct Connection {
    addr: SocketAddr,
    stream: TcpStream,
    server: Arc<ServerInfo>,
    registry: Arc<Registry>,
    sessions: Arc<SessionRegistry>,
    backend: BackendHandle,
}

/// What the worker does after a work item.
enum Flow {
    Continue,
    Close,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        server: Arc<ServerInfo>,
        registry: Arc<Registry>,
        sessions: Arc<SessionRegistry>,
        backend: BackendHandle,
    ) -> Self {
        Self {
            addr,
            stream,
            server,
            registry,
            sessions,
            backend,
        }
    }

    /// Run the connection until QUIT, EOF or a fatal error.
    #[instrument(skip(self), fields(addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        info!(server = %self.server.name, "Client connected");

        let (read_half, write_half) = self.stream.into_split();
        let (work_tx, work_rx) = mpsc::unbounded_channel();

        let session_id = self.sessions.add(work_tx.clone());
        let reader = tokio::spawn(read_lines(read_half, work_tx));

        let mut worker = Worker {
            addr: self.addr,
            server: &self.server,
            registry: &self.registry,
            session: Session::new(self.server.named_channels),
            fetcher: self.backend.fetcher(),
            writer: FramedWrite::new(write_half, LineCodec::new()),
        };
        let result = worker.run(work_rx).await;

        // Both halves stop here, whichever side ended the session.
        reader.abort();
        if self.sessions.remove(session_id) {
            debug!(session = session_id, "Session deregistered");
        }
        info!(nick = %worker.session.nick_or_star(), "Client disconnected");

        result
    }
}

/// Feed client lines to the worker until EOF.
async fn read_lines(read_half: OwnedReadHalf, work: WorkSender) {
    let mut lines = FramedRead::new(read_half, LineCodec::new());

    while let Some(result) = lines.next().await {
        match result {
            Ok(line) => {
                if work.send(Work::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "Read error");
                break;
            }
        }
    }

    debug!("Reader finished");
    let _ = work.send(Work::Shutdown);
}

/// The serialized half of a connection. Owns the session.
struct Worker<'a> {
    addr: SocketAddr,
    server: &'a ServerInfo,
    registry: &'a Registry,
    session: Session,
    fetcher: Fetcher,
    writer: FramedWrite<OwnedWriteHalf, LineCodec>,
}

impl Worker<'_> {
    async fn run(&mut self, mut work: mpsc::UnboundedReceiver<Work>) -> anyhow::Result<()> {
        while let Some(item) = work.recv().await {
            let mut outbox = Vec::new();
            let flow = match item {
                Work::Line(line) => self.process_line(&line, &mut outbox).await,
                Work::Event(event) => {
                    if let Some(event) = self.session.defer(event) {
                        outbox = render_event(self.server, &mut self.session, &event);
                    }
                    Flow::Continue
                }
                Work::Shutdown => break,
            };

            for msg in &outbox {
                self.writer.feed(msg).await?;
            }
            SinkExt::<&Message>::flush(&mut self.writer).await?;

            if let Flow::Close = flow {
                break;
            }
        }
        Ok(())
    }

    async fn process_line(&mut self, line: &str, outbox: &mut Vec<Message>) -> Flow {
        let msg = match MessageRef::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(raw = %line, error = %e, "Ignoring unparsable line");
                return Flow::Continue;
            }
        };
        debug!(raw = %line, "Received line");

        let mut ctx = Context {
            server: self.server,
            session: &mut self.session,
            fetcher: &mut self.fetcher,
            outbox: &mut *outbox,
            remote_addr: self.addr,
        };

        let dispatched = AssertUnwindSafe(self.registry.dispatch(&mut ctx, &msg))
            .catch_unwind()
            .await;

        match dispatched {
            Ok(Ok(())) => Flow::Continue,
            Ok(Err(e)) if e.is_fatal() => {
                info!(reason = e.error_code(), "Closing connection");
                outbox.push(Message::error(closing_text(self.addr, &e)));
                Flow::Close
            }
            Ok(Err(e)) => {
                warn!(error = %e, code = e.error_code(), "Command failed");
                outbox.push(Message::error(e.to_string()));
                Flow::Continue
            }
            Err(_) => {
                error!(raw = %line, "Handler panicked");
                let e = HandlerError::Internal("handler panicked".into());
                outbox.push(Message::error(e.to_string()));
                Flow::Continue
            }
        }
    }
}

fn closing_text(addr: SocketAddr, error: &HandlerError) -> String {
    let reason = match error {
        HandlerError::Quit(Some(msg)) => format!("Quit: {msg}"),
        HandlerError::Quit(None) => "Client Quit".to_string(),
        HandlerError::PasswordMismatch => "Password invalid".to_string(),
        HandlerError::PasswordRequired => "Password required".to_string(),
        other => other.to_string(),
    };
    format!("Closing Link: {} ({reason})", addr.ip())
}
