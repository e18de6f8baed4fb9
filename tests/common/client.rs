//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use std::time::Duration;

use qqirc_proto::{Command, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send a raw IRC line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send an IRC command.
    #[allow(dead_code)]
    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        let msg = Message::from(cmd);
        self.send_raw(&msg.to_string()).await
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Receive messages until the predicate matches, inclusive.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Receive messages until a numeric with `code` arrives.
    pub async fn recv_until_numeric(&mut self, code: u16) -> anyhow::Result<Vec<Message>> {
        self.recv_until(|msg| numeric(msg) == Some(code)).await
    }

    /// Whether the server sends nothing more within `dur`.
    #[allow(dead_code)]
    pub async fn is_quiet(&mut self, dur: Duration) -> bool {
        self.recv_timeout(dur).await.is_err()
    }

    /// Register with PASS, NICK and USER; returns everything up to end of MOTD.
    pub async fn register(&mut self, password: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("PASS {password}")).await?;
        self.send_raw(&format!("NICK {}", self.nick)).await?;
        self.send_raw(&format!("USER {} 0 * :Test User", self.nick))
            .await?;
        self.recv_until_numeric(376).await
    }
}

/// Numeric code of a reply, if it is one.
pub fn numeric(msg: &Message) -> Option<u16> {
    match &msg.command {
        Command::Response(resp, _) => Some(resp.code()),
        _ => None,
    }
}
