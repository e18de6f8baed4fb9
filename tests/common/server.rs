//! Test server management.
//!
//! Spawns and manages qqircd instances for integration testing.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::sleep;

/// Default backend section for tests: one account, two groups, one buddy.
pub const ROSTER: &str = r#"
[backend]
identity = "10000"
echo = true

[[backend.groups]]
id = "1001"
nick = "Rust"
mark = "rs"
code = "55501"
members = [{ id = "10000", name = "me", role = "owner" }, { id = "20001", name = "Bob" }]

[[backend.groups]]
id = "1002"
nick = "Tea Room"
members = [{ id = "20002", name = "Carol", role = "admin" }]

[[backend.buddies]]
id = "20001"
name = "Bob"
"#;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    _dir: TempDir,
}

impl TestServer {
    /// Spawn a server with the default roster and password `secret`.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("password = \"secret\"", ROSTER).await
    }

    /// Spawn a server with extra `[server]` lines and a backend section.
    pub async fn spawn_with(server_extra: &str, backend: &str) -> anyhow::Result<Self> {
        let port = free_port()?;
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("config.toml");
        let config = format!(
            r#"
[server]
name = "qq.bot"
network = "QQ"
{server_extra}

[listen]
address = "127.0.0.1:{port}"
{backend}"#
        );
        std::fs::write(&config_path, config)?;

        let child = Command::new(env!("CARGO_BIN_EXE_qqircd"))
            .arg(&config_path)
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _dir: dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
