//! Integration tests for the connection lifecycle.
//!
//! Registration, the password gate, PING and QUIT against a spawned server.

mod common;

use std::time::Duration;

use common::client::numeric;
use common::{ROSTER, TestServer};
use qqirc_proto::Command;

#[tokio::test]
async fn test_registration_burst() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");

    let burst = client.register("secret").await.expect("Registration failed");
    let codes: Vec<u16> = burst.iter().filter_map(numeric).collect();
    assert_eq!(codes, vec![1, 4, 5, 376]);

    match &burst[0].command {
        Command::Response(_, params) => assert_eq!(params[0], "alice"),
        other => panic!("Expected RPL_WELCOME, got {other:?}"),
    }
    match &burst[2].command {
        Command::Response(_, params) => {
            assert!(params.iter().any(|p| p == "CHANTYPES=#&"));
            assert!(params.iter().any(|p| p == "PREFIX=(ov)@+"));
        }
        other => panic!("Expected RPL_ISUPPORT, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_password_closes_connection() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");

    client.send_raw("NICK alice").await.unwrap();
    client.send_raw("USER alice 0 * :Alice").await.unwrap();

    let msg = client.recv().await.expect("Expected ERROR");
    match &msg.command {
        Command::ERROR(text) => assert!(text.contains("Password required"), "{text}"),
        other => panic!("Expected ERROR, got {other:?}"),
    }
    assert!(client.recv().await.is_err(), "connection should be closed");
}

#[tokio::test]
async fn test_wrong_password_closes_connection() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");

    client.send_raw("PASS guess").await.unwrap();
    client.send_raw("NICK alice").await.unwrap();
    client.send_raw("USER alice 0 * :Alice").await.unwrap();

    let msg = client.recv().await.expect("Expected ERROR");
    assert!(matches!(&msg.command, Command::ERROR(t) if t.contains("Password invalid")));
}

#[tokio::test]
async fn test_any_password_without_configured_one() {
    let server = TestServer::spawn_with("", ROSTER)
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");
    client.register("whatever").await.expect("Registration failed");
}

#[tokio::test]
async fn test_commands_before_registration_are_ignored() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");

    client.send_raw("JOIN *").await.unwrap();
    client.send_raw("WHO alice").await.unwrap();
    assert!(client.is_quiet(Duration::from_millis(300)).await);

    client.register("secret").await.expect("Registration failed");
}

#[tokio::test]
async fn test_ping_and_quit() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");
    client.register("secret").await.expect("Registration failed");

    client.send_raw("PING lag-check").await.unwrap();
    let pong = client.recv().await.expect("Failed to receive PONG");
    match &pong.command {
        Command::PONG(server, Some(token)) => {
            assert_eq!(token, "lag-check");
            assert_eq!(server, "qq.bot");
        }
        other => panic!("Expected PONG with token, got: {other:?}"),
    }

    client.send_raw("BOGUS").await.unwrap();
    let reply = client.recv().await.unwrap();
    assert_eq!(numeric(&reply), Some(421));

    client.send_raw("QUIT :done").await.unwrap();
    let msg = client.recv().await.expect("Expected ERROR");
    match &msg.command {
        Command::ERROR(text) => assert!(text.ends_with("(Quit: done)"), "{text}"),
        other => panic!("Expected ERROR, got {other:?}"),
    }
}
