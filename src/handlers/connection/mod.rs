//! Connection and registration handlers.
//!
//! Handles PASS, NICK, USER, PING, PONG, QUIT, PROTOCTL and MODE, plus the
//! registration burst that follows the first complete NICK/USER pair.

mod nick;
mod pass;
mod ping;
mod protoctl;
mod quit;
mod user;
mod welcome;

pub use nick::{NickChangeHandler, NickHandler};
pub use pass::PassHandler;
pub use ping::{PingHandler, PongHandler};
pub use protoctl::{ModeHandler, ProtoctlHandler};
pub use quit::QuitHandler;
pub use user::UserHandler;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::backend::{BackendEvent, Contact, Dialog, Role};
    use crate::error::HandlerError;
    use crate::handlers::testing::{Harness, ROSTER, verbs};

    #[tokio::test]
    async fn registration_sends_welcome_burst() {
        let mut h = Harness::new(ROSTER);
        let lines = h.register().await;
        assert_eq!(verbs(&lines), vec!["001", "004", "005", "376"]);
        assert_eq!(
            lines[0],
            ":qq.bot 001 alice :Welcome to the QQ IRC gateway, alice"
        );
        for token in ["CHANTYPES=#&", "PREFIX=(ov)@+", "CHARSET=utf-8", "NAMEDCHANNELS"] {
            assert!(lines[2].contains(token), "missing {token}: {}", lines[2]);
        }
        assert_eq!(lines[3], ":qq.bot 376 alice :End of MOTD command.");

        assert!(h.session.is_registered());
        assert_eq!(h.session.nicks.irc_name("10000"), Some("alice"));
        assert_eq!(h.session.channels.irc_name("1001"), Some("#1001"));
    }

    #[tokio::test]
    async fn user_before_nick() {
        let mut h = Harness::new(ROSTER);
        h.send("PASS secret").await;
        assert!(h.send("USER a 0 * :A").await.is_empty());
        let lines = h.send("NICK alice").await;
        assert_eq!(verbs(&lines)[0], "001");
    }

    #[tokio::test]
    async fn missing_password_is_fatal() {
        let mut h = Harness::new(ROSTER);
        h.send("NICK alice").await;
        let (result, lines) = h.exchange("USER a 0 * :A").await;
        assert!(matches!(result, Err(HandlerError::PasswordRequired)));
        assert!(lines.is_empty());
        assert!(!h.session.is_registered());
    }

    #[tokio::test]
    async fn wrong_password_is_fatal() {
        let mut h = Harness::new(ROSTER);
        h.send("PASS guess").await;
        h.send("NICK alice").await;
        let (result, _) = h.exchange("USER a 0 * :A").await;
        assert!(matches!(result, Err(HandlerError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn commands_before_registration_are_ignored() {
        let mut h = Harness::new(ROSTER);
        assert!(h.send("JOIN *").await.is_empty());
        assert!(h.send("PRIVMSG Bob :hi").await.is_empty());
        assert_eq!(
            h.send("USER a").await,
            vec![":qq.bot 461 * USER :Not enough parameters"]
        );
    }

    #[tokio::test]
    async fn unknown_command_after_registration() {
        let mut h = Harness::new(ROSTER);
        h.register().await;
        assert_eq!(
            h.send("FROB x").await,
            vec![":qq.bot 421 alice FROB :Unknown command"]
        );
        assert_eq!(
            h.send("PASS again").await,
            vec![":qq.bot 421 alice PASS :Unknown command"]
        );
        assert!(h.send("MODE alice +i").await.is_empty());
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let mut h = Harness::new(ROSTER);
        assert_eq!(h.send("PING lag-1").await, vec![":qq.bot PONG qq.bot :lag-1"]);
    }

    #[tokio::test]
    async fn quit_is_fatal() {
        let mut h = Harness::new(ROSTER);
        let (result, _) = h.exchange("QUIT :bye").await;
        assert!(matches!(result, Err(HandlerError::Quit(Some(ref m))) if m == "bye"));
    }

    #[tokio::test]
    async fn nick_change_follows_identity() {
        let mut h = Harness::new(ROSTER);
        h.register().await;
        assert_eq!(
            h.send("NICK alicia").await,
            vec![":alice!10000@qq.com NICK alicia"]
        );
        assert_eq!(h.session.nicks.irc_name("10000"), Some("alicia"));
        assert_eq!(h.session.nicks.backend_id("alice"), None);

        assert_eq!(
            h.send("NICK bob").await,
            vec![":qq.bot 433 alicia bob :Nickname is already in use"]
        );
        assert_eq!(h.session.nick.as_deref(), Some("alicia"));
    }

    #[tokio::test]
    async fn early_events_are_replayed_after_registration() {
        let mut h = Harness::new(ROSTER);
        let early = BackendEvent::Message {
            dialog: Dialog::Buddy(Contact {
                id: Some("20001".into()),
                name: "Bob".into(),
                role: Role::Member,
            }),
            member: None,
            text: "early".into(),
        };
        assert!(h.session.defer(Arc::new(early.clone())).is_none());

        let lines = h.register().await;
        assert_eq!(verbs(&lines), vec!["001", "004", "005", "376", "PRIVMSG"]);
        assert_eq!(lines[4], ":Bob!20001@qq.com PRIVMSG alice :early");
        assert!(h.session.defer(Arc::new(early)).is_some());
    }

    #[tokio::test]
    async fn autojoin_joins_groups() {
        let roster = ROSTER.replace("[server]\n", "[server]\nautojoin = true\n");
        let mut h = Harness::new(&roster);
        let lines = h.register().await;
        assert!(lines.contains(&":alice!10000@qq.com JOIN #1001".to_string()));
        assert!(lines.contains(&":alice!10000@qq.com JOIN #1002".to_string()));
    }
}
