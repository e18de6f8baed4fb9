//! Registration completion: password gate, welcome burst, namespace setup.

use qqirc_proto::{IsupportBuilder, Response};
use tracing::{info, warn};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::channel::join_all_groups;
use crate::handlers::channel::resolve::{register_contact, register_group};
use crate::handlers::messaging::render_event;
use crate::handlers::Context;
use crate::state::{Capability, Phase, ServerInfo, Session, VERSION};

/// Complete registration once both NICK and USER have arrived.
pub(super) async fn try_register(ctx: &mut Context<'_>) -> HandlerResult {
    if !ctx.session.can_register() {
        return Ok(());
    }
    complete_registration(ctx).await
}

/// Check the password, greet the client and populate the name maps.
///
/// Backend events queued before this point are delivered at the end, even
/// when populating the maps failed.
pub async fn complete_registration(ctx: &mut Context<'_>) -> HandlerResult {
    check_password(ctx.server, ctx.session)?;

    ctx.session.phase = Phase::Registered;
    info!(
        nick = %ctx.nick(),
        identity = ?ctx.session.identity,
        addr = %ctx.remote_addr,
        "Client registered"
    );

    send_welcome_burst(ctx);

    let result = match populate(ctx).await {
        Ok(()) if ctx.server.autojoin => join_all_groups(ctx).await,
        other => other,
    };
    replay_pending(ctx);
    result
}

/// Registration needs a non-empty password, equal to the configured one if
/// there is one.
fn check_password(server: &ServerInfo, session: &Session) -> Result<(), HandlerError> {
    let supplied = match session.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(HandlerError::PasswordRequired),
    };
    match server.password.as_deref() {
        Some(expected) if expected != supplied => Err(HandlerError::PasswordMismatch),
        _ => Ok(()),
    }
}

fn send_welcome_burst(ctx: &mut Context<'_>) {
    let nick = ctx.nick();
    let server_name = ctx.server.name.clone();

    ctx.send_reply(
        Response::RPL_WELCOME,
        vec![
            nick.clone(),
            format!("Welcome to the {} IRC gateway, {}", ctx.server.network, nick),
        ],
    );
    ctx.send_reply(
        Response::RPL_MYINFO,
        vec![
            nick.clone(),
            server_name,
            VERSION.to_string(),
            "i".to_string(),
            "ov".to_string(),
        ],
    );

    let mut isupport = IsupportBuilder::new()
        .network(&ctx.server.network)
        .chantypes("#&")
        .prefix("@+", "ov")
        .charset("utf-8")
        .casemapping("rfc1459");
    for cap in Capability::ALL {
        isupport = isupport.custom(cap.token(), None);
    }
    let mut params = vec![nick.clone()];
    params.extend(isupport.into_tokens());
    params.push("are supported by this server".to_string());
    ctx.send_reply(Response::RPL_ISUPPORT, params);

    ctx.send_reply(
        Response::RPL_ENDOFMOTD,
        vec![nick, "End of MOTD command.".to_string()],
    );
}

/// Map the identity, every group and every buddy.
async fn populate(ctx: &mut Context<'_>) -> HandlerResult {
    if let Some(id) = ctx.session.identity.clone() {
        let nick = ctx.nick();
        if let Err(taken) = ctx.session.nicks.rename(&id, &nick) {
            warn!(nick = %nick, owner = %taken.owner, "Own nick already mapped");
        }
    }

    let (groups, buddies) = ctx
        .fetcher
        .fetch(|b| Ok((b.list_groups()?, b.list_buddies()?)))
        .await?;

    for group in &groups {
        register_group(ctx.session, group);
    }
    for buddy in &buddies {
        register_contact(ctx.session, buddy);
    }
    info!(
        channels = ctx.session.channels.len(),
        nicks = ctx.session.nicks.len(),
        "Namespace populated"
    );
    Ok(())
}

fn replay_pending(ctx: &mut Context<'_>) {
    let pending = ctx.session.retire_pending();
    for event in pending {
        for line in render_event(ctx.server, ctx.session, &event) {
            ctx.send(line);
        }
    }
}
