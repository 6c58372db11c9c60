//! Private server creation handler.
//!
//! Creates a server for the requesting player, configures it from the command
//! arguments and moves the player onto it.
//!
//! # Rate limiting
//!
//! An origin may create one server per cooldown period. The cooldown check, the
//! replacement of the origin's previous server and the bookkeeping of the new one all
//! happen under the cluster's creation lock, so two concurrent commands from the same
//! origin are fully serialised.
//!
//! # Background tasks
//!
//! A successful creation leaves two tasks behind:
//! - the private server reminder, bound to the cluster and the session lifetimes;
//! - the master grant, which waits for the player's connection to complete and gives
//!   them master on their new server. It gives up after the grant timeout or when the
//!   player disconnects.

use std::{sync::Arc, time::Duration};

use log::{debug, error, info};
use tokio::{sync::oneshot, time};

use crate::{
    cluster::{Cluster, remind_private_match, servers::GameServer, session::Session},
    commands::{
        CommandContext, CommandError,
        params::{CreateParams, infer_create_params},
        responses::{format_change_map, format_grant_master, format_set_map, format_set_mode},
    },
};

/// Creates a private server for the session's origin.
///
/// # Errors
///
/// - [`CommandError::UnknownArgument`] when an argument cannot be classified
/// - [`CommandError::RateLimited`] when the origin is still cooling down
/// - [`CommandError::Dependency`] when the server cannot be created, started or joined
pub async fn handle_create_game(
    context: &CommandContext<'_>,
    args: &[String],
) -> Result<String, CommandError> {
    debug!("handling creategame command: {:?}", args);

    let CommandContext {
        cluster,
        session,
        lifetime: _,
    } = context;

    let params = infer_create_params(cluster.manager.as_ref(), args)?;
    let host = session.host();

    let server = {
        let mut creations = cluster.creations.lock().await;
        creations.forget_expired(cluster.settings.create_cooldown);

        if creations.is_cooling_down(&host, cluster.settings.create_cooldown) {
            debug!("{} created a server too recently", host);
            return Err(CommandError::RateLimited);
        }

        if let Some(existing) = creations.owned_server(&host) {
            info!("{}: removing previous server {}", host, existing.id());
            cluster.manager.remove_server(&existing).await;
        }

        let server = provision_server(cluster, &params).await?;
        creations.record(&host, Arc::clone(&server));
        server
    };

    let connected = session
        .connect_to_server(Arc::clone(&server))
        .map_err(|e| {
            error!("{}: failed to connect to {}: {:?}", host, server.id(), e);
            CommandError::Dependency("failed to connect to server")
        })?;

    tokio::spawn(remind_private_match(
        cluster.lifetime.clone(),
        Arc::clone(session),
        Arc::clone(&server),
        cluster.settings.reminder_interval,
    ));

    tokio::spawn(grant_master_on_connect(
        Arc::clone(session),
        server,
        connected,
        cluster.settings.grant_timeout,
    ));

    Ok(String::new())
}

/// Asks the manager for a new server, waits for it and applies `params`.
///
/// The server is bound to the cluster lifetime rather than the command's, so a
/// command timing out does not take a starting server down with it.
async fn provision_server(
    cluster: &Cluster,
    params: &CreateParams,
) -> Result<Arc<GameServer>, CommandError> {
    info!("starting server");

    let preset = params.preset.as_deref().unwrap_or_default();

    let server = cluster
        .manager
        .new_server(&cluster.lifetime, preset, true)
        .await
        .map_err(|e| {
            error!("failed to create server: {:?}", e);
            CommandError::Dependency("failed to create server")
        })?;

    cluster
        .manager
        .start_and_wait(&server, &cluster.lifetime)
        .await
        .map_err(|e| {
            error!("server {} failed to start: {:?}", server.id(), e);
            CommandError::Dependency("server failed to start")
        })?;

    configure_server(&server, params);

    Ok(server)
}

/// Sends the directives selecting the requested map and mode.
///
/// Without a map nor a mode, the preset's configuration stands.
fn configure_server(server: &GameServer, params: &CreateParams) {
    match (&params.map, params.mode) {
        (Some(map), Some(mode)) => server.send_command(&format_change_map(map, mode)),
        (None, Some(mode)) => server.send_command(&format_set_mode(mode)),
        (Some(map), None) => server.send_command(&format_set_map(map)),
        (None, None) => {}
    }
}

/// Gives master to the session once its connection to `server` succeeds.
async fn grant_master_on_connect(
    session: Arc<dyn Session>,
    server: Arc<GameServer>,
    connected: oneshot::Receiver<bool>,
    timeout: Duration,
) {
    let session_lifetime = session.lifetime();

    tokio::select! {
        status = connected => match status {
            Ok(true) => server.send_command(&format_grant_master(session.client_num())),
            _ => debug!("connection to {} failed, no master granted", server.id()),
        },
        _ = time::sleep(timeout) => debug!("connection to {} took too long", server.id()),
        _ = session_lifetime.cancelled() => debug!("session left before reaching {}", server.id()),
    }
}
