//! Join command handler.
//!
//! Resolves a code typed by a player into a destination, in this order:
//! 1. the server the session is already on, in which case nothing happens;
//! 2. a running server whose id or alias is the code;
//! 3. a space found through the [`SpaceService`](crate::cluster::spaces::SpaceService),
//!    started on demand.
//!
//! A running server always wins over a space reachable with the same code.

use std::sync::Arc;

use log::{debug, error, info};

use crate::commands::{CommandContext, CommandError};

/// Moves the session to the server or space named by `target`.
///
/// # Errors
///
/// - [`CommandError::TargetNotFound`] when neither a server nor a space matches
/// - [`CommandError::Dependency`] when the space service or the connection fails
pub async fn handle_join(
    context: &CommandContext<'_>,
    target: &str,
) -> Result<String, CommandError> {
    debug!("handling join command: {}", target);

    let CommandContext {
        cluster,
        session,
        lifetime,
    } = context;

    if let Some(current) = session.server()
        && current.is_reference(target)
    {
        debug!("{} is already on {}", session.host(), target);
        return Ok(String::new());
    }

    let server = cluster
        .manager
        .servers()
        .into_iter()
        .find(|server| server.is_running() && server.is_reference(target));

    if let Some(server) = server {
        info!("{}: joining server {}", session.host(), server.id());
        session.connect_to_server(server).map_err(|e| {
            error!(
                "{}: failed to connect to {}: {:?}",
                session.host(), target, e
            );
            CommandError::Dependency("failed to connect to server")
        })?;
        return Ok(String::new());
    }

    let space = cluster
        .spaces
        .search_space(lifetime, target)
        .await
        .map_err(|e| {
            error!("failed to look up space {}: {:?}", target, e);
            CommandError::Dependency("failed to look up space")
        })?;

    let Some(space) = space else {
        return Err(CommandError::TargetNotFound(target.to_owned()));
    };

    let instance = cluster
        .spaces
        .start_space(lifetime, space.id())
        .await
        .map_err(|e| {
            error!("failed to start space {}: {:?}", space.id(), e);
            CommandError::Dependency("failed to start space")
        })?;

    info!("{}: joining space {}", session.host(), instance.space.id());
    session
        .connect_to_space(Arc::clone(&instance.server), instance.space.id())
        .map_err(|e| {
            error!(
                "{}: failed to connect to space {}: {:?}",
                session.host(), target, e
            );
            CommandError::Dependency("failed to connect to server")
        })?;

    Ok(String::new())
}
