//! Matchmaking queue handlers.
//!
//! Thin pass-through to the [`MatchQueue`](crate::cluster::matches::MatchQueue). The
//! queue does not say why it refused a request, so every failure is reported as an
//! unknown duel type.

use log::{debug, warn};

use crate::commands::{CommandContext, CommandError};

/// Queues the session for a duel of type `duel_type`.
///
/// An empty type selects the queue's default.
pub fn handle_duel(context: &CommandContext<'_>, duel_type: &str) -> Result<String, CommandError> {
    debug!("handling duel command: {:?}", duel_type);

    let session_id = context.session.id();
    context
        .cluster
        .matches
        .queue(session_id, duel_type)
        .map_err(|e| {
            warn!(
                "session {} could not queue for '{}': {:?}",
                session_id, duel_type, e
            );
            CommandError::UnknownDuelType(duel_type.to_owned())
        })?;

    Ok(String::new())
}

/// Removes the session from the duel queue. Always succeeds.
pub fn handle_stop_duel(context: &CommandContext<'_>) -> Result<String, CommandError> {
    debug!("handling stopduel command");

    context.cluster.matches.dequeue(context.session.id());

    Ok(String::new())
}
