//! Home command handler.

use log::debug;

use crate::commands::{CommandContext, CommandError};

/// Sends the player back to their home space.
pub async fn handle_home(context: &CommandContext<'_>) -> Result<String, CommandError> {
    debug!("handling home command");

    context.session.go_home(&context.lifetime).await;

    Ok(String::new())
}
