//! Help command handler.
//!
//! Sends the list of available commands to the player as server messages. Web
//! clients get an extra line about sharing links.

use log::debug;

use crate::commands::{CommandContext, CommandError, responses::format_help};

/// Sends help information about available commands to the player.
///
/// The lines go out as individual messages; the command response itself is empty.
pub fn handle_help(context: &CommandContext<'_>) -> Result<String, CommandError> {
    debug!("handling help command");

    let session = &context.session;
    for line in format_help(session.client_type()) {
        session.send_message(&line);
    }

    Ok(String::new())
}
