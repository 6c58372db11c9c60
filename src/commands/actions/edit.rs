//! Open editing toggle.
//!
//! Only the owner of a space may open it to editing by everyone. The new state is
//! announced to every player on the server backing the space.

use log::{debug, error, info};

use crate::commands::{CommandContext, CommandError, responses::format_editing_announcement};

/// Toggles open editing in the session's current space.
///
/// # Errors
///
/// - [`CommandError::NotSpaceOwner`] when the session is not in a space it owns
/// - [`CommandError::Dependency`] when ownership cannot be checked
pub async fn handle_edit(context: &CommandContext<'_>) -> Result<String, CommandError> {
    debug!("handling edit command");

    let CommandContext {
        cluster,
        session,
        lifetime,
    } = context;

    let is_owner = session.is_owner(lifetime).await.map_err(|e| {
        error!(
            "{}: failed to check space ownership: {:?}",
            session.host(), e
        );
        CommandError::Dependency("failed to check space ownership")
    })?;

    let instance = match session.space() {
        Some(instance) if is_owner => instance,
        _ => return Err(CommandError::NotSpaceOwner),
    };

    let open_edit = !instance.space.is_open_edit();
    instance.space.set_open_edit(open_edit);
    info!(
        "space {}: open edit set to {}",
        instance.space.id(), open_edit
    );

    cluster
        .manager
        .announce(&instance.server, &format_editing_announcement(open_edit));

    Ok(String::new())
}
