//! Deadline-bounded command execution.
//!
//! A command runs as its own task and hands its result back through a single-slot
//! channel. The caller waits for the first of that result and the deadline; a result
//! that arrives late is dropped together with the channel.

use std::{future::Future, sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::{sync::oneshot, time};

use crate::{
    cluster::{Cluster, session::Session},
    commands::{CommandError, CommandResult},
    lifetime::Lifetime,
};

/// Runs the future built by `task` on its own task and waits for it at most `deadline`.
///
/// `task` receives a child of `parent` that is cancelled as soon as the wait is over,
/// whatever its outcome. The spawned task is not aborted: it is expected to notice the
/// cancellation and stop, and its result is discarded if nobody waits for it anymore.
///
/// # Returns
///
/// * `Ok(T)` - The task finished in time
/// * `Err(CommandError::TimedOut)` - The deadline elapsed first
/// * `Err(CommandError::Aborted)` - The task ended without producing a result
pub async fn with_deadline<F, Fut, T>(
    deadline: Duration,
    parent: &Lifetime,
    task: F,
) -> Result<T, CommandError>
where
    F: FnOnce(Lifetime) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let lifetime = parent.child();
    let (sender, receiver) = oneshot::channel();

    let future = task(lifetime.clone());
    tokio::spawn(async move {
        // Sending on a oneshot never blocks, even when the receiver is gone
        if sender.send(future.await).is_err() {
            debug!("discarding result delivered after the deadline");
        }
    });

    let result = time::timeout(deadline, receiver).await;
    lifetime.cancel();

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(CommandError::Aborted),
        Err(_) => Err(CommandError::TimedOut),
    }
}

impl Cluster {
    /// Runs a player command, giving up after the configured command timeout.
    ///
    /// The command is bound to the session lifetime, so it is also cancelled when the
    /// player disconnects. Provisioning started by the command is bound to the
    /// cluster lifetime and survives a timeout.
    pub async fn run_command_with_timeout(
        self: &Arc<Self>,
        command: &str,
        session: Arc<dyn Session>,
    ) -> Result<CommandResult, CommandError> {
        let cluster = Arc::clone(self);
        let command = command.to_owned();
        let session_lifetime = session.lifetime();

        let result = with_deadline(
            self.settings.command_timeout,
            &session_lifetime,
            move |lifetime| async move { cluster.run_command(&lifetime, &command, session).await },
        )
        .await;

        if let Err(CommandError::TimedOut) = &result {
            warn!(
                "command timed out after {:?}",
                self.settings.command_timeout
            );
        }

        result?
    }
}
