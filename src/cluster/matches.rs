//! Contract of the matchmaking subsystem.

use mockall::automock;

/// Duel queue the cluster forwards `duel` and `stopduel` to.
///
/// Pairing is entirely up to the implementation; the cluster only forwards intent.
#[automock]
pub trait MatchQueue: Send + Sync {
    /// Adds the session to the queue of `duel_type`.
    ///
    /// An empty `duel_type` selects the default queue. Any error means the session was
    /// not queued.
    fn queue(&self, session_id: u32, duel_type: &str) -> anyhow::Result<()>;

    /// Removes the session from every queue. Unknown sessions are ignored.
    fn dequeue(&self, session_id: u32);
}
