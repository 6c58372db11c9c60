//! Cancellation scopes for sessions, commands and the cluster itself.
//!
//! A [`Lifetime`] is a cloneable handle on a cancellation signal. Lifetimes form a
//! tree: a child created with [`Lifetime::child`] is cancelled whenever one of its
//! ancestors is, while cancelling a child leaves its parent untouched.
//!
//! Background tasks receive the lifetimes that govern them when they are spawned and
//! race [`Lifetime::cancelled`] against their own suspension points with
//! `tokio::select!`.
//!
//! # Examples
//!
//! ```no_run
//! # use skirmish::lifetime::Lifetime;
//! # async fn example() {
//! let cluster = Lifetime::new();
//! let command = cluster.child();
//!
//! cluster.cancel();
//! assert!(command.is_cancelled());
//! command.cancelled().await; // resolves immediately
//! # }
//! ```

use std::sync::Arc;

use futures::future::{FutureExt, select_all};
use tokio::sync::watch;

/// Cloneable cancellation scope.
///
/// Every clone observes the same signal. The senders of the whole ancestry are kept
/// alive by the handle, so a scope is never considered cancelled just because the
/// value that created it was dropped.
#[derive(Clone, Debug)]
pub struct Lifetime {
    /// Signals of this scope and all of its ancestors, root first
    chain: Vec<Arc<watch::Sender<bool>>>,
}

impl Lifetime {
    /// Creates a new root scope.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Lifetime {
            chain: vec![Arc::new(sender)],
        }
    }

    /// Creates a scope that ends when either itself or `self` is cancelled.
    pub fn child(&self) -> Self {
        let (sender, _) = watch::channel(false);
        let mut chain = self.chain.clone();
        chain.push(Arc::new(sender));
        Lifetime { chain }
    }

    /// Cancels this scope and every scope derived from it.
    pub fn cancel(&self) {
        if let Some(own) = self.chain.last() {
            own.send_replace(true);
        }
    }

    /// Returns `true` once this scope or one of its ancestors has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.chain.iter().any(|signal| *signal.borrow())
    }

    /// Resolves when this scope or one of its ancestors is cancelled.
    pub async fn cancelled(&self) {
        let waits = self.chain.iter().map(|signal| {
            let mut receiver = signal.subscribe();
            async move {
                // The sender lives in `self.chain`, so this only returns on cancel
                let _ = receiver.wait_for(|cancelled| *cancelled).await;
            }
            .boxed()
        });

        select_all(waits).await;
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[test]
    fn test_new_lifetime_is_alive() {
        let lifetime = Lifetime::new();
        assert!(!lifetime.is_cancelled());
    }

    #[test]
    fn test_cancel_is_seen_by_clones() {
        let lifetime = Lifetime::new();
        let clone = lifetime.clone();

        lifetime.cancel();

        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_parent_cancel_reaches_child() {
        let parent = Lifetime::new();
        let child = parent.child();
        let grandchild = child.child();

        parent.cancel();

        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let parent = Lifetime::new();
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
        assert!(!sibling.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let lifetime = Lifetime::new();
        let waiter = lifetime.clone();

        let task = tokio::spawn(async move { waiter.cancelled().await });
        lifetime.cancel();

        assert!(
            timeout(Duration::from_secs(1), task).await.is_ok(),
            "cancelled() should resolve once the scope is cancelled"
        );
    }

    #[tokio::test]
    async fn test_cancelled_resolves_when_parent_cancelled() {
        let parent = Lifetime::new();
        let child = parent.child();
        parent.cancel();

        assert!(
            timeout(Duration::from_secs(1), child.cancelled())
                .await
                .is_ok()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pending_while_alive() {
        let parent = Lifetime::new();
        let child = parent.child();

        let result = timeout(Duration::from_secs(5), child.cancelled()).await;

        assert!(result.is_err(), "an alive scope should never resolve");
    }
}
