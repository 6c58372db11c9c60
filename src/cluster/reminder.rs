//! Onboarding reminder for players alone on their private server.

use std::{sync::Arc, time::Duration};

use log::debug;
use tokio::time::{self, Instant};

use crate::{
    cluster::{servers::GameServer, session::Session},
    commands::responses::format_private_server_reminder,
    lifetime::Lifetime,
};

/// Below this many clients a private server is considered empty.
const POPULATED_SERVER_CLIENTS: u32 = 2;

/// Tells the owner of a fresh private server how to invite other players.
///
/// The reminder is sent right away and then every `period` for as long as the server
/// has fewer than two clients. Once a second player shows up the loop ends for good,
/// even if the server empties again later. It also ends when either the session or
/// `cluster_lifetime` ends; both are checked between reminders.
///
/// # Arguments
///
/// * `cluster_lifetime` - Scope of the cluster the server belongs to
/// * `session` - Owner of the server, receives the reminders
/// * `server` - The private server to watch
/// * `period` - Delay between two reminders
pub async fn remind_private_match(
    cluster_lifetime: Lifetime,
    session: Arc<dyn Session>,
    server: Arc<GameServer>,
    period: Duration,
) {
    let message = format_private_server_reminder(server.reference(), session.client_type());
    let session_lifetime = session.lifetime();
    let mut interval = time::interval_at(Instant::now() + period, period);

    loop {
        if server.num_clients().await >= POPULATED_SERVER_CLIENTS {
            debug!("server {} is populated, stop reminding", server.id());
            return;
        }

        session.send_message(&message);

        tokio::select! {
            _ = session_lifetime.cancelled() => return,
            _ = cluster_lifetime.cancelled() => return,
            _ = interval.tick() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::{sync::mpsc, task::JoinHandle};

    use super::*;
    use crate::cluster::session::{ClientType, MockSession};

    const PERIOD: Duration = Duration::from_secs(30);

    fn create_server() -> Arc<GameServer> {
        let (sender, _receiver) = mpsc::unbounded_channel();
        Arc::new(GameServer::new("abcd", sender))
    }

    fn create_session(lifetime: Lifetime, counter: Arc<AtomicUsize>) -> Arc<dyn Session> {
        let mut session = MockSession::new();
        session
            .expect_client_type()
            .return_const(ClientType::Desktop);
        session
            .expect_lifetime()
            .returning(move || lifetime.clone());
        session.expect_send_message().returning(move |message| {
            assert!(message.contains("#join abcd"));
            counter.fetch_add(1, Ordering::SeqCst);
        });
        Arc::new(session)
    }

    fn spawn_reminder(
        cluster_lifetime: &Lifetime,
        session: &Arc<dyn Session>,
        server: &Arc<GameServer>,
    ) -> JoinHandle<()> {
        tokio::spawn(remind_private_match(
            cluster_lifetime.clone(),
            Arc::clone(session),
            Arc::clone(server),
            PERIOD,
        ))
    }

    /// Lets the reminder task run until it waits on its next tick.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminds_immediately_then_every_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let session = create_session(Lifetime::new(), Arc::clone(&counter));
        let server = create_server();
        let cluster_lifetime = Lifetime::new();

        let task = spawn_reminder(&cluster_lifetime, &session, &server);
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        time::advance(PERIOD).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        time::advance(PERIOD).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        cluster_lifetime.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_for_good_once_populated() {
        let counter = Arc::new(AtomicUsize::new(0));
        let session = create_session(Lifetime::new(), Arc::clone(&counter));
        let server = create_server();
        server.set_num_clients(1).await;

        let task = spawn_reminder(&Lifetime::new(), &session, &server);
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        server.set_num_clients(2).await;
        time::advance(PERIOD).await;
        settle().await;

        assert!(task.is_finished());

        // A player leaving afterwards does not bring the reminder back
        server.set_num_clients(1).await;
        time::advance(PERIOD * 3).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_reminds_populated_server() {
        let counter = Arc::new(AtomicUsize::new(0));
        let session = create_session(Lifetime::new(), Arc::clone(&counter));
        let server = create_server();
        server.set_num_clients(4).await;

        spawn_reminder(&Lifetime::new(), &session, &server)
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_session_ends() {
        let counter = Arc::new(AtomicUsize::new(0));
        let session_lifetime = Lifetime::new();
        let session = create_session(session_lifetime.clone(), Arc::clone(&counter));
        let server = create_server();

        let task = spawn_reminder(&Lifetime::new(), &session, &server);
        settle().await;

        session_lifetime.cancel();
        task.await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_cluster_ends() {
        let counter = Arc::new(AtomicUsize::new(0));
        let session = create_session(Lifetime::new(), Arc::clone(&counter));
        let server = create_server();
        let cluster_lifetime = Lifetime::new();

        let task = spawn_reminder(&cluster_lifetime, &session, &server);
        settle().await;

        cluster_lifetime.cancel();
        task.await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
