//! Console player.
//!
//! The operator plays from the terminal: each line read on stdin is a command, with
//! or without the leading `#`, and everything the cluster says to the player is
//! printed on stdout. Connections complete immediately and update the client count
//! of the servers involved.

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::{mpsc, oneshot},
};

use crate::{
    cluster::{
        Cluster,
        servers::GameServer,
        session::{ClientType, Session},
        spaces::{Space, SpaceInstance, SpaceService},
    },
    commands::{CommandResult, ErrorKind},
    lifetime::Lifetime,
    local::spaces::LocalSpaceService,
};

/// Address the console player is seen from.
const CONSOLE_HOST: &str = "127.0.0.1";

/// A connection to account for: the player leaves `from` and joins `to`.
struct Move {
    from: Option<Arc<GameServer>>,
    to: Arc<GameServer>,
    connected: oneshot::Sender<bool>,
}

pub struct ConsoleSession {
    lifetime: Lifetime,
    spaces: Arc<LocalSpaceService>,
    /// Space `home` leads to
    home: Option<String>,
    server: RwLock<Option<Arc<GameServer>>>,
    space: RwLock<Option<SpaceInstance>>,
    messages: mpsc::UnboundedSender<String>,
    /// Queued in connection order, sent while holding `server`
    moves: mpsc::UnboundedSender<Move>,
}

impl ConsoleSession {
    pub fn new(
        lifetime: Lifetime,
        spaces: Arc<LocalSpaceService>,
        home: Option<String>,
        messages: mpsc::UnboundedSender<String>,
    ) -> Self {
        let (moves, receiver) = mpsc::unbounded_channel();
        tokio::spawn(apply_moves(receiver));

        ConsoleSession {
            lifetime,
            spaces,
            home,
            server: RwLock::new(None),
            space: RwLock::new(None),
            messages,
            moves,
        }
    }

    /// Moves the player to `server`, inside `space` if given.
    fn connect(
        &self,
        server: Arc<GameServer>,
        space: Option<Arc<Space>>,
    ) -> oneshot::Receiver<bool> {
        let (connected, receiver) = oneshot::channel();

        *self.space.write().unwrap_or_else(PoisonError::into_inner) =
            space.map(|space| SpaceInstance {
                space,
                server: Arc::clone(&server),
            });

        let mut current = self.server.write().unwrap_or_else(PoisonError::into_inner);
        let from = current.replace(Arc::clone(&server));
        let connection = Move {
            from,
            to: server,
            connected,
        };
        if self.moves.send(connection).is_err() {
            warn!("client counts are no longer tracked");
        }

        receiver
    }
}

/// Applies the moves to the client counts, one at a time and in connection order.
async fn apply_moves(mut moves: mpsc::UnboundedReceiver<Move>) {
    while let Some(connection) = moves.recv().await {
        if let Some(from) = &connection.from {
            from.update_num_clients(|n| n.saturating_sub(1)).await;
        }
        connection.to.update_num_clients(|n| n + 1).await;

        debug!("console connected to {}", connection.to.reference());
        // The command may be long gone
        let _ = connection.connected.send(true);
    }
}

#[async_trait]
impl Session for ConsoleSession {
    fn id(&self) -> u32 {
        1
    }

    fn host(&self) -> String {
        CONSOLE_HOST.to_owned()
    }

    fn client_type(&self) -> ClientType {
        ClientType::Desktop
    }

    fn lifetime(&self) -> Lifetime {
        self.lifetime.clone()
    }

    fn server(&self) -> Option<Arc<GameServer>> {
        self.server
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn space(&self) -> Option<SpaceInstance> {
        self.space
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The console player owns every space it is in.
    async fn is_owner(&self, _lifetime: &Lifetime) -> anyhow::Result<bool> {
        Ok(self.space().is_some())
    }

    fn connect_to_server(
        &self,
        server: Arc<GameServer>,
    ) -> anyhow::Result<oneshot::Receiver<bool>> {
        Ok(self.connect(server, None))
    }

    fn connect_to_space(
        &self,
        server: Arc<GameServer>,
        space_id: &str,
    ) -> anyhow::Result<oneshot::Receiver<bool>> {
        let space = self
            .spaces
            .find(space_id)
            .with_context(|| format!("unknown space {}", space_id))?;
        Ok(self.connect(server, Some(space)))
    }

    fn send_message(&self, message: &str) {
        if self.messages.send(message.to_owned()).is_err() {
            warn!("console output is closed, dropping message: {}", message);
        }
    }

    fn client_num(&self) -> i32 {
        0
    }

    async fn go_home(&self, lifetime: &Lifetime) {
        let Some(home) = &self.home else {
            self.send_message("you have no home space");
            return;
        };

        let connected = match self.spaces.start_space(lifetime, home).await {
            Ok(instance) => self.connect_to_space(instance.server, instance.space.id()),
            Err(e) => Err(e),
        };

        if let Err(e) = connected {
            warn!("failed to send the console home: {:?}", e);
            self.send_message("failed to go home");
        }
    }
}

/// Removes the in-game colour escapes from `message`.
fn strip_colours(message: &str) -> String {
    let mut stripped = String::with_capacity(message.len());
    let mut chars = message.chars();

    while let Some(c) = chars.next() {
        match c {
            '\x0c' => {
                chars.next();
            }
            c => stripped.push(c),
        }
    }

    stripped
}

/// Prints the messages sent to the console player until every sender is gone.
pub async fn print_messages(mut messages: mpsc::UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();

    while let Some(message) = messages.recv().await {
        let line = format!("{}\n", strip_colours(&message));
        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            warn!("failed to write to stdout: {}", e);
            break;
        }
    }
}

/// Runs the commands read on stdin until it closes or the session ends.
pub async fn run_console(
    cluster: Arc<Cluster>,
    session: Arc<ConsoleSession>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = session.lifetime.cancelled() => break,
        };
        let Some(line) = line else {
            break;
        };

        let command = line.trim();
        let command = command.strip_prefix('#').unwrap_or(command);
        if command.is_empty() {
            continue;
        }

        match cluster
            .run_command_with_timeout(command, session.clone())
            .await
        {
            Ok(CommandResult::Handled(response)) if !response.is_empty() => {
                session.send_message(&response)
            }
            Ok(CommandResult::Handled(_)) => {}
            Ok(CommandResult::Unhandled) => {
                session.send_message(&format!("unknown command: {}", command))
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Dependency | ErrorKind::Timeout => {
                        warn!("command '{}' failed: {}", command, e)
                    }
                    ErrorKind::Argument | ErrorKind::Policy => {
                        debug!("command '{}' rejected: {}", command, e)
                    }
                }
                session.send_message(&e.to_string());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cluster::servers::ServerManager,
        config::{CatalogConfig, PresetConfig, SpaceConfig},
        local::manager::LocalServerManager,
    };

    struct Fixture {
        session: ConsoleSession,
        manager: Arc<LocalServerManager>,
        messages: mpsc::UnboundedReceiver<String>,
    }

    fn create_fixture(home: Option<&str>) -> Fixture {
        let manager = Arc::new(LocalServerManager::new(CatalogConfig {
            maps: vec![],
            presets: vec![PresetConfig {
                name: "default".to_string(),
                default: true,
            }],
        }));
        let spaces = Arc::new(LocalSpaceService::new(
            &[SpaceConfig {
                id: "space-1".to_string(),
                alias: Some("lobby".to_string()),
            }],
            manager.clone(),
            Lifetime::new(),
        ));
        let (sender, messages) = mpsc::unbounded_channel();
        let home = home.map(str::to_owned);
        let session = ConsoleSession::new(Lifetime::new(), spaces, home, sender);

        Fixture {
            session,
            manager,
            messages,
        }
    }

    #[test]
    fn test_strip_colours() {
        assert_eq!(strip_colours("\x0c1#join abcd\x0c7 now"), "#join abcd now");
        assert_eq!(strip_colours("plain"), "plain");
    }

    #[tokio::test]
    async fn test_connect_moves_client_count() {
        let fixture = create_fixture(None);
        let lifetime = Lifetime::new();
        let manager = &fixture.manager;
        let session = &fixture.session;
        let first = manager.new_server(&lifetime, "", true).await.unwrap();
        let second = manager.new_server(&lifetime, "", true).await.unwrap();

        let connected = session.connect_to_server(Arc::clone(&first)).unwrap();
        assert_eq!(connected.await, Ok(true));
        assert_eq!(first.num_clients().await, 1);

        let connected = session.connect_to_server(Arc::clone(&second)).unwrap();
        assert_eq!(connected.await, Ok(true));
        assert_eq!(first.num_clients().await, 0);
        assert_eq!(second.num_clients().await, 1);
        assert_eq!(session.server().unwrap().id(), second.id());
        assert!(session.space().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_connects_keep_one_client() {
        let fixture = create_fixture(None);
        let session = Arc::new(fixture.session);
        let lifetime = Lifetime::new();
        let mut servers = vec![];
        for _ in 0..4 {
            let server = fixture.manager.new_server(&lifetime, "", true).await;
            servers.push(server.unwrap());
        }

        for _ in 0..50 {
            let tasks: Vec<_> = servers
                .iter()
                .map(|server| {
                    let session = Arc::clone(&session);
                    let server = Arc::clone(server);
                    tokio::spawn(async move { session.connect_to_server(server).unwrap().await })
                })
                .collect();
            for task in tasks {
                assert_eq!(task.await.unwrap(), Ok(true));
            }

            let mut total = 0;
            for server in &servers {
                total += server.num_clients().await;
            }
            assert_eq!(total, 1);
            assert_eq!(session.server().unwrap().num_clients().await, 1);
        }
    }

    #[tokio::test]
    async fn test_owner_only_inside_space() {
        let fixture = create_fixture(Some("lobby"));
        let lifetime = Lifetime::new();

        assert!(!fixture.session.is_owner(&lifetime).await.unwrap());

        fixture.session.go_home(&lifetime).await;

        assert_eq!(fixture.session.space().unwrap().space.id(), "space-1");
        assert!(fixture.session.is_owner(&lifetime).await.unwrap());
    }

    #[tokio::test]
    async fn test_go_home_without_home() {
        let mut fixture = create_fixture(None);

        fixture.session.go_home(&Lifetime::new()).await;

        assert_eq!(
            fixture.messages.try_recv().unwrap(),
            "you have no home space"
        );
        assert!(fixture.session.server().is_none());
    }

    #[tokio::test]
    async fn test_connect_to_unknown_space() {
        let fixture = create_fixture(None);
        let manager = &fixture.manager;
        let server = manager.new_server(&Lifetime::new(), "", false).await;

        let result = fixture.session.connect_to_space(server.unwrap(), "space-9");

        assert!(result.is_err());
    }
}
