//! Game server instances and the contract of the manager that owns them.
//!
//! The cluster never runs game servers itself. It asks a [`ServerManager`] for
//! instances, talks to them through their directive channel and reads the client
//! count the manager keeps up to date.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use log::warn;
use mockall::automock;
use tokio::sync::{Mutex, mpsc};

use crate::lifetime::Lifetime;

/// A game server instance known to the cluster.
///
/// The process behind it is owned by the [`ServerManager`]; this value carries the
/// state the command core needs: how to reference the server, whether it is running,
/// how many clients it holds and where to send directives.
#[derive(Debug)]
pub struct GameServer {
    /// Stable identifier, also used as the join code
    id: String,
    /// Optional human friendly name that can be used instead of the id
    alias: Option<String>,
    running: AtomicBool,
    /// Guarded by the server's own lock, independent of any cluster-wide lock
    num_clients: Mutex<u32>,
    /// Directives consumed by the process owner
    commands: mpsc::UnboundedSender<String>,
}

impl GameServer {
    /// Creates a stopped server with no clients.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of the instance, used as its join code
    /// * `commands` - Sender half of the channel the process owner reads directives from
    pub fn new(id: &str, commands: mpsc::UnboundedSender<String>) -> Self {
        GameServer {
            id: id.to_owned(),
            alias: None,
            running: AtomicBool::new(false),
            num_clients: Mutex::new(0),
            commands,
        }
    }

    /// Sets an alias that [`GameServer::is_reference`] accepts as well as the id.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_owned());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name players should use to reach this server.
    ///
    /// The alias when there is one, otherwise the id.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.id)
    }

    /// Returns `true` when `reference` names this server, by id or by alias.
    pub fn is_reference(&self, reference: &str) -> bool {
        self.id == reference || self.alias.as_deref() == Some(reference)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Reads the number of connected clients under the server's lock.
    pub async fn num_clients(&self) -> u32 {
        *self.num_clients.lock().await
    }

    /// Updates the number of connected clients under the server's lock.
    pub async fn set_num_clients(&self, num_clients: u32) {
        *self.num_clients.lock().await = num_clients;
    }

    /// Replaces the number of connected clients with `update(current)` and returns it.
    ///
    /// The read and the write happen under one hold of the server's lock.
    pub async fn update_num_clients(&self, update: impl FnOnce(u32) -> u32) -> u32 {
        let mut num_clients = self.num_clients.lock().await;
        *num_clients = update(*num_clients);
        *num_clients
    }

    /// Sends a directive to the server process.
    ///
    /// Directives sent after the process owner stopped listening are dropped with a
    /// warning.
    pub fn send_command(&self, command: &str) {
        if self.commands.send(command.to_owned()).is_err() {
            warn!("server {} is not listening, dropped '{}'", self.id, command);
        }
    }
}

/// A named server configuration known to the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Canonical preset name
    pub name: String,
    /// Whether this preset is used when no preset is requested
    pub default: bool,
}

/// Contract of the subsystem that owns game server processes.
///
/// Besides the server lifecycle, the manager resolves map and preset names for the
/// argument classifier and relays announcements to the occupants of a server.
#[automock]
#[async_trait]
pub trait ServerManager: Send + Sync {
    /// Returns the canonical map name matching `name`, if the map exists.
    fn find_map(&self, name: &str) -> Option<String>;

    /// Returns the preset matching `name`.
    ///
    /// With `exact` unset, implementations may accept prefixes of preset names.
    fn find_preset(&self, name: &str, exact: bool) -> Option<Preset>;

    /// Creates a new server from `preset` and registers it.
    ///
    /// An empty preset selects the manager's default. The server is bound to
    /// `lifetime` and must be torn down when it ends.
    async fn new_server(
        &self,
        lifetime: &Lifetime,
        preset: &str,
        ephemeral: bool,
    ) -> anyhow::Result<Arc<GameServer>>;

    /// Starts `server` and waits until it accepts directives and connections.
    ///
    /// Implementations bound the wait with their own readiness timeout.
    async fn start_and_wait(
        &self,
        server: &Arc<GameServer>,
        lifetime: &Lifetime,
    ) -> anyhow::Result<()>;

    /// Stops `server` and removes it from the registry.
    async fn remove_server(&self, server: &Arc<GameServer>);

    /// Returns a snapshot of the registered servers.
    fn servers(&self) -> Vec<Arc<GameServer>>;

    /// Sends `message` to every client connected to `server`.
    fn announce(&self, server: &Arc<GameServer>, message: &str);
}
