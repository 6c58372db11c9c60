//! The cluster: shared state and collaborators behind every player command.
//!
//! This module provides the [`Cluster`], which owns the handles on the external
//! subsystems (server manager, spaces, matchmaking), the cluster-wide lifetime and the
//! bookkeeping of which origin created which server and when.
//!
//! # Overview
//!
//! ```text
//! ingress ─► run_command_with_timeout ─► run_command ─► Commander
//!                  │ (deadline)                             │
//!                  ▼                                        ├─► creategame ─► ServerManager
//!             "command timed out"                           ├─► join ──────► ServerManager / SpaceService
//!                                                           ├─► duel ──────► MatchQueue
//!                                                           └─► edit, home, help ─► Session
//! ```
//!
//! # Locking
//!
//! The cooldown and ownership records live together in a [`CreationLedger`] behind a
//! single async mutex, held for the whole of a `creategame` command. Everything else
//! uses per-object locks: each [`GameServer`] guards its own client count and each
//! [`Session`] guards its own current server.
//!
//! # Modules
//!
//! - [`servers`] - Game server instances and the [`ServerManager`] contract
//! - [`spaces`] - Persistent spaces and the [`SpaceService`] contract
//! - [`matches`] - The [`MatchQueue`] contract
//! - [`session`] - The [`Session`] contract
//! - `reminder` - Periodic onboarding reminder for private servers
//! - `timeout` - Deadline-bounded command execution

pub mod matches;
mod reminder;
pub mod servers;
pub mod session;
pub mod spaces;
mod timeout;

use std::{collections::HashMap, sync::Arc, time::Duration};

use log::info;
use tokio::{sync::Mutex, time::Instant};

pub use crate::cluster::reminder::remind_private_match;
use crate::{
    cluster::{
        matches::MatchQueue,
        servers::{GameServer, ServerManager},
        session::Session,
        spaces::SpaceService,
    },
    commands::{CommandContext, CommandError, CommandResult, Commander},
    config::ClusterConfig,
    lifetime::Lifetime,
};

/// Timing policy of the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Minimum delay between two server creations from the same origin
    pub create_cooldown: Duration,
    /// Ceiling on the execution of a single command
    pub command_timeout: Duration,
    /// Period of the private server reminder
    pub reminder_interval: Duration,
    /// How long a new server owner may take to connect before losing master
    pub grant_timeout: Duration,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        ClusterSettings::from(&ClusterConfig::default())
    }
}

impl From<&ClusterConfig> for ClusterSettings {
    fn from(config: &ClusterConfig) -> Self {
        ClusterSettings {
            create_cooldown: Duration::from_secs(config.create_cooldown_secs),
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            reminder_interval: Duration::from_secs(config.reminder_interval_secs),
            grant_timeout: Duration::from_secs(config.grant_timeout_secs),
        }
    }
}

/// Who created which server and when, keyed by origin.
///
/// Both maps are only ever touched together, under the cluster's creation lock.
#[derive(Debug, Default)]
pub struct CreationLedger {
    last_create: HashMap<String, Instant>,
    host_servers: HashMap<String, Arc<GameServer>>,
}

impl CreationLedger {
    /// Returns `true` when `host` created a server less than `cooldown` ago.
    pub fn is_cooling_down(&self, host: &str, cooldown: Duration) -> bool {
        match self.last_create.get(host) {
            Some(last_create) => last_create.elapsed() < cooldown,
            None => false,
        }
    }

    /// Returns the server currently owned by `host`.
    pub fn owned_server(&self, host: &str) -> Option<Arc<GameServer>> {
        self.host_servers.get(host).cloned()
    }

    /// Forgets the creations made `cooldown` or more ago.
    ///
    /// Ownership records stay: they are how a previous server gets removed.
    pub fn forget_expired(&mut self, cooldown: Duration) {
        self.last_create
            .retain(|_, last_create| last_create.elapsed() < cooldown);
    }

    /// Records that `host` just created `server`, replacing its previous server.
    pub fn record(&mut self, host: &str, server: Arc<GameServer>) {
        self.last_create.insert(host.to_owned(), Instant::now());
        self.host_servers.insert(host.to_owned(), server);
    }
}

/// Shared state of the command core.
pub struct Cluster {
    pub(crate) manager: Arc<dyn ServerManager>,
    pub(crate) spaces: Arc<dyn SpaceService>,
    pub(crate) matches: Arc<dyn MatchQueue>,
    pub(crate) settings: ClusterSettings,
    /// Scope of the whole cluster; servers and reminders are bound to it
    pub(crate) lifetime: Lifetime,
    pub(crate) creations: Mutex<CreationLedger>,
    commander: Commander,
}

impl Cluster {
    /// Creates a cluster on top of its collaborators.
    ///
    /// # Arguments
    ///
    /// * `manager` - Owner of the game server processes
    /// * `spaces` - Space storage and search
    /// * `matches` - Duel queue
    /// * `settings` - Cooldown and timeout policy
    /// * `lifetime` - Scope of the cluster; cancelling it stops every background task
    pub fn new(
        manager: Arc<dyn ServerManager>,
        spaces: Arc<dyn SpaceService>,
        matches: Arc<dyn MatchQueue>,
        settings: ClusterSettings,
        lifetime: Lifetime,
    ) -> Self {
        Cluster {
            manager,
            spaces,
            matches,
            settings,
            lifetime,
            creations: Mutex::new(CreationLedger::default()),
            commander: Commander::new(),
        }
    }

    /// Returns the cluster-wide lifetime.
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// Runs a player command without any deadline.
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Scope of this command; collaborators observe it
    /// * `command` - Raw command text, without the leading `#`
    /// * `session` - Session that issued the command
    ///
    /// # Returns
    ///
    /// * `Ok(CommandResult::Handled(_))` - The command was recognised and succeeded
    /// * `Ok(CommandResult::Unhandled)` - Unknown verb, another interpreter may try it
    /// * `Err(CommandError)` - The command was recognised and failed
    pub async fn run_command(
        &self,
        lifetime: &Lifetime,
        command: &str,
        session: Arc<dyn Session>,
    ) -> Result<CommandResult, CommandError> {
        info!("{}: running command '{}'", session.host(), command);

        let command = match self.commander.parse(command)? {
            Some(command) => command,
            None => return Ok(CommandResult::Unhandled),
        };

        let context = CommandContext {
            cluster: self,
            session,
            lifetime: lifetime.clone(),
        };

        let response = self.commander.execute(&command, &context).await?;
        Ok(CommandResult::Handled(response))
    }
}
