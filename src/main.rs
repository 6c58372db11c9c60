//! Skirmish - command and provisioning core of a multiplayer game cluster.
//!
//! Players type commands in chat, prefixed with `#`. This crate interprets them:
//! it provisions private servers on demand, moves players between servers and
//! persistent spaces, forwards duel requests to matchmaking and runs the background
//! tasks that follow a server creation.
//!
//! # Overview
//!
//! Every command goes through [`Cluster::run_command_with_timeout`], which bounds its
//! execution with the configured deadline and routes it to a handler. The handlers
//! talk to the rest of the cluster through four contracts:
//!
//! - [`ServerManager`](cluster::servers::ServerManager) - creates, starts and removes game servers
//! - [`SpaceService`](cluster::spaces::SpaceService) - looks up and starts persistent spaces
//! - [`MatchQueue`](cluster::matches::MatchQueue) - duel matchmaking
//! - [`Session`](cluster::session::Session) - the connected player
//!
//! This binary wires them to in-process implementations and lets the operator play
//! from the terminal.
//!
//! # Configuration
//!
//! ```yaml
//! cluster:
//!   create_cooldown_secs: 10
//!   command_timeout_secs: 10
//!   reminder_interval_secs: 30
//!   grant_timeout_secs: 10
//!
//! catalog:
//!   maps: ["complex", "dust2"]
//!   presets:
//!     - name: "default"
//!       default: true
//!
//! spaces:
//!   - id: "space-1"
//!     alias: "lobby"
//!
//! duels: ["ffa", "insta"]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `SKIRMISH_` prefix:
//!
//! ```bash
//! export SKIRMISH_CLUSTER__CREATE_COOLDOWN_SECS=60
//! ```
//!
//! # Usage
//!
//! ```bash
//! skirmish --config config.yaml
//! ```
//!
//! Then type commands, with or without the leading `#`:
//!
//! ```text
//! #creategame ctf dust2
//! #join lobby
//! #duel insta
//! ```
//!
//! # Architecture
//!
//! - [`cluster`] - Shared state, collaborator contracts and background tasks
//! - [`commands`] - Command parsing, argument classification and handlers
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`lifetime`] - Cancellation scopes
//! - [`local`] - In-process collaborators and the console player
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//!   - Set to `debug` for verbose output
//!   - Set to `warn` or `error` for minimal logging

use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use tokio::{signal, sync::mpsc};

use crate::{
    cluster::{Cluster, ClusterSettings, session::Session},
    config::Config,
    lifetime::Lifetime,
    local::{
        console::{ConsoleSession, print_messages, run_console},
        manager::LocalServerManager,
        queue::LocalMatchQueue,
        spaces::LocalSpaceService,
    },
};

mod cluster;
mod commands;
mod config;
mod lifetime;
mod local;

/// Command-line arguments.
///
/// # Examples
///
/// ```bash
/// skirmish --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// See the [`config`] module for the expected format. A missing file leaves every
    /// setting at its default.
    #[arg(short, long)]
    config: String,
}

/// Main entry point.
///
/// 1. **Logging Setup**: `info` level by default, overridden with `RUST_LOG`
/// 2. **Argument Parsing**: `clap`
/// 3. **Configuration Loading**: YAML file plus `SKIRMISH_` environment overrides
/// 4. **Wiring**: in-process collaborators around a [`Cluster`]
/// 5. **Console**: commands are read on stdin until it closes or Ctrl-C is pressed
///
/// Leaving cancels the cluster lifetime, which stops every background task.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting skirmish {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let lifetime = Lifetime::new();

    let manager = Arc::new(LocalServerManager::new(config.catalog.clone()));
    let spaces = Arc::new(LocalSpaceService::new(
        &config.spaces,
        manager.clone(),
        lifetime.clone(),
    ));
    let matches = Arc::new(LocalMatchQueue::new(config.duels.clone()));

    let cluster = Arc::new(Cluster::new(
        manager,
        spaces.clone(),
        matches,
        ClusterSettings::from(&config.cluster),
        lifetime.clone(),
    ));

    let (sender, receiver) = mpsc::unbounded_channel();
    let home = config.spaces.first().map(|space| space.id.clone());
    let session = Arc::new(ConsoleSession::new(lifetime.child(), spaces, home, sender));
    tokio::spawn(print_messages(receiver));

    session.go_home(&session.lifetime()).await;

    tokio::select! {
        result = run_console(Arc::clone(&cluster), session) => {
            if let Err(e) = result {
                error!("Console stopped: {:?}", e);
            }
        }
        _ = signal::ctrl_c() => info!("Interrupted"),
    }

    info!("Shutting down");
    cluster.lifetime().cancel();
}
