//! Player command parsing and execution.
//!
//! This module turns the text a player types after `#` into cluster operations.
//!
//! # Overview
//!
//! Command processing happens in two steps:
//! 1. **Parsing** - [`Commander::parse`] splits the text into a verb and its arguments
//!    and builds a [`command::Command`]. Unknown verbs are not errors: they are
//!    reported as unhandled so another interpreter can try them.
//! 2. **Execution** - [`Commander::execute`] routes the command to its handler in
//!    `actions`, which talks to the cluster collaborators through a [`CommandContext`].
//!
//! # Architecture
//!
//! ```text
//! "creategame ffa dust"
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← parse() + execute()
//! └─────────────┘
//!      │
//!      ├── parse() ──────────────► Command::CreateGame(["ffa", "dust"])
//!      │
//!      └── execute() ────────────► Action handlers
//!                                   - handle_create_game
//!                                   - handle_edit
//!                                   - handle_join
//!                                   - handle_duel / handle_stop_duel
//!                                   - handle_home
//!                                   - handle_help
//! ```
//!
//! # Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `creategame` | `[mode] [map] [preset]` in any order | Create a private server |
//! | `edit` | None | Toggle open editing in your space |
//! | `join` | `<code>` | Join a server or a space |
//! | `duel` | `[type]` | Queue for a duel |
//! | `stopduel` | None | Leave the duel queue |
//! | `home` | None | Go back to your home space |
//! | `help` | None | Display help information |
//!
//! # Error Handling
//!
//! Failures are reported as [`CommandError`] values whose `Display` is the message
//! shown to the player. Errors from collaborators are logged with their details and
//! replaced with a generic message; nothing is retried.
//!
//! # Module Organization
//!
//! - [`commander`] - Parsing and routing
//! - [`command`] - Command enum and verb parsing
//! - [`params`] - Classification of `creategame` arguments
//! - `actions` - Individual command handlers
//! - [`responses`] - Player facing messages and server directives

use std::{fmt, sync::Arc};

mod actions;
pub mod command;
pub mod commander;
pub mod params;
pub mod responses;

pub use crate::commands::commander::Commander;
use crate::{
    cluster::{Cluster, session::Session},
    lifetime::Lifetime,
};

/// Runtime context for command execution.
///
/// Handlers get everything they need from here: the cluster and its collaborators,
/// the session that issued the command and the scope of the command itself.
pub struct CommandContext<'a> {
    /// Cluster the command runs against
    pub cluster: &'a Cluster,
    /// Session that issued the command
    pub session: Arc<dyn Session>,
    /// Scope of this command, cancelled when it times out
    pub lifetime: Lifetime,
}

/// Outcome of a command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The verb was recognised and the command succeeded, with a response for the player
    Handled(String),
    /// The verb is unknown to the cluster
    Unhandled,
}

/// Category of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unclassifiable input
    Argument,
    /// The request was understood but is not allowed right now
    Policy,
    /// A collaborator failed
    Dependency,
    /// The command did not finish in time
    Timeout,
}

/// Errors a command can end with.
///
/// The `Display` output is what the player sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command text holds no verb
    InvalidCommand,
    /// A `creategame` argument is neither a mode, a map nor a preset
    UnknownArgument(String),
    /// `join` was not given exactly one argument
    JoinArguments,
    /// The origin created a server too recently
    RateLimited,
    /// The session does not own the space it is in
    NotSpaceOwner,
    /// Nothing matches the `join` target
    TargetNotFound(String),
    /// The matchmaking queue refused the duel type
    UnknownDuelType(String),
    /// A collaborator failed; holds the generic message shown to the player
    Dependency(&'static str),
    /// The command ended without producing a result
    Aborted,
    /// The command did not finish before the deadline
    TimedOut,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::InvalidCommand
            | CommandError::UnknownArgument(_)
            | CommandError::JoinArguments
            | CommandError::TargetNotFound(_)
            | CommandError::UnknownDuelType(_) => ErrorKind::Argument,
            CommandError::RateLimited | CommandError::NotSpaceOwner => ErrorKind::Policy,
            CommandError::Dependency(_) | CommandError::Aborted => ErrorKind::Dependency,
            CommandError::TimedOut => ErrorKind::Timeout,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidCommand => write!(f, "invalid command"),
            CommandError::UnknownArgument(argument) => write!(
                f,
                "argument '{}' neither corresponded to a map nor a game mode",
                argument
            ),
            CommandError::JoinArguments => write!(f, "join takes a single argument"),
            CommandError::RateLimited => write!(f, "too soon since last server create"),
            CommandError::NotSpaceOwner => write!(f, "this is not your space"),
            CommandError::TargetNotFound(target) => {
                write!(f, "failed to find server or space matching {}", target)
            }
            CommandError::UnknownDuelType(duel_type) => {
                write!(f, "duel type '{}' does not exist", duel_type)
            }
            CommandError::Dependency(message) => write!(f, "{}", message),
            CommandError::Aborted => write!(f, "command failed"),
            CommandError::TimedOut => write!(f, "command timed out"),
        }
    }
}

impl std::error::Error for CommandError {}
