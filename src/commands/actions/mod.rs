//! Command action handlers.
//!
//! Individual handler functions for each player command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext), performs the command against
//! the cluster collaborators and returns the response for the player or a
//! [`CommandError`](crate::commands::CommandError).
//!
//! # Available Handlers
//!
//! - [`handle_create_game`] - Provision a private server
//! - [`handle_edit`] - Toggle open editing in the session's space
//! - [`handle_join`] - Move the session to a server or a space
//! - [`handle_duel`] / [`handle_stop_duel`] - Matchmaking queue pass-through
//! - [`handle_home`] - Send the session back home
//! - [`handle_help`] - Display help information

mod create_game;
mod duel;
mod edit;
mod help;
mod home;
mod join;

pub use crate::commands::actions::{
    create_game::handle_create_game,
    duel::{handle_duel, handle_stop_duel},
    edit::handle_edit,
    help::handle_help,
    home::handle_home,
    join::handle_join,
};
