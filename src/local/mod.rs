//! In-process collaborators for running the cluster from a terminal.
//!
//! - [`manager`] - Server registry whose servers log the directives they receive
//! - [`spaces`] - Spaces declared in the configuration
//! - [`queue`] - Duel queue pairing players of the same type
//! - [`console`] - The operator as a player, reading commands on stdin

pub mod console;
pub mod manager;
pub mod queue;
pub mod spaces;
