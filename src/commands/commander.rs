//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which parses command text and
//! routes parsed commands to their handlers.
//!
//! # Flow
//!
//! ```text
//! "join abcd" → parse() → Command::Join("abcd") → execute() → handle_join → response
//! ```

use log::debug;

use crate::commands::{
    CommandContext, CommandError,
    actions::{
        handle_create_game, handle_duel, handle_edit, handle_help, handle_home, handle_join,
        handle_stop_duel,
    },
    command::Command,
};

/// Command orchestrator for parsing and executing player commands.
///
/// The Commander is stateless; everything a command needs comes from the
/// [`CommandContext`] it is executed with.
///
/// # Supported Commands
///
/// - `creategame [args...]` - Create a private server
/// - `edit` - Toggle open editing in the current space
/// - `join <code>` - Join a server or a space
/// - `duel [type]` - Queue for a duel
/// - `stopduel` - Leave the duel queue
/// - `home` - Go back to the home space
/// - `help` - Display help information
#[derive(Debug, Default)]
pub struct Commander;

impl Commander {
    /// Creates a new Commander.
    pub fn new() -> Self {
        Commander
    }

    /// Parses command text into a structured command.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Command))` - The command is for the cluster
    /// * `Ok(None)` - Unknown verb; the command should be left to other interpreters
    /// * `Err(CommandError)` - The text is empty or the arguments are malformed
    ///
    /// # Examples
    ///
    /// ```
    /// # use skirmish::commands::Commander;
    /// let commander = Commander::new();
    ///
    /// assert!(commander.parse("help").unwrap().is_some());
    /// assert!(commander.parse("dance").unwrap().is_none());
    /// assert!(commander.parse("").is_err());
    /// ```
    pub fn parse(&self, body: &str) -> Result<Option<Command>, CommandError> {
        Command::parse(body)
    }

    /// Executes a parsed command.
    ///
    /// # Command Handlers
    ///
    /// - [`Command::CreateGame`] → `handle_create_game`
    /// - [`Command::Edit`] → `handle_edit`
    /// - [`Command::Join`] → `handle_join`
    /// - [`Command::Duel`] → `handle_duel`
    /// - [`Command::StopDuel`] → `handle_stop_duel`
    /// - [`Command::Home`] → `handle_home`
    /// - [`Command::Help`] → `handle_help`
    ///
    /// # Returns
    ///
    /// The response to show the player, or the error the command ended with.
    pub async fn execute(
        &self,
        command: &Command,
        context: &CommandContext<'_>,
    ) -> Result<String, CommandError> {
        debug!("executing {:?}", command);

        match command {
            Command::CreateGame(args) => handle_create_game(context, args).await,
            Command::Edit => handle_edit(context).await,
            Command::Join(target) => handle_join(context, target).await,
            Command::Duel(duel_type) => handle_duel(context, duel_type),
            Command::StopDuel => handle_stop_duel(context),
            Command::Home => handle_home(context).await,
            Command::Help => handle_help(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        cluster::{
            Cluster, ClusterSettings,
            matches::MockMatchQueue,
            servers::MockServerManager,
            session::{ClientType, MockSession},
            spaces::MockSpaceService,
        },
        commands::CommandResult,
        lifetime::Lifetime,
    };

    fn create_cluster(matches: MockMatchQueue) -> Cluster {
        Cluster::new(
            Arc::new(MockServerManager::new()),
            Arc::new(MockSpaceService::new()),
            Arc::new(matches),
            ClusterSettings::default(),
            Lifetime::new(),
        )
    }

    fn create_session() -> MockSession {
        let mut session = MockSession::new();
        session.expect_id().return_const(7u32);
        session.expect_host().returning(|| "10.0.0.1".to_string());
        session
            .expect_client_type()
            .return_const(ClientType::Desktop);
        session
    }

    #[test]
    fn test_parse_known_verb() {
        let commander = Commander::new();
        assert_eq!(commander.parse("stopduel"), Ok(Some(Command::StopDuel)));
    }

    #[test]
    fn test_parse_unknown_verb() {
        let commander = Commander::new();
        assert_eq!(commander.parse("kick 3"), Ok(None));
    }

    #[tokio::test]
    async fn test_run_command_unknown_verb_is_unhandled() {
        let cluster = create_cluster(MockMatchQueue::new());
        let session = create_session();

        let result = cluster
            .run_command(&Lifetime::new(), "kick 3", Arc::new(session))
            .await;

        assert_eq!(result, Ok(CommandResult::Unhandled));
    }

    #[tokio::test]
    async fn test_run_command_empty_is_error() {
        let cluster = create_cluster(MockMatchQueue::new());
        let session = create_session();

        let result = cluster
            .run_command(&Lifetime::new(), "", Arc::new(session))
            .await;

        assert_eq!(result, Err(CommandError::InvalidCommand));
    }

    #[tokio::test]
    async fn test_run_command_routes_duel() {
        let mut matches = MockMatchQueue::new();
        matches
            .expect_queue()
            .withf(|session_id, duel_type| *session_id == 7 && duel_type == "insta")
            .times(1)
            .returning(|_, _| Ok(()));
        let cluster = create_cluster(matches);
        let session = create_session();

        let result = cluster
            .run_command(&Lifetime::new(), "duel insta", Arc::new(session))
            .await;

        assert!(matches!(result, Ok(CommandResult::Handled(_))));
    }

    #[tokio::test]
    async fn test_run_command_routes_help() {
        let cluster = create_cluster(MockMatchQueue::new());
        let mut session = create_session();
        session.expect_send_message().times(4).return_const(());

        let result = cluster
            .run_command(&Lifetime::new(), "help", Arc::new(session))
            .await;

        assert!(matches!(result, Ok(CommandResult::Handled(_))));
    }

    #[tokio::test]
    async fn test_run_command_join_argument_count() {
        let cluster = create_cluster(MockMatchQueue::new());
        let session = create_session();

        let result = cluster
            .run_command(&Lifetime::new(), "join", Arc::new(session))
            .await;

        assert_eq!(result, Err(CommandError::JoinArguments));
    }
}
