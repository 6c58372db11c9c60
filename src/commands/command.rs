//! Command parsing.
//!
//! This module converts the text of a player command into a structured [`Command`].
//! Arguments are separated by whitespace; there is no quoting or escaping.

use log::debug;

use crate::commands::CommandError;

/// A parsed player command.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Command {
    /// Create a private server
    ///
    /// # Fields
    ///
    /// * `Vec<String>` - Unclassified mode, map and preset arguments
    CreateGame(Vec<String>),
    /// Toggle open editing in the current space
    Edit,
    /// Join a server or a space
    ///
    /// # Fields
    ///
    /// * `String` - Server reference or space code
    Join(String),
    /// Queue for a duel
    ///
    /// # Fields
    ///
    /// * `String` - Duel type, empty for the default queue
    Duel(String),
    /// Leave the duel queue
    StopDuel,
    /// Go back to the home space
    Home,
    /// Display help information
    Help,
}

impl Command {
    /// Parses the text of a command.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Command))` - The verb is known and its arguments are well formed
    /// * `Ok(None)` - The verb is unknown to the cluster
    /// * `Err(CommandError::InvalidCommand)` - The text holds no verb at all
    /// * `Err(CommandError::JoinArguments)` - `join` without exactly one argument
    ///
    /// # Examples
    ///
    /// ```
    /// # use skirmish::commands::command::Command;
    /// let command = Command::parse("join abcd").unwrap();
    /// assert_eq!(command, Some(Command::Join("abcd".to_string())));
    /// ```
    pub fn parse(body: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = body.split_whitespace();

        let verb = match tokens.next() {
            Some(verb) => verb,
            None => return Err(CommandError::InvalidCommand),
        };
        let args: Vec<String> = tokens.map(str::to_owned).collect();

        debug!("parsing command: verb={} args={:?}", verb, args);

        let command = match verb {
            "creategame" => Command::CreateGame(args),
            "edit" => Command::Edit,
            "join" => Command::Join(Self::parse_join(args)?),
            "duel" => Command::Duel(args.into_iter().next().unwrap_or_default()),
            "stopduel" => Command::StopDuel,
            "home" => Command::Home,
            "help" => Command::Help,
            _ => return Ok(None),
        };

        Ok(Some(command))
    }

    fn parse_join(args: Vec<String>) -> Result<String, CommandError> {
        // Exactly one argument: the target
        match <[String; 1]>::try_from(args) {
            Ok([target]) => Ok(target),
            Err(_) => Err(CommandError::JoinArguments),
        }
    }
}
