//! Player facing messages.
//!
//! Everything the cluster says to a player, or asks a server to say, is formatted
//! here. Highlighted words use the in-game colour escapes.

use crate::cluster::session::ClientType;

/// Wraps `text` in the in-game blue colour, resetting to white afterwards.
///
/// # Examples
///
/// ```
/// # use skirmish::commands::responses::blue;
/// assert_eq!(blue("#join"), "\x0c1#join\x0c7");
/// ```
pub fn blue(text: &str) -> String {
    format!("\x0c1{}\x0c7", text)
}

/// Formats the lines sent to a player asking for help.
///
/// Web clients get an extra hint about inviting players with their URL.
pub fn format_help(client_type: ClientType) -> Vec<String> {
    let mut lines = vec![
        format!("{}: create a private game", blue("#creategame")),
        format!("{}: join a game server by room code", blue("#join [code]")),
        format!("{}: queue for a duel", blue("#duel")),
        format!("{}: leave the duel queue", blue("#stopduel")),
    ];

    if client_type == ClientType::Web {
        let invite = "you can also invite players by sharing the link in your URL bar";
        lines.push(invite.to_owned());
    }

    lines
}

/// Formats the reminder sent to the owner of an empty private server.
///
/// # Examples
///
/// ```
/// # use skirmish::commands::responses::format_private_server_reminder;
/// # use skirmish::cluster::session::ClientType;
/// let message = format_private_server_reminder("abcd", ClientType::Desktop);
/// assert!(message.contains("#join abcd"));
/// ```
pub fn format_private_server_reminder(reference: &str, client_type: ClientType) -> String {
    match client_type {
        ClientType::Desktop => format!(
            "This is your private server. Have other players join by saying '#join {}' in any server.",
            reference
        ),
        ClientType::Web => format!(
            "This is your private server. Have other players join by saying '#join {}' in any server or by sending the link in your URL bar. (We also copied it for you!)",
            reference
        ),
    }
}

/// Formats the announcement made when a space owner toggles open editing.
pub fn format_editing_announcement(open_edit: bool) -> String {
    match open_edit {
        true => "editing is now enabled".to_owned(),
        false => "editing is now disabled".to_owned(),
    }
}

/// Directive applying both a map and a game mode.
pub fn format_change_map(map: &str, mode: usize) -> String {
    format!("changemap {} {}", map, mode)
}

/// Directive applying a game mode on the current map.
pub fn format_set_mode(mode: usize) -> String {
    format!("setmode {}", mode)
}

/// Directive applying a map in the current game mode.
pub fn format_set_map(map: &str) -> String {
    format!("setmap {}", map)
}

/// Directive giving master privileges to a client.
pub fn format_grant_master(client_num: i32) -> String {
    format!("grantmaster {}", client_num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blue() {
        assert_eq!(blue("#duel"), "\x0c1#duel\x0c7");
    }

    #[test]
    fn test_format_help_desktop() {
        let lines = format_help(ClientType::Desktop);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("#creategame"));
        assert!(lines[1].contains("#join [code]"));
        assert!(lines[2].contains("#duel"));
        assert!(lines[3].contains("#stopduel"));
    }

    #[test]
    fn test_format_help_web_has_url_hint() {
        let lines = format_help(ClientType::Web);
        assert_eq!(lines.len(), 5);
        assert!(lines[4].contains("URL bar"));
    }

    #[test]
    fn test_format_private_server_reminder() {
        assert_eq!(
            format_private_server_reminder("abcd", ClientType::Desktop),
            "This is your private server. Have other players join by saying '#join abcd' in any server."
        );
        let reminder = format_private_server_reminder("abcd", ClientType::Web);
        assert!(reminder.contains("URL bar"));
    }

    #[test]
    fn test_format_editing_announcement() {
        assert_eq!(format_editing_announcement(true), "editing is now enabled");
        assert_eq!(
            format_editing_announcement(false),
            "editing is now disabled"
        );
    }

    #[test]
    fn test_directives() {
        assert_eq!(format_change_map("dust", 0), "changemap dust 0");
        assert_eq!(format_set_mode(11), "setmode 11");
        assert_eq!(format_set_map("dust"), "setmap dust");
        assert_eq!(format_grant_master(3), "grantmaster 3");
    }
}
