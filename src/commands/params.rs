//! Classification of `creategame` arguments.
//!
//! Every argument must be a game mode, a map or a preset. Categories are tried in
//! that order, so a word that is both a map and a preset is a map. When several
//! arguments fall in the same category, the first one is kept.

use log::debug;

use crate::{cluster::servers::ServerManager, commands::CommandError};

/// Known game modes. A mode is identified by its position in this list.
pub const MODE_NAMES: [&str; 23] = [
    "ffa",
    "coop",
    "teamplay",
    "insta",
    "instateam",
    "effic",
    "efficteam",
    "tac",
    "tacteam",
    "capture",
    "regencapture",
    "ctf",
    "instactf",
    "protect",
    "instaprotect",
    "hold",
    "instahold",
    "efficctf",
    "efficprotect",
    "effichold",
    "collect",
    "instacollect",
    "efficcollect",
];

/// Returns the number of the game mode called `name`.
///
/// # Examples
///
/// ```
/// # use skirmish::commands::params::get_mode_number;
/// assert_eq!(get_mode_number("ffa"), Some(0));
/// assert_eq!(get_mode_number("ctf"), Some(11));
/// assert_eq!(get_mode_number("dust"), None);
/// ```
pub fn get_mode_number(name: &str) -> Option<usize> {
    MODE_NAMES.iter().position(|mode| *mode == name)
}

/// Parameters of a server creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateParams {
    /// Map to load
    pub map: Option<String>,
    /// Canonical name of the preset to create the server from
    pub preset: Option<String>,
    /// Game mode number, see [`MODE_NAMES`]
    pub mode: Option<usize>,
}

/// Sorts `args` into modes, maps and presets.
///
/// # Arguments
///
/// * `manager` - Resolves map and preset names
/// * `args` - Arguments of the `creategame` command, in order
///
/// # Errors
///
/// Returns [`CommandError::UnknownArgument`] naming the first argument that is
/// neither a mode, a map nor a preset.
pub fn infer_create_params(
    manager: &dyn ServerManager,
    args: &[String],
) -> Result<CreateParams, CommandError> {
    let mut params = CreateParams::default();

    for arg in args {
        if let Some(mode) = get_mode_number(arg) {
            params.mode.get_or_insert(mode);
            continue;
        }

        if let Some(map) = manager.find_map(arg) {
            params.map.get_or_insert(map);
            continue;
        }

        if let Some(preset) = manager.find_preset(arg, false) {
            params.preset.get_or_insert(preset.name);
            continue;
        }

        debug!("unclassifiable creategame argument: {}", arg);
        return Err(CommandError::UnknownArgument(arg.clone()));
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::servers::{MockServerManager, Preset};

    /// Manager knowing the maps `dust` and `complex` and the presets `competitive`
    /// and `complex`.
    fn create_manager() -> MockServerManager {
        let mut manager = MockServerManager::new();
        manager.expect_find_map().returning(|name| match name {
            "dust" | "complex" => Some(name.to_string()),
            _ => None,
        });
        manager
            .expect_find_preset()
            .returning(|name, _| match name {
                "competitive" | "complex" => Some(Preset {
                    name: name.to_string(),
                    default: false,
                }),
                _ => None,
            });
        manager
    }

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_get_mode_number() {
        assert_eq!(get_mode_number("ffa"), Some(0));
        assert_eq!(get_mode_number("insta"), Some(3));
        assert_eq!(get_mode_number("efficcollect"), Some(22));
        assert_eq!(get_mode_number("FFA"), None);
        assert_eq!(get_mode_number(""), None);
    }

    #[test]
    fn test_no_args() {
        let manager = create_manager();
        let params = infer_create_params(&manager, &[]).unwrap();
        assert_eq!(params, CreateParams::default());
    }

    #[test]
    fn test_mode_and_map() {
        let manager = create_manager();
        let params = infer_create_params(&manager, &args(&["ffa", "dust"])).unwrap();

        assert_eq!(params.mode, Some(0));
        assert_eq!(params.map, Some("dust".to_string()));
        assert_eq!(params.preset, None);
    }

    #[test]
    fn test_order_does_not_matter() {
        let manager = create_manager();
        let params = infer_create_params(&manager, &args(&["dust", "competitive", "ctf"])).unwrap();

        assert_eq!(params.mode, Some(11));
        assert_eq!(params.map, Some("dust".to_string()));
        assert_eq!(params.preset, Some("competitive".to_string()));
    }

    #[test]
    fn test_map_wins_over_preset() {
        let manager = create_manager();
        let params = infer_create_params(&manager, &args(&["complex"])).unwrap();

        assert_eq!(params.map, Some("complex".to_string()));
        assert_eq!(params.preset, None);
    }

    #[test]
    fn test_first_match_per_kind_wins() {
        let manager = create_manager();
        let params = infer_create_params(&manager, &args(&["insta", "ffa", "dust", "complex"]))
            .unwrap();

        assert_eq!(params.mode, Some(3));
        assert_eq!(params.map, Some("dust".to_string()));
    }

    #[test]
    fn test_unknown_argument_is_named() {
        let manager = create_manager();
        let result = infer_create_params(&manager, &args(&["ffa", "xyz123", "dust"]));

        assert_eq!(
            result,
            Err(CommandError::UnknownArgument("xyz123".to_string()))
        );
    }

    #[test]
    fn test_mode_names_never_reach_manager() {
        let mut manager = MockServerManager::new();
        manager.expect_find_map().never();
        manager.expect_find_preset().never();

        let params = infer_create_params(&manager, &args(&["tac"])).unwrap();
        assert_eq!(params.mode, Some(7));
    }

    #[test]
    fn test_presets_are_not_exact() {
        let mut manager = MockServerManager::new();
        manager.expect_find_map().returning(|_| None);
        manager
            .expect_find_preset()
            .withf(|name, exact| name == "comp" && !*exact)
            .times(1)
            .returning(|_, _| {
                Some(Preset {
                    name: "competitive".to_string(),
                    default: false,
                })
            });

        let params = infer_create_params(&manager, &args(&["comp"])).unwrap();
        assert_eq!(params.preset, Some("competitive".to_string()));
    }
}
