//! Configuration file structures for the skirmish cluster.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `SKIRMISH_`. Nested keys are separated with `__`, so
//! `SKIRMISH_CLUSTER__CREATE_COOLDOWN_SECS=30` sets `cluster.create_cooldown_secs`.
//!
//! Every field has a default, so any section may be left out.
//!
//! # Configuration File Format
//!
//! ```yaml
//! cluster:
//!   # Minimum delay between two servers created from the same address
//!   create_cooldown_secs: 10
//!   # Ceiling on the execution of a single command
//!   command_timeout_secs: 10
//!   # Period of the reminder sent to owners of empty private servers
//!   reminder_interval_secs: 30
//!   # How long a new server owner may take to connect and still get master
//!   grant_timeout_secs: 10
//!
//! catalog:
//!   maps: ["complex", "dust2", "turbine"]
//!   presets:
//!     - name: "default"
//!       default: true
//!     - name: "competitive"
//!
//! spaces:
//!   - id: "space-1"
//!     alias: "lobby"
//!
//! # The first duel type is used when a player does not name one
//! duels: ["ffa", "insta"]
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timing policy of the command core
    pub cluster: ClusterConfig,
    /// Maps and presets servers can be created from
    pub catalog: CatalogConfig,
    /// Persistent spaces players can join
    pub spaces: Vec<SpaceConfig>,
    /// Known duel types
    pub duels: Vec<String>,
}

impl Config {
    /// Loads the configuration from the YAML file at `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns the figment error when the file is malformed or a value has the wrong
    /// type. A missing file is not an error; the defaults and environment apply.
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        Figment::from(Yaml::file(path))
            .merge(Env::prefixed("SKIRMISH_").split("__"))
            .extract()
    }
}

/// Timing policy, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub create_cooldown_secs: u64,
    pub command_timeout_secs: u64,
    pub reminder_interval_secs: u64,
    pub grant_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            create_cooldown_secs: 10,
            command_timeout_secs: 10,
            reminder_interval_secs: 30,
            grant_timeout_secs: 10,
        }
    }
}

/// Maps and presets known to the server manager.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub maps: Vec<String>,
    pub presets: Vec<PresetConfig>,
}

/// A server preset.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetConfig {
    pub name: String,
    /// Used when a server is created without naming a preset
    #[serde(default)]
    pub default: bool,
}

/// A persistent space.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceConfig {
    pub id: String,
    /// Short code players can use instead of the id
    #[serde(default)]
    pub alias: Option<String>,
}
