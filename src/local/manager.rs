//! In-process server manager.
//!
//! Servers managed here have no game process behind them: each one is a task that
//! logs the directives it receives until the server is removed or its lifetime ends.
//! Maps and presets come from the configured catalog.

use std::{
    collections::HashMap,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::bail;
use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::mpsc;

use crate::{
    cluster::servers::{GameServer, Preset, ServerManager},
    config::CatalogConfig,
    lifetime::Lifetime,
};

/// Registry of in-process servers.
pub struct LocalServerManager {
    catalog: CatalogConfig,
    servers: RwLock<HashMap<String, Arc<GameServer>>>,
    next_id: AtomicU64,
}

impl LocalServerManager {
    pub fn new(catalog: CatalogConfig) -> Self {
        LocalServerManager {
            catalog,
            servers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the preset used when none is named.
    ///
    /// The first preset flagged as default, or the first preset of the catalog.
    fn default_preset(&self) -> Option<Preset> {
        let presets = &self.catalog.presets;
        presets
            .iter()
            .find(|preset| preset.default)
            .or_else(|| presets.first())
            .map(|preset| Preset {
                name: preset.name.clone(),
                default: preset.default,
            })
    }
}

#[async_trait]
impl ServerManager for LocalServerManager {
    fn find_map(&self, name: &str) -> Option<String> {
        self.catalog.maps.iter().find(|map| *map == name).cloned()
    }

    fn find_preset(&self, name: &str, exact: bool) -> Option<Preset> {
        let presets = &self.catalog.presets;

        let exact_match = presets.iter().find(|preset| preset.name == name);
        let preset = match exact_match {
            Some(preset) => preset,
            None if exact || name.is_empty() => return None,
            None => presets
                .iter()
                .find(|preset| preset.name.starts_with(name))?,
        };

        Some(Preset {
            name: preset.name.clone(),
            default: preset.default,
        })
    }

    async fn new_server(
        &self,
        lifetime: &Lifetime,
        preset: &str,
        ephemeral: bool,
    ) -> anyhow::Result<Arc<GameServer>> {
        let preset = match preset {
            "" => self.default_preset(),
            name => self.find_preset(name, true),
        };
        let Some(preset) = preset else {
            bail!("no such preset");
        };

        let id = format!("{:04x}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();
        let server = Arc::new(GameServer::new(&id, sender));

        info!(
            "created server {} from preset {} (ephemeral: {})",
            id, preset.name, ephemeral
        );

        tokio::spawn(log_directives(id.clone(), receiver, lifetime.clone()));

        self.servers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&server));

        Ok(server)
    }

    async fn start_and_wait(
        &self,
        server: &Arc<GameServer>,
        lifetime: &Lifetime,
    ) -> anyhow::Result<()> {
        if lifetime.is_cancelled() {
            bail!("server {} was shut down before starting", server.id());
        }

        server.set_running(true);
        debug!("server {} is running", server.id());
        Ok(())
    }

    async fn remove_server(&self, server: &Arc<GameServer>) {
        server.set_running(false);
        let removed = self
            .servers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(server.id());

        if removed.is_some() {
            info!("removed server {}", server.id());
        }
    }

    fn servers(&self) -> Vec<Arc<GameServer>> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn announce(&self, server: &Arc<GameServer>, message: &str) {
        info!("[{}] announce: {}", server.reference(), message);
    }
}

/// Logs the directives sent to server `id` until every sender is gone or `lifetime`
/// ends.
async fn log_directives(
    id: String,
    mut receiver: mpsc::UnboundedReceiver<String>,
    lifetime: Lifetime,
) {
    loop {
        tokio::select! {
            directive = receiver.recv() => match directive {
                Some(directive) => info!("[{}] {}", id, directive),
                None => break,
            },
            _ = lifetime.cancelled() => break,
        }
    }

    debug!("server {} stopped", id);
}
