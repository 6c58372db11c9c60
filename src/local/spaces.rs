//! Configured persistent spaces.
//!
//! Spaces are declared in the configuration and reachable by id or alias. A space
//! gets a backing server from the [`ServerManager`] the first time it is started and
//! keeps it while that server runs.

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use log::info;
use tokio::sync::Mutex;

use crate::{
    cluster::{
        servers::ServerManager,
        spaces::{Space, SpaceInstance, SpaceService},
    },
    config::SpaceConfig,
    lifetime::Lifetime,
};

pub struct LocalSpaceService {
    manager: Arc<dyn ServerManager>,
    /// Scope of the backing servers
    lifetime: Lifetime,
    spaces: Vec<(SpaceConfig, Arc<Space>)>,
    instances: Mutex<HashMap<String, SpaceInstance>>,
}

impl LocalSpaceService {
    pub fn new(
        configs: &[SpaceConfig],
        manager: Arc<dyn ServerManager>,
        lifetime: Lifetime,
    ) -> Self {
        let spaces = configs
            .iter()
            .map(|config| (config.clone(), Arc::new(Space::new(&config.id))))
            .collect();

        LocalSpaceService {
            manager,
            lifetime,
            spaces,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the space reachable with `code`, by id or alias.
    pub fn find(&self, code: &str) -> Option<Arc<Space>> {
        self.spaces
            .iter()
            .find(|(config, _)| config.id == code || config.alias.as_deref() == Some(code))
            .map(|(_, space)| Arc::clone(space))
    }
}

#[async_trait]
impl SpaceService for LocalSpaceService {
    async fn search_space(
        &self,
        _lifetime: &Lifetime,
        code: &str,
    ) -> anyhow::Result<Option<Arc<Space>>> {
        Ok(self.find(code))
    }

    async fn start_space(&self, _lifetime: &Lifetime, code: &str) -> anyhow::Result<SpaceInstance> {
        let space = self
            .find(code)
            .with_context(|| format!("no space reachable with {}", code))?;

        // One backing server per space
        let mut instances = self.instances.lock().await;

        if let Some(instance) = instances.get(space.id())
            && instance.server.is_running()
        {
            return Ok(instance.clone());
        }

        let server = self.manager.new_server(&self.lifetime, "", false).await?;
        self.manager.start_and_wait(&server, &self.lifetime).await?;
        info!("space {} started on server {}", space.id(), server.id());

        let instance = SpaceInstance { space, server };
        instances.insert(instance.space.id().to_owned(), instance.clone());

        Ok(instance)
    }
}
