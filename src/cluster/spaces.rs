//! Persistent spaces and the contract of the subsystem that stores them.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use mockall::automock;

use crate::{cluster::servers::GameServer, lifetime::Lifetime};

/// A persistent, named room that players can join by code.
#[derive(Debug)]
pub struct Space {
    id: String,
    /// Whether every occupant may edit the map, not only the owner
    open_edit: AtomicBool,
}

impl Space {
    pub fn new(id: &str) -> Self {
        Space {
            id: id.to_owned(),
            open_edit: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_open_edit(&self) -> bool {
        self.open_edit.load(Ordering::SeqCst)
    }

    pub fn set_open_edit(&self, open_edit: bool) {
        self.open_edit.store(open_edit, Ordering::SeqCst);
    }
}

/// A started space together with the server backing it.
#[derive(Debug, Clone)]
pub struct SpaceInstance {
    pub space: Arc<Space>,
    pub server: Arc<GameServer>,
}

/// Contract of the space storage and search subsystem.
#[automock]
#[async_trait]
pub trait SpaceService: Send + Sync {
    /// Looks up the space reachable with `code`.
    async fn search_space(
        &self,
        lifetime: &Lifetime,
        code: &str,
    ) -> anyhow::Result<Option<Arc<Space>>>;

    /// Makes sure the space reachable with `code` has a running instance.
    ///
    /// Starting an already running space returns the existing instance.
    async fn start_space(&self, lifetime: &Lifetime, code: &str) -> anyhow::Result<SpaceInstance>;
}
