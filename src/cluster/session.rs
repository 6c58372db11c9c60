//! Contract of a connected player session.
//!
//! Sessions are created and destroyed by the ingress layer. The cluster only reads
//! them and changes the server they are attached to through the connect operations.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::oneshot;

use crate::{
    cluster::{servers::GameServer, spaces::SpaceInstance},
    lifetime::Lifetime,
};

/// Kind of client behind a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    /// Native desktop client
    Desktop,
    /// Browser client, which can share its URL as an invite
    Web,
}

/// A connected player.
#[automock]
#[async_trait]
pub trait Session: Send + Sync {
    /// Identifier of the session, unique for the process lifetime.
    fn id(&self) -> u32;

    /// Origin of the session, used as the key for rate limiting and ownership.
    fn host(&self) -> String;

    fn client_type(&self) -> ClientType;

    /// Scope that ends when the player disconnects.
    fn lifetime(&self) -> Lifetime;

    /// Server the session is currently attached to, read under the session's lock.
    fn server(&self) -> Option<Arc<GameServer>>;

    /// Space the session is currently in, if any.
    fn space(&self) -> Option<SpaceInstance>;

    /// Checks whether the player owns the space they are currently in.
    async fn is_owner(&self, lifetime: &Lifetime) -> anyhow::Result<bool>;

    /// Starts moving the session to `server`.
    ///
    /// The receiver yields `true` once the client is connected, `false` if the
    /// connection failed.
    fn connect_to_server(
        &self,
        server: Arc<GameServer>,
    ) -> anyhow::Result<oneshot::Receiver<bool>>;

    /// Starts moving the session to the server backing a space.
    ///
    /// `space_id` becomes the room identity of the connection.
    fn connect_to_space(
        &self,
        server: Arc<GameServer>,
        space_id: &str,
    ) -> anyhow::Result<oneshot::Receiver<bool>>;

    /// Sends a server message to the player.
    fn send_message(&self, message: &str);

    /// Client number of the player on its current server.
    fn client_num(&self) -> i32;

    /// Sends the player back to their home space.
    async fn go_home(&self, lifetime: &Lifetime);
}
