//! Server dependencies for domain operations (using traits for testability)
//!
//! This is the only handle matching code gets on storage. Production wires
//! the Postgres adapters; tests wire `test_dependencies`.

use sqlx::PgPool;
use std::sync::Arc;

use super::postgres::{PgConversationBridge, PgDirectory, PgMatchRepository};
use super::{BaseConversationBridge, BaseDirectory, BaseMatchRepository};

#[derive(Clone)]
pub struct ServerDeps {
    pub directory: Arc<dyn BaseDirectory>,
    pub matches: Arc<dyn BaseMatchRepository>,
    pub conversations: Arc<dyn BaseConversationBridge>,
}

impl ServerDeps {
    pub fn new(
        directory: Arc<dyn BaseDirectory>,
        matches: Arc<dyn BaseMatchRepository>,
        conversations: Arc<dyn BaseConversationBridge>,
    ) -> Self {
        Self {
            directory,
            matches,
            conversations,
        }
    }

    /// Wire every collaborator against one Postgres pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgDirectory::new(pool.clone())),
            Arc::new(PgMatchRepository::new(pool.clone())),
            Arc::new(PgConversationBridge::new(pool)),
        )
    }
}
