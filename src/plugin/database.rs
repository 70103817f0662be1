//! Owns the process-wide data-access client.

use crate::config::DatabaseConfig;
use crate::error::{StartupError, StoreError};
use crate::plugin::{Plugin, ServerBuilder};
use crate::state::AppState;
use crate::store::{PgUserStore, UserStore};
use async_trait::async_trait;
use std::sync::Arc;

pub const DATABASE_PLUGIN: &str = "database";

enum StoreSource {
    Postgres(DatabaseConfig),
    Ready(Arc<dyn UserStore>),
}

/// Attaches a `UserStore` to shared state on registration and closes it on post-stop.
/// A client that cannot be constructed fails registration, so the server never listens.
pub struct DatabasePlugin {
    source: StoreSource,
}

impl DatabasePlugin {
    pub fn connect(config: DatabaseConfig) -> Self {
        DatabasePlugin {
            source: StoreSource::Postgres(config),
        }
    }

    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        DatabasePlugin {
            source: StoreSource::Ready(store),
        }
    }
}

#[async_trait]
impl Plugin for DatabasePlugin {
    fn name(&self) -> &str {
        DATABASE_PLUGIN
    }

    async fn register(&self, server: &mut ServerBuilder) -> Result<(), StartupError> {
        let store: Arc<dyn UserStore> = match &self.source {
            StoreSource::Postgres(config) => Arc::new(PgUserStore::connect(config).await?),
            StoreSource::Ready(store) => Arc::clone(store),
        };
        server.provide_store(store);
        Ok(())
    }

    async fn on_post_stop(&self, state: &AppState) -> Result<(), StoreError> {
        state.store.close().await
    }
}
