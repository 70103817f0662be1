//! User routes plugin.

use crate::error::StartupError;
use crate::plugin::{Plugin, ServerBuilder, DATABASE_PLUGIN};
use crate::routes::user_routes;
use async_trait::async_trait;

pub const USERS_PLUGIN: &str = "app/users";

/// Registers POST /users. Requires the database plugin.
pub struct UsersPlugin;

#[async_trait]
impl Plugin for UsersPlugin {
    fn name(&self) -> &str {
        USERS_PLUGIN
    }

    fn dependencies(&self) -> &[&'static str] {
        &[DATABASE_PLUGIN]
    }

    async fn register(&self, server: &mut ServerBuilder) -> Result<(), StartupError> {
        if server.store().is_none() {
            return Err(StartupError::MissingState("a user store"));
        }
        server.route(user_routes());
        Ok(())
    }
}
