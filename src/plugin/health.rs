//! Health and readiness routes plugin.

use crate::error::StartupError;
use crate::plugin::{Plugin, ServerBuilder, DATABASE_PLUGIN};
use crate::routes::common_routes;
use async_trait::async_trait;

pub const HEALTH_PLUGIN: &str = "app/health";

/// Registers health and readiness routes. Readiness pings the store.
pub struct HealthPlugin;

#[async_trait]
impl Plugin for HealthPlugin {
    fn name(&self) -> &str {
        HEALTH_PLUGIN
    }

    fn dependencies(&self) -> &[&'static str] {
        &[DATABASE_PLUGIN]
    }

    async fn register(&self, server: &mut ServerBuilder) -> Result<(), StartupError> {
        server.route(common_routes());
        Ok(())
    }
}
