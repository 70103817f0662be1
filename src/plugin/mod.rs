//! Plugins: named units of registration with declared dependencies.
//!
//! The composition root resolves declared dependencies into a registration order once at
//! startup. A plugin listed before one of its dependencies is moved after it; unknown
//! dependencies, duplicate names and cycles abort startup.

mod database;
mod health;
mod users;

pub use database::{DatabasePlugin, DATABASE_PLUGIN};
pub use health::{HealthPlugin, HEALTH_PLUGIN};
pub use users::{UsersPlugin, USERS_PLUGIN};

use crate::config::ServerConfig;
use crate::error::{StartupError, StoreError};
use crate::state::AppState;
use crate::store::UserStore;
use async_trait::async_trait;
use axum::Router;
use std::collections::HashSet;
use std::sync::Arc;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Names of plugins that must be registered first.
    fn dependencies(&self) -> &[&'static str] {
        &[]
    }

    async fn register(&self, server: &mut ServerBuilder) -> Result<(), StartupError>;

    /// Runs after the listener has stopped and in-flight requests have drained.
    async fn on_post_stop(&self, _state: &AppState) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Collects what plugins contribute during registration.
#[derive(Default)]
pub struct ServerBuilder {
    store: Option<Arc<dyn UserStore>>,
    router: Router<AppState>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide_store(&mut self, store: Arc<dyn UserStore>) {
        self.store = Some(store);
    }

    pub fn store(&self) -> Option<&Arc<dyn UserStore>> {
        self.store.as_ref()
    }

    pub fn route(&mut self, routes: Router<AppState>) {
        self.router = std::mem::take(&mut self.router).merge(routes);
    }

    pub(crate) fn into_parts(self) -> (Option<Arc<dyn UserStore>>, Router<AppState>) {
        (self.store, self.router)
    }
}

/// Order plugins so every plugin follows its dependencies. Ties keep declaration order.
pub fn resolve_order(plugins: Vec<Box<dyn Plugin>>) -> Result<Vec<Box<dyn Plugin>>, StartupError> {
    let mut names = HashSet::new();
    for p in &plugins {
        if !names.insert(p.name().to_string()) {
            return Err(StartupError::DuplicatePlugin(p.name().to_string()));
        }
    }
    for p in &plugins {
        if let Some(dep) = p.dependencies().iter().find(|d| !names.contains(**d)) {
            return Err(StartupError::MissingDependency {
                plugin: p.name().to_string(),
                dependency: (*dep).to_string(),
            });
        }
    }

    let total = plugins.len();
    let mut pending: Vec<Option<Box<dyn Plugin>>> = plugins.into_iter().map(Some).collect();
    let mut placed: HashSet<String> = HashSet::new();
    let mut ordered = Vec::with_capacity(total);
    while ordered.len() < total {
        let ready = pending.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|p| p.dependencies().iter().all(|d| placed.contains(*d)))
        });
        let Some(i) = ready else {
            let stuck = pending.iter().flatten().map(|p| p.name().to_string()).collect();
            return Err(StartupError::DependencyCycle(stuck));
        };
        if let Some(p) = pending[i].take() {
            placed.insert(p.name().to_string());
            ordered.push(p);
        }
    }
    Ok(ordered)
}

/// Production plugin set: database, user routes, health routes.
pub fn default_plugins(config: &ServerConfig) -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(DatabasePlugin::connect(config.database.clone())),
        Box::new(UsersPlugin),
        Box::new(HealthPlugin),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: &'static str,
        deps: &'static [&'static str],
    }

    #[async_trait]
    impl Plugin for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn dependencies(&self) -> &[&'static str] {
            self.deps
        }

        async fn register(&self, _server: &mut ServerBuilder) -> Result<(), StartupError> {
            Ok(())
        }
    }

    fn plugin(name: &'static str, deps: &'static [&'static str]) -> Box<dyn Plugin> {
        Box::new(Named { name, deps })
    }

    fn order(plugins: Vec<Box<dyn Plugin>>) -> Vec<String> {
        resolve_order(plugins)
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[test]
    fn keeps_declaration_order_when_satisfied() {
        let got = order(vec![plugin("database", &[]), plugin("app/users", &["database"])]);
        assert_eq!(got, ["database", "app/users"]);
    }

    #[test]
    fn moves_dependencies_first() {
        let got = order(vec![
            plugin("app/users", &["database"]),
            plugin("app/health", &["database"]),
            plugin("database", &[]),
        ]);
        assert_eq!(got, ["database", "app/users", "app/health"]);
    }

    #[test]
    fn chains_resolve_transitively() {
        let got = order(vec![plugin("c", &["b"]), plugin("b", &["a"]), plugin("a", &[])]);
        assert_eq!(got, ["a", "b", "c"]);
    }

    #[test]
    fn rejects_unknown_dependency() {
        let err = resolve_order(vec![plugin("app/users", &["database"])]).err().unwrap();
        assert!(matches!(
            err,
            StartupError::MissingDependency { ref plugin, ref dependency }
                if plugin == "app/users" && dependency == "database"
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let err = resolve_order(vec![plugin("database", &[]), plugin("database", &[])]).err().unwrap();
        assert!(matches!(err, StartupError::DuplicatePlugin(ref n) if n == "database"));
    }

    #[test]
    fn rejects_cycles() {
        let err = resolve_order(vec![plugin("a", &["b"]), plugin("b", &["a"]), plugin("c", &[])])
            .err()
            .unwrap();
        match err {
            StartupError::DependencyCycle(names) => assert_eq!(names, ["a", "b"]),
            other => panic!("unexpected {other}"),
        }
    }
}
