//! User registry: a plugin-composed REST service that creates users in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod plugin;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

pub use config::{DatabaseConfig, ServerConfig};
pub use error::{AppError, ConfigError, StartupError, StoreError};
pub use model::{NewUser, Social, User, UserId};
pub use plugin::{default_plugins, DatabasePlugin, HealthPlugin, Plugin, ServerBuilder, UsersPlugin};
pub use server::{shutdown_signal, Server, ServerOptions};
pub use state::AppState;
pub use store::{MemoryUserStore, PgUserStore, UserStore};
