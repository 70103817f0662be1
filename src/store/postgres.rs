//! PostgreSQL user store over a shared `PgPool`.

use crate::config::DatabaseConfig;
use crate::error::{ConfigError, StoreError};
use crate::model::{NewUser, Social, User, UserId};
use crate::store::UserStore;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;

/// True when `name` can be used unquoted as a table name (letters, digits, underscore; no leading digit).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Users live in one table: `id BIGSERIAL`, `firstname`, `lastname`, `email` (TEXT), `social` (JSONB).
/// The schema itself is owned elsewhere; this store only reads and inserts.
pub struct PgUserStore {
    pool: PgPool,
    insert_sql: String,
    select_sql: String,
}

impl PgUserStore {
    /// Connect a pool from config. Fails fast when the URL is malformed or the database is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;
        tracing::info!(max_connections = config.max_connections, "connected user store pool");
        Self::from_pool(pool, &config.users_table)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self, ConfigError> {
        if !is_valid_identifier(table) {
            return Err(ConfigError::Invalid {
                key: "USERS_TABLE",
                value: table.to_string(),
            });
        }
        Ok(PgUserStore {
            pool,
            insert_sql: format!(
                "INSERT INTO {} (firstname, lastname, email, social) VALUES ($1, $2, $3, $4) RETURNING id",
                table
            ),
            select_sql: format!(
                "SELECT id, firstname, lastname, email, social FROM {} WHERE id = $1",
                table
            ),
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserId, StoreError> {
        let (id,): (i64,) = sqlx::query_as(&self.insert_sql)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.email)
            .bind(Json(&user.social))
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId(id))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row: Option<(i64, String, String, String, Json<Social>)> = sqlx::query_as(&self.select_sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, firstname, lastname, email, Json(social))| User {
            id: UserId(id),
            firstname,
            lastname,
            email,
            social,
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::info!("user store pool closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_valid_identifier("users"));
        assert!(is_valid_identifier("_app_users2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2users"));
        assert!(!is_valid_identifier("users; DROP TABLE x"));
        assert!(!is_valid_identifier("public.users"));
    }

    #[tokio::test]
    async fn rejects_unsafe_table_name() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/users")
            .unwrap();
        assert!(PgUserStore::from_pool(pool, "users\"--").is_err());
    }

    #[tokio::test]
    async fn connect_fails_on_malformed_url() {
        let config = DatabaseConfig {
            url: "not a database url".into(),
            ..DatabaseConfig::default()
        };
        assert!(PgUserStore::connect(&config).await.is_err());
    }
}
