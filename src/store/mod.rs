//! Data-access client for users: the `UserStore` seam plus PostgreSQL and in-memory backends.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::{is_valid_identifier, PgUserStore};

use crate::error::StoreError;
use crate::model::{NewUser, User, UserId};
use async_trait::async_trait;

/// Typed create/read operations against user storage.
///
/// Implementations must be safe for concurrent use; the core never locks around a call.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert one user and return the identifier the store assigned.
    /// Either the whole row is written or nothing is.
    async fn create_user(&self, user: &NewUser) -> Result<UserId, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Cheap connectivity check for the readiness route.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release underlying connections. Called once, after the listener has stopped.
    async fn close(&self) -> Result<(), StoreError>;
}
