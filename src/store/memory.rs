//! In-memory user store for tests and local runs without a database.

use crate::error::StoreError;
use crate::model::{NewUser, User, UserId};
use crate::store::UserStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryUserStore {
    next_id: AtomicI64,
    users: RwLock<BTreeMap<UserId, User>>,
    inserts: AtomicUsize,
    closes: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts so far.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn users(&self) -> Vec<User> {
        self.users
            .read()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserId, StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        users.insert(id, User::from_new(id, user.clone()));
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        Ok(users.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
