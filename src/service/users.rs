//! User creation against the shared store.

use crate::error::AppError;
use crate::model::{CreatedUser, NewUser};
use crate::store::UserStore;

pub struct UserService;

impl UserService {
    /// Issue exactly one insert. No deduplication: identical payloads create distinct users.
    pub async fn create(store: &dyn UserStore, user: &NewUser) -> Result<CreatedUser, AppError> {
        let id = store.create_user(user).await?;
        tracing::debug!(user_id = %id, "user created");
        Ok(CreatedUser { id })
    }
}
