//! User HTTP handlers.

use crate::error::AppError;
use crate::extractors::ValidatedUser;
use crate::response::created;
use crate::service::UserService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// POST /users: 201 with `{"id": ...}`. Storage failures surface as 500 through `AppError`.
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedUser(user): ValidatedUser,
) -> Result<impl IntoResponse, AppError> {
    let body = UserService::create(state.store.as_ref(), &user).await?;
    Ok(created(body))
}
