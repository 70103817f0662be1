//! User routes.

use crate::handlers::create_user;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}
