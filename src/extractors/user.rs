//! Extract and validate a user-creation payload before the handler runs.

use crate::error::AppError;
use crate::model::NewUser;
use crate::service::RequestValidator;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// A body that passed validation. Rejection short-circuits with 400 (or 413) and the handler never runs.
#[derive(Clone, Debug)]
pub struct ValidatedUser(pub NewUser);

#[async_trait]
impl<S> FromRequest<S> for ValidatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        RequestValidator::validate_new_user(&body).map(ValidatedUser)
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::BadRequest(rejection.body_text())
}
