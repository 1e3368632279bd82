use crate::api::{ApiError, ErrorResponse, JsonBody};
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::{get_conn, DbPool};
use crate::schema::users;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use foodgram_core::validation::{required, validate_password};
use foodgram_core::ValidationErrors;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    JsonBody(req): JsonBody<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = ValidationErrors::new();
    let current = required(&mut errors, "current_password", req.current_password.as_deref());
    if current.is_some_and(|current| !verify_password(current, &user.password_hash)) {
        errors.add("current_password", "Wrong password.");
    }
    let new_password = required(&mut errors, "new_password", req.new_password.as_deref());
    if let Some(Err(message)) = new_password.map(validate_password) {
        errors.add("new_password", message);
    }
    errors.into_result()?;
    let new_password = new_password.unwrap_or_default();

    let password_hash = hash_password(new_password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::Internal("Failed to hash password")
    })?;

    let mut conn = get_conn(&pool)?;
    diesel::update(users::table.find(user.id))
        .set(users::password_hash.eq(&password_hash))
        .execute(&mut conn)?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
