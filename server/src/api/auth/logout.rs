use crate::api::{ApiError, ErrorResponse};
use crate::auth::{delete_session, AuthToken, AuthUser};
use crate::db::{get_conn, DbPool};
use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    tag = "auth",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    AuthToken(token): AuthToken,
    State(pool): State<Arc<DbPool>>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;
    delete_session(&mut conn, &token)?;

    tracing::info!(user_id = user.id, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}
