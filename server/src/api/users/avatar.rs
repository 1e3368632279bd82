use crate::api::{ApiError, ErrorResponse, JsonBody};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use foodgram_core::image::validate_image_reference;
use foodgram_core::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 data URI or URL of the image
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    /// Stored image reference, null when no avatar is set
    pub avatar: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users/me/avatar/",
    tag = "users",
    responses(
        (status = 200, description = "Current avatar", body = AvatarResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn get_avatar(AuthUser(user): AuthUser) -> Json<AvatarResponse> {
    Json(AvatarResponse {
        avatar: user.avatar,
    })
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = AvatarResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    JsonBody(req): JsonBody<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let Some(avatar) = req.avatar.map(|a| a.trim().to_string()) else {
        return Err(ValidationErrors::single("avatar", foodgram_core::validation::REQUIRED).into());
    };
    validate_image_reference(&avatar)
        .map_err(|message| ValidationErrors::single("avatar", message))?;

    let mut conn = get_conn(&pool)?;
    diesel::update(users::table.find(user.id))
        .set(users::avatar.eq(&avatar))
        .execute(&mut conn)?;

    tracing::debug!(user_id = user.id, "Avatar updated");

    Ok(Json(AvatarResponse {
        avatar: Some(avatar),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 400, description = "No avatar set", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<StatusCode, ApiError> {
    if user.avatar.is_none() {
        return Err(ApiError::BadRequest("No avatar to delete".to_string()));
    }

    let mut conn = get_conn(&pool)?;
    diesel::update(users::table.find(user.id))
        .set(users::avatar.eq(None::<String>))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn user(avatar: Option<&str>) -> User {
        User {
            id: 7,
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password_hash: String::new(),
            avatar: avatar.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_avatar() {
        let Json(body) = get_avatar(AuthUser(user(Some("/media/avatars/ann.png")))).await;
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"avatar": "/media/avatars/ann.png"})
        );

        let Json(body) = get_avatar(AuthUser(user(None))).await;
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"avatar": null})
        );
    }
}
