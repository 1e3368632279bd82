use crate::api::{ApiError, ErrorResponse, JsonBody};
use crate::auth::{create_session, verify_password};
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::validation::required;
use foodgram_core::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn credentials(&self) -> Result<(&str, &str), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = required(&mut errors, "email", self.email.as_deref());
        let password = required(&mut errors, "password", self.password.as_deref());
        errors.into_result()?;
        Ok((email.unwrap_or_default().trim(), password.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = req.credentials()?;

    let mut conn = get_conn(&pool)?;

    let user: Option<User> = users::table
        .filter(
            diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(email) = LOWER(")
                .bind::<diesel::sql_types::Text, _>(email)
                .sql(")"),
        )
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user.filter(|u| verify_password(password, &u.password_hash)) else {
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    let auth_token = create_session(&mut conn, user.id, config.session_ttl_days).map_err(|e| {
        tracing::error!("Failed to create session: {}", e);
        ApiError::Internal("Failed to create session")
    })?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodgram_core::validation::REQUIRED;

    #[test]
    fn test_credentials_required() {
        let req: LoginRequest =
            serde_json::from_value(serde_json::json!({"email": "cook@example.com"})).unwrap();
        let errors = req.credentials().unwrap_err();
        assert_eq!(errors.messages("password"), [REQUIRED.to_string()]);
        assert!(!errors.has("email"));
    }

    #[test]
    fn test_credentials_trim_email() {
        let req = LoginRequest {
            email: Some(" cook@example.com ".to_string()),
            password: Some("s3cret-pass".to_string()),
        };
        assert_eq!(req.credentials().unwrap(), ("cook@example.com", "s3cret-pass"));
    }
}
