use crate::api::{ApiError, ErrorResponse, JsonBody};
use crate::auth::hash_password;
use crate::db::{get_conn, DbPool};
use crate::models::NewUser;
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::validation::validate_signup;
use foodgram_core::{SignupDraft, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    /// Absent fields become empty strings, which validation reports as required.
    fn draft(&self) -> SignupDraft<'_> {
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or_default()
        }
        SignupDraft {
            email: field(&self.email).trim(),
            username: field(&self.username).trim(),
            first_name: field(&self.first_name).trim(),
            last_name: field(&self.last_name).trim(),
            password: field(&self.password),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid data or email/username taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = req.draft();
    validate_signup(&draft)?;

    let mut conn = get_conn(&pool)?;

    let mut errors = ValidationErrors::new();
    let email_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(
            diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(email) = LOWER(")
                .bind::<diesel::sql_types::Text, _>(draft.email)
                .sql(")"),
        ),
    ))
    .get_result(&mut conn)?;
    if email_taken {
        errors.add("email", "A user with that email already exists.");
    }
    let username_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.eq(draft.username)),
    ))
    .get_result(&mut conn)?;
    if username_taken {
        errors.add("username", "A user with that username already exists.");
    }
    errors.into_result()?;

    let password_hash = hash_password(draft.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::Internal("Failed to hash password")
    })?;

    let new_user = NewUser {
        email: draft.email,
        username: draft.username,
        first_name: draft.first_name,
        last_name: draft.last_name,
        password_hash: &password_hash,
    };

    let user_id: i32 = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(users::id)
        .get_result(&mut conn)
        .map_err(|e| match e {
            // Lost a race with a concurrent signup
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Validation(ValidationErrors::single(
                    "username",
                    "A user with that username or email already exists.",
                ))
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(user_id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user_id,
            email: draft.email.to_string(),
            username: draft.username.to_string(),
            first_name: draft.first_name.to_string(),
            last_name: draft.last_name.to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodgram_core::validation::REQUIRED;

    #[test]
    fn test_missing_fields_are_required() {
        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "email": "cook@example.com",
            "username": "cook",
            "last_name": "Lee",
            "password": "s3cret-pass"
        }))
        .unwrap();

        let errors = validate_signup(&req.draft()).unwrap_err();
        assert_eq!(errors.messages("first_name"), [REQUIRED.to_string()]);
        assert!(!errors.has("email"));
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_empty_body_reports_every_field() {
        let errors = validate_signup(&SignupRequest::default().draft()).unwrap_err();
        for field in ["email", "username", "first_name", "last_name", "password"] {
            assert_eq!(errors.messages(field), [REQUIRED.to_string()], "{}", field);
        }
    }
}
