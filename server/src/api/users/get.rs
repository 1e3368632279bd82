use crate::api::responses::{load_user_response, UserResponse};
use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::auth::MaybeAuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(load_user_response(&mut conn, viewer.as_ref(), user)?))
}
