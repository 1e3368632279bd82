use crate::api::recipes::get::find_recipe;
use crate::api::recipes::payload::ensure_author;
use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::schema::recipes;
use axum::{
    extract::State,
    http::StatusCode,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn(&pool)?;
    let recipe = find_recipe(&mut conn, id)?;
    ensure_author(recipe.author_id, user.id)?;

    // Tags, ingredient lines, favorites and cart rows cascade
    diesel::delete(recipes::table.find(recipe.id)).execute(&mut conn)?;

    tracing::info!(recipe_id = recipe.id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
