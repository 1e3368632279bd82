use crate::api::responses::{load_recipe_response, RecipeResponse};
use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::auth::MaybeAuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::Recipe;
use crate::schema::recipes;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

/// Load a recipe row or fail with 404.
pub fn find_recipe(conn: &mut PgConnection, id: i32) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;
    let recipe = find_recipe(&mut conn, id)?;
    Ok(Json(load_recipe_response(&mut conn, viewer.as_ref(), recipe)?))
}
