use crate::api::recipes::get::find_recipe;
use crate::api::recipes::payload::{ensure_author, replace_links, RecipeRequest};
use crate::api::responses::{load_recipe_response, RecipeResponse};
use crate::api::{ApiError, ErrorResponse, JsonBody, PathParam};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipes;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
    JsonBody(req): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;
    let existing = find_recipe(&mut conn, id)?;
    ensure_author(existing.author_id, user.id)?;

    let valid = req.validate(&mut conn, false)?;

    let recipe = conn.transaction::<Recipe, diesel::result::Error, _>(|conn| {
        let changes = RecipeChanges {
            name: &valid.name,
            text: &valid.text,
            image: valid.image.as_deref(),
            cooking_time: valid.cooking_time,
        };
        let recipe: Recipe = diesel::update(recipes::table.find(existing.id))
            .set(&changes)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_links(conn, recipe.id, &valid.tags, &valid.ingredients)?;
        Ok(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, "Recipe updated");

    Ok(Json(load_recipe_response(&mut conn, Some(&user), recipe)?))
}
