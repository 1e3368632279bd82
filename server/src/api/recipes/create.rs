use crate::api::recipes::payload::{replace_links, RecipeRequest};
use crate::api::responses::{load_recipe_response, RecipeResponse};
use crate::api::{ApiError, ErrorResponse, JsonBody};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    JsonBody(req): JsonBody<RecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let valid = req.validate(&mut conn, true)?;

    let recipe = conn.transaction::<Recipe, diesel::result::Error, _>(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &valid.name,
            text: &valid.text,
            image: valid.image.as_deref(),
            cooking_time: valid.cooking_time,
        };
        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_links(conn, recipe.id, &valid.tags, &valid.ingredients)?;
        Ok(recipe)
    })?;

    tracing::info!(recipe_id = recipe.id, author_id = user.id, "Recipe created");

    let response = load_recipe_response(&mut conn, Some(&user), recipe)?;
    Ok((StatusCode::CREATED, Json(response)))
}
