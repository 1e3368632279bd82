use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::db::{get_conn, DbPool};
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    tag = "ingredients",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient", body = Ingredient),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Ingredient>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient not found"))?;

    Ok(Json(ingredient))
}
