use crate::api::{ApiError, ErrorResponse, QueryParams};
use crate::db::{get_conn, DbPool};
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use foodgram_core::search::{like_pattern, rank_by_name};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientSearchParams {
    /// Case-insensitive substring; names starting with it come first
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = "ingredients",
    params(IngredientSearchParams),
    responses(
        (status = 200, description = "Matching ingredients", body = Vec<Ingredient>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    QueryParams(params): QueryParams<IngredientSearchParams>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let query = params.name.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        let rows = ingredients::table
            .order((ingredients::name, ingredients::id))
            .select(Ingredient::as_select())
            .load(&mut conn)?;
        return Ok(Json(rows));
    }

    let matches: Vec<Ingredient> = ingredients::table
        .filter(ingredients::name.ilike(like_pattern(query)))
        .select(Ingredient::as_select())
        .load(&mut conn)?;

    Ok(Json(rank_by_name(matches, query, |i| i.name.as_str())))
}
