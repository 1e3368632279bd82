use crate::api::recipes::get::find_recipe;
use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use axum::{
    extract::State,
    Json,
};
use foodgram_core::short_link;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Short link to the recipe", body = ShortLinkResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_link(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<ShortLinkResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;
    let recipe = find_recipe(&mut conn, id)?;

    let id = u32::try_from(recipe.id).map_err(|_| ApiError::NotFound("Recipe not found"))?;
    let token = short_link::encode(id);

    Ok(Json(ShortLinkResponse {
        short_link: config.public_url(&format!("/s/{}", token)),
    }))
}
