//! Resolves short links handed out by `GET /api/recipes/{id}/get-link`.

use crate::api::{ApiError, PathParam};
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use diesel::prelude::*;
use foodgram_core::short_link;
use std::sync::Arc;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new().route("/s/{token}", get(resolve_short_link))
}

#[derive(OpenApi)]
#[openapi(paths(resolve_short_link))]
pub struct ApiDoc;

/// Path a token redirects to. Tokens that name no recipe go to the
/// not-found page.
fn target_path(
    token: &str,
    exists: impl FnOnce(i32) -> Result<bool, ApiError>,
) -> Result<String, ApiError> {
    let recipe_id = match short_link::decode(token).map(i32::try_from) {
        Ok(Ok(id)) => id,
        Ok(Err(_)) | Err(_) => {
            tracing::debug!(token, "Malformed short link");
            return Ok("/not_found/".to_string());
        }
    };

    if exists(recipe_id)? {
        Ok(format!("/recipes/{}/", recipe_id))
    } else {
        Ok("/not_found/".to_string())
    }
}

#[utoipa::path(
    get,
    path = "/s/{token}/",
    tag = "short-links",
    params(("token" = String, Path, description = "Short link token")),
    responses(
        (status = 302, description = "Redirect to the recipe page, or to the not-found page")
    )
)]
pub async fn resolve_short_link(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    PathParam(token): PathParam<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = target_path(&token, |id| {
        let mut conn = get_conn(&pool)?;
        let found: bool =
            diesel::select(diesel::dsl::exists(recipes::table.find(id))).get_result(&mut conn)?;
        Ok(found)
    })?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, config.public_url(&path))],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_recipe() {
        let token = short_link::encode(42);
        let path = target_path(&token, |id| Ok(id == 42)).unwrap();
        assert_eq!(path, "/recipes/42/");
    }

    #[test]
    fn test_unknown_recipe() {
        let token = short_link::encode(7);
        assert_eq!(target_path(&token, |_| Ok(false)).unwrap(), "/not_found/");
    }

    #[test]
    fn test_malformed_token_skips_lookup() {
        let path = target_path("!!", |_| panic!("must not query")).unwrap();
        assert_eq!(path, "/not_found/");
    }

    #[test]
    fn test_token_beyond_recipe_ids() {
        let token = short_link::encode(u32::MAX);
        assert_eq!(target_path(&token, |_| Ok(true)).unwrap(), "/not_found/");
    }
}
