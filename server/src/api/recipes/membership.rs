//! Favorites and shopping cart toggles. Both lists share the same semantics
//! and differ only in which table they write.

use crate::api::recipes::get::find_recipe;
use crate::api::responses::ShortRecipeResponse;
use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::store::PgStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use foodgram_core::{membership, MembershipKind};
use std::sync::Arc;

fn add(
    pool: Arc<DbPool>,
    kind: MembershipKind,
    user: &User,
    recipe_id: i32,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    let recipe = {
        let mut conn = get_conn(&pool)?;
        find_recipe(&mut conn, recipe_id)?
    };

    membership::add(&PgStore::new(pool), kind, user.id, recipe.id)?;

    Ok((StatusCode::CREATED, Json(ShortRecipeResponse::from(recipe))))
}

fn remove(
    pool: Arc<DbPool>,
    kind: MembershipKind,
    user: &User,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let recipe = {
        let mut conn = get_conn(&pool)?;
        find_recipe(&mut conn, recipe_id)?
    };

    membership::remove(&PgStore::new(pool), kind, user.id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added to favorites", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in favorites", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<impl IntoResponse, ApiError> {
    add(pool, MembershipKind::Favorite, &user, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode, ApiError> {
    remove(pool, MembershipKind::Favorite, &user, id)
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Added to the shopping cart", body = ShortRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Already in the shopping cart", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_to_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<impl IntoResponse, ApiError> {
    add(pool, MembershipKind::ShoppingCart, &user, id)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 400, description = "Not in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_from_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode, ApiError> {
    remove(pool, MembershipKind::ShoppingCart, &user, id)
}
