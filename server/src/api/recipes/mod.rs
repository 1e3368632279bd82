pub mod create;
pub mod delete;
pub mod download;
pub mod get;
pub mod get_link;
pub mod list;
pub mod membership;
pub mod payload;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/api/recipes/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(membership::add_favorite).delete(membership::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(membership::add_to_shopping_cart).delete(membership::remove_from_shopping_cart),
        )
        .route("/api/recipes/{id}/get-link", get(get_link::get_link))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        membership::add_favorite,
        membership::remove_favorite,
        membership::add_to_shopping_cart,
        membership::remove_from_shopping_cart,
        download::download_shopping_cart,
        get_link::get_link,
    ),
    components(schemas(
        list::RecipeListResponse,
        payload::RecipeRequest,
        payload::IngredientAmountInput,
        get_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;
