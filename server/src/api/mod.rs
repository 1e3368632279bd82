pub mod auth;
mod error;
pub mod extract;
pub mod ingredients;
pub mod pagination;
pub mod recipes;
pub mod responses;
pub mod short_link;
pub mod tags;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use extract::{JsonBody, PathParam, QueryParams};

use crate::AppState;
use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

/// Every HTTP route of the service, without trailing slashes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(tags::router())
        .merge(ingredients::router())
        .merge(recipes::router())
        .merge(short_link::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Foodgram", description = "Recipe sharing API"),
        components(schemas(
            ErrorResponse,
            responses::UserResponse,
            responses::RecipeResponse,
            responses::RecipeIngredientResponse,
            responses::ShortRecipeResponse,
            responses::SubscriptionResponse,
        ))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Clients send `Authorization: Token <key>`
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key>",
            ))),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        short_link::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_has_every_module() {
        let spec = openapi();
        for path in [
            "/api/auth/token/login/",
            "/api/users/",
            "/api/users/{id}/subscribe/",
            "/api/tags/",
            "/api/ingredients/",
            "/api/recipes/",
            "/api/recipes/download_shopping_cart/",
            "/api/recipes/{id}/get-link/",
            "/s/{token}/",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
        assert!(spec
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("token_auth")));
    }
}
