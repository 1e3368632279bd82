use crate::api::pagination::page_links;
use crate::api::responses::{load_recipe_responses, RecipeResponse};
use crate::api::{ApiError, ErrorResponse, QueryParams};
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::Recipe;
use crate::schema::{favorites, recipe_tags, recipes, shopping_carts, tags};
use axum::{
    extract::State,
    http::Uri,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use foodgram_core::{PageRequest, ValidationErrors};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for the recipe list. `tags` may be repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Tag slugs; a recipe matches if it has any of them
    pub tags: Vec<String>,
    /// Author user ID
    pub author: Option<i32>,
    /// `1` to show only the caller's favorites
    pub is_favorited: bool,
    /// `1` to show only recipes in the caller's shopping cart
    pub is_in_shopping_cart: bool,
}

impl RecipeListParams {
    /// Parse raw query pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ValidationErrors> {
        let mut params = Self::default();
        let mut errors = ValidationErrors::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = value.parse().ok(),
                "limit" => params.limit = value.parse().ok(),
                "tags" if !value.is_empty() => params.tags.push(value.clone()),
                "author" if !value.is_empty() => match value.parse() {
                    Ok(id) => params.author = Some(id),
                    Err(_) => errors.add("author", "Enter a whole number."),
                },
                "is_favorited" => params.is_favorited = is_truthy(value),
                "is_in_shopping_cart" => params.is_in_shopping_cart = is_truthy(value),
                _ => {}
            }
        }

        errors.into_result().map(|()| params)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "True")
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeListResponse {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecipeResponse>,
}

/// Recipes matching the filters. Membership filters only apply to a known viewer.
fn filtered(params: &RecipeListParams, viewer_id: Option<i32>) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !params.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(params.tags.clone()))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some(viewer_id) = viewer_id {
        if params.is_favorited {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(viewer_id))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if params.is_in_shopping_cart {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_carts::table
                        .filter(shopping_carts::user_id.eq(viewer_id))
                        .select(shopping_carts::recipe_id),
                ),
            );
        }
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = RecipeListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    QueryParams(pairs): QueryParams<Vec<(String, String)>>,
    uri: Uri,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let params = RecipeListParams::from_pairs(&pairs)?;
    let request = PageRequest::new(params.page, params.limit, config.page_size);
    let viewer_id = viewer.as_ref().map(|u| u.id);

    let mut conn = get_conn(&pool)?;

    let count: i64 = filtered(&params, viewer_id).count().get_result(&mut conn)?;
    let rows: Vec<Recipe> = filtered(&params, viewer_id)
        .order(recipes::id.desc())
        .limit(request.limit)
        .offset(request.offset())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let results = load_recipe_responses(&mut conn, viewer.as_ref(), rows)?;
    let links = page_links(&config, &uri, request, count);

    Ok(Json(RecipeListResponse {
        count: links.count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_tags_and_flags() {
        let params = RecipeListParams::from_pairs(&pairs(&[
            ("tags", "breakfast"),
            ("tags", "dinner"),
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "0"),
            ("author", "4"),
            ("page", "2"),
        ]))
        .unwrap();
        assert_eq!(params.tags, vec!["breakfast", "dinner"]);
        assert!(params.is_favorited);
        assert!(!params.is_in_shopping_cart);
        assert_eq!(params.author, Some(4));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_bad_author_is_a_field_error() {
        let errors = RecipeListParams::from_pairs(&pairs(&[("author", "me")])).unwrap_err();
        assert!(errors.has("author"));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(
            RecipeListParams::from_pairs(&[]).unwrap(),
            RecipeListParams::default()
        );
    }
}
