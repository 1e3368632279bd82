use crate::api::{ApiError, ErrorResponse, QueryParams};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::schema::{ingredients, recipe_ingredients, shopping_carts};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use diesel::prelude::*;
use foodgram_core::shopping_list::SHOPPING_LIST_FILENAME;
use foodgram_core::{
    build_shopping_list, render_shopping_list, IngredientLine, RecipeLines, ShoppingListOrder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadParams {
    /// `first_seen` (default) or `name`
    #[param(value_type = Option<String>)]
    pub order: Option<ShoppingListOrder>,
}

type CartLineRow = (i32, String, String, i32);

/// Group ingredient rows by recipe, following the cart order.
fn group_by_recipe(cart: &[i32], rows: Vec<CartLineRow>) -> Vec<RecipeLines> {
    let mut lines: HashMap<i32, Vec<IngredientLine>> = HashMap::new();
    for (recipe_id, name, unit, amount) in rows {
        lines
            .entry(recipe_id)
            .or_default()
            .push(IngredientLine::new(name, unit, amount));
    }

    cart.iter()
        .map(|&recipe_id| RecipeLines {
            recipe_id,
            lines: lines.remove(&recipe_id).unwrap_or_default(),
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = "recipes",
    params(DownloadParams),
    responses(
        (status = 200, description = "Plain-text shopping list", body = String, content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    QueryParams(params): QueryParams<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let cart: Vec<i32> = shopping_carts::table
        .filter(shopping_carts::user_id.eq(user.id))
        .order(shopping_carts::id)
        .select(shopping_carts::recipe_id)
        .load(&mut conn)?;

    let rows: Vec<CartLineRow> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&cart))
        .order(recipe_ingredients::id)
        .select((
            recipe_ingredients::recipe_id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let recipes = group_by_recipe(&cart, rows);
    let entries = build_shopping_list(&recipes, params.order.unwrap_or_default());

    tracing::debug!(
        user_id = user.id,
        recipes = cart.len(),
        entries = entries.len(),
        "Shopping list built"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
            ),
        ],
        render_shopping_list(&entries),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_follows_cart_order() {
        let rows = vec![
            (1, "Flour".to_string(), "g".to_string(), 200),
            (2, "Flour".to_string(), "g".to_string(), 50),
            (1, "Milk".to_string(), "ml".to_string(), 100),
        ];
        let grouped = group_by_recipe(&[2, 1], rows);
        assert_eq!(grouped[0].recipe_id, 2);
        assert_eq!(grouped[0].lines, vec![IngredientLine::new("Flour", "g", 50)]);
        assert_eq!(grouped[1].lines.len(), 2);

        let text = render_shopping_list(&build_shopping_list(&grouped, ShoppingListOrder::FirstSeen));
        assert_eq!(text, "Shopping list:\n\n- Flour: 250 g\n- Milk: 100 ml\n");
    }

    #[test]
    fn test_recipe_without_ingredients() {
        let grouped = group_by_recipe(&[5], Vec::new());
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].lines.is_empty());
    }
}
