//! Response shapes shared by several endpoint modules, and the batch loaders
//! that fill them.
//!
//! Loaders take a page of rows and issue one query per related table, never
//! one per row.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Recipe, Tag, User};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    subscriptions, tags, users,
};

/// Public profile of a user as seen by the viewer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user (always false for anonymous viewers)
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

/// Compact recipe representation used by favorites, the cart and
/// subscription listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<Recipe> for ShortRecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: i64,
}

/// Which of `author_ids` the viewer follows.
pub fn followed_authors(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    author_ids: &[i32],
) -> QueryResult<HashSet<i32>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    let ids: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer.id))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}

pub fn load_user_responses(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    users: Vec<User>,
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let followed = followed_authors(conn, viewer, &ids)?;
    Ok(users
        .into_iter()
        .map(|u| {
            let subscribed = followed.contains(&u.id);
            UserResponse::new(u, subscribed)
        })
        .collect())
}

pub fn load_user_response(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    user: User,
) -> QueryResult<UserResponse> {
    let followed = followed_authors(conn, viewer, &[user.id])?;
    let subscribed = followed.contains(&user.id);
    Ok(UserResponse::new(user, subscribed))
}

/// Expand recipes into their full representation, keeping input order.
pub fn load_recipe_responses(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    recipe_rows: Vec<Recipe>,
) -> QueryResult<Vec<RecipeResponse>> {
    if recipe_rows.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipe_rows.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipe_rows.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let tag_rows: Vec<(i32, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order((recipe_tags::recipe_id, tags::id))
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let ingredient_rows: Vec<(i32, i32, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(recipe_ingredients::id)
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientResponse>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientResponse {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let authors: Vec<User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?;
    let followed = followed_authors(conn, viewer, &author_ids)?;
    let authors: HashMap<i32, UserResponse> = authors
        .into_iter()
        .map(|u| {
            let subscribed = followed.contains(&u.id);
            (u.id, UserResponse::new(u, subscribed))
        })
        .collect();

    let (favorited, in_cart): (HashSet<i32>, HashSet<i32>) = match viewer {
        Some(viewer) => {
            let favorited: Vec<i32> = favorites::table
                .filter(favorites::user_id.eq(viewer.id))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load(conn)?;
            let in_cart: Vec<i32> = shopping_carts::table
                .filter(shopping_carts::user_id.eq(viewer.id))
                .filter(shopping_carts::recipe_id.eq_any(&recipe_ids))
                .select(shopping_carts::recipe_id)
                .load(conn)?;
            (favorited.into_iter().collect(), in_cart.into_iter().collect())
        }
        None => (HashSet::new(), HashSet::new()),
    };

    let mut responses = Vec::with_capacity(recipe_rows.len());
    for recipe in recipe_rows {
        // Author rows are cascade-deleted with their recipes
        let Some(author) = authors.get(&recipe.author_id).cloned() else {
            tracing::warn!(recipe_id = recipe.id, "Recipe author missing, skipping");
            continue;
        };
        responses.push(RecipeResponse {
            id: recipe.id,
            tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
            author,
            ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        });
    }

    Ok(responses)
}

pub fn load_recipe_response(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    recipe: Recipe,
) -> QueryResult<RecipeResponse> {
    load_recipe_responses(conn, viewer, vec![recipe])?
        .pop()
        .ok_or(diesel::result::Error::NotFound)
}

/// Annotate followed authors with their recipe counts and newest recipes.
///
/// `recipes_limit` caps the preview; `None` shows every recipe.
pub fn load_subscription_responses(
    conn: &mut PgConnection,
    authors: Vec<User>,
    recipes_limit: Option<i64>,
) -> QueryResult<Vec<SubscriptionResponse>> {
    let author_ids: Vec<i32> = authors.iter().map(|u| u.id).collect();

    let recipe_rows: Vec<Recipe> = recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .order(recipes::id.desc())
        .select(Recipe::as_select())
        .load(conn)?;

    let mut by_author: HashMap<i32, Vec<Recipe>> = HashMap::new();
    for recipe in recipe_rows {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }

    Ok(authors
        .into_iter()
        .map(|author| {
            let recipes = by_author.remove(&author.id).unwrap_or_default();
            let recipes_count = recipes.len() as i64;
            let shown = match recipes_limit {
                Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
                None => usize::MAX,
            };
            SubscriptionResponse {
                id: author.id,
                email: author.email,
                username: author.username,
                first_name: author.first_name,
                last_name: author.last_name,
                is_subscribed: true,
                avatar: author.avatar,
                recipes: recipes
                    .into_iter()
                    .take(shown)
                    .map(ShortRecipeResponse::from)
                    .collect(),
                recipes_count,
            }
        })
        .collect())
}
