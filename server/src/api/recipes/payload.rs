//! Request body shared by recipe create and update, plus the writes that
//! attach tags and ingredients to a recipe.

use std::collections::HashSet;

use diesel::prelude::*;
use foodgram_core::validation::{check_known_ids, validate_recipe};
use foodgram_core::{IngredientAmount, RecipeDraft};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct IngredientAmountInput {
    /// Ingredient ID
    pub id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeRequest {
    /// Tag IDs
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
    pub name: Option<String>,
    /// Base64 data URI or URL of the image
    pub image: Option<String>,
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i32>,
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidRecipe {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeRequest {
    /// Validate the payload, including that every referenced tag and
    /// ingredient exists.
    pub fn validate(
        self,
        conn: &mut PgConnection,
        require_image: bool,
    ) -> Result<ValidRecipe, ApiError> {
        let amounts: Option<Vec<IngredientAmount>> = self.ingredients.as_ref().map(|items| {
            items
                .iter()
                .map(|i| IngredientAmount {
                    id: i.id,
                    amount: i.amount,
                })
                .collect()
        });

        let draft = RecipeDraft {
            name: self.name.as_deref(),
            text: self.text.as_deref(),
            image: self.image.as_deref(),
            cooking_time: self.cooking_time,
            tags: self.tags.as_deref(),
            ingredients: amounts.as_deref(),
        };
        let mut errors = validate_recipe(&draft, require_image)
            .err()
            .unwrap_or_default();

        if let Some(requested) = self.tags.as_deref().filter(|t| !t.is_empty()) {
            let known: HashSet<i32> = tags::table
                .filter(tags::id.eq_any(requested))
                .select(tags::id)
                .load::<i32>(conn)?
                .into_iter()
                .collect();
            check_known_ids(&mut errors, "tags", requested, &known);
        }

        if let Some(amounts) = amounts.as_deref().filter(|a| !a.is_empty()) {
            let requested: Vec<i32> = amounts.iter().map(|a| a.id).collect();
            let known: HashSet<i32> = ingredients::table
                .filter(ingredients::id.eq_any(&requested))
                .select(ingredients::id)
                .load::<i32>(conn)?
                .into_iter()
                .collect();
            check_known_ids(&mut errors, "ingredients", &requested, &known);
        }

        errors.into_result().map_err(ApiError::from)?;

        Ok(ValidRecipe {
            name: self.name.unwrap_or_default().trim().to_string(),
            text: self.text.unwrap_or_default().trim().to_string(),
            image: self.image.map(|i| i.trim().to_string()),
            cooking_time: self.cooking_time.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            ingredients: amounts.unwrap_or_default(),
        })
    }
}

/// Replace the recipe's tags and ingredient lines wholesale.
///
/// Must run inside the transaction that writes the recipe row.
pub fn replace_links(
    conn: &mut PgConnection,
    recipe_id: i32,
    tag_ids: &[i32],
    amounts: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    let new_tags: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&new_tags)
        .execute(conn)?;

    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    let new_lines: Vec<NewRecipeIngredient> = amounts
        .iter()
        .map(|a| NewRecipeIngredient {
            recipe_id,
            ingredient_id: a.id,
            amount: a.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&new_lines)
        .execute(conn)?;

    Ok(())
}

/// Check the recipe belongs to `user_id`.
pub fn ensure_author(author_id: i32, user_id: i32) -> Result<(), ApiError> {
    if author_id == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Only the author can change this recipe"))
    }
}
