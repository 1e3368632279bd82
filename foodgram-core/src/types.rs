use serde::{Deserialize, Serialize};

pub const MIN_COOKING_TIME: i32 = 1;
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;
pub const MAX_RECIPE_NAME: usize = 256;
pub const MAX_INGREDIENT_NAME: usize = 128;
pub const MAX_MEASUREMENT_UNIT: usize = 64;
pub const MAX_NAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Which per-user recipe collection a membership refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    Favorite,
    ShoppingCart,
}

impl MembershipKind {
    /// Human-readable collection name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            MembershipKind::Favorite => "favorites",
            MembershipKind::ShoppingCart => "the shopping cart",
        }
    }
}

/// One ingredient line of a recipe, already resolved to name and unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// A recipe reduced to what the shopping list needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLines {
    pub recipe_id: i32,
    pub lines: Vec<IngredientLine>,
}

/// One consolidated entry of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}
