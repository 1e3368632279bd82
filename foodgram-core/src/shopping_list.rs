//! Shopping list aggregation.
//!
//! Ingredient lines from every recipe in a user's cart are merged per
//! (name, measurement unit) pair and their amounts summed. Entries keep the
//! order in which each pair was first seen; [`ShoppingListOrder::Name`] gives
//! an alphabetical presentation instead.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{RecipeLines, ShoppingListEntry};

/// First line of the downloadable shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// File name offered to the browser for the download.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingListOrder {
    /// Order in which each ingredient first appears across the cart
    #[default]
    FirstSeen,
    /// Alphabetical by name, then unit
    Name,
}

/// Merge ingredient lines across recipes, summing amounts per (name, unit).
pub fn aggregate<'a, I>(recipes: I) -> Vec<ShoppingListEntry>
where
    I: IntoIterator<Item = &'a RecipeLines>,
{
    let mut positions: HashMap<(&'a str, &'a str), usize> = HashMap::new();
    let mut entries: Vec<ShoppingListEntry> = Vec::new();

    for recipe in recipes {
        for line in &recipe.lines {
            let key = (line.name.as_str(), line.measurement_unit.as_str());
            match positions.get(&key) {
                Some(&index) => entries[index].total_amount += i64::from(line.amount),
                None => {
                    positions.insert(key, entries.len());
                    entries.push(ShoppingListEntry {
                        name: line.name.clone(),
                        measurement_unit: line.measurement_unit.clone(),
                        total_amount: i64::from(line.amount),
                    });
                }
            }
        }
    }

    entries
}

/// Aggregate and apply the requested presentation order.
pub fn build_shopping_list(recipes: &[RecipeLines], order: ShoppingListOrder) -> Vec<ShoppingListEntry> {
    let mut entries = aggregate(recipes);
    if order == ShoppingListOrder::Name {
        // stable, so equal names keep first-seen order between units
        entries.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
        });
    }
    entries
}

/// Render entries as the plain-text download.
pub fn render_shopping_list(entries: &[ShoppingListEntry]) -> String {
    let mut content = format!("{}\n\n", SHOPPING_LIST_HEADER);
    for entry in entries {
        content.push_str(&format!(
            "- {}: {} {}\n",
            entry.name, entry.total_amount, entry.measurement_unit
        ));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IngredientLine;

    fn recipe(id: i32, lines: &[(&str, &str, i32)]) -> RecipeLines {
        RecipeLines {
            recipe_id: id,
            lines: lines
                .iter()
                .map(|(name, unit, amount)| IngredientLine::new(*name, *unit, *amount))
                .collect(),
        }
    }

    #[test]
    fn test_empty_input() {
        let recipes: Vec<RecipeLines> = Vec::new();
        assert!(aggregate(&recipes).is_empty());
    }

    #[test]
    fn test_sums_duplicate_keys() {
        let recipes = vec![
            recipe(1, &[("flour", "g", 200), ("milk", "ml", 100)]),
            recipe(2, &[("flour", "g", 50)]),
        ];
        let entries = aggregate(&recipes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "flour");
        assert_eq!(entries[0].total_amount, 250);
        assert_eq!(entries[1].name, "milk");
        assert_eq!(entries[1].total_amount, 100);
    }

    #[test]
    fn test_same_name_different_unit_kept_apart() {
        let recipes = vec![
            recipe(1, &[("sugar", "g", 100)]),
            recipe(2, &[("sugar", "tbsp", 2), ("sugar", "g", 20)]),
        ];
        let entries = aggregate(&recipes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].measurement_unit, "g");
        assert_eq!(entries[0].total_amount, 120);
        assert_eq!(entries[1].measurement_unit, "tbsp");
        assert_eq!(entries[1].total_amount, 2);
    }

    #[test]
    fn test_first_seen_order() {
        let recipes = vec![
            recipe(1, &[("salt", "g", 5)]),
            recipe(2, &[("butter", "g", 30), ("salt", "g", 1)]),
        ];
        let names: Vec<_> = aggregate(&recipes).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["salt", "butter"]);
    }

    #[test]
    fn test_name_order() {
        let recipes = vec![
            recipe(1, &[("salt", "g", 5)]),
            recipe(2, &[("butter", "g", 30), ("salt", "g", 1)]),
        ];
        let names: Vec<_> = build_shopping_list(&recipes, ShoppingListOrder::Name)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["butter", "salt"]);
    }

    #[test]
    fn test_totals_do_not_overflow_i32() {
        let recipes = vec![
            recipe(1, &[("water", "ml", i32::MAX)]),
            recipe(2, &[("water", "ml", i32::MAX)]),
        ];
        let entries = aggregate(&recipes);
        assert_eq!(entries[0].total_amount, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn test_render() {
        let entries = vec![
            ShoppingListEntry {
                name: "Flour".to_string(),
                measurement_unit: "g".to_string(),
                total_amount: 250,
            },
            ShoppingListEntry {
                name: "Milk".to_string(),
                measurement_unit: "ml".to_string(),
                total_amount: 100,
            },
        ];
        assert_eq!(
            render_shopping_list(&entries),
            "Shopping list:\n\n- Flour: 250 g\n- Milk: 100 ml\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_shopping_list(&[]), "Shopping list:\n\n");
    }
}
