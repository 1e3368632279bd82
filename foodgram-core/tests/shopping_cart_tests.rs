//! Cart-to-download flow over the in-memory store.

use foodgram_core::{
    build_shopping_list, membership, render_shopping_list, IngredientLine, MembershipError,
    MembershipKind, MembershipStore, MemoryStore, RecipeLines, ShoppingListOrder,
};

const USER: i32 = 1;

fn catalog() -> Vec<RecipeLines> {
    vec![
        RecipeLines {
            recipe_id: 10,
            lines: vec![
                IngredientLine::new("Flour", "g", 200),
                IngredientLine::new("Milk", "ml", 100),
            ],
        },
        RecipeLines {
            recipe_id: 11,
            lines: vec![IngredientLine::new("Flour", "g", 50)],
        },
        RecipeLines {
            recipe_id: 12,
            lines: vec![IngredientLine::new("Eggs", "pcs", 3)],
        },
    ]
}

/// Recipes from the catalog that `user` has in the cart, in catalog order.
fn cart_recipes(store: &MemoryStore, user: i32) -> Vec<RecipeLines> {
    catalog()
        .into_iter()
        .filter(|r| {
            store
                .is_member(MembershipKind::ShoppingCart, user, r.recipe_id)
                .unwrap()
        })
        .collect()
}

#[test]
fn test_cart_download_sums_shared_ingredients() {
    let store = MemoryStore::new();
    membership::add(&store, MembershipKind::ShoppingCart, USER, 10).unwrap();
    membership::add(&store, MembershipKind::ShoppingCart, USER, 11).unwrap();
    // favorites never reach the shopping list
    membership::add(&store, MembershipKind::Favorite, USER, 12).unwrap();

    let recipes = cart_recipes(&store, USER);
    let entries = build_shopping_list(&recipes, ShoppingListOrder::FirstSeen);

    assert_eq!(
        render_shopping_list(&entries),
        "Shopping list:\n\n- Flour: 250 g\n- Milk: 100 ml\n"
    );
}

#[test]
fn test_removed_recipe_leaves_the_list() {
    let store = MemoryStore::new();
    membership::add(&store, MembershipKind::ShoppingCart, USER, 10).unwrap();
    membership::add(&store, MembershipKind::ShoppingCart, USER, 11).unwrap();
    membership::remove(&store, MembershipKind::ShoppingCart, USER, 10).unwrap();

    let entries = build_shopping_list(&cart_recipes(&store, USER), ShoppingListOrder::Name);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Flour");
    assert_eq!(entries[0].total_amount, 50);

    assert_eq!(
        membership::remove(&store, MembershipKind::ShoppingCart, USER, 10),
        Err(MembershipError::NotMember(MembershipKind::ShoppingCart))
    );
}

#[test]
fn test_empty_cart() {
    let store = MemoryStore::new();
    let entries = build_shopping_list(&cart_recipes(&store, USER), ShoppingListOrder::FirstSeen);
    assert!(entries.is_empty());
    assert_eq!(render_shopping_list(&entries), "Shopping list:\n\n");
}

#[test]
fn test_concurrent_adds_only_one_wins() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(MemoryStore::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                membership::add(store.as_ref(), MembershipKind::Favorite, USER, 10).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(store.membership_count(MembershipKind::Favorite, USER), 1);
}
