//! Favorites and shopping cart membership.
//!
//! Adding is not idempotent: a second add for the same (user, recipe) pair is
//! reported as [`MembershipError::AlreadyMember`], and removing a pair that
//! was never added is [`MembershipError::NotMember`]. Duplicate detection
//! relies on the store's uniqueness constraint, so two racing requests can't
//! both succeed.

use crate::error::{MembershipError, StoreError};
use crate::store::MembershipStore;
use crate::types::MembershipKind;

pub fn add<S>(
    store: &S,
    kind: MembershipKind,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), MembershipError>
where
    S: MembershipStore + ?Sized,
{
    match store.insert_membership(kind, user_id, recipe_id) {
        Ok(()) => {
            tracing::debug!(?kind, user_id, recipe_id, "membership added");
            Ok(())
        }
        Err(StoreError::UniqueViolation) => Err(MembershipError::AlreadyMember(kind)),
        Err(e) => Err(MembershipError::Store(e)),
    }
}

pub fn remove<S>(
    store: &S,
    kind: MembershipKind,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), MembershipError>
where
    S: MembershipStore + ?Sized,
{
    if store.delete_membership(kind, user_id, recipe_id)? {
        tracing::debug!(?kind, user_id, recipe_id, "membership removed");
        Ok(())
    } else {
        Err(MembershipError::NotMember(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_add_twice_conflicts() {
        let store = MemoryStore::new();
        add(&store, MembershipKind::Favorite, 1, 7).unwrap();
        assert_eq!(
            add(&store, MembershipKind::Favorite, 1, 7),
            Err(MembershipError::AlreadyMember(MembershipKind::Favorite))
        );
    }

    #[test]
    fn test_remove_missing() {
        let store = MemoryStore::new();
        assert_eq!(
            remove(&store, MembershipKind::ShoppingCart, 1, 7),
            Err(MembershipError::NotMember(MembershipKind::ShoppingCart))
        );
    }

    #[test]
    fn test_add_remove_add() {
        let store = MemoryStore::new();
        add(&store, MembershipKind::ShoppingCart, 2, 9).unwrap();
        remove(&store, MembershipKind::ShoppingCart, 2, 9).unwrap();
        add(&store, MembershipKind::ShoppingCart, 2, 9).unwrap();
        assert!(store
            .is_member(MembershipKind::ShoppingCart, 2, 9)
            .unwrap());
    }

    #[test]
    fn test_users_do_not_share_membership() {
        let store = MemoryStore::new();
        add(&store, MembershipKind::Favorite, 1, 7).unwrap();
        add(&store, MembershipKind::Favorite, 2, 7).unwrap();
        assert_eq!(
            remove(&store, MembershipKind::Favorite, 3, 7),
            Err(MembershipError::NotMember(MembershipKind::Favorite))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MembershipError::AlreadyMember(MembershipKind::Favorite).to_string(),
            "Recipe is already in favorites"
        );
        assert_eq!(
            MembershipError::NotMember(MembershipKind::ShoppingCart).to_string(),
            "Recipe is not in the shopping cart"
        );
    }
}
