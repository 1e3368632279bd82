//! In-process store for tests.
//!
//! Mirrors the database constraints: duplicate pairs are unique violations
//! and a self-subscription trips the check constraint.

use std::collections::HashSet;
use std::sync::Mutex;

use super::{MembershipStore, SubscriptionStore};
use crate::error::StoreError;
use crate::types::MembershipKind;

#[derive(Debug, Default)]
pub struct MemoryStore {
    memberships: Mutex<HashSet<(MembershipKind, i32, i32)>>,
    subscriptions: Mutex<HashSet<(i32, i32)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memberships of one kind for a user.
    pub fn membership_count(&self, kind: MembershipKind, user_id: i32) -> usize {
        self.memberships
            .lock()
            .map(|set| {
                set.iter()
                    .filter(|(k, user, _)| *k == kind && *user == user_id)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Authors followed by `user_id`, sorted by id.
    pub fn authors_followed_by(&self, user_id: i32) -> Vec<i32> {
        let mut authors: Vec<i32> = self
            .subscriptions
            .lock()
            .map(|set| {
                set.iter()
                    .filter(|(user, _)| *user == user_id)
                    .map(|(_, author)| *author)
                    .collect()
            })
            .unwrap_or_default();
        authors.sort_unstable();
        authors
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

impl MembershipStore for MemoryStore {
    fn insert_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), StoreError> {
        let mut set = self.memberships.lock().map_err(poisoned)?;
        if set.insert((kind, user_id, recipe_id)) {
            Ok(())
        } else {
            Err(StoreError::UniqueViolation)
        }
    }

    fn delete_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError> {
        let mut set = self.memberships.lock().map_err(poisoned)?;
        Ok(set.remove(&(kind, user_id, recipe_id)))
    }

    fn is_member(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError> {
        let set = self.memberships.lock().map_err(poisoned)?;
        Ok(set.contains(&(kind, user_id, recipe_id)))
    }
}

impl SubscriptionStore for MemoryStore {
    fn insert_subscription(&self, user_id: i32, author_id: i32) -> Result<(), StoreError> {
        if user_id == author_id {
            return Err(StoreError::CheckViolation);
        }
        let mut set = self.subscriptions.lock().map_err(poisoned)?;
        if set.insert((user_id, author_id)) {
            Ok(())
        } else {
            Err(StoreError::UniqueViolation)
        }
    }

    fn delete_subscription(&self, user_id: i32, author_id: i32) -> Result<bool, StoreError> {
        let mut set = self.subscriptions.lock().map_err(poisoned)?;
        Ok(set.remove(&(user_id, author_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_kinds_are_independent() {
        let store = MemoryStore::new();
        store
            .insert_membership(MembershipKind::Favorite, 1, 10)
            .unwrap();
        assert!(store.is_member(MembershipKind::Favorite, 1, 10).unwrap());
        assert!(!store.is_member(MembershipKind::ShoppingCart, 1, 10).unwrap());
        store
            .insert_membership(MembershipKind::ShoppingCart, 1, 10)
            .unwrap();
        assert_eq!(store.membership_count(MembershipKind::ShoppingCart, 1), 1);
    }

    #[test]
    fn test_self_subscription_hits_check() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_subscription(3, 3),
            Err(StoreError::CheckViolation)
        );
    }
}
