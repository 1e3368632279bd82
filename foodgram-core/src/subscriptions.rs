//! Following other authors.

use crate::error::{StoreError, SubscriptionError};
use crate::store::SubscriptionStore;

/// Subscribe `user_id` to `author_id`.
///
/// Self-subscription is rejected before touching the store; a duplicate is
/// detected by the store's uniqueness constraint.
pub fn subscribe<S>(store: &S, user_id: i32, author_id: i32) -> Result<(), SubscriptionError>
where
    S: SubscriptionStore + ?Sized,
{
    if user_id == author_id {
        return Err(SubscriptionError::SelfSubscription);
    }

    match store.insert_subscription(user_id, author_id) {
        Ok(()) => {
            tracing::debug!(user_id, author_id, "subscribed");
            Ok(())
        }
        Err(StoreError::UniqueViolation) => Err(SubscriptionError::AlreadySubscribed),
        Err(StoreError::CheckViolation) => Err(SubscriptionError::SelfSubscription),
        Err(e) => Err(SubscriptionError::Store(e)),
    }
}

pub fn unsubscribe<S>(store: &S, user_id: i32, author_id: i32) -> Result<(), SubscriptionError>
where
    S: SubscriptionStore + ?Sized,
{
    if store.delete_subscription(user_id, author_id)? {
        tracing::debug!(user_id, author_id, "unsubscribed");
        Ok(())
    } else {
        Err(SubscriptionError::NotSubscribed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_self_subscription_rejected() {
        let store = MemoryStore::new();
        for id in [1, 42, i32::MAX] {
            assert_eq!(
                subscribe(&store, id, id),
                Err(SubscriptionError::SelfSubscription)
            );
        }
        assert!(store.authors_followed_by(1).is_empty());
    }

    #[test]
    fn test_duplicate_subscription() {
        let store = MemoryStore::new();
        subscribe(&store, 1, 2).unwrap();
        assert_eq!(
            subscribe(&store, 1, 2),
            Err(SubscriptionError::AlreadySubscribed)
        );
        // the reverse direction is a different subscription
        subscribe(&store, 2, 1).unwrap();
    }

    #[test]
    fn test_unsubscribe() {
        let store = MemoryStore::new();
        subscribe(&store, 1, 2).unwrap();
        subscribe(&store, 1, 3).unwrap();
        assert_eq!(store.authors_followed_by(1), vec![2, 3]);

        unsubscribe(&store, 1, 2).unwrap();
        assert_eq!(store.authors_followed_by(1), vec![3]);
        assert_eq!(
            unsubscribe(&store, 1, 2),
            Err(SubscriptionError::NotSubscribed)
        );
    }
}
