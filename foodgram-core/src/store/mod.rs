//! Persistence seams for the membership and subscription services.
//!
//! The server implements these traits over Postgres; [`MemoryStore`] keeps
//! everything in process for tests. Implementations must report a duplicate
//! insert as [`StoreError::UniqueViolation`] so the services can turn it into
//! the right domain error without a read-before-write.

mod memory;

pub use memory::MemoryStore;

use std::fmt;

use crate::error::StoreError;
use crate::types::MembershipKind;

/// Favorites and shopping cart rows, keyed by (user, recipe).
pub trait MembershipStore: Send + Sync + fmt::Debug {
    /// Insert the pair. A pair that already exists is a `UniqueViolation`.
    fn insert_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), StoreError>;

    /// Delete the pair, returning whether a row was removed.
    fn delete_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError>;

    fn is_member(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError>;
}

/// Subscription rows, keyed by (follower, author).
pub trait SubscriptionStore: Send + Sync + fmt::Debug {
    fn insert_subscription(&self, user_id: i32, author_id: i32) -> Result<(), StoreError>;

    fn delete_subscription(&self, user_id: i32, author_id: i32) -> Result<bool, StoreError>;
}
