//! Postgres implementation of the core store traits.

use std::fmt;
use std::sync::Arc;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::{MembershipKind, MembershipStore, StoreError, SubscriptionStore};

use crate::db::{DbConn, DbPool};
use crate::schema::{favorites, shopping_carts, subscriptions};

/// Store backed by the connection pool. Each call checks out its own
/// connection, so uniqueness races are settled by the database.
#[derive(Clone)]
pub struct PgStore {
    pool: Arc<DbPool>,
}

impl PgStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Backend(format!("connection pool: {}", e)))
    }
}

impl fmt::Debug for PgStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PgStore")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

fn store_error(e: DieselError) -> StoreError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            StoreError::CheckViolation
        }
        other => StoreError::Backend(other.to_string()),
    }
}

impl MembershipStore for PgStore {
    fn insert_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let inserted = match kind {
            MembershipKind::Favorite => diesel::insert_into(favorites::table)
                .values((
                    favorites::user_id.eq(user_id),
                    favorites::recipe_id.eq(recipe_id),
                ))
                .execute(&mut conn),
            MembershipKind::ShoppingCart => diesel::insert_into(shopping_carts::table)
                .values((
                    shopping_carts::user_id.eq(user_id),
                    shopping_carts::recipe_id.eq(recipe_id),
                ))
                .execute(&mut conn),
        };
        inserted.map(|_| ()).map_err(store_error)
    }

    fn delete_membership(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let deleted = match kind {
            MembershipKind::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(&mut conn),
            MembershipKind::ShoppingCart => diesel::delete(
                shopping_carts::table
                    .filter(shopping_carts::user_id.eq(user_id))
                    .filter(shopping_carts::recipe_id.eq(recipe_id)),
            )
            .execute(&mut conn),
        };
        deleted.map(|n| n > 0).map_err(store_error)
    }

    fn is_member(
        &self,
        kind: MembershipKind,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let found = match kind {
            MembershipKind::Favorite => diesel::select(diesel::dsl::exists(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            ))
            .get_result(&mut conn),
            MembershipKind::ShoppingCart => diesel::select(diesel::dsl::exists(
                shopping_carts::table
                    .filter(shopping_carts::user_id.eq(user_id))
                    .filter(shopping_carts::recipe_id.eq(recipe_id)),
            ))
            .get_result(&mut conn),
        };
        found.map_err(store_error)
    }
}

impl SubscriptionStore for PgStore {
    fn insert_subscription(&self, user_id: i32, author_id: i32) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::user_id.eq(user_id),
                subscriptions::author_id.eq(author_id),
            ))
            .execute(&mut conn)
            .map(|_| ())
            .map_err(store_error)
    }

    fn delete_subscription(&self, user_id: i32, author_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::author_id.eq(author_id)),
        )
        .execute(&mut conn)
        .map(|n| n > 0)
        .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_errors_are_classified() {
        let unique = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        );
        assert_eq!(store_error(unique), StoreError::UniqueViolation);

        let check = DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("subscriptions_no_self".to_string()),
        );
        assert_eq!(store_error(check), StoreError::CheckViolation);

        assert!(matches!(
            store_error(DieselError::NotFound),
            StoreError::Backend(_)
        ));
    }
}
