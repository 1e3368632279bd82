use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to generate session token: {0}")]
    Token(#[from] anyhow::Error),

    #[error("Failed to store session: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Issue a new session for `user_id` and return the plain token.
///
/// Only the token's hash is stored.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: i32,
    ttl_days: i64,
) -> Result<String, SessionError> {
    let token = generate_token()?;
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Delete the session belonging to `token`. Returns whether one existed.
pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<bool, diesel::result::Error> {
    let token_hash = hash_token(token);
    let deleted =
        diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)?;
    Ok(deleted > 0)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}
