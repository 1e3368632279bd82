use crate::api::responses::{load_subscription_responses, SubscriptionResponse};
use crate::api::{ApiError, ErrorResponse, PathParam, QueryParams};
use crate::auth::AuthUser;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::users;
use crate::store::PgStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use foodgram_core::pagination::parse_recipes_limit;
use foodgram_core::subscriptions;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitParams {
    /// Maximum number of the author's recipes to include
    pub recipes_limit: Option<String>,
}

fn find_author(conn: &mut PgConnection, id: i32) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found"))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(("id" = i32, Path, description = "Author ID"), RecipesLimitParams),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Cannot subscribe to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Already subscribed", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
    QueryParams(params): QueryParams<RecipesLimitParams>,
) -> Result<impl IntoResponse, ApiError> {
    // The store checks out its own connection; never hold one across it
    let author = {
        let mut conn = get_conn(&pool)?;
        find_author(&mut conn, id)?
    };

    subscriptions::subscribe(&PgStore::new(pool.clone()), user.id, author.id)?;

    let limit = parse_recipes_limit(params.recipes_limit.as_deref());
    let mut conn = get_conn(&pool)?;
    let response = load_subscription_responses(&mut conn, vec![author], limit)?
        .pop()
        .ok_or(ApiError::Internal("Failed to load subscription"))?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode, ApiError> {
    let author = {
        let mut conn = get_conn(&pool)?;
        find_author(&mut conn, id)?
    };

    subscriptions::unsubscribe(&PgStore::new(pool), user.id, author.id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATIONS;
    use crate::models::NewUser;
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel_migrations::MigrationHarness;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn insert_user(conn: &mut PgConnection, username: &str) -> User {
        let email = format!("{}@example.com", username);
        diesel::insert_into(users::table)
            .values(&NewUser {
                email: &email,
                username,
                first_name: "Test",
                last_name: "Cook",
                password_hash: "unused",
            })
            .returning(User::as_returning())
            .get_result(conn)
            .unwrap()
    }

    /// A pool of one connection deadlocks any handler that keeps its own
    /// connection checked out while the store asks for another.
    #[tokio::test]
    #[ignore = "needs DATABASE_URL pointing at a scratch Postgres database"]
    async fn test_subscribe_round_trip_on_single_connection_pool() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(2))
            .build(ConnectionManager::<PgConnection>::new(url))
            .unwrap();

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let (reader, author) = {
            let mut conn = pool.get().unwrap();
            conn.run_pending_migrations(MIGRATIONS).unwrap();
            (
                insert_user(&mut conn, &format!("reader{}", stamp)),
                insert_user(&mut conn, &format!("author{}", stamp)),
            )
        };
        let pool = Arc::new(pool);

        let response = subscribe(
            AuthUser(reader.clone()),
            State(pool.clone()),
            PathParam(author.id),
            QueryParams(RecipesLimitParams::default()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let status = unsubscribe(
            AuthUser(reader.clone()),
            State(pool.clone()),
            PathParam(author.id),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let mut conn = pool.get().unwrap();
        diesel::delete(users::table.filter(users::id.eq_any([reader.id, author.id])))
            .execute(&mut conn)
            .unwrap();
    }
}
