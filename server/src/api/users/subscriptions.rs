use crate::api::pagination::{page_links, PageParams};
use crate::api::responses::{load_subscription_responses, SubscriptionResponse};
use crate::api::{ApiError, ErrorResponse, QueryParams};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::{subscriptions, users};
use axum::{
    extract::State,
    http::Uri,
    Json,
};
use diesel::prelude::*;
use foodgram_core::pagination::parse_recipes_limit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Maximum number of recipes shown per author
    pub recipes_limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<SubscriptionResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = "users",
    params(SubscriptionListParams),
    responses(
        (status = 200, description = "Followed authors, most recent first", body = SubscriptionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    QueryParams(params): QueryParams<SubscriptionListParams>,
    uri: Uri,
) -> Result<Json<SubscriptionListResponse>, ApiError> {
    let mut conn = get_conn(&pool)?;
    let request = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .request(&config);

    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .count()
        .get_result(&mut conn)?;

    let author_ids: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .order(subscriptions::id.desc())
        .limit(request.limit)
        .offset(request.offset())
        .select(subscriptions::author_id)
        .load(&mut conn)?;

    let mut by_id: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(&mut conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let authors: Vec<User> = author_ids.iter().filter_map(|id| by_id.remove(id)).collect();

    let limit = parse_recipes_limit(params.recipes_limit.as_deref());
    let results = load_subscription_responses(&mut conn, authors, limit)?;
    let links = page_links(&config, &uri, request, count);

    Ok(Json(SubscriptionListResponse {
        count: links.count,
        next: links.next,
        previous: links.previous,
        results,
    }))
}
