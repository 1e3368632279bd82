use crate::api::pagination::{page_links, PageParams};
use crate::api::responses::{load_user_responses, UserResponse};
use crate::api::{ApiError, ErrorResponse, QueryParams};
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserListResponse {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<UserResponse>,
}

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    QueryParams(params): QueryParams<PageParams>,
    uri: Uri,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let request = params.request(&config);

    let count: i64 = users::table.count().get_result(&mut conn)?;
    let rows: Vec<User> = users::table
        .order(users::id)
        .limit(request.limit)
        .offset(request.offset())
        .select(User::as_select())
        .load(&mut conn)?;

    let results = load_user_responses(&mut conn, viewer.as_ref(), rows)?;
    let links = page_links(&config, &uri, request, count);

    Ok((
        StatusCode::OK,
        Json(UserListResponse {
            count: links.count,
            next: links.next,
            previous: links.previous,
            results,
        }),
    ))
}
