use crate::api::{ApiError, ErrorResponse};
use crate::db::{get_conn, DbPool};
use crate::models::Tag;
use crate::schema::tags;
use axum::{extract::State, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags/",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(State(pool): State<Arc<DbPool>>) -> Result<Json<Vec<Tag>>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let rows = tags::table
        .order(tags::id)
        .select(Tag::as_select())
        .load(&mut conn)?;

    Ok(Json(rows))
}
