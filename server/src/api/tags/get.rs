use crate::api::{ApiError, ErrorResponse, PathParam};
use crate::db::{get_conn, DbPool};
use crate::models::Tag;
use crate::schema::tags;
use axum::{
    extract::State,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(pool): State<Arc<DbPool>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Tag>, ApiError> {
    let mut conn = get_conn(&pool)?;

    let tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag not found"))?;

    Ok(Json(tag))
}
