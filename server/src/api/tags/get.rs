use crate::api::{ApiError, DetailResponse};
use crate::models::Tag;
use crate::schema::tags;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 404, description = "Tag not found", body = DetailResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Tag>, ApiError> {
    let mut conn = state.conn()?;

    let tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)?;

    Ok(Json(tag))
}
