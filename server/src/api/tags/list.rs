use crate::api::{ApiError, DetailResponse};
use crate::models::Tag;
use crate::schema::tags;
use crate::AppState;
use axum::{extract::State, Json};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/api/tags/",
    tag = "tags",
    responses(
        (status = 200, description = "All tags, ordered by name", body = Vec<Tag>),
        (status = 500, description = "Internal error", body = DetailResponse)
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let mut conn = state.conn()?;

    let tags: Vec<Tag> = tags::table
        .select(Tag::as_select())
        .order((tags::name.asc(), tags::id.asc()))
        .load(&mut conn)?;

    Ok(Json(tags))
}
