use super::representation::{subscribed_authors, UserResponse};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = DetailResponse)
    ),
    security(
        (),
        ("token_auth" = [])
    )
)]
pub async fn get_user(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let viewer = viewer.map(|AuthUser(user)| user);
    let mut conn = state.conn()?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)?;
    let subscribed = subscribed_authors(&mut conn, viewer.as_ref(), &[user.id])?;

    Ok(Json(UserResponse::new(&user, subscribed.contains(&user.id))))
}
