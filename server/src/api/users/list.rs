use super::representation::{user_responses, UserResponse};
use crate::api::pagination::{PageParams, Paginated};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::users;
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Registered users", body = Paginated<UserResponse>),
        (status = 404, description = "Invalid page", body = DetailResponse)
    ),
    security(
        (),
        ("token_auth" = [])
    )
)]
pub async fn list_users(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let viewer = viewer.map(|AuthUser(user)| user);
    let page = params.resolve(state.config.page_size)?;
    let mut conn = state.conn()?;

    let rows: Vec<(User, i64)> = users::table
        .select((User::as_select(), count_over()))
        .order(users::id.asc())
        .limit(page.size)
        .offset(page.offset())
        .load(&mut conn)?;

    let count = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let users: Vec<User> = rows.into_iter().map(|(user, _)| user).collect();
    let results = user_responses(&mut conn, viewer.as_ref(), &users)?;

    Ok(Json(page.wrap(count, results, &uri)?))
}
