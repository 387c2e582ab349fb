use super::representation::{users_with_recipes, UserWithRecipes};
use super::subscriptions::RecipesLimitParams;
use crate::api::{ApiError, DetailResponse, ErrorResponse};
use crate::auth::AuthUser;
use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

fn find_author(conn: &mut PgConnection, id: i32) -> Result<User, ApiError> {
    Ok(users::table
        .find(id)
        .select(User::as_select())
        .first(conn)?)
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author's user ID"),
        RecipesLimitParams,
    ),
    responses(
        (status = 201, description = "Subscribed", body = UserWithRecipes),
        (status = 400, description = "Self-subscription or already subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = DetailResponse),
        (status = 404, description = "Author not found", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<RecipesLimitParams>,
) -> Result<impl IntoResponse, ApiError> {
    let recipes_limit = params.resolve()?;
    let mut conn = state.conn()?;
    let author = find_author(&mut conn, id)?;

    if author.id == user.id {
        return Err(ApiError::domain("You cannot subscribe to yourself."));
    }

    let inserted = diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            user_id: user.id,
            author_id: author.id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(ApiError::domain("You are already subscribed to this author."));
    }

    tracing::info!("User {} subscribed to {}", user.id, author.id);

    let body = users_with_recipes(
        &mut conn,
        &state.config,
        Some(&user),
        std::slice::from_ref(&author),
        recipes_limit,
    )?
    .pop()
    .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author's user ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = DetailResponse),
        (status = 404, description = "Author not found", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    let author = find_author(&mut conn, id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user.id))
            .filter(subscriptions::author_id.eq(author.id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::domain("You are not subscribed to this author."));
    }

    Ok(StatusCode::NO_CONTENT)
}
