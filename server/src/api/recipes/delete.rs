use super::access::authored_recipe;
use super::persist::delete_image;
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = DetailResponse),
        (status = 403, description = "Not the author", body = DetailResponse),
        (status = 404, description = "Recipe not found", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    let recipe = authored_recipe(&mut conn, id, &user)?;

    // Tags, ingredient amounts, favorites and cart entries cascade
    conn.transaction::<(), ApiError, _>(|conn| {
        diesel::delete(recipes::table.find(recipe.id)).execute(conn)?;
        delete_image(conn, recipe.image_id)?;
        Ok(())
    })?;

    tracing::info!("User {} deleted recipe {}", user.id, recipe.id);

    Ok(StatusCode::NO_CONTENT)
}
