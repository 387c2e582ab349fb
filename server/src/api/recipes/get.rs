use super::access::find_recipe;
use super::representation::{recipe_response, RecipeResponse};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = DetailResponse)
    ),
    security(
        (),
        ("token_auth" = [])
    )
)]
pub async fn get_recipe(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let viewer = viewer.map(|AuthUser(user)| user);
    let mut conn = state.conn()?;

    let recipe = find_recipe(&mut conn, id)?;
    let response = recipe_response(&mut conn, &state.config, viewer.as_ref(), recipe)?;

    Ok(Json(response))
}
