use super::access::authored_recipe;
use super::payload::{RecipePayload, RecipeRequest};
use super::persist::{check_references, delete_image, set_ingredients, set_tags, store_image};
use super::representation::{recipe_response, RecipeResponse};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body(
        content(
            (RecipeRequest = "application/json"),
            (RecipeRequest = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized", body = DetailResponse),
        (status = 403, description = "Not the author", body = DetailResponse),
        (status = 404, description = "Recipe not found", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: RecipePayload,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.conn()?;
    let existing = authored_recipe(&mut conn, id, &user)?;

    let fields = payload.validate(true)?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        check_references(conn, &fields)?;
        let image_id = fields
            .image
            .as_ref()
            .map(|image| store_image(conn, image))
            .transpose()?;

        let changes = RecipeChanges {
            name: fields.name.as_deref(),
            image_id,
            text: fields.text.as_deref(),
            cooking_time: fields.cooking_time,
        };

        let recipe = if changes.is_empty() {
            existing.clone()
        } else {
            diesel::update(recipes::table.find(existing.id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        if let Some(tags) = &fields.tags {
            set_tags(conn, recipe.id, tags)?;
        }
        if let Some(ingredients) = &fields.ingredients {
            set_ingredients(conn, recipe.id, ingredients)?;
        }

        // The replaced image is no longer referenced by any recipe
        if image_id.is_some() {
            delete_image(conn, existing.image_id)?;
        }

        Ok(recipe)
    })?;

    let response = recipe_response(&mut conn, &state.config, Some(&user), recipe)?;
    Ok(Json(response))
}
