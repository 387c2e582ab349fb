use super::payload::{RecipePayload, RecipeRequest};
use super::persist::{check_references, set_ingredients, set_tags, store_image};
use super::representation::{recipe_response, RecipeResponse};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = "recipes",
    request_body(
        content(
            (RecipeRequest = "application/json"),
            (RecipeRequest = "multipart/form-data")
        )
    ),
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    payload: RecipePayload,
) -> Result<impl IntoResponse, ApiError> {
    let fields = payload.validate(false)?;
    let (Some(name), Some(text), Some(cooking_time), Some(image), Some(tags), Some(ingredients)) = (
        fields.name.as_deref(),
        fields.text.as_deref(),
        fields.cooking_time,
        fields.image.as_ref(),
        fields.tags.as_deref(),
        fields.ingredients.as_deref(),
    ) else {
        return Err(ApiError::Internal("validated recipe is incomplete".to_string()));
    };

    let mut conn = state.conn()?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        check_references(conn, &fields)?;
        let image_id = store_image(conn, image)?;

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name,
                image_id,
                text,
                cooking_time,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        set_tags(conn, recipe.id, tags)?;
        set_ingredients(conn, recipe.id, ingredients)?;

        Ok(recipe)
    })?;

    tracing::info!("User {} created recipe {}", user.id, recipe.id);

    let response = recipe_response(&mut conn, &state.config, Some(&user), recipe)?;
    Ok((StatusCode::CREATED, Json(response)))
}
