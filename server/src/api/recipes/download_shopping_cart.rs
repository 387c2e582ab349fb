use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::schema::{ingredients, recipe_ingredients, shopping_cart};
use crate::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use diesel::prelude::*;
use foodgram_core::shopping_list::{aggregate, render};
use foodgram_core::CartIngredient;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = "recipes",
    responses(
        (status = 200, description = "Shopping list as a text attachment", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = state.conn()?;

    let rows: Vec<(i32, String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .inner_join(
            shopping_cart::table.on(shopping_cart::recipe_id.eq(recipe_ingredients::recipe_id)),
        )
        .filter(shopping_cart::user_id.eq(user.id))
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let lines = aggregate(rows.into_iter().map(
        |(ingredient_id, name, measurement_unit, amount)| CartIngredient {
            ingredient_id,
            name,
            measurement_unit,
            amount,
        },
    ));
    tracing::debug!("Shopping list for user {} has {} lines", user.id, lines.len());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    state.config.shopping_list_filename
                ),
            ),
        ],
        render(&lines),
    ))
}
