use crate::api::{ApiError, DetailResponse, ErrorResponse, JsonBody, Validator};
use crate::auth::AuthUser;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use foodgram_core::validation::MAX_NAME_LENGTH;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: Option<String>,
    pub measurement_unit: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/ingredients/",
    tag = "ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Invalid request or duplicate", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_ingredient(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut v = Validator::new();
    let name = v.text("name", &req.name, MAX_NAME_LENGTH);
    let unit = v.text("measurement_unit", &req.measurement_unit, MAX_NAME_LENGTH);
    let (name, unit) = v.finish_with(name.zip(unit))?;

    let mut conn = state.conn()?;

    let created: Option<Ingredient> = diesel::insert_into(ingredients::table)
        .values(&NewIngredient {
            name,
            measurement_unit: unit,
        })
        .on_conflict_do_nothing()
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
        .optional()?;

    match created {
        Some(ingredient) => Ok((StatusCode::CREATED, Json(ingredient))),
        None => Err(ApiError::domain(
            "An ingredient with this name and measurement unit already exists.",
        )),
    }
}
