use crate::api::{ApiError, DetailResponse};
use crate::models::Ingredient;
use crate::schema::ingredients;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive prefix of the ingredient name
    pub search: Option<String>,
}

/// `ILIKE` pattern matching names that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}%", escaped)
}

#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = "ingredients",
    params(SearchParams),
    responses(
        (status = 200, description = "Ingredients, ordered by name", body = Vec<Ingredient>),
        (status = 500, description = "Internal error", body = DetailResponse)
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let mut conn = state.conn()?;

    let mut query = ingredients::table
        .select(Ingredient::as_select())
        .into_boxed();

    if let Some(search) = params.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            query = query.filter(ingredients::name.ilike(prefix_pattern(search)));
        }
    }

    let results = query
        .order((ingredients::name.asc(), ingredients::id.asc()))
        .load(&mut conn)?;

    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("сах"), "сах%");
        assert_eq!(prefix_pattern("50%_"), "50\\%\\_%");
    }
}
