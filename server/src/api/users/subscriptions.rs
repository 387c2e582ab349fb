use super::representation::{followed_authors, users_with_recipes, UserWithRecipes};
use crate::api::pagination::{PageParams, Paginated};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitParams {
    /// Maximum number of recipes embedded per author (newest first)
    #[param(value_type = Option<i64>, minimum = 0)]
    pub recipes_limit: Option<String>,
}

impl RecipesLimitParams {
    pub fn resolve(&self) -> Result<Option<usize>, ApiError> {
        match self.recipes_limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
                ApiError::field(
                    "recipes_limit",
                    "A valid non-negative integer is required.",
                )
            }),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = "users",
    params(PageParams, RecipesLimitParams),
    responses(
        (status = 200, description = "Authors the caller follows", body = Paginated<UserWithRecipes>),
        (status = 400, description = "Invalid recipes_limit"),
        (status = 401, description = "Unauthorized", body = DetailResponse),
        (status = 404, description = "Invalid page", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(page_params): Query<PageParams>,
    Query(limit_params): Query<RecipesLimitParams>,
) -> Result<Json<Paginated<UserWithRecipes>>, ApiError> {
    let page = page_params.resolve(state.config.page_size)?;
    let recipes_limit = limit_params.resolve()?;
    let mut conn = state.conn()?;

    let (authors, count) = followed_authors(&mut conn, &user, page.size, page.offset())?;
    let results = users_with_recipes(
        &mut conn,
        &state.config,
        Some(&user),
        &authors,
        recipes_limit,
    )?;

    Ok(Json(page.wrap(count, results, &uri)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(raw: Option<&str>) -> Result<Option<usize>, ApiError> {
        RecipesLimitParams {
            recipes_limit: raw.map(str::to_string),
        }
        .resolve()
    }

    #[test]
    fn test_recipes_limit() {
        assert_eq!(limit(None).unwrap(), None);
        assert_eq!(limit(Some("")).unwrap(), None);
        assert_eq!(limit(Some("2")).unwrap(), Some(2));
        assert_eq!(limit(Some("0")).unwrap(), Some(0));
        assert!(matches!(limit(Some("-1")), Err(ApiError::Fields(_))));
        assert!(matches!(limit(Some("two")), Err(ApiError::Fields(_))));
    }
}
