use super::representation::{recipe_responses, RecipeResponse};
use crate::api::pagination::{PageParams, Paginated};
use crate::api::{ApiError, DetailResponse};
use crate::auth::AuthUser;
use crate::models::Recipe;
use crate::raw_sql::count_over;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags};
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use diesel::dsl::not;
use diesel::prelude::*;
use utoipa::IntoParams;

/// Documentation for the filter query parameters; parsed by [`parse_filters`].
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct RecipeFilterParams {
    /// Only recipes by this user ID
    author: Option<i32>,
    /// Tag slug; repeat to match recipes with any of the tags
    tags: Option<Vec<String>>,
    /// `1` for the caller's favorites only, `0` to exclude them
    is_favorited: Option<u8>,
    /// `1` for recipes in the caller's shopping cart only, `0` to exclude them
    is_in_shopping_cart: Option<u8>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecipeFilters {
    pub author: Option<i32>,
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parse filters from raw query pairs. `tags` may repeat.
pub fn parse_filters(pairs: &[(String, String)]) -> Result<RecipeFilters, ApiError> {
    let mut filters = RecipeFilters::default();

    for (key, value) in pairs {
        match key.as_str() {
            "author" if !value.is_empty() => {
                let author = value
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::field("author", "Enter a number."))?;
                filters.author = Some(author);
            }
            "tags" if !value.is_empty() => filters.tags.push(value.clone()),
            "is_favorited" => filters.is_favorited = parse_flag(value),
            "is_in_shopping_cart" => filters.is_in_shopping_cart = parse_flag(value),
            _ => {}
        }
    }

    Ok(filters)
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(PageParams, RecipeFilterParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = Paginated<RecipeResponse>),
        (status = 400, description = "Invalid filter"),
        (status = 404, description = "Invalid page", body = DetailResponse)
    ),
    security(
        (),
        ("token_auth" = [])
    )
)]
pub async fn list_recipes(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(page_params): Query<PageParams>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Paginated<RecipeResponse>>, ApiError> {
    let viewer = viewer.map(|AuthUser(user)| user);
    let page = page_params.resolve(state.config.page_size)?;
    let filters = parse_filters(&pairs)?;

    // Anonymous readers have no favorites or cart
    if viewer.is_none() && (filters.is_favorited == Some(true) || filters.is_in_shopping_cart == Some(true)) {
        return Ok(Json(page.wrap(0, Vec::new(), &uri)?));
    }

    let mut conn = state.conn()?;

    let mut query = recipes::table.into_boxed();

    if let Some(author) = filters.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filters.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(filters.tags.clone()))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some(user) = &viewer {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user.id))
            .select(favorites::recipe_id);
        match filters.is_favorited {
            Some(true) => query = query.filter(recipes::id.eq_any(favorited)),
            Some(false) => query = query.filter(not(recipes::id.eq_any(favorited))),
            None => {}
        }

        let in_cart = shopping_cart::table
            .filter(shopping_cart::user_id.eq(user.id))
            .select(shopping_cart::recipe_id);
        match filters.is_in_shopping_cart {
            Some(true) => query = query.filter(recipes::id.eq_any(in_cart)),
            Some(false) => query = query.filter(not(recipes::id.eq_any(in_cart))),
            None => {}
        }
    }

    let rows: Vec<(Recipe, i64)> = query
        .select((Recipe::as_select(), count_over()))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .limit(page.size)
        .offset(page.offset())
        .load(&mut conn)?;

    let count = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let recipes = rows.into_iter().map(|(recipe, _)| recipe).collect();
    let results = recipe_responses(&mut conn, &state.config, viewer.as_ref(), recipes)?;

    Ok(Json(page.wrap(count, results, &uri)?))
}
