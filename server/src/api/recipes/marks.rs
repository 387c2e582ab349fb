//! Per-user recipe markers: favorites and shopping-cart entries.

use super::access::find_recipe;
use super::representation::RecipeMinified;
use crate::api::ApiError;
use crate::models::{NewFavorite, NewShoppingCartEntry, User};
use crate::schema::{favorites, shopping_cart};
use crate::AppState;
use axum::{http::StatusCode, Json};
use diesel::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

impl RecipeMark {
    fn already_added(self) -> &'static str {
        match self {
            RecipeMark::Favorite => "Recipe is already added to favorites.",
            RecipeMark::ShoppingCart => "Recipe is already added to the shopping cart.",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            RecipeMark::Favorite => "Recipe is not present in favorites.",
            RecipeMark::ShoppingCart => "Recipe is not present in the shopping cart.",
        }
    }

    /// Insert the marker row. `false` when it already existed; the unique
    /// constraint decides between concurrent duplicate requests.
    fn insert(self, conn: &mut PgConnection, user_id: i32, recipe_id: i32) -> QueryResult<bool> {
        let inserted = match self {
            RecipeMark::Favorite => diesel::insert_into(favorites::table)
                .values(&NewFavorite { user_id, recipe_id })
                .on_conflict_do_nothing()
                .execute(conn)?,
            RecipeMark::ShoppingCart => diesel::insert_into(shopping_cart::table)
                .values(&NewShoppingCartEntry { user_id, recipe_id })
                .on_conflict_do_nothing()
                .execute(conn)?,
        };
        Ok(inserted > 0)
    }

    /// Delete the marker row. `false` when there was none.
    fn delete(self, conn: &mut PgConnection, user_id: i32, recipe_id: i32) -> QueryResult<bool> {
        let deleted = match self {
            RecipeMark::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?,
            RecipeMark::ShoppingCart => diesel::delete(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user_id))
                    .filter(shopping_cart::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?,
        };
        Ok(deleted > 0)
    }
}

pub fn add_mark(
    state: &AppState,
    user: &User,
    recipe_id: i32,
    mark: RecipeMark,
) -> Result<(StatusCode, Json<RecipeMinified>), ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    if !mark.insert(&mut conn, user.id, recipe.id)? {
        return Err(ApiError::domain(mark.already_added()));
    }
    tracing::debug!("User {} marked recipe {} as {:?}", user.id, recipe.id, mark);

    Ok((
        StatusCode::CREATED,
        Json(RecipeMinified::new(&recipe, &state.config)),
    ))
}

pub fn remove_mark(
    state: &AppState,
    user: &User,
    recipe_id: i32,
    mark: RecipeMark,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    if !mark.delete(&mut conn, user.id, recipe.id)? {
        return Err(ApiError::domain(mark.not_present()));
    }

    Ok(StatusCode::NO_CONTENT)
}
