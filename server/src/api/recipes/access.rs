use crate::api::ApiError;
use crate::models::{Recipe, User};
use crate::schema::recipes;
use diesel::prelude::*;

pub fn find_recipe(conn: &mut PgConnection, id: i32) -> Result<Recipe, ApiError> {
    Ok(recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)?)
}

/// Load a recipe the user may modify: 404 if it does not exist, 403 if
/// someone else wrote it.
pub fn authored_recipe(conn: &mut PgConnection, id: i32, user: &User) -> Result<Recipe, ApiError> {
    let recipe = find_recipe(conn, id)?;
    if recipe.author_id != user.id {
        tracing::info!(
            "User {} denied write access to recipe {} by {}",
            user.id,
            recipe.id,
            recipe.author_id
        );
        return Err(ApiError::Forbidden);
    }
    Ok(recipe)
}
