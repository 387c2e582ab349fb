//! Recipe representations and the batch queries that fill them.
//!
//! Lists load the tags, ingredients, authors and viewer flags for a whole page
//! in a handful of queries instead of one round trip per recipe.

use crate::api::users::representation::{subscribed_authors, UserResponse};
use crate::api::ApiError;
use crate::config::Config;
use crate::models::{Ingredient, Recipe, Tag, User};
use crate::schema::{favorites, ingredients, recipe_ingredients, recipe_tags, shopping_cart, tags, users};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// URL of the recipe image
    pub image: String,
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i32,
}

/// Short form used by favorites, the shopping cart and subscriptions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeMinified {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeMinified {
    pub fn new(recipe: &Recipe, config: &Config) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: config.image_url(recipe.image_id),
            cooking_time: recipe.cooking_time,
        }
    }
}

fn group_by_recipe<T>(rows: Vec<(i32, T)>) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for (recipe_id, item) in rows {
        grouped.entry(recipe_id).or_default().push(item);
    }
    grouped
}

/// Recipe ids among `ids` that the viewer has favorited / put in the cart.
fn viewer_marks(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    ids: &[i32],
) -> QueryResult<(HashSet<i32>, HashSet<i32>)> {
    let Some(viewer) = viewer else {
        return Ok((HashSet::new(), HashSet::new()));
    };

    let favorited: Vec<i32> = favorites::table
        .filter(favorites::user_id.eq(viewer.id))
        .filter(favorites::recipe_id.eq_any(ids))
        .select(favorites::recipe_id)
        .load(conn)?;

    let in_cart: Vec<i32> = shopping_cart::table
        .filter(shopping_cart::user_id.eq(viewer.id))
        .filter(shopping_cart::recipe_id.eq_any(ids))
        .select(shopping_cart::recipe_id)
        .load(conn)?;

    Ok((favorited.into_iter().collect(), in_cart.into_iter().collect()))
}

/// Full representations for `recipes`, in the same order.
pub fn recipe_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    recipes: Vec<Recipe>,
) -> QueryResult<Vec<RecipeResponse>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let tag_rows: Vec<(i32, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .order((tags::name.asc(), tags::id.asc()))
        .load(conn)?;
    let mut tags_by_recipe = group_by_recipe(tag_rows);

    let ingredient_rows: Vec<(i32, Ingredient, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .select((
            recipe_ingredients::recipe_id,
            Ingredient::as_select(),
            recipe_ingredients::amount,
        ))
        .order(recipe_ingredients::id.asc())
        .load(conn)?;
    let mut ingredients_by_recipe = group_by_recipe(
        ingredient_rows
            .into_iter()
            .map(|(recipe_id, ingredient, amount)| {
                (
                    recipe_id,
                    RecipeIngredientResponse {
                        id: ingredient.id,
                        name: ingredient.name,
                        measurement_unit: ingredient.measurement_unit,
                        amount,
                    },
                )
            })
            .collect(),
    );

    let authors: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let subscribed = subscribed_authors(conn, viewer, &author_ids)?;
    let (favorited, in_cart) = viewer_marks(conn, viewer, &ids)?;

    let mut responses = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        // recipes.author_id is a NOT NULL foreign key
        let author = authors.get(&recipe.author_id).ok_or(diesel::result::Error::NotFound)?;

        responses.push(RecipeResponse {
            id: recipe.id,
            tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
            author: UserResponse::new(author, subscribed.contains(&author.id)),
            ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            image: config.image_url(recipe.image_id),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        });
    }

    Ok(responses)
}

/// Full representation of a single recipe.
pub fn recipe_response(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    recipe_responses(conn, config, viewer, vec![recipe])?
        .pop()
        .ok_or(ApiError::NotFound)
}
