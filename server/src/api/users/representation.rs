//! User representations shared by the user, subscription and recipe endpoints.

use crate::api::recipes::representation::RecipeMinified;
use crate::config::Config;
use crate::models::{Recipe, User};
use crate::raw_sql::{count_over, LATEST_RECIPES_PER_AUTHOR_QUERY};
use crate::schema::{recipes, subscriptions};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Integer};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requesting user follows this user (false for anonymous readers)
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

/// A followed author together with (some of) their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRecipes {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeMinified>,
    /// Total number of recipes by this author, regardless of `recipes_limit`
    pub recipes_count: i64,
}

/// Which of `author_ids` the viewer follows.
pub fn subscribed_authors(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    author_ids: &[i32],
) -> QueryResult<HashSet<i32>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer.id))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)?;

    Ok(ids.into_iter().collect())
}

pub fn user_responses(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    users: &[User],
) -> QueryResult<Vec<UserResponse>> {
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(conn, viewer, &ids)?;

    Ok(users
        .iter()
        .map(|u| UserResponse::new(u, subscribed.contains(&u.id)))
        .collect())
}

/// Split `recipes` per author, keeping their order.
pub fn group_by_author(recipes: Vec<Recipe>) -> HashMap<i32, Vec<Recipe>> {
    let mut grouped: HashMap<i32, Vec<Recipe>> = HashMap::new();
    for recipe in recipes {
        grouped.entry(recipe.author_id).or_default().push(recipe);
    }
    grouped
}

/// Newest recipes of each author, at most `limit` per author when given.
fn latest_recipes(
    conn: &mut PgConnection,
    author_ids: &[i32],
    limit: Option<usize>,
) -> QueryResult<Vec<Recipe>> {
    match limit {
        Some(limit) => sql_query(LATEST_RECIPES_PER_AUTHOR_QUERY)
            .bind::<Array<Integer>, _>(author_ids)
            .bind::<BigInt, _>(i64::try_from(limit).unwrap_or(i64::MAX))
            .load(conn),
        None => recipes::table
            .filter(recipes::author_id.eq_any(author_ids))
            .select(Recipe::as_select())
            .order((recipes::pub_date.desc(), recipes::id.desc()))
            .load(conn),
    }
}

/// Build `UserWithRecipes` for each author in `authors`, keeping their order.
pub fn users_with_recipes(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    authors: &[User],
    recipes_limit: Option<usize>,
) -> QueryResult<Vec<UserWithRecipes>> {
    let ids: Vec<i32> = authors.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(conn, viewer, &ids)?;

    let counts: HashMap<i32, i64> = recipes::table
        .filter(recipes::author_id.eq_any(&ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();
    let mut grouped = group_by_author(latest_recipes(conn, &ids, recipes_limit)?);

    Ok(authors
        .iter()
        .map(|author| {
            let recipes = grouped.remove(&author.id).unwrap_or_default();
            UserWithRecipes {
                user: UserResponse::new(author, subscribed.contains(&author.id)),
                recipes: recipes
                    .iter()
                    .map(|r| RecipeMinified::new(r, config))
                    .collect(),
                recipes_count: counts.get(&author.id).copied().unwrap_or(0),
            }
        })
        .collect())
}

/// Page of users the viewer follows, with the total count.
pub fn followed_authors(
    conn: &mut PgConnection,
    viewer: &User,
    limit: i64,
    offset: i64,
) -> QueryResult<(Vec<User>, i64)> {
    use crate::schema::users;

    let rows: Vec<(User, i64)> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::user_id.eq(viewer.id))
        .select((User::as_select(), count_over()))
        .order((subscriptions::created_at.desc(), subscriptions::id.desc()))
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    let count = rows.first().map(|(_, c)| *c).unwrap_or(0);
    Ok((rows.into_iter().map(|(u, _)| u).collect(), count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn recipe(id: i32, author_id: i32) -> Recipe {
        Recipe {
            id,
            author_id,
            name: format!("recipe {}", id),
            image_id: Uuid::nil(),
            text: String::new(),
            cooking_time: 10,
            pub_date: Utc.timestamp_opt(1_700_000_000 - i64::from(id), 0).unwrap(),
        }
    }

    #[test]
    fn test_group_by_author_keeps_order() {
        let recipes = vec![recipe(1, 7), recipe(4, 8), recipe(2, 7), recipe(3, 7)];
        let grouped = group_by_author(recipes);

        let ids = |author: i32| grouped[&author].iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(7), vec![1, 2, 3]);
        assert_eq!(ids(8), vec![4]);
        assert!(!grouped.contains_key(&9));
    }
}
