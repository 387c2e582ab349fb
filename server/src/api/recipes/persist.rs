//! Database writes shared by recipe create and update.

use super::payload::{RecipeFields, RecipeImage};
use crate::api::{ApiError, FieldErrors};
use crate::models::{NewImage, NewRecipeIngredient, NewRecipeTag};
use crate::schema::{images, ingredients, recipe_ingredients, recipe_tags, tags};
use diesel::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

fn missing_ids(requested: &[i32], found: &[i32]) -> Vec<i32> {
    let found: HashSet<i32> = found.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

fn does_not_exist(ids: &[i32]) -> Vec<String> {
    ids.iter()
        .map(|id| format!("Invalid pk \"{}\" - object does not exist.", id))
        .collect()
}

/// Reject tag or ingredient ids that do not exist, as field errors.
///
/// Call inside the write transaction: found rows stay share-locked until it
/// ends, so they cannot be deleted before the association rows are written.
pub fn check_references(conn: &mut PgConnection, fields: &RecipeFields) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if let Some(tag_ids) = &fields.tags {
        let found: Vec<i32> = tags::table
            .filter(tags::id.eq_any(tag_ids))
            .select(tags::id)
            .for_share()
            .load(conn)?;
        let missing = missing_ids(tag_ids, &found);
        if !missing.is_empty() {
            errors.insert("tags".to_string(), does_not_exist(&missing));
        }
    }

    if let Some(amounts) = &fields.ingredients {
        let ids: Vec<i32> = amounts.iter().map(|(id, _)| *id).collect();
        let found: Vec<i32> = ingredients::table
            .filter(ingredients::id.eq_any(&ids))
            .select(ingredients::id)
            .for_share()
            .load(conn)?;
        let missing = missing_ids(&ids, &found);
        if !missing.is_empty() {
            errors.insert("ingredients".to_string(), does_not_exist(&missing));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Fields(errors))
    }
}

pub fn store_image(conn: &mut PgConnection, image: &RecipeImage) -> QueryResult<Uuid> {
    diesel::insert_into(images::table)
        .values(&NewImage {
            content_type: image.content_type,
            data: &image.data,
        })
        .returning(images::id)
        .get_result(conn)
}

pub fn delete_image(conn: &mut PgConnection, image_id: Uuid) -> QueryResult<usize> {
    diesel::delete(images::table.find(image_id)).execute(conn)
}

/// Replace the recipe's tags with `tag_ids`.
pub fn set_tags(conn: &mut PgConnection, recipe_id: i32, tag_ids: &[i32]) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

/// Replace the recipe's ingredient amounts with `amounts`.
pub fn set_ingredients(
    conn: &mut PgConnection,
    recipe_id: i32,
    amounts: &[(i32, i32)],
) -> QueryResult<()> {
    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;

    let rows: Vec<NewRecipeIngredient> = amounts
        .iter()
        .map(|&(ingredient_id, amount)| NewRecipeIngredient {
            recipe_id,
            ingredient_id,
            amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ids_keeps_request_order() {
        assert_eq!(missing_ids(&[5, 1, 9, 2], &[1, 2]), vec![5, 9]);
        assert!(missing_ids(&[1], &[1]).is_empty());
    }

    #[test]
    fn test_does_not_exist_message() {
        assert_eq!(
            does_not_exist(&[42]),
            vec!["Invalid pk \"42\" - object does not exist.".to_string()]
        );
    }
}
