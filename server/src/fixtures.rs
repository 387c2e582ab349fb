//! Loading ingredient and tag fixtures into the database.

use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use diesel::prelude::*;
use foodgram_core::{parse_ingredients, parse_tags, FixtureError, FixtureFormat};
use std::path::Path;

/// Rows per INSERT; keeps bind parameters well under PostgreSQL's limit.
const BATCH_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

fn read(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Insert ingredients from a CSV or JSON file, skipping existing
/// (name, measurement_unit) pairs. Returns the number of new rows.
pub fn import_ingredients(conn: &mut PgConnection, path: &Path) -> Result<usize, ImportError> {
    let format = FixtureFormat::from_path(path)?;
    let fixtures = parse_ingredients(&read(path)?, format)?;

    conn.transaction::<usize, ImportError, _>(|conn| {
        let mut inserted = 0;
        for chunk in fixtures.chunks(BATCH_SIZE) {
            let rows: Vec<NewIngredient> = chunk
                .iter()
                .map(|f| NewIngredient {
                    name: &f.name,
                    measurement_unit: &f.measurement_unit,
                })
                .collect();
            inserted += diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        tracing::info!(
            "Imported {} of {} ingredients from {}",
            inserted,
            fixtures.len(),
            path.display()
        );
        Ok(inserted)
    })
}

/// Insert tags from a JSON file, skipping any that clash with an existing
/// name, color or slug. Returns the number of new rows.
pub fn import_tags(conn: &mut PgConnection, path: &Path) -> Result<usize, ImportError> {
    let fixtures = parse_tags(&read(path)?)?;

    let rows: Vec<NewTag> = fixtures
        .iter()
        .map(|t| NewTag {
            name: t.name.trim(),
            color: &t.color,
            slug: &t.slug,
        })
        .collect();

    let inserted = diesel::insert_into(tags::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)?;

    tracing::info!(
        "Imported {} of {} tags from {}",
        inserted,
        fixtures.len(),
        path.display()
    );
    Ok(inserted)
}
