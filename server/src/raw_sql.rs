//! SQL fragments that Diesel's DSL cannot express.
//!
//! Nothing here takes user input; anything that ever does must go through
//! `.bind()`.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::BigInt;

/// `COUNT(*) OVER()`: total matching rows, computed before LIMIT/OFFSET.
pub fn count_over() -> SqlLiteral<BigInt> {
    sql::<BigInt>("COUNT(*) OVER()")
}

/// The newest `$2` recipes of each author in `$1`, newest first overall.
///
/// A `ROW_NUMBER()` window can only be filtered from an outer query, which
/// Diesel cannot build. Both parameters are passed with `.bind()`.
pub const LATEST_RECIPES_PER_AUTHOR_QUERY: &str = "SELECT id, author_id, name, image_id, text, cooking_time, pub_date \
    FROM (SELECT r.*, ROW_NUMBER() OVER ( \
              PARTITION BY r.author_id ORDER BY r.pub_date DESC, r.id DESC \
          ) AS position \
          FROM recipes r \
          WHERE r.author_id = ANY($1)) ranked \
    WHERE position <= $2 \
    ORDER BY pub_date DESC, id DESC";
