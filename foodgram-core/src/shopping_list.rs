//! Shopping-list aggregation.
//!
//! The server loads every recipe-ingredient row reachable through a user's
//! cart; this module folds those rows into one line per ingredient and
//! renders the downloadable text file.

use serde::Serialize;
use std::collections::HashMap;

/// One ingredient amount from one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredient {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Total quantity of one ingredient across the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListLine {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Group rows by ingredient and sum their amounts.
///
/// Lines come back sorted by ingredient name, then id, so the rendered file is
/// stable across requests.
pub fn aggregate<I>(rows: I) -> Vec<ShoppingListLine>
where
    I: IntoIterator<Item = CartIngredient>,
{
    let mut totals: HashMap<i32, ShoppingListLine> = HashMap::new();

    for row in rows {
        totals
            .entry(row.ingredient_id)
            .and_modify(|line| line.total_amount += i64::from(row.amount))
            .or_insert_with(|| ShoppingListLine {
                ingredient_id: row.ingredient_id,
                name: row.name.clone(),
                measurement_unit: row.measurement_unit.clone(),
                total_amount: i64::from(row.amount),
            });
    }

    let mut lines: Vec<ShoppingListLine> = totals.into_values().collect();
    lines.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
    });
    lines
}

/// Render lines as `"<name> - <amount> <unit>.\n"`, one per ingredient.
pub fn render(lines: &[ShoppingListLine]) -> String {
    lines
        .iter()
        .map(|line| {
            format!(
                "{} - {} {}.\n",
                line.name, line.total_amount, line.measurement_unit
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, name: &str, unit: &str, amount: i32) -> CartIngredient {
        CartIngredient {
            ingredient_id: id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_empty_cart_renders_empty_file() {
        let lines = aggregate(Vec::new());
        assert!(lines.is_empty());
        assert_eq!(render(&lines), "");
    }

    #[test]
    fn test_same_name_different_ingredient_stays_separate() {
        // "salt" measured in grams and in pinches are distinct ingredients
        let lines = aggregate(vec![row(2, "salt", "pinch", 1), row(1, "salt", "g", 5)]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].ingredient_id, 1);
        assert_eq!(render(&lines), "salt - 5 g.\nsalt - 1 pinch.\n");
    }

    #[test]
    fn test_large_totals_do_not_overflow() {
        let lines = aggregate(vec![row(1, "flour", "g", i32::MAX), row(1, "flour", "g", 1)]);
        assert_eq!(lines[0].total_amount, i64::from(i32::MAX) + 1);
    }
}
