//! Parsing of the ingredient and tag fixture files loaded by
//! `foodgram import-ingredients` and `foodgram import-tags`.

use serde::Deserialize;
use std::path::Path;

use crate::error::FixtureError;
use crate::validation::{exceeds, is_hex_color, is_slug, MAX_NAME_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientFixture {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagFixture {
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Csv,
    Json,
}

impl FixtureFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(FixtureError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parse ingredients from either a headerless `name,measurement_unit` CSV or a
/// JSON array of objects.
///
/// CSV fields follow the usual quoting rules, so a name or unit containing a
/// comma must be quoted. Errors point at the CSV line or the 1-based JSON
/// array entry.
pub fn parse_ingredients(
    input: &str,
    format: FixtureFormat,
) -> Result<Vec<IngredientFixture>, FixtureError> {
    match format {
        FixtureFormat::Json => serde_json::from_str::<Vec<IngredientFixture>>(input)?
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let ingredient = IngredientFixture {
                    name: raw.name.trim().to_string(),
                    measurement_unit: raw.measurement_unit.trim().to_string(),
                };
                check_ingredient(&ingredient).map_err(|message| FixtureError::InvalidEntry {
                    entry: index + 1,
                    message,
                })?;
                Ok::<_, FixtureError>(ingredient)
            })
            .collect(),
        FixtureFormat::Csv => parse_ingredients_csv(input),
    }
}

fn parse_ingredients_csv(input: &str) -> Result<Vec<IngredientFixture>, FixtureError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut parsed = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let invalid = |message: String| FixtureError::InvalidLine { line, message };

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != 2 {
            return Err(invalid(format!(
                "expected name,measurement_unit, found {} fields",
                record.len()
            )));
        }
        if &record[0] == "name" && &record[1] == "measurement_unit" {
            continue;
        }

        let ingredient = IngredientFixture {
            name: record[0].to_string(),
            measurement_unit: record[1].to_string(),
        };
        check_ingredient(&ingredient).map_err(invalid)?;
        parsed.push(ingredient);
    }

    Ok(parsed)
}

fn check_ingredient(ingredient: &IngredientFixture) -> Result<(), String> {
    if ingredient.name.is_empty() || ingredient.measurement_unit.is_empty() {
        return Err("name and measurement_unit are required".to_string());
    }
    if exceeds(&ingredient.name, MAX_NAME_LENGTH)
        || exceeds(&ingredient.measurement_unit, MAX_NAME_LENGTH)
    {
        return Err(format!("longer than {} characters", MAX_NAME_LENGTH));
    }
    Ok(())
}

/// Parse a JSON array of tags, validating colors and slugs.
pub fn parse_tags(input: &str) -> Result<Vec<TagFixture>, FixtureError> {
    let tags: Vec<TagFixture> = serde_json::from_str(input)?;

    for tag in &tags {
        let invalid = |message: &str| FixtureError::InvalidTag {
            slug: tag.slug.clone(),
            message: message.to_string(),
        };

        if tag.name.trim().is_empty() || exceeds(&tag.name, MAX_NAME_LENGTH) {
            return Err(invalid("name must be 1-200 characters"));
        }
        if !is_hex_color(&tag.color) {
            return Err(invalid("color must look like #RRGGBB"));
        }
        if !is_slug(&tag.slug) || exceeds(&tag.slug, MAX_NAME_LENGTH) {
            return Err(invalid("slug may only contain letters, digits, - and _"));
        }
    }

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FixtureFormat::from_path(Path::new("data/ingredients.CSV")).unwrap(),
            FixtureFormat::Csv
        );
        assert_eq!(
            FixtureFormat::from_path(Path::new("ingredients.json")).unwrap(),
            FixtureFormat::Json
        );
        assert!(FixtureFormat::from_path(Path::new("ingredients.xml")).is_err());
    }

    #[test]
    fn test_parse_csv() {
        let csv = "абрикосовое варенье,г\n\n\"соль, крупная\",по вкусу\n";
        let parsed = parse_ingredients(csv, FixtureFormat::Csv).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "абрикосовое варенье");
        assert_eq!(parsed[0].measurement_unit, "г");
        assert_eq!(parsed[1].name, "соль, крупная");
        assert_eq!(parsed[1].measurement_unit, "по вкусу");
    }

    #[test]
    fn test_parse_csv_quoted_unit_with_comma() {
        let csv = "salt,\"pinch, small\"\n\"say \"\"cheese\"\"\",g\n";
        let parsed = parse_ingredients(csv, FixtureFormat::Csv).unwrap();
        assert_eq!(
            parsed,
            vec![
                IngredientFixture {
                    name: "salt".to_string(),
                    measurement_unit: "pinch, small".to_string(),
                },
                IngredientFixture {
                    name: "say \"cheese\"".to_string(),
                    measurement_unit: "g".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_csv_skips_header() {
        let csv = "name,measurement_unit\nflour,g\n";
        let parsed = parse_ingredients(csv, FixtureFormat::Csv).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "flour");
    }

    #[test]
    fn test_parse_csv_reports_file_line() {
        let csv = "name,measurement_unit\n\nflour,g\nsugar,\n";
        let err = parse_ingredients(csv, FixtureFormat::Csv).unwrap_err();
        assert!(
            matches!(err, FixtureError::InvalidLine { line: 4, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_parse_json_reports_entry() {
        let json = r#"[{"name": "flour", "measurement_unit": "g"}, {"name": " ", "measurement_unit": "g"}]"#;
        let err = parse_ingredients(json, FixtureFormat::Json).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidEntry { entry: 2, .. }));
    }

    #[test]
    fn test_parse_csv_rejects_line_without_unit() {
        let err = parse_ingredients("flour,g\nsugar\n", FixtureFormat::Csv).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[{"name": " flour ", "measurement_unit": "g"}]"#;
        let parsed = parse_ingredients(json, FixtureFormat::Json).unwrap();
        assert_eq!(
            parsed,
            vec![IngredientFixture {
                name: "flour".to_string(),
                measurement_unit: "g".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_tags_validates_color() {
        let ok = r##"[{"name": "Завтрак", "color": "#E26C2D", "slug": "breakfast"}]"##;
        assert_eq!(parse_tags(ok).unwrap().len(), 1);

        let bad = r#"[{"name": "Lunch", "color": "green", "slug": "lunch"}]"#;
        assert!(matches!(
            parse_tags(bad),
            Err(FixtureError::InvalidTag { .. })
        ));
    }
}
