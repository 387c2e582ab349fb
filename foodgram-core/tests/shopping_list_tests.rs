//! Behavioural tests for shopping-list aggregation and image round-trips.

use base64::Engine;
use foodgram_core::shopping_list::{aggregate, render};
use foodgram_core::{decode_data_uri, validate_image, CartIngredient};

fn row(ingredient_id: i32, name: &str, unit: &str, amount: i32) -> CartIngredient {
    CartIngredient {
        ingredient_id,
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount,
    }
}

#[test]
fn test_amounts_are_summed_across_recipes() {
    // R1: A x2. R2: A x3, B x1.
    let rows = vec![
        row(1, "A", "g", 2),
        row(1, "A", "g", 3),
        row(2, "B", "pcs", 1),
    ];

    let lines = aggregate(rows);
    let file = render(&lines);

    assert_eq!(file, "A - 5 g.\nB - 1 pcs.\n");
    assert_eq!(file.lines().filter(|l| l.starts_with("A - ")).count(), 1);
    assert_eq!(file.lines().filter(|l| l.starts_with("B - ")).count(), 1);
}

#[test]
fn test_lines_are_sorted_by_name() {
    let rows = vec![
        row(3, "сахар", "г", 100),
        row(1, "молоко", "мл", 200),
        row(2, "яйца", "шт", 2),
        row(1, "молоко", "мл", 50),
    ];

    let names: Vec<String> = aggregate(rows).into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["молоко", "сахар", "яйца"]);
}

#[test]
fn test_order_of_rows_does_not_change_result() {
    let forward = vec![row(1, "A", "g", 2), row(2, "B", "g", 1), row(1, "A", "g", 3)];
    let mut backward = forward.clone();
    backward.reverse();

    assert_eq!(render(&aggregate(forward)), render(&aggregate(backward)));
}

#[test]
fn test_png_data_uri_round_trip() {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(3, 3));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    let original = buf.into_inner();

    let encoded = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&original)
    );

    let decoded = decode_data_uri(&encoded).unwrap();
    assert_eq!(decoded.extension, "png");
    assert_eq!(decoded.data, original);
    assert_eq!(validate_image(&decoded.data), Ok("image/png"));
}
