pub mod error;
pub mod fixtures;
pub mod image;
pub mod shopping_list;
pub mod validation;

pub use error::{FixtureError, ImageError};
pub use fixtures::{parse_ingredients, parse_tags, FixtureFormat, IngredientFixture, TagFixture};
pub use image::{decode_data_uri, validate_image, DataUri, MAX_FILE_SIZE};
pub use shopping_list::{CartIngredient, ShoppingListLine};
