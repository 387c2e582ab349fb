//! Recipe write payloads.
//!
//! Create and update accept either a JSON body, where `image` is a
//! `data:image/<ext>;base64,...` string, or `multipart/form-data`, where
//! `image` is a file part and `tags`/`ingredients` are JSON-encoded fields.

use crate::api::{ApiError, JsonBody, Validator};
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
};
use foodgram_core::validation::MAX_NAME_LENGTH;
use foodgram_core::{decode_data_uri, validate_image, ImageError, MAX_FILE_SIZE};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

const MIN_VALUE: &str = "Ensure this value is greater than or equal to 1.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// An integer that clients may also send as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Int(i64),
    Text(String),
}

impl IntegerInput {
    /// Parse a positive `i32`, or the message explaining why not.
    fn positive(&self) -> Result<i32, String> {
        let value = match self {
            IntegerInput::Int(n) => *n,
            IntegerInput::Text(s) => s.trim().parse().map_err(|_| NOT_AN_INTEGER.to_string())?,
        };
        if value < 1 {
            return Err(MIN_VALUE.to_string());
        }
        i32::try_from(value)
            .map_err(|_| format!("Ensure this value is less than or equal to {}.", i32::MAX))
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: i32,
    #[schema(value_type = i32, minimum = 1)]
    pub amount: IntegerInput,
}

/// JSON body for recipe create (all fields required) and update (all optional).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    /// Tag IDs
    pub tags: Option<Vec<i32>>,
    /// `data:image/<ext>;base64,<payload>`
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    /// Cooking time in minutes
    #[schema(value_type = Option<i32>, minimum = 1)]
    pub cooking_time: Option<IntegerInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUri(String),
    Upload(Vec<u8>),
}

/// A recipe write request as received, before validation.
#[derive(Debug, Clone, Default)]
pub struct RecipePayload {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<ImageSource>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<IntegerInput>,
}

impl From<RecipeRequest> for RecipePayload {
    fn from(req: RecipeRequest) -> Self {
        Self {
            ingredients: req.ingredients,
            tags: req.tags,
            image: req.image.map(ImageSource::DataUri),
            name: req.name,
            text: req.text,
            cooking_time: req.cooking_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeImage {
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// A validated recipe write. `None` fields are left unchanged by updates.
#[derive(Debug, Clone, Default)]
pub struct RecipeFields {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<RecipeImage>,
    pub tags: Option<Vec<i32>>,
    /// (ingredient id, amount)
    pub ingredients: Option<Vec<(i32, i32)>>,
}

fn decode_image(source: ImageSource) -> Result<RecipeImage, ImageError> {
    let data = match source {
        ImageSource::DataUri(uri) => decode_data_uri(&uri)?.data,
        ImageSource::Upload(bytes) => bytes,
    };
    let content_type = validate_image(&data)?;
    Ok(RecipeImage { content_type, data })
}

impl RecipePayload {
    /// Check every field. With `partial`, absent fields are allowed.
    pub fn validate(self, partial: bool) -> Result<RecipeFields, ApiError> {
        let mut v = Validator::new();
        let mut fields = RecipeFields::default();

        if !partial || self.name.is_some() {
            fields.name = v.text("name", &self.name, MAX_NAME_LENGTH).map(str::to_string);
        }
        if !partial || self.text.is_some() {
            fields.text = v.text("text", &self.text, usize::MAX).map(str::to_string);
        }

        match &self.cooking_time {
            Some(raw) => match raw.positive() {
                Ok(minutes) => fields.cooking_time = Some(minutes),
                Err(message) => v.add("cooking_time", message),
            },
            None if !partial => v.add("cooking_time", crate::api::REQUIRED),
            None => {}
        }

        match self.image {
            Some(source) => match decode_image(source) {
                Ok(image) => fields.image = Some(image),
                Err(e) => v.add("image", e.to_string()),
            },
            None if !partial => v.add("image", crate::api::REQUIRED),
            None => {}
        }

        match self.tags {
            Some(tags) if tags.is_empty() => v.add("tags", "At least one tag is required."),
            Some(tags) => {
                let unique: HashSet<i32> = tags.iter().copied().collect();
                if unique.len() != tags.len() {
                    v.add("tags", "Tags must not repeat.");
                } else {
                    fields.tags = Some(tags);
                }
            }
            None if !partial => v.add("tags", crate::api::REQUIRED),
            None => {}
        }

        match self.ingredients {
            Some(items) if items.is_empty() => {
                v.add("ingredients", "At least one ingredient is required.")
            }
            Some(items) => {
                let mut seen = HashSet::new();
                let mut parsed = Vec::with_capacity(items.len());
                let mut valid = true;
                for item in &items {
                    if !seen.insert(item.id) {
                        v.add("ingredients", "Ingredients must not repeat.");
                        valid = false;
                        break;
                    }
                    match item.amount.positive() {
                        Ok(amount) => parsed.push((item.id, amount)),
                        Err(message) => {
                            v.add("ingredients", format!("Ingredient {}: {}", item.id, message));
                            valid = false;
                        }
                    }
                }
                if valid {
                    fields.ingredients = Some(parsed);
                }
            }
            None if !partial => v.add("ingredients", crate::api::REQUIRED),
            None => {}
        }

        v.finish()?;
        Ok(fields)
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::field(
            "image",
            ImageError::TooLarge {
                size: MAX_FILE_SIZE + 1,
                max: MAX_FILE_SIZE,
            }
            .to_string(),
        )
    } else {
        ApiError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

/// `tags` as a JSON array (`[1, 2]`) or a single id; repeated parts accumulate.
fn parse_tag_field(value: &str, tags: &mut Vec<i32>) -> Result<(), String> {
    let value = value.trim();
    if value.starts_with('[') {
        let ids: Vec<i32> = serde_json::from_str(value).map_err(|e| e.to_string())?;
        tags.extend(ids);
    } else {
        tags.push(
            value
                .parse()
                .map_err(|_| format!("Incorrect type. Expected pk value, received {:?}.", value))?,
        );
    }
    Ok(())
}

async fn read_multipart(mut multipart: Multipart) -> Result<RecipePayload, ApiError> {
    let mut payload = RecipePayload::default();
    let mut v = Validator::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();

        match name.as_str() {
            "image" => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                payload.image = Some(if !is_file && bytes.starts_with(b"data:") {
                    ImageSource::DataUri(String::from_utf8_lossy(&bytes).into_owned())
                } else {
                    ImageSource::Upload(bytes.to_vec())
                });
            }
            "name" => payload.name = Some(field.text().await.map_err(multipart_error)?),
            "text" => payload.text = Some(field.text().await.map_err(multipart_error)?),
            "cooking_time" => {
                let raw = field.text().await.map_err(multipart_error)?;
                payload.cooking_time = Some(IntegerInput::Text(raw));
            }
            "tags" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let tags = payload.tags.get_or_insert_with(Vec::new);
                if let Err(message) = parse_tag_field(&raw, tags) {
                    v.add("tags", message);
                }
            }
            "ingredients" => {
                let raw = field.text().await.map_err(multipart_error)?;
                match serde_json::from_str::<Vec<IngredientAmountRequest>>(&raw) {
                    Ok(items) => payload.ingredients = Some(items),
                    Err(e) => v.add("ingredients", e.to_string()),
                }
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    v.finish()?;
    Ok(payload)
}

impl<S> FromRequest<S> for RecipePayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await
        } else {
            let JsonBody(body) = JsonBody::<RecipeRequest>::from_request(req, state).await?;
            Ok(body.into())
        }
    }
}
